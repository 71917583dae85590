use anyhow::{anyhow, Result};
use serde_json::json;

use crate::output::print_json;
use fleet_core::config::store_path;
use fleet_core::credential::Credential;
use fleet_core::store::ConsoleStore;

// ---------------------------------------------------------------------------
// login
// ---------------------------------------------------------------------------

pub fn run(token: &str, org: Option<&str>, json: bool) -> Result<()> {
    // Prefix check happens before anything touches disk.
    let credential = Credential::new(token, org).map_err(|e| anyhow!("{e}"))?;

    let store = ConsoleStore::open(&store_path()).map_err(|e| anyhow!("{e}"))?;
    store.set_credential(&credential).map_err(|e| anyhow!("{e}"))?;

    if json {
        return print_json(&json!({ "logged_in": true, "org": credential.org_slug }));
    }
    println!("Logged in (org: {}).", credential.org_slug);
    Ok(())
}

// ---------------------------------------------------------------------------
// logout
// ---------------------------------------------------------------------------

pub fn run_logout(json: bool) -> Result<()> {
    let store = ConsoleStore::open(&store_path()).map_err(|e| anyhow!("{e}"))?;
    store.clear_credential().map_err(|e| anyhow!("{e}"))?;

    if json {
        return print_json(&json!({ "logged_in": false }));
    }
    println!("Logged out.");
    Ok(())
}
