use std::path::Path;

use anyhow::{anyhow, Result};

use fleet_core::config::ConsoleConfig;

// ---------------------------------------------------------------------------
// ui
// ---------------------------------------------------------------------------

pub fn run(config_path: &Path, port: u16, no_open: bool) -> Result<()> {
    let config = ConsoleConfig::load(config_path).map_err(|e| anyhow!("{e}"))?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        let url = format!("http://localhost:{actual_port}");

        println!("Fleet console → {url}  (upstream: {})", config.upstream_base_url);
        if !no_open {
            let _ = open::that(&url);
        }

        tokio::select! {
            res = fleet_server::serve_on(&config, listener) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
