//! Remote command execution.
//!
//! The command line is tokenized (double-quoted segments stay whole) and sent
//! with a fixed timeout. If the per-app exec path can't be reached, a
//! secondary top-level path with identical request/response shape is tried
//! before the original failure is surfaced.

use serde_json::{json, Value};

use crate::client::Client;
use crate::error::{ClientError, Result};
use fleet_core::cmdline;

/// Fixed upstream timeout, in seconds, for every exec call.
pub const EXEC_TIMEOUT_SECS: u64 = 30;

/// Output of a remote command, identical for both execution paths.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i64,
}

impl ExecOutput {
    fn from_value(value: &Value) -> Self {
        Self {
            stdout: value
                .get("stdout")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            stderr: value
                .get("stderr")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            exit_code: value.get("exit_code").and_then(Value::as_i64).unwrap_or(0),
        }
    }
}

impl Client {
    /// Run a command on a machine and return its output.
    pub async fn exec(&self, app: &str, machine_id: &str, command_line: &str) -> Result<ExecOutput> {
        let cmd = cmdline::tokenize(command_line);
        if cmd.is_empty() {
            return Err(ClientError::InvalidRequest("empty command".into()));
        }
        let body = json!({ "cmd": cmd, "timeout": EXEC_TIMEOUT_SECS });

        let primary = format!("apps/{app}/machines/{machine_id}/exec");
        let primary_err = match self.post_json(&primary, body.clone()).await {
            Ok(value) => return Ok(ExecOutput::from_value(&value)),
            Err(e) => e,
        };

        tracing::warn!(
            app,
            machine_id,
            error = %primary_err,
            "primary exec path failed, trying direct machine path"
        );
        let fallback = format!("machines/{machine_id}/exec");
        match self.post_json(&fallback, body).await {
            Ok(value) => Ok(ExecOutput::from_value(&value)),
            // The primary error is the one worth reporting.
            Err(_) => Err(primary_err),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
