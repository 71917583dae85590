//! Remote resource models and payload normalization.
//!
//! Upstream list/detail payloads drift in shape; every constructor here
//! guarantees the display fields (`id`, `name`, state) are populated,
//! substituting `"unknown"` for anything absent or malformed. Displayed state
//! is always a cache of last-known-remote-state — nothing here simulates a
//! transition.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder used when a required display field is missing upstream.
pub const UNKNOWN: &str = "unknown";

fn str_or_unknown(value: &Value, key: &str) -> String {
    match value.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => {
            tracing::debug!(field = key, "upstream payload missing field, defaulting");
            UNKNOWN.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// MachineState
// ---------------------------------------------------------------------------

/// Remote machine lifecycle state. A destroyed machine is observed only as
/// absence from list/get results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineState {
    Created,
    Started,
    Stopped,
    Suspended,
    Destroyed,
    Unknown,
}

impl MachineState {
    /// Case-insensitive parse; unrecognized states map to `Unknown`, never an
    /// error — the remote API may grow states this console doesn't know.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "created" => Self::Created,
            "started" => Self::Started,
            "stopped" => Self::Stopped,
            "suspended" => Self::Suspended,
            "destroyed" => Self::Destroyed,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for MachineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Started => "started",
            Self::Stopped => "stopped",
            Self::Suspended => "suspended",
            Self::Destroyed => "destroyed",
            Self::Unknown => UNKNOWN,
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// MachineSignal
// ---------------------------------------------------------------------------

/// The fixed set of signals that may be sent to a machine. Signals are
/// advisory; a successful call only confirms delivery was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MachineSignal {
    Sigint,
    Sigterm,
    Sigkill,
    Sighup,
    Sigquit,
    Sigusr1,
    Sigusr2,
}

impl MachineSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sigint => "SIGINT",
            Self::Sigterm => "SIGTERM",
            Self::Sigkill => "SIGKILL",
            Self::Sighup => "SIGHUP",
            Self::Sigquit => "SIGQUIT",
            Self::Sigusr1 => "SIGUSR1",
            Self::Sigusr2 => "SIGUSR2",
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    pub id: String,
    pub name: String,
    pub status: String,
    pub org_slug: String,
}

impl App {
    pub fn from_value(value: &Value) -> Self {
        let org_slug = value
            .get("organization")
            .and_then(|o| o.get("slug"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string();
        Self {
            id: str_or_unknown(value, "id"),
            name: str_or_unknown(value, "name"),
            status: str_or_unknown(value, "status"),
            org_slug,
        }
    }
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub id: String,
    pub name: String,
    pub state: MachineState,
    pub region: String,
    /// Full machine configuration snapshot, kept verbatim for cloning.
    pub config: Value,
}

impl Machine {
    pub fn from_value(value: &Value) -> Self {
        let state = value
            .get("state")
            .and_then(Value::as_str)
            .map(MachineState::parse)
            .unwrap_or(MachineState::Unknown);
        Self {
            id: str_or_unknown(value, "id"),
            name: str_or_unknown(value, "name"),
            state,
            region: str_or_unknown(value, "region"),
            config: value.get("config").cloned().unwrap_or(Value::Null),
        }
    }
}

// ---------------------------------------------------------------------------
// Volume
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    pub id: String,
    pub name: String,
    pub state: String,
    pub region: String,
    pub size_gb: u64,
}

impl Volume {
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: str_or_unknown(value, "id"),
            name: str_or_unknown(value, "name"),
            state: str_or_unknown(value, "state"),
            region: str_or_unknown(value, "region"),
            size_gb: value.get("size_gb").and_then(Value::as_u64).unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Secret
// ---------------------------------------------------------------------------

/// Secret metadata only — values never round-trip through the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,
    pub digest: String,
}

impl Secret {
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: str_or_unknown(value, "name"),
            digest: str_or_unknown(value, "digest"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
