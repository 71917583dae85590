//! Lifecycle orchestrator.
//!
//! Drives a user-initiated action against a remote resource through an
//! explicit per-target state machine:
//!
//! `Idle → AwaitingConfirmation → Executing → Succeeded | Failed → Idle`
//!
//! One record per target resource id makes the "no concurrent duplicate
//! action" invariant mechanically enforceable: the transition into
//! `Executing` happens under the lock before any network call, so a second
//! `execute` on the same target observes `Executing` and is rejected without
//! touching the SDK. Confirmation for destructive actions is exact string
//! equality against the target's label, never fuzzy.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::cache::{CacheKey, ResourceCache};
use crate::client::Client;
use crate::error::ClientError;
use crate::exec::ExecOutput;
use fleet_core::resource::MachineSignal;

// ---------------------------------------------------------------------------
// Action model
// ---------------------------------------------------------------------------

/// What kind of resource an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    App,
    Machine,
    Volume,
    Secret,
}

/// The requested operation. `Signal`, `Clone`, and `Exec` carry parameters;
/// everything else is identified by the target alone.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    Start,
    Stop,
    Restart,
    Suspend,
    Signal(MachineSignal),
    Delete,
    Clone {
        name: Option<String>,
        region: Option<String>,
    },
    Exec {
        command: String,
    },
}

impl ActionKind {
    /// Destructive actions require the user to retype the target's label.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Delete)
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Suspend => "suspend",
            Self::Signal(_) => "signal",
            Self::Delete => "delete",
            Self::Clone { .. } => "clone",
            Self::Exec { .. } => "exec",
        }
    }
}

/// Ephemeral action request — exists only from confirmation to completion.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub resource: ResourceKind,
    /// App the target belongs to. For app targets this equals the app name.
    pub app: String,
    pub target_id: String,
    /// Human label shown in (and retyped into) the confirmation dialog.
    pub target_label: String,
}

/// Per-target state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    AwaitingConfirmation,
    Executing,
    Succeeded,
    Failed,
}

/// What a completed action means for the caller's view.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Completed,
    /// Deletion completed — the target's detail view is now invalid.
    NavigateAway,
    Cloned { new_id: String },
    ExecFinished(ExecOutput),
}

/// Non-blocking, dismissable user feedback.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub success: bool,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("no pending action for target '{0}'")]
    NoPendingAction(String),

    #[error("an action is already executing for target '{0}'")]
    Busy(String),

    #[error("confirmation required: type the resource name to confirm")]
    NotConfirmed,

    #[error("{kind} is not supported for this resource")]
    UnsupportedAction { kind: &'static str },

    #[error("action failed: {0}")]
    ActionFailed(String),
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

struct PendingAction {
    request: ActionRequest,
    state: ActionState,
    confirmed: bool,
}

struct Inner {
    actions: HashMap<String, PendingAction>,
    cache: ResourceCache,
    notifications: Vec<Notification>,
}

pub struct Orchestrator {
    client: Client,
    inner: Mutex<Inner>,
}

impl Orchestrator {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            inner: Mutex::new(Inner {
                actions: HashMap::new(),
                cache: ResourceCache::default(),
                notifications: Vec::new(),
            }),
        }
    }

    /// The underlying SDK client, for read paths that bypass the state
    /// machine.
    pub fn client_ref(&self) -> &Client {
        &self.client
    }

    /// A poisoned lock means a panic elsewhere; the state is still usable.
    fn guard(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    // -- intent -------------------------------------------------------------

    /// Register intent and enter `AwaitingConfirmation`.
    ///
    /// Non-destructive actions are armed immediately; destructive ones stay
    /// unarmed until [`confirm`](Self::confirm) succeeds. A request against a
    /// target that is currently `Executing` is rejected. A pending
    /// (unexecuted) request is replaced — the user changed their mind.
    pub fn request(&self, request: ActionRequest) -> Result<(), OrchestratorError> {
        validate_kind(&request)?;
        let mut inner = self.guard();
        if let Some(existing) = inner.actions.get(&request.target_id) {
            if existing.state == ActionState::Executing {
                return Err(OrchestratorError::Busy(request.target_id));
            }
        }
        let confirmed = !request.kind.is_destructive();
        let target_id = request.target_id.clone();
        inner.actions.insert(
            target_id,
            PendingAction {
                request,
                state: ActionState::AwaitingConfirmation,
                confirmed,
            },
        );
        Ok(())
    }

    /// Arm a destructive action: `typed` must equal the target's label
    /// exactly. Returns whether execution is now permitted.
    pub fn confirm(&self, target_id: &str, typed: &str) -> bool {
        let mut inner = self.guard();
        let Some(action) = inner.actions.get_mut(target_id) else {
            return false;
        };
        if action.state != ActionState::AwaitingConfirmation {
            return false;
        }
        action.confirmed = typed == action.request.target_label;
        action.confirmed
    }

    /// Abandon a not-yet-executing action. The only cancellation point:
    /// once `execute` starts, the mutating call is not cancellable.
    pub fn cancel(&self, target_id: &str) {
        let mut inner = self.guard();
        if let Some(action) = inner.actions.get(target_id) {
            if action.state == ActionState::AwaitingConfirmation {
                inner.actions.remove(target_id);
            }
        }
    }

    pub fn state_of(&self, target_id: &str) -> ActionState {
        let inner = self.guard();
        inner
            .actions
            .get(target_id)
            .map(|a| a.state)
            .unwrap_or(ActionState::Idle)
    }

    /// Drain accumulated notifications, oldest first.
    pub fn take_notifications(&self) -> Vec<Notification> {
        let mut inner = self.guard();
        std::mem::take(&mut inner.notifications)
    }

    // -- execution ----------------------------------------------------------

    /// Run the confirmed action: exactly one SDK mutating call, then cache
    /// invalidation on success or a notification on failure. Either way the
    /// target returns to `Idle`; retries are user-initiated.
    pub async fn execute(&self, target_id: &str) -> Result<ActionOutcome, OrchestratorError> {
        let request = {
            let mut inner = self.guard();
            let action = inner
                .actions
                .get_mut(target_id)
                .ok_or_else(|| OrchestratorError::NoPendingAction(target_id.to_string()))?;
            if action.state == ActionState::Executing {
                return Err(OrchestratorError::Busy(target_id.to_string()));
            }
            if !action.confirmed {
                return Err(OrchestratorError::NotConfirmed);
            }
            action.state = ActionState::Executing;
            action.request.clone()
        };

        let result = self.dispatch(&request).await;

        let mut inner = self.guard();
        inner.actions.remove(target_id);
        match result {
            Ok(outcome) => {
                invalidate_for(&mut inner.cache, &request);
                inner.notifications.push(Notification {
                    message: format!(
                        "{} {} succeeded",
                        request.kind.describe(),
                        request.target_label
                    ),
                    success: true,
                    at: Utc::now(),
                });
                Ok(outcome)
            }
            Err(e) => {
                inner.notifications.push(Notification {
                    message: format!(
                        "{} {} failed: {e}",
                        request.kind.describe(),
                        request.target_label
                    ),
                    success: false,
                    at: Utc::now(),
                });
                Err(OrchestratorError::ActionFailed(e.to_string()))
            }
        }
    }

    async fn dispatch(&self, request: &ActionRequest) -> Result<ActionOutcome, ClientError> {
        let app = &request.app;
        let id = &request.target_id;
        match (&request.kind, request.resource) {
            (ActionKind::Start, ResourceKind::Machine) => {
                self.client.start_machine(app, id).await?;
                Ok(ActionOutcome::Completed)
            }
            (ActionKind::Stop, ResourceKind::Machine) => {
                self.client.stop_machine(app, id).await?;
                Ok(ActionOutcome::Completed)
            }
            (ActionKind::Restart, ResourceKind::Machine) => {
                self.client.restart_machine(app, id).await?;
                Ok(ActionOutcome::Completed)
            }
            (ActionKind::Suspend, ResourceKind::Machine) => {
                self.client.suspend_machine(app, id).await?;
                Ok(ActionOutcome::Completed)
            }
            (ActionKind::Signal(signal), ResourceKind::Machine) => {
                self.client.signal_machine(app, id, *signal).await?;
                Ok(ActionOutcome::Completed)
            }
            (ActionKind::Delete, ResourceKind::Machine) => {
                self.client.delete_machine(app, id, false).await?;
                Ok(ActionOutcome::NavigateAway)
            }
            (ActionKind::Delete, ResourceKind::App) => {
                self.client.delete_app(app).await?;
                Ok(ActionOutcome::NavigateAway)
            }
            (ActionKind::Delete, ResourceKind::Volume) => {
                self.client.delete_volume(app, id).await?;
                Ok(ActionOutcome::NavigateAway)
            }
            (ActionKind::Delete, ResourceKind::Secret) => {
                self.client.unset_secret(app, id).await?;
                Ok(ActionOutcome::NavigateAway)
            }
            (ActionKind::Clone { name, region }, ResourceKind::Machine) => {
                // Read-then-create: the clone reflects the read-time snapshot.
                let source = self.client.get_machine(app, id).await?;
                let clone_name = name
                    .clone()
                    .unwrap_or_else(|| format!("{}-clone-{}", source.name, short_suffix()));
                let mut payload = json!({ "name": clone_name, "config": source.config });
                if let Some(region) = region {
                    payload["region"] = json!(region);
                } else if source.region != fleet_core::resource::UNKNOWN {
                    payload["region"] = json!(source.region);
                }
                let machine = self.client.create_machine(app, payload).await?;
                Ok(ActionOutcome::Cloned { new_id: machine.id })
            }
            (ActionKind::Exec { command }, ResourceKind::Machine) => {
                let output = self.client.exec(app, id, command).await?;
                Ok(ActionOutcome::ExecFinished(output))
            }
            // validate_kind rejects these at request time.
            _ => Err(ClientError::InvalidRequest(format!(
                "{} is not supported for this resource",
                request.kind.describe()
            ))),
        }
    }

    // -- cache --------------------------------------------------------------

    /// Read a cached snapshot. Reading is open to all; invalidation is not.
    pub fn cache_get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let inner = self.guard();
        inner.cache.get(key)
    }

    /// Store a freshly fetched snapshot.
    pub fn cache_put<T: Serialize>(&self, key: CacheKey, value: &T) {
        let mut inner = self.guard();
        inner.cache.put(key, value);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_kind(request: &ActionRequest) -> Result<(), OrchestratorError> {
    let ok = match request.kind {
        ActionKind::Delete => true,
        ActionKind::Start
        | ActionKind::Stop
        | ActionKind::Restart
        | ActionKind::Suspend
        | ActionKind::Signal(_)
        | ActionKind::Clone { .. }
        | ActionKind::Exec { .. } => request.resource == ResourceKind::Machine,
    };
    if ok {
        Ok(())
    } else {
        Err(OrchestratorError::UnsupportedAction {
            kind: request.kind.describe(),
        })
    }
}

fn invalidate_for(cache: &mut ResourceCache, request: &ActionRequest) {
    match request.resource {
        ResourceKind::Machine => cache.invalidate_machines(&request.app),
        ResourceKind::App => cache.invalidate_app(&request.app),
        ResourceKind::Volume => cache.invalidate_volumes(&request.app),
        ResourceKind::Secret => cache.invalidate_secrets(&request.app),
    }
}

fn short_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..4].to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
