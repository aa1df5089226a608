use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::authz::Role;

pub const SESSION_ACTIVATED: &str = "session.activated";
pub const SESSION_CLEARED: &str = "session.cleared";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent<T> {
    pub id: Uuid,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
    /// Session the event belongs to.
    pub subject_id: Uuid,
    pub payload: T,
}

impl<T> DomainEvent<T> {
    pub fn new(name: impl Into<String>, subject_id: Uuid, payload: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            occurred_at: Utc::now(),
            subject_id,
            payload,
        }
    }
}

pub type EventBus = broadcast::Sender<Value>;

pub fn init_event_bus() -> (EventBus, broadcast::Receiver<Value>) {
    broadcast::channel(1024)
}

/// Payload of session lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTransition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    pub capabilities: usize,
}

impl SessionTransition {
    pub fn activated(role: Role, capabilities: usize) -> Self {
        Self {
            role: Some(role),
            role_name: role.name().map(str::to_string),
            capabilities,
        }
    }

    pub fn cleared() -> Self {
        Self {
            role: None,
            role_name: None,
            capabilities: 0,
        }
    }
}

/// Sends a session event on the bus. Having no subscribers is not an error.
pub fn publish(event_bus: &EventBus, name: &str, session_id: Uuid, transition: SessionTransition) {
    let event = DomainEvent::new(name, session_id, transition);
    match serde_json::to_value(&event) {
        Ok(value) => {
            let _ = event_bus.send(value);
        }
        Err(err) => tracing::error!("failed to encode session event: {}", err),
    }
}

/// Logs every session transition seen on the bus until it closes.
pub async fn start_audit_listener(mut rx: broadcast::Receiver<Value>) {
    tracing::info!("session audit listener started");
    loop {
        let event = match rx.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "session audit listener lagged");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        let name = event.get("name").and_then(|v| v.as_str()).unwrap_or("unknown");
        let session = event.get("subject_id").and_then(|v| v.as_str()).unwrap_or("-");
        let payload = event.get("payload");
        let role = payload
            .and_then(|p| p.get("role_name"))
            .and_then(|v| v.as_str())
            .unwrap_or("none");
        let capabilities = payload
            .and_then(|p| p.get("capabilities"))
            .and_then(|v| v.as_u64())
            .unwrap_or(0);

        tracing::info!(event = %name, session = %session, role = %role, capabilities, "session transition");
    }
    tracing::info!("session audit listener stopped");
}
