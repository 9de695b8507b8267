//! Events emitted as dispatched requests complete, and the sinks that receive them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ftapi_shared::FtApiError;
use serde_json::{Value, json};
use tokio::sync::mpsc;

use crate::descriptor::CallKind;

/// Outcome of one dispatched request.
#[derive(Debug)]
pub enum ContentEvent {
    /// The transport returned a body.
    ItemReceived {
        kind: CallKind,
        /// Requested id; `None` for collection calls.
        id: Option<String>,
        data: Value,
        received_at: DateTime<Utc>,
    },
    /// The transport reported a failure.
    Error {
        kind: CallKind,
        id: Option<String>,
        error: FtApiError,
        received_at: DateTime<Utc>,
    },
}

impl ContentEvent {
    pub const ITEM_RECEIVED: &'static str = "itemReceived";
    pub const ERROR: &'static str = "error";

    /// Event name as seen by subscribers.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ItemReceived { .. } => Self::ITEM_RECEIVED,
            Self::Error { .. } => Self::ERROR,
        }
    }

    pub fn kind(&self) -> CallKind {
        match self {
            Self::ItemReceived { kind, .. } | Self::Error { kind, .. } => *kind,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::ItemReceived { id, .. } | Self::Error { id, .. } => id.as_deref(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// JSON rendering used for line-oriented output.
    pub fn to_json(&self) -> Value {
        match self {
            Self::ItemReceived {
                kind,
                id,
                data,
                received_at,
            } => json!({
                "event": self.name(),
                "call": kind,
                "id": id,
                "receivedAt": received_at,
                "data": data,
            }),
            Self::Error {
                kind,
                id,
                error,
                received_at,
            } => json!({
                "event": self.name(),
                "call": kind,
                "id": id,
                "receivedAt": received_at,
                "error": error.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Publish capability injected into the client.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: ContentEvent);
}

/// Sink that drops every event, for headless usage.
pub struct SilentSink;

impl EventSink for SilentSink {
    fn publish(&self, _event: ContentEvent) {}
}

impl EventSink for mpsc::UnboundedSender<ContentEvent> {
    fn publish(&self, event: ContentEvent) {
        if self.send(event).is_err() {
            tracing::debug!("event receiver dropped, discarding event");
        }
    }
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn publish(&self, event: ContentEvent) {
        (**self).publish(event);
    }
}

/// Create an unbounded channel whose sender can be handed to a client.
pub fn channel() -> (
    mpsc::UnboundedSender<ContentEvent>,
    mpsc::UnboundedReceiver<ContentEvent>,
) {
    mpsc::unbounded_channel()
}
