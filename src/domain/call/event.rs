//! Call session domain events

use crate::domain::call::entity::Participant;
use crate::domain::call::value_object::{CallDirection, EndReason};
use crate::domain::shared::events::EventMetadata;
use crate::domain::shared::value_objects::SessionRef;
use serde::{Deserialize, Serialize};

/// Common fields of every session event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEventBase {
    pub metadata: EventMetadata,
    pub session_ref: SessionRef,
}

impl SessionEventBase {
    fn new(event_type: &str, session_ref: SessionRef) -> Self {
        Self {
            metadata: EventMetadata::new(event_type.to_string()),
            session_ref,
        }
    }
}

/// Events recorded by the call session aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Session created
    Created {
        base: SessionEventBase,
        participant: Participant,
        direction: CallDirection,
    },
    /// Both sides agreed, media setup started
    Connecting { base: SessionEventBase },
    /// Media is flowing
    Connected { base: SessionEventBase },
    /// Session reached its terminal state
    Ended {
        base: SessionEventBase,
        reason: EndReason,
        duration_seconds: u64,
    },
}

impl SessionEvent {
    pub fn created(
        session_ref: SessionRef,
        participant: Participant,
        direction: CallDirection,
    ) -> Self {
        SessionEvent::Created {
            base: SessionEventBase::new("call.created", session_ref),
            participant,
            direction,
        }
    }

    pub fn connecting(session_ref: SessionRef) -> Self {
        SessionEvent::Connecting {
            base: SessionEventBase::new("call.connecting", session_ref),
        }
    }

    pub fn connected(session_ref: SessionRef) -> Self {
        SessionEvent::Connected {
            base: SessionEventBase::new("call.connected", session_ref),
        }
    }

    pub fn ended(session_ref: SessionRef, reason: EndReason, duration_seconds: u64) -> Self {
        SessionEvent::Ended {
            base: SessionEventBase::new("call.ended", session_ref),
            reason,
            duration_seconds,
        }
    }

    pub fn event_type(&self) -> &str {
        match self {
            SessionEvent::Created { base, .. }
            | SessionEvent::Connecting { base }
            | SessionEvent::Connected { base }
            | SessionEvent::Ended { base, .. } => &base.metadata.event_type,
        }
    }
}
