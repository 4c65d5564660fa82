//! Call signaling events exchanged over the socket bridge

use crate::domain::call::entity::Participant;
use crate::domain::shared::value_objects::SessionRef;
use serde::{Deserialize, Serialize};

/// Signaling event received from the remote party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundSignal {
    /// Remote party is calling us
    Incoming {
        participant: Participant,
        session_ref: SessionRef,
    },
    /// Remote party accepted our outgoing call
    Accept { session_ref: SessionRef },
    /// Remote party rejected our outgoing call
    Reject { session_ref: SessionRef },
    /// Remote party ended a connected call
    Hangup { session_ref: SessionRef },
    /// Remote caller withdrew before we answered
    Cancel { session_ref: SessionRef },
    /// Remote party is already in a call
    Busy { session_ref: SessionRef },
    /// Remote media path is ready
    MediaReady { session_ref: SessionRef },
}

impl InboundSignal {
    /// Session this signal addresses
    pub fn session_ref(&self) -> SessionRef {
        match self {
            InboundSignal::Incoming { session_ref, .. }
            | InboundSignal::Accept { session_ref }
            | InboundSignal::Reject { session_ref }
            | InboundSignal::Hangup { session_ref }
            | InboundSignal::Cancel { session_ref }
            | InboundSignal::Busy { session_ref }
            | InboundSignal::MediaReady { session_ref } => *session_ref,
        }
    }
}

/// Signaling event emitted toward the remote party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundSignal {
    /// Place a call to the given participant
    Invite {
        participant: Participant,
        session_ref: SessionRef,
    },
    /// Accept their incoming call
    Accept { session_ref: SessionRef },
    /// Decline their incoming call
    Reject { session_ref: SessionRef },
    /// End the connected call
    Hangup { session_ref: SessionRef },
    /// Withdraw our outgoing attempt
    Cancel { session_ref: SessionRef },
    /// We are already in a call
    Busy { session_ref: SessionRef },
    /// Our media path is ready
    MediaReady { session_ref: SessionRef },
}

impl OutboundSignal {
    pub fn session_ref(&self) -> SessionRef {
        match self {
            OutboundSignal::Invite { session_ref, .. }
            | OutboundSignal::Accept { session_ref }
            | OutboundSignal::Reject { session_ref }
            | OutboundSignal::Hangup { session_ref }
            | OutboundSignal::Cancel { session_ref }
            | OutboundSignal::Busy { session_ref }
            | OutboundSignal::MediaReady { session_ref } => *session_ref,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OutboundSignal::Invite { .. } => "invite",
            OutboundSignal::Accept { .. } => "accept",
            OutboundSignal::Reject { .. } => "reject",
            OutboundSignal::Hangup { .. } => "hangup",
            OutboundSignal::Cancel { .. } => "cancel",
            OutboundSignal::Busy { .. } => "busy",
            OutboundSignal::MediaReady { .. } => "media_ready",
        }
    }
}
