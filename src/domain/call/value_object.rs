//! Call value objects

use serde::{Deserialize, Serialize};

/// Call direction, fixed at session creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallDirection {
    /// Placed by the local user
    Outgoing,
    /// Signaled by the remote party
    Incoming,
}

/// Call session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallStatus {
    /// Outgoing call placed, waiting for the remote party to react
    Calling,
    /// Incoming call, local user is being alerted
    Ringing,
    /// Accepted on both sides, media path being set up
    Connecting,
    /// Media is flowing, duration is ticking
    Connected,
    /// Terminal state, kept briefly for display
    Ended(EndReason),
}

impl CallStatus {
    /// Check if a state transition is valid
    pub fn can_transition_to(&self, new_status: &CallStatus) -> bool {
        use CallStatus::*;

        match (self, new_status) {
            (Calling, Connecting) => true,
            (Calling, Ended(_)) => true,

            (Ringing, Connecting) => true,
            (Ringing, Ended(_)) => true,

            (Connecting, Connected) => true,
            (Connecting, Ended(_)) => true,

            (Connected, Ended(_)) => true,

            // Terminal; the slot clears back to idle instead
            (Ended(_), _) => false,

            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, CallStatus::Ended(_))
    }

    /// States that must make progress or be reaped by the watchdog
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            CallStatus::Calling | CallStatus::Ringing | CallStatus::Connecting
        )
    }
}

/// Reason a session reached its terminal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Local user ended a connected call
    LocalHangup,
    /// Remote party ended a connected call
    RemoteHangup,
    /// Local user declined an incoming call
    Declined,
    /// Remote party rejected our outgoing call
    RemoteRejected,
    /// Local user abandoned an outgoing attempt
    Cancelled,
    /// Remote caller withdrew before we answered
    RemoteCancelled,
    /// Remote party was already in a call
    Busy,
    /// No progressing signal within the watchdog bound
    Timeout,
    /// Outbound signaling could not be delivered
    TransportFailed,
}
