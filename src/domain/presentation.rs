//! Visible-surface projection
//!
//! Pure function of manager state; all real logic lives in the two
//! managers, the selector only decides which surface the shell shows.

use crate::domain::call::{CallSession, CallStatus};
use crate::domain::notification::NotificationEvent;
use serde::{Deserialize, Serialize};

/// Which UI surface is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveSurface {
    /// Nothing call- or notification-related is visible
    Idle,
    /// Incoming call prompt (accept/decline)
    IncomingCallPrompt,
    /// Outgoing "calling..." banner
    OutgoingCallBanner,
    /// Full in-call window
    CallWindow,
    /// Transient "Call Ended" banner during the grace period
    CallEndedBanner,
    /// Stacked notification items
    NotificationStack,
}

/// Decide the visible surface; call surfaces outrank the stack
pub fn select_surface(
    call: Option<&CallSession>,
    notifications: &[NotificationEvent],
) -> ActiveSurface {
    if let Some(session) = call {
        return match session.status() {
            CallStatus::Ringing => ActiveSurface::IncomingCallPrompt,
            CallStatus::Calling => ActiveSurface::OutgoingCallBanner,
            CallStatus::Connecting | CallStatus::Connected => ActiveSurface::CallWindow,
            CallStatus::Ended(_) => ActiveSurface::CallEndedBanner,
        };
    }

    if notifications.is_empty() {
        ActiveSurface::Idle
    } else {
        ActiveSurface::NotificationStack
    }
}
