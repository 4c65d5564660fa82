//! Call session aggregate root

use crate::domain::call::entity::Participant;
use crate::domain::call::event::SessionEvent;
use crate::domain::call::value_object::{CallDirection, CallStatus, EndReason};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::SessionRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The one call the client may hold at a time
///
/// Enforces the transition table and keeps the per-session bookkeeping
/// (toggles, start time, ticked duration). A session never moves out of
/// `Ended`; the manager replaces the whole slot instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSession {
    /// Signaling correlation token
    session_ref: SessionRef,
    /// Remote party
    participant: Participant,
    /// Fixed at creation
    direction: CallDirection,
    /// Current state
    status: CallStatus,
    /// Microphone muted, effective only while connected
    muted: bool,
    /// Speaker output, effective only while connected
    speaker_on: bool,
    /// Stamped on transition into `Connected`
    started_at: Option<DateTime<Utc>>,
    /// Advanced once per second while connected
    duration_seconds: u64,
    /// Pending domain events
    #[serde(skip)]
    events: Vec<SessionEvent>,
}

impl CallSession {
    /// Create the outgoing leg of a call the local user placed
    pub fn outgoing(participant: Participant) -> Self {
        Self::new(SessionRef::new(), participant, CallDirection::Outgoing)
    }

    /// Create the local session for a remote party's incoming call
    pub fn incoming(session_ref: SessionRef, participant: Participant) -> Self {
        Self::new(session_ref, participant, CallDirection::Incoming)
    }

    fn new(session_ref: SessionRef, participant: Participant, direction: CallDirection) -> Self {
        let status = match direction {
            CallDirection::Outgoing => CallStatus::Calling,
            CallDirection::Incoming => CallStatus::Ringing,
        };

        let mut session = Self {
            session_ref,
            participant: participant.clone(),
            direction,
            status,
            muted: false,
            speaker_on: false,
            started_at: None,
            duration_seconds: 0,
            events: Vec::new(),
        };

        session.record_event(SessionEvent::created(session_ref, participant, direction));
        session
    }

    /// Both sides agreed; media setup starts
    pub fn begin_connecting(&mut self) -> Result<()> {
        self.transition_to(CallStatus::Connecting)?;
        self.record_event(SessionEvent::connecting(self.session_ref));
        Ok(())
    }

    /// Media path is ready; the call is live
    pub fn connect(&mut self) -> Result<()> {
        self.transition_to(CallStatus::Connected)?;
        self.started_at = Some(Utc::now());
        self.duration_seconds = 0;
        self.record_event(SessionEvent::connected(self.session_ref));
        Ok(())
    }

    /// Move to the terminal state
    pub fn end(&mut self, reason: EndReason) -> Result<()> {
        self.transition_to(CallStatus::Ended(reason.clone()))?;
        self.record_event(SessionEvent::ended(
            self.session_ref,
            reason,
            self.duration_seconds,
        ));
        Ok(())
    }

    /// One-second duration tick, driven by the runtime while connected
    pub fn tick_duration(&mut self) {
        if self.status == CallStatus::Connected {
            self.duration_seconds += 1;
        }
    }

    /// Toggle the microphone; a no-op unless connected
    ///
    /// Returns the resulting value either way, never an error.
    pub fn toggle_mute(&mut self) -> bool {
        if self.status == CallStatus::Connected {
            self.muted = !self.muted;
        }
        self.muted
    }

    /// Toggle the speaker; a no-op unless connected
    pub fn toggle_speaker(&mut self) -> bool {
        if self.status == CallStatus::Connected {
            self.speaker_on = !self.speaker_on;
        }
        self.speaker_on
    }

    fn transition_to(&mut self, new_status: CallStatus) -> Result<()> {
        if !self.status.can_transition_to(&new_status) {
            return Err(DomainError::InvalidStateTransition(format!(
                "Cannot transition from {:?} to {:?}",
                self.status, new_status
            )));
        }

        self.status = new_status;
        Ok(())
    }

    fn record_event(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // Getters
    pub fn session_ref(&self) -> SessionRef {
        self.session_ref
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    pub fn direction(&self) -> CallDirection {
        self.direction
    }

    pub fn status(&self) -> &CallStatus {
        &self.status
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_speaker_on(&self) -> bool {
        self.speaker_on
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_terminal(&self) -> bool {
        !self.status.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::value_objects::UserId;

    fn remote_party() -> Participant {
        Participant::new(UserId::new("u-bob"), "Bob".to_string(), None)
    }

    #[test]
    fn test_outgoing_lifecycle() {
        let mut session = CallSession::outgoing(remote_party());
        assert_eq!(*session.status(), CallStatus::Calling);
        assert_eq!(session.direction(), CallDirection::Outgoing);

        session.begin_connecting().unwrap();
        assert_eq!(*session.status(), CallStatus::Connecting);

        session.connect().unwrap();
        assert_eq!(*session.status(), CallStatus::Connected);
        assert!(session.started_at().is_some());
        assert_eq!(session.duration_seconds(), 0);

        for _ in 0..5 {
            session.tick_duration();
        }
        assert_eq!(session.duration_seconds(), 5);

        session.end(EndReason::LocalHangup).unwrap();
        assert!(session.is_terminal());

        let events = session.take_events();
        assert_eq!(events.len(), 4); // Created, Connecting, Connected, Ended
    }

    #[test]
    fn test_incoming_starts_ringing() {
        let session = CallSession::incoming(SessionRef::new(), remote_party());
        assert_eq!(*session.status(), CallStatus::Ringing);
        assert_eq!(session.direction(), CallDirection::Incoming);
    }

    #[test]
    fn test_cannot_connect_while_ringing() {
        let mut session = CallSession::incoming(SessionRef::new(), remote_party());
        assert!(session.connect().is_err());
    }

    #[test]
    fn test_cannot_transition_after_ended() {
        let mut session = CallSession::outgoing(remote_party());
        session.end(EndReason::Cancelled).unwrap();
        assert!(session.begin_connecting().is_err());
        assert!(session.end(EndReason::Timeout).is_err());
    }

    #[test]
    fn test_toggles_are_noops_unless_connected() {
        let mut session = CallSession::outgoing(remote_party());
        assert!(!session.toggle_mute());
        assert!(!session.toggle_speaker());

        session.begin_connecting().unwrap();
        session.connect().unwrap();
        assert!(session.toggle_mute());
        assert!(session.is_muted());
        assert!(session.toggle_speaker());

        session.end(EndReason::RemoteHangup).unwrap();
        assert!(session.toggle_mute()); // stays true, no flip after ended
        assert!(session.is_muted());
    }

    #[test]
    fn test_tick_only_counts_while_connected() {
        let mut session = CallSession::outgoing(remote_party());
        session.tick_duration();
        assert_eq!(session.duration_seconds(), 0);

        session.begin_connecting().unwrap();
        session.connect().unwrap();
        session.tick_duration();
        session.end(EndReason::LocalHangup).unwrap();
        session.tick_duration();
        assert_eq!(session.duration_seconds(), 1);
    }
}
