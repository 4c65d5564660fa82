//! Single-slot call session management
//!
//! Owns the one call the client may hold at a time and reconciles remote
//! signaling, local user actions and timer fires into the session's state
//! machine. All mutation funnels through this manager; the presentation
//! layer only reads cloned snapshots.

use crate::config::CallConfig;
use crate::domain::bridge::SocketBridge;
use crate::domain::call::entity::Participant;
use crate::domain::call::session::CallSession;
use crate::domain::call::signal::{InboundSignal, OutboundSignal};
use crate::domain::call::value_object::{CallStatus, EndReason};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::SessionRef;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, warn};

/// The session slot plus its timer bookkeeping
///
/// Deadlines live next to the session so a fire can re-check the session
/// it was armed for before acting.
struct Slot {
    session: Option<CallSession>,
    /// Guards against a second local accept while one is in flight
    accept_in_flight: bool,
    /// Pending states must progress before this deadline
    watchdog_at: Option<Instant>,
    /// When an ended session disappears from the slot
    clear_at: Option<Instant>,
}

impl Slot {
    fn new() -> Self {
        Self {
            session: None,
            accept_in_flight: false,
            watchdog_at: None,
            clear_at: None,
        }
    }

    fn has_active_session(&self) -> bool {
        self.session.as_ref().map_or(false, |s| s.is_active())
    }

    /// Ref and status of the live session, if any
    fn active_state(&self) -> Option<(SessionRef, CallStatus)> {
        self.session
            .as_ref()
            .filter(|s| s.is_active())
            .map(|s| (s.session_ref(), s.status().clone()))
    }

    /// Whether the live session matches the given signaling ref
    fn matches(&self, session_ref: SessionRef) -> bool {
        self.session
            .as_ref()
            .map_or(false, |s| s.session_ref() == session_ref && s.is_active())
    }

    fn install(&mut self, session: CallSession, watchdog_at: Instant) {
        self.session = Some(session);
        self.accept_in_flight = false;
        self.watchdog_at = Some(watchdog_at);
        self.clear_at = None;
    }

    /// Terminate the current session and start the display grace period
    fn end_session(&mut self, reason: EndReason, clear_at: Instant) {
        if let Some(session) = self.session.as_mut() {
            if session.end(reason).is_ok() {
                self.clear_at = Some(clear_at);
            }
        }
        self.accept_in_flight = false;
        self.watchdog_at = None;
    }

    fn log_events(&mut self) {
        if let Some(session) = self.session.as_mut() {
            for event in session.take_events() {
                debug!(event = event.event_type(), "call event");
            }
        }
    }
}

/// Owns the single active call session and its state machine
pub struct CallSessionManager {
    slot: Mutex<Slot>,
    bridge: Arc<dyn SocketBridge>,
    config: CallConfig,
}

impl CallSessionManager {
    pub fn new(bridge: Arc<dyn SocketBridge>, config: CallConfig) -> Self {
        Self {
            slot: Mutex::new(Slot::new()),
            bridge,
            config,
        }
    }

    /// Place an outgoing call
    ///
    /// A send failure does not surface as an error; the session is forced
    /// to `Ended(TransportFailed)` so the UI is never left hanging.
    pub async fn place_call(&self, participant: Participant) -> Result<SessionRef> {
        let (session_ref, invite) = {
            let mut slot = self.slot.lock().unwrap();
            if slot.has_active_session() {
                return Err(DomainError::InvalidOperation(
                    "a call is already in progress".to_string(),
                ));
            }

            let session = CallSession::outgoing(participant.clone());
            let session_ref = session.session_ref();
            slot.install(session, Instant::now() + self.config.watchdog());
            slot.log_events();

            (
                session_ref,
                OutboundSignal::Invite {
                    participant,
                    session_ref,
                },
            )
        };

        self.send_or_end(invite).await;
        Ok(session_ref)
    }

    /// Apply a remote signaling event
    ///
    /// Signals for a session that no longer exists (or a replaced ref) are
    /// stale and silently discarded.
    pub async fn handle_signal(&self, signal: InboundSignal) {
        match signal {
            InboundSignal::Incoming {
                participant,
                session_ref,
            } => self.handle_incoming(participant, session_ref).await,
            InboundSignal::Accept { session_ref } => {
                self.progress(session_ref, CallStatus::Calling, SessionStep::Connecting)
            }
            InboundSignal::MediaReady { session_ref } => {
                self.progress(session_ref, CallStatus::Connecting, SessionStep::Connected)
            }
            InboundSignal::Reject { session_ref } => {
                self.end_remote(session_ref, EndReason::RemoteRejected, &[CallStatus::Calling]);
            }
            InboundSignal::Cancel { session_ref } => {
                // Remote wins over a local accept still in flight
                self.end_remote(
                    session_ref,
                    EndReason::RemoteCancelled,
                    &[CallStatus::Ringing, CallStatus::Calling],
                );
            }
            InboundSignal::Hangup { session_ref } => {
                self.end_remote(
                    session_ref,
                    EndReason::RemoteHangup,
                    &[
                        CallStatus::Ringing,
                        CallStatus::Calling,
                        CallStatus::Connecting,
                        CallStatus::Connected,
                    ],
                );
            }
            InboundSignal::Busy { session_ref } => {
                self.end_remote(session_ref, EndReason::Busy, &[CallStatus::Calling]);
            }
        }
    }

    async fn handle_incoming(&self, participant: Participant, session_ref: SessionRef) {
        let busy_reply = {
            let mut slot = self.slot.lock().unwrap();
            if slot.has_active_session() {
                debug!(%session_ref, "already in a call, answering busy");
                Some(OutboundSignal::Busy { session_ref })
            } else {
                let session = CallSession::incoming(session_ref, participant);
                slot.install(session, Instant::now() + self.config.watchdog());
                slot.log_events();
                None
            }
        };

        if let Some(signal) = busy_reply {
            // A failed busy reply must not disturb the live call
            if let Err(e) = self.bridge.send_signal(signal).await {
                warn!(error = %e, "failed to send busy reply");
            }
        }
    }

    /// Accept the ringing incoming call
    ///
    /// Composed of [`begin_accept`](Self::begin_accept) and
    /// [`finish_accept`](Self::finish_accept) so the in-flight window is
    /// explicit: a remote cancel arriving between the two still ends the
    /// session, and the late finish is a no-op.
    pub async fn accept(&self) -> Result<()> {
        let Some(session_ref) = self.begin_accept()? else {
            return Ok(());
        };
        let result = self
            .bridge
            .send_signal(OutboundSignal::Accept { session_ref })
            .await;
        self.finish_accept(session_ref, result);
        Ok(())
    }

    /// First half of accept: claim the in-flight flag
    ///
    /// Returns `None` when another accept is already in flight (no-op).
    pub fn begin_accept(&self) -> Result<Option<SessionRef>> {
        let mut slot = self.slot.lock().unwrap();
        let Some((session_ref, status)) = slot.active_state() else {
            return Err(DomainError::InvalidOperation(
                "no incoming call to accept".to_string(),
            ));
        };
        if status != CallStatus::Ringing {
            return Err(DomainError::InvalidOperation(format!(
                "cannot accept in state {:?}",
                status
            )));
        }
        if slot.accept_in_flight {
            debug!("accept already in flight, ignoring");
            return Ok(None);
        }
        slot.accept_in_flight = true;
        Ok(Some(session_ref))
    }

    /// Second half of accept: apply the outcome of the signaling send
    ///
    /// Only acts on the session the accept was begun for. A resolution
    /// arriving after that session ended or was replaced in the slot is
    /// stale and discarded; in particular it must never progress a newer
    /// incoming call the user has not accepted.
    pub fn finish_accept(&self, session_ref: SessionRef, send_result: Result<()>) {
        let mut slot = self.slot.lock().unwrap();

        if !slot.matches(session_ref) {
            // Session ended or replaced while our accept was in flight
            debug!(%session_ref, "accept resolved for a stale session, discarding");
            return;
        }
        slot.accept_in_flight = false;

        if let Err(e) = send_result {
            warn!(error = %e, "accept signaling failed, ending call");
            slot.end_session(
                EndReason::TransportFailed,
                Instant::now() + self.config.ended_grace(),
            );
            slot.log_events();
            return;
        }

        let progressed = slot
            .session
            .as_mut()
            .filter(|s| *s.status() == CallStatus::Ringing)
            .map_or(false, |s| s.begin_connecting().is_ok());
        if progressed {
            slot.watchdog_at = Some(Instant::now() + self.config.watchdog());
        }
        slot.log_events();
    }

    /// Decline the ringing incoming call
    pub async fn decline(&self) -> Result<()> {
        let reject = {
            let mut slot = self.slot.lock().unwrap();
            let Some((session_ref, status)) = slot.active_state() else {
                return Err(DomainError::InvalidOperation(
                    "no incoming call to decline".to_string(),
                ));
            };
            if status != CallStatus::Ringing {
                return Err(DomainError::InvalidOperation(format!(
                    "cannot decline in state {:?}",
                    status
                )));
            }
            slot.end_session(
                EndReason::Declined,
                Instant::now() + self.config.ended_grace(),
            );
            slot.log_events();
            OutboundSignal::Reject { session_ref }
        };

        self.send_best_effort(reject).await;
        Ok(())
    }

    /// End or abandon the current call, whatever its state
    pub async fn hang_up(&self) -> Result<()> {
        let outbound = {
            let mut slot = self.slot.lock().unwrap();
            let Some((session_ref, status)) = slot.active_state() else {
                return Err(DomainError::InvalidOperation("no call to end".to_string()));
            };
            let (reason, outbound) = match status {
                CallStatus::Calling => (
                    EndReason::Cancelled,
                    OutboundSignal::Cancel { session_ref },
                ),
                CallStatus::Ringing => {
                    (EndReason::Declined, OutboundSignal::Reject { session_ref })
                }
                _ => (
                    EndReason::LocalHangup,
                    OutboundSignal::Hangup { session_ref },
                ),
            };
            slot.end_session(reason, Instant::now() + self.config.ended_grace());
            slot.log_events();
            outbound
        };

        self.send_best_effort(outbound).await;
        Ok(())
    }

    /// Local media path is ready; completes `Connecting` -> `Connected`
    pub async fn notify_media_ready(&self) {
        let outbound = {
            let mut slot = self.slot.lock().unwrap();
            let Some((session_ref, status)) = slot.active_state() else {
                return;
            };
            if status != CallStatus::Connecting {
                return;
            }
            let connected = slot
                .session
                .as_mut()
                .map_or(false, |s| s.connect().is_ok());
            if connected {
                slot.watchdog_at = None;
            }
            slot.log_events();
            OutboundSignal::MediaReady { session_ref }
        };

        self.send_or_end(outbound).await;
    }

    /// Toggle the microphone; no observable effect unless connected
    pub fn toggle_mute(&self) -> bool {
        let mut slot = self.slot.lock().unwrap();
        slot.session
            .as_mut()
            .map(|s| s.toggle_mute())
            .unwrap_or(false)
    }

    /// Toggle the speaker; no observable effect unless connected
    pub fn toggle_speaker(&self) -> bool {
        let mut slot = self.slot.lock().unwrap();
        slot.session
            .as_mut()
            .map(|s| s.toggle_speaker())
            .unwrap_or(false)
    }

    /// One-second duration tick, driven by the runtime
    pub fn tick_duration(&self) {
        let mut slot = self.slot.lock().unwrap();
        if let Some(session) = slot.session.as_mut() {
            session.tick_duration();
        }
    }

    /// Fire due timers: the pending-state watchdog and the ended-grace clear
    ///
    /// Deadlines are re-validated against the current session before
    /// acting, so a fire armed for a replaced session is a discard.
    pub async fn handle_timeouts(&self, now: Instant) {
        let outbound = {
            let mut slot = self.slot.lock().unwrap();

            if slot.clear_at.map_or(false, |at| at <= now) {
                debug!("clearing ended session after display grace");
                slot.session = None;
                slot.clear_at = None;
            }

            if slot.watchdog_at.map_or(false, |at| at <= now) {
                slot.watchdog_at = None;
                match slot.active_state().filter(|(_, status)| status.is_pending()) {
                    None => None,
                    Some((session_ref, status)) => {
                        let outbound = match status {
                            CallStatus::Calling => OutboundSignal::Cancel { session_ref },
                            CallStatus::Ringing => OutboundSignal::Reject { session_ref },
                            _ => OutboundSignal::Hangup { session_ref },
                        };
                        warn!(%session_ref, "watchdog expired, ending call");
                        slot.end_session(EndReason::Timeout, now + self.config.ended_grace());
                        slot.log_events();
                        Some(outbound)
                    }
                }
            } else {
                None
            }
        };

        if let Some(signal) = outbound {
            self.send_best_effort(signal).await;
        }
    }

    /// Drop an ended session from the slot immediately
    pub fn dismiss(&self) {
        let mut slot = self.slot.lock().unwrap();
        if slot.session.as_ref().map_or(false, |s| s.is_terminal()) {
            slot.session = None;
            slot.clear_at = None;
        }
    }

    /// Snapshot of the current session for the presentation layer
    pub fn current(&self) -> Option<CallSession> {
        self.slot.lock().unwrap().session.clone()
    }

    /// Advance the matching session one step on a progressing remote signal
    fn progress(&self, session_ref: SessionRef, expected: CallStatus, step: SessionStep) {
        let mut slot = self.slot.lock().unwrap();
        let eligible = slot.matches(session_ref)
            && slot
                .session
                .as_ref()
                .map_or(false, |s| *s.status() == expected);
        if !eligible {
            debug!(%session_ref, "discarding stale progress signal");
            return;
        }

        let applied = slot.session.as_mut().map_or(false, |s| match step {
            SessionStep::Connecting => s.begin_connecting().is_ok(),
            SessionStep::Connected => s.connect().is_ok(),
        });
        if applied {
            slot.watchdog_at = match step {
                SessionStep::Connecting => Some(Instant::now() + self.config.watchdog()),
                SessionStep::Connected => None,
            };
        }
        slot.log_events();
    }

    /// End the current session by a remote signal, if state and ref match
    fn end_remote(&self, session_ref: SessionRef, reason: EndReason, from: &[CallStatus]) {
        let mut slot = self.slot.lock().unwrap();
        let eligible = slot.matches(session_ref)
            && slot
                .session
                .as_ref()
                .map_or(false, |s| from.contains(s.status()));
        if eligible {
            slot.end_session(reason, Instant::now() + self.config.ended_grace());
            slot.log_events();
        } else {
            debug!(%session_ref, "discarding stale end signal");
        }
    }

    /// Send a signal the session depends on; failure forces a local end
    async fn send_or_end(&self, signal: OutboundSignal) {
        let session_ref = signal.session_ref();
        if let Err(e) = self.bridge.send_signal(signal).await {
            warn!(%session_ref, error = %e, "signaling send failed, ending call");
            let mut slot = self.slot.lock().unwrap();
            if slot.matches(session_ref) {
                slot.end_session(
                    EndReason::TransportFailed,
                    Instant::now() + self.config.ended_grace(),
                );
                slot.log_events();
            }
        }
    }

    /// Send a signal for an already-terminal session; failure is only logged
    async fn send_best_effort(&self, signal: OutboundSignal) {
        let kind = signal.kind();
        if let Err(e) = self.bridge.send_signal(signal).await {
            warn!(signal = kind, error = %e, "signaling send failed");
        }
    }
}

/// Progressing transitions driven by remote signals
#[derive(Debug, Clone, Copy)]
enum SessionStep {
    Connecting,
    Connected,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bridge::MockSocketBridge;
    use crate::domain::call::value_object::CallDirection;
    use crate::domain::shared::value_objects::UserId;
    use std::time::Duration;

    fn participant(id: &str, name: &str) -> Participant {
        Participant::new(UserId::new(id), name.to_string(), None)
    }

    fn manager_with(mock: MockSocketBridge) -> CallSessionManager {
        CallSessionManager::new(Arc::new(mock), CallConfig::default())
    }

    fn accepting_bridge() -> MockSocketBridge {
        let mut mock = MockSocketBridge::new();
        mock.expect_send_signal().returning(|_| Ok(()));
        mock
    }

    #[tokio::test]
    async fn test_place_call_enters_calling() {
        let manager = manager_with(accepting_bridge());

        manager
            .place_call(participant("u-bob", "Bob"))
            .await
            .unwrap();

        let session = manager.current().unwrap();
        assert_eq!(*session.status(), CallStatus::Calling);
        assert_eq!(session.direction(), CallDirection::Outgoing);
    }

    #[tokio::test]
    async fn test_second_place_call_is_rejected() {
        let manager = manager_with(accepting_bridge());

        manager
            .place_call(participant("u-bob", "Bob"))
            .await
            .unwrap();
        let second = manager.place_call(participant("u-eve", "Eve")).await;
        assert!(second.is_err());

        // Slot still holds the first call
        let session = manager.current().unwrap();
        assert_eq!(session.participant().display_name(), "Bob");
    }

    #[tokio::test]
    async fn test_outgoing_happy_path_with_duration() {
        let manager = manager_with(accepting_bridge());

        let session_ref = manager
            .place_call(participant("u-bob", "Bob"))
            .await
            .unwrap();

        manager
            .handle_signal(InboundSignal::Accept { session_ref })
            .await;
        assert_eq!(*manager.current().unwrap().status(), CallStatus::Connecting);

        manager
            .handle_signal(InboundSignal::MediaReady { session_ref })
            .await;
        let session = manager.current().unwrap();
        assert_eq!(*session.status(), CallStatus::Connected);
        assert!(session.started_at().is_some());
        assert_eq!(session.duration_seconds(), 0);

        for _ in 0..5 {
            manager.tick_duration();
        }
        assert_eq!(manager.current().unwrap().duration_seconds(), 5);
    }

    #[tokio::test]
    async fn test_incoming_while_active_answers_busy() {
        let mut mock = MockSocketBridge::new();
        mock.expect_send_signal()
            .withf(|s| matches!(s, OutboundSignal::Busy { .. }))
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_send_signal()
            .withf(|s| !matches!(s, OutboundSignal::Busy { .. }))
            .returning(|_| Ok(()));
        let manager = manager_with(mock);

        let session_ref = manager.place_call(participant("u-q", "Q")).await.unwrap();
        manager
            .handle_signal(InboundSignal::Accept { session_ref })
            .await;
        manager
            .handle_signal(InboundSignal::MediaReady { session_ref })
            .await;

        manager
            .handle_signal(InboundSignal::Incoming {
                participant: participant("u-p", "P"),
                session_ref: SessionRef::new(),
            })
            .await;

        // Connected session with Q is unaffected
        let session = manager.current().unwrap();
        assert_eq!(*session.status(), CallStatus::Connected);
        assert_eq!(session.participant().display_name(), "Q");
    }

    #[tokio::test]
    async fn test_remote_cancel_beats_inflight_accept() {
        let manager = manager_with(accepting_bridge());

        let session_ref = SessionRef::new();
        manager
            .handle_signal(InboundSignal::Incoming {
                participant: participant("u-p", "P"),
                session_ref,
            })
            .await;

        // Local accept claimed but not yet resolved
        let claimed = manager.begin_accept().unwrap().unwrap();
        assert_eq!(claimed, session_ref);

        manager
            .handle_signal(InboundSignal::Cancel { session_ref })
            .await;

        // The late accept resolution must not resurrect the session
        manager.finish_accept(claimed, Ok(()));

        let session = manager.current().unwrap();
        assert_eq!(
            *session.status(),
            CallStatus::Ended(EndReason::RemoteCancelled)
        );
    }

    #[tokio::test]
    async fn test_stale_accept_resolution_spares_replacement_session() {
        let manager = manager_with(accepting_bridge());

        // Incoming call A, local accept claimed but not yet resolved
        let first_ref = SessionRef::new();
        manager
            .handle_signal(InboundSignal::Incoming {
                participant: participant("u-a", "A"),
                session_ref: first_ref,
            })
            .await;
        let claimed = manager.begin_accept().unwrap().unwrap();

        // A is cancelled and cleared; B rings before the accept resolves
        manager
            .handle_signal(InboundSignal::Cancel {
                session_ref: first_ref,
            })
            .await;
        manager.dismiss();

        let second_ref = SessionRef::new();
        manager
            .handle_signal(InboundSignal::Incoming {
                participant: participant("u-b", "B"),
                session_ref: second_ref,
            })
            .await;

        // The resolution for A must not touch B
        manager.finish_accept(claimed, Ok(()));

        let session = manager.current().unwrap();
        assert_eq!(*session.status(), CallStatus::Ringing);
        assert_eq!(session.session_ref(), second_ref);

        // B is still acceptable by the user
        let reclaimed = manager.begin_accept().unwrap().unwrap();
        assert_eq!(reclaimed, second_ref);
    }

    #[tokio::test]
    async fn test_second_accept_is_noop() {
        let manager = manager_with(accepting_bridge());

        manager
            .handle_signal(InboundSignal::Incoming {
                participant: participant("u-p", "P"),
                session_ref: SessionRef::new(),
            })
            .await;

        let first = manager.begin_accept().unwrap();
        assert!(first.is_some());
        let second = manager.begin_accept().unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_accept_completes_to_connecting() {
        let manager = manager_with(accepting_bridge());

        let session_ref = SessionRef::new();
        manager
            .handle_signal(InboundSignal::Incoming {
                participant: participant("u-p", "P"),
                session_ref,
            })
            .await;

        manager.accept().await.unwrap();
        assert_eq!(*manager.current().unwrap().status(), CallStatus::Connecting);

        manager
            .handle_signal(InboundSignal::MediaReady { session_ref })
            .await;
        assert_eq!(*manager.current().unwrap().status(), CallStatus::Connected);
    }

    #[tokio::test]
    async fn test_toggles_require_connected() {
        let manager = manager_with(accepting_bridge());

        assert!(!manager.toggle_mute());

        let session_ref = manager.place_call(participant("u-b", "B")).await.unwrap();
        assert!(!manager.toggle_mute());
        assert!(!manager.toggle_speaker());

        manager
            .handle_signal(InboundSignal::Accept { session_ref })
            .await;
        manager
            .handle_signal(InboundSignal::MediaReady { session_ref })
            .await;

        assert!(manager.toggle_mute());
        assert!(manager.toggle_speaker());
        assert!(!manager.toggle_mute());
    }

    #[tokio::test]
    async fn test_transport_failure_forces_ended() {
        let mut mock = MockSocketBridge::new();
        mock.expect_send_signal()
            .returning(|_| Err(DomainError::Transport("socket closed".to_string())));
        let manager = manager_with(mock);

        manager.place_call(participant("u-b", "B")).await.unwrap();

        let session = manager.current().unwrap();
        assert_eq!(
            *session.status(),
            CallStatus::Ended(EndReason::TransportFailed)
        );
    }

    #[tokio::test]
    async fn test_watchdog_forces_ended() {
        let manager = manager_with(accepting_bridge());

        manager.place_call(participant("u-b", "B")).await.unwrap();

        let later = Instant::now() + Duration::from_secs(46);
        manager.handle_timeouts(later).await;

        let session = manager.current().unwrap();
        assert_eq!(*session.status(), CallStatus::Ended(EndReason::Timeout));
    }

    #[tokio::test]
    async fn test_watchdog_spares_connected_call() {
        let manager = manager_with(accepting_bridge());

        let session_ref = manager.place_call(participant("u-b", "B")).await.unwrap();
        manager
            .handle_signal(InboundSignal::Accept { session_ref })
            .await;
        manager
            .handle_signal(InboundSignal::MediaReady { session_ref })
            .await;

        let later = Instant::now() + Duration::from_secs(120);
        manager.handle_timeouts(later).await;

        assert_eq!(*manager.current().unwrap().status(), CallStatus::Connected);
    }

    #[tokio::test]
    async fn test_ended_session_clears_after_grace() {
        let manager = manager_with(accepting_bridge());

        manager
            .handle_signal(InboundSignal::Incoming {
                participant: participant("u-p", "P"),
                session_ref: SessionRef::new(),
            })
            .await;
        manager.decline().await.unwrap();

        // Still visible for the grace period
        assert!(manager.current().is_some());

        let later = Instant::now() + Duration::from_secs(4);
        manager.handle_timeouts(later).await;
        assert!(manager.current().is_none());
    }

    #[tokio::test]
    async fn test_dismiss_clears_ended_only() {
        let manager = manager_with(accepting_bridge());

        manager.place_call(participant("u-b", "B")).await.unwrap();
        manager.dismiss();
        assert!(manager.current().is_some());

        manager.hang_up().await.unwrap();
        manager.dismiss();
        assert!(manager.current().is_none());
    }

    #[tokio::test]
    async fn test_stale_signal_is_discarded() {
        let manager = manager_with(accepting_bridge());

        manager.place_call(participant("u-b", "B")).await.unwrap();

        // Hangup for a session ref we never created
        manager
            .handle_signal(InboundSignal::Hangup {
                session_ref: SessionRef::new(),
            })
            .await;

        assert_eq!(*manager.current().unwrap().status(), CallStatus::Calling);
    }

    #[tokio::test]
    async fn test_incoming_replaces_ended_session() {
        let manager = manager_with(accepting_bridge());

        manager.place_call(participant("u-b", "B")).await.unwrap();
        manager.hang_up().await.unwrap();

        manager
            .handle_signal(InboundSignal::Incoming {
                participant: participant("u-p", "P"),
                session_ref: SessionRef::new(),
            })
            .await;

        let session = manager.current().unwrap();
        assert_eq!(*session.status(), CallStatus::Ringing);
        assert_eq!(session.participant().display_name(), "P");
    }
}
