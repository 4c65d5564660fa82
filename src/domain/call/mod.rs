//! Call session bounded context

pub mod entity;
pub mod event;
pub mod manager;
pub mod session;
pub mod signal;
pub mod value_object;

pub use entity::Participant;
pub use event::SessionEvent;
pub use manager::CallSessionManager;
pub use session::CallSession;
pub use signal::{InboundSignal, OutboundSignal};
pub use value_object::{CallDirection, CallStatus, EndReason};
