//! Notification routing for order and referral events.
//!
//! The dispatcher decides who hears about an event and what they are told;
//! a [`Transport`] does the delivery. Delivery is best-effort: failures are
//! logged and counted but never reported back to the operation that
//! produced the event.

pub mod dispatcher;
pub mod error;
pub mod notification;
pub mod render;
pub mod transport;

pub use dispatcher::{DispatchReport, NotificationDispatcher};
pub use error::TransportError;
pub use notification::{NotificationEvent, Party, Recipient};
pub use transport::{RecordingTransport, SentMessage, Transport};
