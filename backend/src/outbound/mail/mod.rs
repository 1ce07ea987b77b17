//! Mail transports: an HTTP relay client and a logging fallback.

mod http_relay;
mod logging;

pub use http_relay::{HttpMailRelay, MailRelayIdentity};
pub use logging::LoggingMailTransport;
