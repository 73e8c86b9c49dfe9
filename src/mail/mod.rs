//! Outbound email.
//!
//! - Request validation against an address policy
//! - Template rendering into a final subject and body
//! - Delivery over SMTP, or a Gmail compose link in preview mode

mod compose;
mod dispatcher;
mod mock_transport;
mod transport;
mod types;
mod validator;

pub use compose::{gmail_compose_url, GMAIL_COMPOSE_BASE};
pub use dispatcher::MailDispatcher;
pub use mock_transport::MockTransport;
pub use transport::{build_message, MailTransport, SmtpTransport};
pub use types::{
    ComposedMail, DispatchError, DispatchOutcome, EmailRequest, OutgoingMail, TransportError,
    TransportReceipt,
};
pub use validator::{validate, AddressPolicy};
