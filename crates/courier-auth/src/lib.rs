//! # courier-auth
//!
//! Email 2FA gate for Courier.
//!
//! Access to the assistant is locked until the operator proves control of a
//! side channel: a one-time code is mailed out-of-band and must be typed
//! back into the chat. The gate state machine lives in [`gate`], the SMTP
//! delivery in [`mailer`].

pub mod gate;
pub mod mailer;

pub use gate::{CodeCheck, TwoFactorGate};
pub use mailer::SmtpCodeSender;
