//! Two-factor gate state machine.
//!
//! Pure state, no delivery. Arming mints a fresh code and returns it; the
//! caller is responsible for sending it over a side channel. Checks never
//! touch the network either, so the whole lifecycle is unit-testable.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// How long a mailed code stays valid.
const CODE_TTL_MINUTES: i64 = 10;

/// Outcome of a code submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    /// Code matched; the gate is open.
    Verified,
    /// Code did not match the armed one.
    WrongCode,
    /// No live code to check against (never armed, or past expiry).
    Expired,
}

/// Gate protecting the assistant behind an emailed one-time code.
#[derive(Debug)]
pub struct TwoFactorGate {
    code: String,
    expires_at: DateTime<Utc>,
    verified: bool,
}

impl TwoFactorGate {
    /// A gate with no code armed. Every check reports [`CodeCheck::Expired`]
    /// until [`arm`](Self::arm) is called.
    pub fn new() -> Self {
        Self {
            code: String::new(),
            expires_at: DateTime::<Utc>::MIN_UTC,
            verified: false,
        }
    }

    /// Mint a fresh code and arm the gate with it.
    ///
    /// Unconditionally replaces any previous code and clears verification.
    /// Returns the code for out-of-band delivery.
    pub fn arm(&mut self) -> String {
        self.arm_at(Utc::now())
    }

    fn arm_at(&mut self, now: DateTime<Utc>) -> String {
        self.code = generate_code();
        self.expires_at = now + Duration::minutes(CODE_TTL_MINUTES);
        self.verified = false;
        tracing::info!("2FA code armed, valid for {CODE_TTL_MINUTES} minutes");
        self.code.clone()
    }

    /// Check a submitted code.
    ///
    /// Expiry wins over a digit match: a correct code submitted late still
    /// reports [`CodeCheck::Expired`] and mutates nothing. Input is trimmed
    /// before comparison, the match itself is exact.
    pub fn check(&mut self, input: &str) -> CodeCheck {
        self.check_at(input, Utc::now())
    }

    fn check_at(&mut self, input: &str, now: DateTime<Utc>) -> CodeCheck {
        if now > self.expires_at {
            tracing::warn!("2FA check rejected: no live code");
            return CodeCheck::Expired;
        }
        if input.trim() == self.code {
            self.verified = true;
            tracing::info!("2FA verification succeeded");
            return CodeCheck::Verified;
        }
        tracing::warn!("2FA check rejected: wrong code");
        CodeCheck::WrongCode
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Whether the armed code lapsed without ever verifying. A verified
    /// gate never reports expired.
    pub fn is_expired(&self) -> bool {
        !self.verified && Utc::now() > self.expires_at
    }

    /// When the current code stops being accepted.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl Default for TwoFactorGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Six digits, zero-padded, uniform over `000000..=999999`.
///
/// `rand::rng()` is a CSPRNG, so codes are not guessable from earlier ones.
pub fn generate_code() -> String {
    format!("{:06}", rand::rng().random_range(0..1_000_000))
}
