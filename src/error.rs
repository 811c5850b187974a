//! Unified error types for the blehub firmware.
//!
//! Every condition in this core is recovered locally: nothing here is
//! ever surfaced to a remote peer as a GATT/ATT error response, and
//! nothing aborts the process. All variants are `Copy` so they can be
//! passed through the event loop without allocation.

use core::fmt;

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A link-tracking operation failed.
    Link(LinkError),
    /// A write payload could not be acted on.
    Payload(PayloadError),
    /// Peripheral or stack initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Payload(e) => write!(f, "payload: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Link-tracking errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// All slots occupied at connect time; the connection proceeds
    /// untracked and is reported as device 0.
    SlotTableFull,
    /// A disconnect or write referenced a connection with no slot.
    UnknownConnection,
    /// The radio stack reported a failed connect attempt.
    ConnectAttemptFailed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlotTableFull => write!(f, "slot table full"),
            Self::UnknownConnection => write!(f, "unknown connection"),
            Self::ConnectAttemptFailed => write!(f, "connect attempt failed"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Write-payload errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    /// Payload did not match the command vocabulary.
    UnrecognizedCommand,
    /// Payload is not valid UTF-8; decoded best-effort for logging.
    MalformedPayload,
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedCommand => write!(f, "unrecognized command"),
            Self::MalformedPayload => write!(f, "malformed payload"),
        }
    }
}

impl From<PayloadError> for Error {
    fn from(e: PayloadError) -> Self {
        Self::Payload(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed_by_category() {
        let e: Error = LinkError::SlotTableFull.into();
        assert_eq!(e.to_string(), "link: slot table full");
        let e: Error = PayloadError::MalformedPayload.into();
        assert_eq!(e.to_string(), "payload: malformed payload");
    }
}
