//! Command interpreter for the write characteristic.
//!
//! Payloads are matched against a fixed vocabulary by exact byte
//! equality — no trimming, no case folding. Anything else is
//! `Unrecognized` and carries the raw bytes for logging.

/// A parsed write payload. Produced transiently per write, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    LightOn,
    LightOff,
    FanOn,
    FanOff,
    Unrecognized(&'a [u8]),
}

impl<'a> Command<'a> {
    /// Exact, case-sensitive match against the command table.
    pub fn parse(payload: &'a [u8]) -> Self {
        match payload {
            b"LIGHT ON" => Self::LightOn,
            b"LIGHT OFF" => Self::LightOff,
            b"FAN ON" => Self::FanOn,
            b"FAN OFF" => Self::FanOff,
            other => Self::Unrecognized(other),
        }
    }

    /// Canonical text of a recognized command, `None` for `Unrecognized`.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::LightOn => Some("LIGHT ON"),
            Self::LightOff => Some("LIGHT OFF"),
            Self::FanOn => Some("FAN ON"),
            Self::FanOff => Some("FAN OFF"),
            Self::Unrecognized(_) => None,
        }
    }
}
