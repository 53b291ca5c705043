use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error as ThisError;
use uuid::Uuid;

///
/// GuidError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum GuidError {
    #[error("invalid guid string")]
    InvalidString,
}

///
/// GuidDecodeError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum GuidDecodeError {
    #[error("invalid guid length: {len} bytes")]
    InvalidSize { len: usize },
}

///
/// Guid
///
/// 16-byte entity identifier. The persisted representation is the raw
/// byte array; the textual representation is the hyphenated form.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deref,
    Display,
    Eq,
    From,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
)]
#[repr(transparent)]
pub struct Guid(Uuid);

impl Guid {
    pub const STORED_SIZE: u32 = 16;

    pub const MIN: Self = Self::from_bytes([0x00; 16]);
    pub const MAX: Self = Self::from_bytes([0xFF; 16]);

    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, GuidDecodeError> {
        if bytes.len() != Self::STORED_SIZE as usize {
            return Err(GuidDecodeError::InvalidSize { len: bytes.len() });
        }

        let mut array = [0u8; 16];
        array.copy_from_slice(bytes);

        Ok(Self::from_bytes(array))
    }

    #[must_use]
    pub const fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl FromStr for Guid {
    type Err = GuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self).map_err(|_| GuidError::InvalidString)
    }
}
