//! Opaque record identifier.
//!
//! A [`FoodId`] is 12 bytes rendered as 24 lowercase hex characters:
//! a 4-byte big-endian creation time in seconds, 5 bytes unique to the
//! running process, and a 3-byte big-endian counter.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::time;

const BYTE_LEN: usize = 12;
const HEX_LEN: usize = BYTE_LEN * 2;

static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(|| {
    let random = uuid::Uuid::new_v4();
    let mut out = [0u8; 5];
    out.copy_from_slice(&random.as_bytes()[..5]);
    out
});

static COUNTER: LazyLock<AtomicU32> = LazyLock::new(|| {
    let random = uuid::Uuid::new_v4();
    let bytes = random.as_bytes();
    AtomicU32::new(u32::from_be_bytes([0, bytes[5], bytes[6], bytes[7]]))
});

/// The string did not look like a [`FoodId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid food id `{0}`: expected {HEX_LEN} hex characters")]
pub struct InvalidFoodId(pub String);

/// Unique identifier for a [`Food`](crate::food::Food).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FoodId([u8; BYTE_LEN]);

impl Default for FoodId {
    fn default() -> Self {
        let seconds = time::epoch_seconds(time::now());
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; BYTE_LEN];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }
}

impl FoodId {
    /// Generate a new identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `s` has the shape of an identifier.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        s.len() == HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Display for FoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for FoodId {
    type Err = InvalidFoodId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_valid(s) {
            return Err(InvalidFoodId(s.to_string()));
        }
        let mut bytes = [0u8; BYTE_LEN];
        for (idx, byte) in bytes.iter_mut().enumerate() {
            let pair = &s[idx * 2..idx * 2 + 2];
            *byte = u8::from_str_radix(pair, 16).map_err(|_| InvalidFoodId(s.to_string()))?;
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for FoodId {
    type Error = InvalidFoodId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FoodId> for String {
    fn from(id: FoodId) -> Self {
        id.to_string()
    }
}
