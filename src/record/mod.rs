//! Record Module
//!
//! The logical record type and its fixed-width slot encoding.
//!
//! ## Slot Format (88 bytes, little-endian)
//! ```text
//! ┌─────────┬────────────┬───────────┬──────────────┬─────────────┬─────────────┐
//! │ id (4)  │ title (64) │ price (8) │ quantity (4) │ deleted (1) │ padding (7) │
//! │  i32    │ UTF-8, NUL │   f64     │     i32      │  0 / 1      │   zeroes    │
//! └─────────┴────────────┴───────────┴──────────────┴─────────────┴─────────────┘
//! ```

mod codec;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use codec::{Slot, SlotState, SLOT_SIZE, TITLE_FIELD_SIZE};

/// Longest title that fits in the title field alongside its terminator
pub const TITLE_MAX_LEN: usize = TITLE_FIELD_SIZE - 1;

// =============================================================================
// Title
// =============================================================================

/// Length-capped title text.
///
/// Truncation policy: the text ends at the first NUL byte, and is then cut to
/// the longest prefix of at most [`TITLE_MAX_LEN`] bytes that ends on a UTF-8
/// character boundary. Construction never fails.
///
/// Titles are always valid UTF-8. A title field read from disk that holds
/// invalid UTF-8 decodes lossily: each bad sequence becomes U+FFFD and the
/// result is truncated again, so such a field is rewritten in its repaired
/// form by the next update or rehash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Title(String);

impl Title {
    pub fn new(text: &str) -> Self {
        let text = match text.find('\0') {
            Some(nul) => &text[..nul],
            None => text,
        };

        let mut end = text.len().min(TITLE_MAX_LEN);
        while !text.is_char_boundary(end) {
            end -= 1;
        }

        Title(text[..end].to_string())
    }

    /// Rebuild a title from a raw on-disk field (NUL padded, decoded lossily)
    pub(crate) fn from_field(field: &[u8]) -> Self {
        let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        Title::new(&String::from_utf8_lossy(&field[..end]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Title::new(text)
    }
}

impl From<String> for Title {
    fn from(text: String) -> Self {
        Title::new(&text)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Title {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Title {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Record
// =============================================================================

/// A live record as seen by callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique key, strictly positive for stored records
    pub id: i32,
    pub title: Title,
    pub price: f64,
    pub quantity: i32,
}

impl Record {
    pub fn new(id: i32, title: &str, price: f64, quantity: i32) -> Self {
        Self {
            id,
            title: Title::new(title),
            price,
            quantity,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} \"{}\" price={} quantity={}",
            self.id, self.title, self.price, self.quantity
        )
    }
}
