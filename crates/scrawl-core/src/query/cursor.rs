//! Continuation cursor codec
//!
//! Owns the opaque wire-token format used to resume a paginated listing.
//! A token encodes the sort key of the last row a client saw: the active
//! sort field, that field's value, and the row id as tie-breaker. The
//! pair `(value, id)` is globally unique because ids are unique, so a
//! decoded key always names exactly one position in the ordering.
//!
//! Tokens are JSON payloads wrapped in URL-safe base64 (no padding), so
//! they travel in query strings unescaped and are not orderable by a
//! naive client. Decoding is pure, never touches the store, and rejects
//! anything malformed with a single error kind - a tampered token never
//! degrades into a weaker boundary.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// Defensive decode bound for untrusted cursor token input. Sized well
// above the largest token `encode` can mint: a maximum-length title
// (512 chars, worst-case JSON escaping) plus payload overhead comes to
// roughly 4.2k after base64.
const MAX_CURSOR_TOKEN_LEN: usize = 8192;

/// Fields a listing can be sorted by
///
/// Every variant maps to an indexed column; anything else is rejected
/// before the store is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Creation timestamp (default)
    #[default]
    CreatedAt,
    /// Last-update timestamp
    UpdatedAt,
    /// Post title
    Title,
}

impl SortField {
    /// Parse a field name as accepted from callers
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created_at" => Some(SortField::CreatedAt),
            "updated_at" => Some(SortField::UpdatedAt),
            "title" => Some(SortField::Title),
            _ => None,
        }
    }

    /// Canonical field name
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Title => "title",
        }
    }

    /// The SQL column this field sorts on
    pub(crate) fn column(&self) -> &'static str {
        self.as_str()
    }

    /// Whether this field carries a millisecond timestamp value
    fn is_timestamp(&self) -> bool {
        matches!(self, SortField::CreatedAt | SortField::UpdatedAt)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending (smallest first)
    Asc,
    /// Descending (newest first, default)
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse a direction name as accepted from callers
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    /// SQL keyword for this direction
    pub(crate) fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A complete sort specification: primary field plus direction.
///
/// The unique row id is always appended as secondary key in the same
/// direction, so the effective ordering is total even when many rows
/// share the primary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

/// The value of the primary sort field at one row
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// Milliseconds since the Unix epoch
    Timestamp(i64),
    /// Textual field value
    Text(String),
}

/// The composite ordering key a cursor points at
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    /// The field this key was minted under
    pub field: SortField,
    /// The primary field's value at the last-seen row
    pub value: SortValue,
    /// The last-seen row id (tie-breaker)
    pub id: Uuid,
}

/// Reasons a cursor token fails to decode
///
/// All variants surface to callers as one "invalid cursor" client input
/// error; the distinctions exist for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("cursor token is empty")]
    Empty,

    #[error("cursor token exceeds max length: {len} chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("cursor token is not valid base64")]
    Encoding,

    #[error("cursor payload is not valid UTF-8")]
    Utf8,

    #[error("cursor payload is malformed")]
    Payload,

    #[error("cursor references unknown sort field '{0}'")]
    UnknownField(String),

    #[error("cursor value does not match the sort field's type")]
    ValueType,

    #[error("cursor id is not a valid UUID")]
    InvalidId,

    #[error("cursor was issued for sort field '{cursor}' but the active sort is '{active}'")]
    FieldMismatch {
        cursor: &'static str,
        active: &'static str,
    },
}

/// Wire shape of the cursor payload
#[derive(Serialize, Deserialize)]
struct Payload {
    f: String,
    v: serde_json::Value,
    id: String,
}

/// Encode a sort key as an opaque, URL-safe token
pub fn encode(key: &SortKey) -> String {
    let value = match &key.value {
        SortValue::Timestamp(millis) => serde_json::Value::from(*millis),
        SortValue::Text(text) => serde_json::Value::from(text.clone()),
    };
    let payload = Payload {
        f: key.field.as_str().to_string(),
        v: value,
        id: key.id.to_string(),
    };
    // Payload is plain data; serialization cannot fail.
    let json = serde_json::to_string(&payload).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a token back into the sort key it was minted from
pub fn decode(token: &str) -> Result<SortKey, CursorError> {
    let token = token.trim();

    if token.is_empty() {
        return Err(CursorError::Empty);
    }

    if token.len() > MAX_CURSOR_TOKEN_LEN {
        return Err(CursorError::TooLong {
            len: token.len(),
            max: MAX_CURSOR_TOKEN_LEN,
        });
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| CursorError::Encoding)?;
    let json = String::from_utf8(bytes).map_err(|_| CursorError::Utf8)?;
    let payload: Payload = serde_json::from_str(&json).map_err(|_| CursorError::Payload)?;

    let field =
        SortField::parse(&payload.f).ok_or_else(|| CursorError::UnknownField(payload.f.clone()))?;

    let value = if field.is_timestamp() {
        match payload.v.as_i64() {
            Some(millis) => SortValue::Timestamp(millis),
            None => return Err(CursorError::ValueType),
        }
    } else {
        match payload.v.as_str() {
            Some(text) => SortValue::Text(text.to_string()),
            None => return Err(CursorError::ValueType),
        }
    };

    let id = Uuid::parse_str(&payload.id).map_err(|_| CursorError::InvalidId)?;

    Ok(SortKey { field, value, id })
}
