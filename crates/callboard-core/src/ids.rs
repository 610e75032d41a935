//! Identifier types for callboard.
//!
//! User ids come from the social identity provider and are numeric. Call ids are
//! opaque strings handed out by the call provider. Coin transaction ids are ULIDs
//! so the journal sorts chronologically.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// A user identifier issued by the social identity provider.
///
/// Serialized as a JSON number. Deserialization also accepts numeric strings,
/// since web clients send either form.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw provider id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Return the raw numeric id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Encode as 8 bytes whose lexicographic order equals numeric order.
    ///
    /// Big-endian with the sign bit flipped, so negative ids sort first.
    #[must_use]
    pub fn to_bytes(self) -> [u8; 8] {
        let mut bytes = self.0.to_be_bytes();
        bytes[0] ^= 0x80;
        bytes
    }

    /// Decode the output of [`UserId::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is shorter than 8 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdError> {
        let mut raw: [u8; 8] = bytes
            .get(..8)
            .and_then(|b| b.try_into().ok())
            .ok_or(IdError::InvalidKey)?;
        raw[0] ^= 0x80;
        Ok(Self(i64::from_be_bytes(raw)))
    }
}

impl FromStr for UserId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| IdError::InvalidUserId(s.to_string()))
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct UserIdVisitor;

        impl Visitor<'_> for UserIdVisitor {
            type Value = UserId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a numeric user id or a string containing one")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<UserId, E> {
                Ok(UserId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<UserId, E> {
                i64::try_from(v)
                    .map(UserId)
                    .map_err(|_| E::custom("user id out of range"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<UserId, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(UserIdVisitor)
    }
}

/// A call identifier returned by the call provider.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    /// Wrap a call id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Extract a call id from a provider JSON value.
    ///
    /// The provider reports ids as numbers, older deployments as strings.
    /// Empty strings, zero, and every other JSON type yield `None`.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(Self(s.clone())),
            serde_json::Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => {
                Some(Self(n.to_string()))
            }
            _ => None,
        }
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallId({})", self.0)
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A coin transaction identifier using ULID for time-ordering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(Ulid);

impl TransactionId {
    /// Generate a new `TransactionId` with the current timestamp.
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    /// Return the bytes of the ULID (16 bytes).
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 16] {
        self.0.to_bytes()
    }

    /// Create a `TransactionId` from index key bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not exactly 16 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdError> {
        let raw: [u8; 16] = bytes.try_into().map_err(|_| IdError::InvalidKey)?;
        Ok(Self(Ulid::from_bytes(raw)))
    }
}

impl FromStr for TransactionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ulid = Ulid::from_string(s).map_err(|_| IdError::InvalidUlid)?;
        Ok(Self(ulid))
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self.0)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TransactionId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.0.to_string()
    }
}

/// An audio item that users can like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Big-endian key bytes.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Decode key bytes written by [`ItemId::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not exactly 4 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdError> {
        let raw: [u8; 4] = bytes.try_into().map_err(|_| IdError::InvalidKey)?;
        Ok(Self(u32::from_be_bytes(raw)))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a numeric user id.
    #[error("invalid user id: {0}")]
    InvalidUserId(String),

    /// The input is not a valid ULID.
    #[error("invalid ULID format")]
    InvalidUlid,

    /// A storage key had the wrong length.
    #[error("invalid key encoding")]
    InvalidKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_accepts_numbers_and_strings() {
        let from_number: UserId = serde_json::from_str("12345").unwrap();
        let from_string: UserId = serde_json::from_str("\"12345\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(serde_json::to_string(&from_number).unwrap(), "12345");
    }

    #[test]
    fn user_id_rejects_garbage() {
        assert!(serde_json::from_str::<UserId>("\"abc\"").is_err());
        assert!(serde_json::from_str::<UserId>("true").is_err());
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn user_id_bytes_preserve_numeric_order() {
        let ids = [-5_i64, -1, 0, 1, 42, 1_000_000, i64::MAX];
        let mut encoded: Vec<_> = ids.iter().map(|&i| UserId::new(i).to_bytes()).collect();
        let sorted = encoded.clone();
        encoded.sort_unstable();
        assert_eq!(encoded, sorted);

        let back = UserId::from_bytes(&UserId::new(-5).to_bytes()).unwrap();
        assert_eq!(back, UserId::new(-5));
    }

    #[test]
    fn call_id_from_provider_json() {
        assert_eq!(
            CallId::from_json(&serde_json::json!(987_654)),
            Some(CallId::new("987654"))
        );
        assert_eq!(
            CallId::from_json(&serde_json::json!("abc")),
            Some(CallId::new("abc"))
        );
        assert_eq!(CallId::from_json(&serde_json::json!("")), None);
        assert_eq!(CallId::from_json(&serde_json::json!(0)), None);
        assert_eq!(CallId::from_json(&serde_json::Value::Null), None);
    }

    #[test]
    fn transaction_id_bytes_roundtrip() {
        let id = TransactionId::generate();
        let parsed = TransactionId::from_bytes(&id.to_bytes()).unwrap();
        assert_eq!(id, parsed);
        assert!(TransactionId::from_bytes(&[1, 2, 3]).is_err());
    }
}
