use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Opaque identifier naming one contact.
///
/// Transmitted and keyed on the wire as its decimal string form, because not
/// every serialization boundary carries 64-bit integers without precision
/// loss. Stability across requests is guaranteed by the directory backend,
/// not by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContactUid(pub u64);

impl fmt::Display for ContactUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContactUid {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<u64> for ContactUid {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// The multi-valued attribute kinds a contact may own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Phone,
    Email,
}

/// A type code as stored by the backing contact store.
///
/// Some stores hold the code as an integer, others as a decimal string for
/// the same field. This is a compatibility shim, not a design principle:
/// everything downstream of [`RawTypeCode::normalize`] sees a plain integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTypeCode {
    Number(i64),
    Text(String),
}

impl RawTypeCode {
    /// Canonical integer form, or `None` when the stored text does not parse.
    pub fn normalize(&self) -> Option<i64> {
        match self {
            RawTypeCode::Number(code) => Some(*code),
            RawTypeCode::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl From<i64> for RawTypeCode {
    fn from(code: i64) -> Self {
        Self::Number(code)
    }
}

/// One phone or email entry exactly as the directory backend yields it.
///
/// `label` is only meaningful when the normalized type code equals the
/// configured custom sentinel for the entry's kind; the handler enforces
/// that, not the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub value: String,
    #[serde(rename = "type")]
    pub type_code: RawTypeCode,
    #[serde(default)]
    pub label: Option<String>,
}

impl RawEntry {
    pub fn new(value: impl Into<String>, type_code: impl Into<RawTypeCode>) -> Self {
        Self {
            value: value.into(),
            type_code: type_code.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Read-only view onto the contact store backing this device.
///
/// All lookups follow a partial-result contract: a backend may omit any
/// requested uid it does not know, and may omit attributes a contact does
/// not have. Callers never treat a miss as an error. Lookups are synchronous
/// reads; the backend owns whatever caching or querying that implies.
pub trait ContactDirectory: Send + Sync {
    /// Every known contact uid. Order is unspecified but must be stable
    /// within a single call.
    fn all_uids(&self) -> Vec<ContactUid>;

    /// Display names for the requested uids. Unknown uids and contacts
    /// without a name are absent from the result.
    fn names(&self, uids: &HashSet<ContactUid>) -> HashMap<ContactUid, String>;

    /// Phone or email entries for the requested uids. Unknown uids are
    /// absent; a known contact with no entries of this kind maps to an
    /// empty vector.
    fn entries(
        &self,
        uids: &HashSet<ContactUid>,
        kind: EntryKind,
    ) -> HashMap<ContactUid, Vec<RawEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uid_round_trips_as_decimal_string() {
        let uid: ContactUid = "15".parse().unwrap();
        assert_eq!(uid, ContactUid(15));
        assert_eq!(uid.to_string(), "15");
    }

    #[test]
    fn uid_parse_rejects_garbage() {
        assert!("fifteen".parse::<ContactUid>().is_err());
        assert!("-3".parse::<ContactUid>().is_err());
    }

    #[test]
    fn type_code_normalizes_both_representations() {
        assert_eq!(RawTypeCode::Number(2).normalize(), Some(2));
        assert_eq!(RawTypeCode::Text("2".into()).normalize(), Some(2));
        assert_eq!(RawTypeCode::Text(" 7 ".into()).normalize(), Some(7));
        assert_eq!(RawTypeCode::Text("work".into()).normalize(), None);
    }

    #[test]
    fn type_code_deserializes_untagged() {
        let entry: RawEntry =
            serde_json::from_str(r#"{"value":"+221234","type":"2"}"#).unwrap();
        assert_eq!(entry.type_code, RawTypeCode::Text("2".into()));
        assert_eq!(entry.label, None);

        let entry: RawEntry =
            serde_json::from_str(r#"{"value":"+221234","type":2,"label":"x"}"#).unwrap();
        assert_eq!(entry.type_code, RawTypeCode::Number(2));
    }
}
