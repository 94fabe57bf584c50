//! A [`ContactDirectory`] backed by a TOML document.
//!
//! Stands in for the platform contact database on development machines and
//! in headless deployments. The document holds one `[[contacts]]` table per
//! contact:
//!
//! ```toml
//! [[contacts]]
//! uid = 1
//! name = "John Smith"
//!
//! [[contacts.phones]]
//! value = "+221234"
//! type = 2
//!
//! [[contacts.emails]]
//! value = "john@example.com"
//! type = "1"
//! ```
//!
//! `type` may be an integer or a decimal string; both forms reach the
//! handler untouched, exercising the same normalization path the platform
//! data takes. Enumeration order is document order.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tether_contacts::{ContactDirectory, ContactUid, EntryKind, RawEntry};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TomlDirectoryError {
    #[error("failed to read contact file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse contact file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("duplicate contact uid {uid}")]
    DuplicateUid { uid: u64 },
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    contacts: Vec<ContactRecord>,
}

#[derive(Debug, Deserialize)]
struct ContactRecord {
    uid: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    phones: Vec<RawEntry>,
    #[serde(default)]
    emails: Vec<RawEntry>,
}

/// Immutable contact set loaded once from a TOML file.
#[derive(Debug)]
pub struct TomlDirectory {
    contacts: Vec<ContactRecord>,
}

impl TomlDirectory {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TomlDirectoryError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| TomlDirectoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Document =
            toml::from_str(&contents).map_err(|source| TomlDirectoryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut seen = HashSet::new();
        for contact in &document.contacts {
            if !seen.insert(contact.uid) {
                return Err(TomlDirectoryError::DuplicateUid { uid: contact.uid });
            }
        }

        tracing::debug!(
            path = %path.display(),
            contacts = document.contacts.len(),
            "contact directory loaded"
        );
        Ok(Self {
            contacts: document.contacts,
        })
    }

    fn requested<'a>(
        &'a self,
        uids: &'a HashSet<ContactUid>,
    ) -> impl Iterator<Item = &'a ContactRecord> {
        self.contacts
            .iter()
            .filter(|contact| uids.contains(&ContactUid(contact.uid)))
    }
}

impl ContactDirectory for TomlDirectory {
    fn all_uids(&self) -> Vec<ContactUid> {
        self.contacts
            .iter()
            .map(|contact| ContactUid(contact.uid))
            .collect()
    }

    fn names(&self, uids: &HashSet<ContactUid>) -> HashMap<ContactUid, String> {
        self.requested(uids)
            .filter_map(|contact| {
                contact
                    .name
                    .as_ref()
                    .map(|name| (ContactUid(contact.uid), name.clone()))
            })
            .collect()
    }

    fn entries(
        &self,
        uids: &HashSet<ContactUid>,
        kind: EntryKind,
    ) -> HashMap<ContactUid, Vec<RawEntry>> {
        self.requested(uids)
            .map(|contact| {
                let entries = match kind {
                    EntryKind::Phone => contact.phones.clone(),
                    EntryKind::Email => contact.emails.clone(),
                };
                (ContactUid(contact.uid), entries)
            })
            .collect()
    }
}
