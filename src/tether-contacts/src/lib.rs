//! Contacts data served to a paired remote device.
//!
//! This crate provides:
//! - The [`ContactDirectory`] collaborator trait, a partial-result view onto
//!   whatever contact store backs the device
//! - The attribute record model, including tolerant normalization of type
//!   codes that arrive as either integers or decimal strings
//! - [`ContactsHandler`], the packet handler implementing the four contacts
//!   request/response operations

mod directory;
mod handler;

pub use directory::{ContactDirectory, ContactUid, EntryKind, RawEntry, RawTypeCode};
pub use handler::{
    ContactsHandler, PACKET_TYPE_REQUEST_ALL_UIDS, PACKET_TYPE_REQUEST_EMAILS_BY_UID,
    PACKET_TYPE_REQUEST_NAMES_BY_UID, PACKET_TYPE_REQUEST_PHONES_BY_UID,
    PACKET_TYPE_RESPONSE_EMAILS, PACKET_TYPE_RESPONSE_NAMES, PACKET_TYPE_RESPONSE_PHONES,
    PACKET_TYPE_RESPONSE_UIDS,
};
