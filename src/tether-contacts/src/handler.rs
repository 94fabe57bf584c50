use crate::directory::{ContactDirectory, ContactUid, EntryKind};
use std::collections::HashSet;
use std::sync::Arc;
use tether_core::{ContactsConfig, DeviceChannel, HandlerError, HandlerResult, Packet, PacketHandler};

/// Requests the uid of every contact in the directory.
pub const PACKET_TYPE_REQUEST_ALL_UIDS: &str = "contacts.request_all_uids";

/// Requests display names for a list of uids carried under the key `uids`
/// (decimal strings).
pub const PACKET_TYPE_REQUEST_NAMES_BY_UID: &str = "contacts.request_names_by_uid";

/// Requests phone entries for a list of uids carried under the key `uids`.
pub const PACKET_TYPE_REQUEST_PHONES_BY_UID: &str = "contacts.request_phones_by_uid";

/// Requests email entries for a list of uids carried under the key `uids`.
pub const PACKET_TYPE_REQUEST_EMAILS_BY_UID: &str = "contacts.request_emails_by_uid";

/// Response carrying every known uid under `uids`.
pub const PACKET_TYPE_RESPONSE_UIDS: &str = "contacts.response_uids";

/// Response carrying the resolved subset under `uids` plus, per resolved uid,
/// a field keyed by that uid's decimal string holding the contact's name.
///
/// For example:
/// `{ "uids": ["1", "15"], "1": "John Smith", "15": "Mom" }`
pub const PACKET_TYPE_RESPONSE_NAMES: &str = "contacts.response_names";

/// Response carrying the resolved subset under `uids` plus, per resolved uid,
/// a list of `[number, type, label]` rows. The label is the user-defined
/// category name when the type is the custom sentinel, otherwise `""`.
///
/// For example:
/// `{ "uids": ["1", "3"], "1": [["+221234", "2", ""]], "3": [["+1(222)333-4444", "0", "Big Red Button"]] }`
pub const PACKET_TYPE_RESPONSE_PHONES: &str = "contacts.response_phones";

/// Response carrying `[address, type, label]` rows, shaped like
/// [`PACKET_TYPE_RESPONSE_PHONES`].
pub const PACKET_TYPE_RESPONSE_EMAILS: &str = "contacts.response_emails";

/// Packet handler serving contact data out of a [`ContactDirectory`].
///
/// Responses only ever advertise uids they carry payload for: anything the
/// directory cannot resolve is dropped, so a response's `uids` is always a
/// subset of the request's. Callers must not assume the two are equal.
pub struct ContactsHandler {
    directory: Arc<dyn ContactDirectory>,
    custom_types: ContactsConfig,
}

impl ContactsHandler {
    pub fn new(directory: Arc<dyn ContactDirectory>, custom_types: ContactsConfig) -> Self {
        Self {
            directory,
            custom_types,
        }
    }

    /// Parses the request's `uids` field. A missing field is a malformed
    /// request; uid strings that are not decimal integers can never resolve
    /// and are dropped up front.
    fn requested_uids(&self, packet: &Packet) -> Result<HashSet<ContactUid>, HandlerError> {
        let Some(raw) = packet.string_list("uids") else {
            return Err(HandlerError::MalformedPacket {
                packet_type: packet.packet_type().to_owned(),
                missing: "uids",
            });
        };

        let mut uids = HashSet::with_capacity(raw.len());
        for uid in &raw {
            match uid.parse::<ContactUid>() {
                Ok(uid) => {
                    uids.insert(uid);
                }
                Err(_) => {
                    tracing::warn!(uid = %uid, "dropping unparseable contact uid from request");
                }
            }
        }
        Ok(uids)
    }

    fn handle_all_uids(&self, channel: &dyn DeviceChannel) -> HandlerResult {
        let uids: Vec<String> = self
            .directory
            .all_uids()
            .into_iter()
            .map(|uid| uid.to_string())
            .collect();

        let mut reply = Packet::new(PACKET_TYPE_RESPONSE_UIDS);
        reply.set_string_list("uids", uids);
        channel.send(reply);
        Ok(())
    }

    fn handle_names(&self, packet: &Packet, channel: &dyn DeviceChannel) -> HandlerResult {
        let requested = self.requested_uids(packet)?;
        let names = self.directory.names(&requested);

        // The directory may have resolved fewer uids than requested;
        // advertise only what actually has a name.
        let mut resolved = Vec::with_capacity(names.len());
        let mut reply = Packet::new(PACKET_TYPE_RESPONSE_NAMES);
        for (uid, name) in names {
            reply.set_string(uid.to_string(), name);
            resolved.push(uid.to_string());
        }
        reply.set_string_list("uids", resolved);

        channel.send(reply);
        Ok(())
    }

    fn handle_entries(
        &self,
        packet: &Packet,
        channel: &dyn DeviceChannel,
        kind: EntryKind,
    ) -> HandlerResult {
        let requested = self.requested_uids(packet)?;
        let entries = self.directory.entries(&requested, kind);

        let (response_type, custom_type) = match kind {
            EntryKind::Phone => (
                PACKET_TYPE_RESPONSE_PHONES,
                self.custom_types.phone_custom_type,
            ),
            EntryKind::Email => (
                PACKET_TYPE_RESPONSE_EMAILS,
                self.custom_types.email_custom_type,
            ),
        };

        let mut resolved = Vec::with_capacity(entries.len());
        let mut reply = Packet::new(response_type);
        for (uid, raw_entries) in entries {
            let mut rows = Vec::with_capacity(raw_entries.len());
            for entry in raw_entries {
                let Some(type_code) = entry.type_code.normalize() else {
                    tracing::warn!(%uid, ?kind, "skipping entry with unparseable type code");
                    continue;
                };
                // Labels are only meaningful for the custom sentinel;
                // anything the directory supplied for other codes is
                // rewritten to empty.
                let label = if type_code == custom_type {
                    entry.label.unwrap_or_default()
                } else {
                    String::new()
                };
                rows.push(vec![entry.value, type_code.to_string(), label]);
            }

            // A contact the directory knows but that yielded no usable rows
            // is still advertised with an empty list, to distinguish
            // "known, empty" from "unknown".
            reply.set_rows(uid.to_string(), rows);
            resolved.push(uid.to_string());
        }
        reply.set_string_list("uids", resolved);

        channel.send(reply);
        Ok(())
    }
}

impl PacketHandler for ContactsHandler {
    fn incoming_packet_types(&self) -> &'static [&'static str] {
        &[
            PACKET_TYPE_REQUEST_ALL_UIDS,
            PACKET_TYPE_REQUEST_NAMES_BY_UID,
            PACKET_TYPE_REQUEST_PHONES_BY_UID,
            PACKET_TYPE_REQUEST_EMAILS_BY_UID,
        ]
    }

    fn outgoing_packet_types(&self) -> &'static [&'static str] {
        &[
            PACKET_TYPE_RESPONSE_UIDS,
            PACKET_TYPE_RESPONSE_NAMES,
            PACKET_TYPE_RESPONSE_PHONES,
            PACKET_TYPE_RESPONSE_EMAILS,
        ]
    }

    fn handle_packet(&self, packet: &Packet, channel: &dyn DeviceChannel) -> HandlerResult {
        match packet.packet_type() {
            PACKET_TYPE_REQUEST_ALL_UIDS => self.handle_all_uids(channel),
            PACKET_TYPE_REQUEST_NAMES_BY_UID => self.handle_names(packet, channel),
            PACKET_TYPE_REQUEST_PHONES_BY_UID => {
                self.handle_entries(packet, channel, EntryKind::Phone)
            }
            PACKET_TYPE_REQUEST_EMAILS_BY_UID => {
                self.handle_entries(packet, channel, EntryKind::Email)
            }
            other => Err(HandlerError::UnsupportedPacket {
                packet_type: other.to_owned(),
            }),
        }
    }
}
