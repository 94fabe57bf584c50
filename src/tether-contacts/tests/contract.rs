//! Wire-level contract for the contacts handler: raw JSON request in,
//! raw JSON response out, dispatched through the packet router.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tether_contacts::{ContactDirectory, ContactUid, ContactsHandler, EntryKind, RawEntry};
use tether_core::{ContactsConfig, DeviceChannel, Packet, PacketRouter};

struct SampleDirectory;

impl ContactDirectory for SampleDirectory {
    fn all_uids(&self) -> Vec<ContactUid> {
        vec![ContactUid(1), ContactUid(3), ContactUid(15)]
    }

    fn names(&self, uids: &HashSet<ContactUid>) -> HashMap<ContactUid, String> {
        [(ContactUid(1), "John Smith"), (ContactUid(15), "Mom")]
            .into_iter()
            .filter(|(uid, _)| uids.contains(uid))
            .map(|(uid, name)| (uid, name.to_owned()))
            .collect()
    }

    fn entries(
        &self,
        uids: &HashSet<ContactUid>,
        kind: EntryKind,
    ) -> HashMap<ContactUid, Vec<RawEntry>> {
        let mut result = HashMap::new();
        if kind == EntryKind::Phone && uids.contains(&ContactUid(3)) {
            result.insert(
                ContactUid(3),
                vec![RawEntry::new("+1(222)333-4444", 0).with_label("Big Red Button")],
            );
        }
        result
    }
}

#[derive(Default)]
struct CollectingChannel {
    sent: Mutex<Vec<Packet>>,
}

impl DeviceChannel for CollectingChannel {
    fn send(&self, packet: Packet) {
        self.sent.lock().unwrap().push(packet);
    }
}

fn router() -> PacketRouter {
    let mut router = PacketRouter::new();
    router.register(Arc::new(ContactsHandler::new(
        Arc::new(SampleDirectory),
        ContactsConfig::default(),
    )));
    router
}

fn respond(request_json: &str) -> Packet {
    let request: Packet = serde_json::from_str(request_json).expect("request should parse");
    let channel = CollectingChannel::default();
    router()
        .dispatch(&request, &channel)
        .expect("dispatch should succeed");
    let sent = channel.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    sent[0].clone()
}

#[test]
fn all_uids_round_trip() {
    let reply = respond(r#"{"type":"contacts.request_all_uids"}"#);
    assert_eq!(reply.packet_type(), "contacts.response_uids");
    assert_eq!(reply.string_list("uids").unwrap(), vec!["1", "3", "15"]);
}

#[test]
fn names_round_trip_drops_unresolved() {
    let reply =
        respond(r#"{"type":"contacts.request_names_by_uid","uids":["1","3","15"]}"#);
    assert_eq!(reply.packet_type(), "contacts.response_names");

    let mut uids = reply.string_list("uids").unwrap();
    uids.sort();
    assert_eq!(uids, vec!["1", "15"]);
    assert_eq!(reply.string("1"), Some("John Smith"));
    assert_eq!(reply.string("15"), Some("Mom"));
    assert!(!reply.has("3"));
}

#[test]
fn phones_round_trip_with_default_custom_code() {
    let reply = respond(r#"{"type":"contacts.request_phones_by_uid","uids":["3"]}"#);
    assert_eq!(reply.packet_type(), "contacts.response_phones");
    assert_eq!(reply.string_list("uids").unwrap(), vec!["3"]);
    // Type 0 is the default custom sentinel, so the label survives.
    assert_eq!(
        reply.rows("3").unwrap(),
        vec![vec![
            "+1(222)333-4444".to_string(),
            "0".to_string(),
            "Big Red Button".to_string()
        ]]
    );
}

#[test]
fn response_serializes_with_uid_keyed_fields() {
    let reply = respond(r#"{"type":"contacts.request_names_by_uid","uids":["15"]}"#);
    let json = serde_json::to_string(&reply).unwrap();
    assert!(json.contains("\"type\":\"contacts.response_names\""));
    assert!(json.contains("\"15\":\"Mom\""));
}

#[test]
fn unknown_type_rejected_at_dispatch_boundary() {
    let request: Packet =
        serde_json::from_str(r#"{"type":"contacts.request_birthdays_by_uid","uids":[]}"#).unwrap();
    let channel = CollectingChannel::default();
    assert!(router().dispatch(&request, &channel).is_err());
    assert!(channel.sent.lock().unwrap().is_empty());
}
