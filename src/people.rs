//! Participant extraction from Granola's loosely-typed `people` structure.
//!
//! The cache stores people as arbitrarily-shaped JSON: a `creator` entry plus
//! an `attendees` array, where each entry may be an individual, a delegated
//! name, or a mailing-list style group carrying a `details.group.members`
//! directory. This module normalizes all of that into a canonical,
//! deduplicated participant list. It is total over arbitrary JSON input:
//! malformed entries are skipped, never propagated as errors.

use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::cache::Document;

/// A single normalized participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedAttendee {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_group: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_count: Option<usize>,
}

/// A group attendee together with its (independently deduplicated) member
/// directory. Only produced when group expansion is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandedGroup {
    pub group: ExtractedAttendee,
    pub members: Vec<ExtractedAttendee>,
}

/// Canonical participant view of one meeting document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingParticipants {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer: Option<ExtractedAttendee>,
    pub attendees: Vec<ExtractedAttendee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_groups: Option<Vec<ExpandedGroup>>,
}

/// Shape of one raw entry, resolved once at the boundary so downstream code
/// never re-inspects the JSON.
enum EntryKind {
    Individual,
    Group { member_count: usize },
}

/// Per-entry outcome. Collapsed to the flat attendee list at the sequence
/// boundary; the skip reason exists so tests can pin down why an entry
/// vanished.
enum Extraction {
    Keep(ExtractedAttendee),
    Skip(&'static str),
}

/// Extract the ordered, deduplicated attendee list from a raw `people` value.
///
/// Processes `creator` first (if present), then each `attendees` entry in
/// order. Dedup key is lowercase email when present, else lowercase name;
/// the first occurrence of a key wins and later duplicates are dropped
/// silently, even when they carry more complete data.
pub fn extract_attendees(people: &Value) -> Vec<ExtractedAttendee> {
    let Some(obj) = people.as_object() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut out = Vec::new();

    if let Some(creator) = obj.get("creator") {
        push_deduped(extract_from_entry(creator), &mut seen, &mut out);
    }
    if let Some(entries) = obj.get("attendees").and_then(Value::as_array) {
        for entry in entries {
            push_deduped(extract_from_entry(entry), &mut seen, &mut out);
        }
    }

    out
}

/// Extract organizer, attendees and (optionally) expanded groups for one
/// document.
///
/// The organizer comes from the calendar event's `organizer.email`; its
/// display name is borrowed from a case-insensitive email match among the
/// extracted attendees, falling back to the email's local part. A resolved
/// organizer is removed from the attendee list, keyed solely on
/// case-insensitive email equality.
pub fn extract_participants(doc: &Document, expand_groups: bool) -> MeetingParticipants {
    let empty = Value::Null;
    let people = doc.people.as_ref().unwrap_or(&empty);
    let mut attendees = extract_attendees(people);

    let organizer_email = doc
        .google_calendar_event
        .as_ref()
        .and_then(|event| event.organizer.as_ref())
        .and_then(|org| org.email.as_deref())
        .filter(|email| !email.is_empty());

    let organizer = organizer_email.map(|email| {
        let name = attendees
            .iter()
            .find(|a| a.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email)))
            .map(|a| a.name.clone())
            .unwrap_or_else(|| local_part(email).to_string());
        ExtractedAttendee {
            name,
            email: Some(email.to_string()),
            is_group: false,
            member_count: None,
        }
    });

    if let Some(email) = organizer_email {
        attendees.retain(|a| !a.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email)));
    }

    let expanded_groups = expand_groups.then(|| expand_raw_groups(people));

    MeetingParticipants { organizer, attendees, expanded_groups }
}

/// Second pass over the raw attendee entries (the creator is never
/// expanded), producing one `{group, members}` pair per entry with a valid
/// non-empty member array, in raw order. Group expansion is strictly
/// additive: the flat attendee list is left untouched.
fn expand_raw_groups(people: &Value) -> Vec<ExpandedGroup> {
    let Some(entries) = people.get("attendees").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut groups = Vec::new();
    for entry in entries {
        let EntryKind::Group { member_count } = classify(entry) else {
            continue;
        };
        let members = entry
            .pointer("/details/group/members")
            .and_then(Value::as_array)
            .map(|m| extract_group_members(m))
            .unwrap_or_default();
        let name = str_field(entry, "name")
            .or_else(|| str_field(entry, "email"))
            .unwrap_or_else(|| "(group)".to_string());
        let group = ExtractedAttendee {
            name,
            email: str_field(entry, "email"),
            is_group: true,
            member_count: Some(member_count),
        };
        groups.push(ExpandedGroup { group, members });
    }
    groups
}

/// Normalize one group's member directory. Name resolution is identical to
/// the individual entry path; dedup is scoped to this group only, never
/// against the outer attendee list.
fn extract_group_members(members: &[Value]) -> Vec<ExtractedAttendee> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for member in members {
        push_deduped(extract_individual(member), &mut seen, &mut out);
    }
    out
}

fn push_deduped(
    extraction: Extraction,
    seen: &mut HashSet<String>,
    out: &mut Vec<ExtractedAttendee>,
) {
    match extraction {
        Extraction::Keep(attendee) => {
            let key = dedup_key(&attendee);
            if key.is_empty() {
                debug!("dropping attendee with empty dedup key");
            } else if seen.insert(key) {
                out.push(attendee);
            } else {
                debug!("dropping duplicate attendee '{}'", attendee.name);
            }
        }
        Extraction::Skip(reason) => debug!("skipping people entry: {}", reason),
    }
}

/// Lowercase email when present, else lowercase name.
fn dedup_key(attendee: &ExtractedAttendee) -> String {
    match &attendee.email {
        Some(email) if !email.is_empty() => email.to_lowercase(),
        _ => attendee.name.to_lowercase(),
    }
}

/// Extract one raw entry, classifying it as group or individual. Entries
/// lacking both name and email are meaningless and skipped without being
/// counted.
fn extract_from_entry(entry: &Value) -> Extraction {
    if !entry.is_object() {
        return Extraction::Skip("entry is not an object");
    }
    let name = str_field(entry, "name");
    let email = str_field(entry, "email");
    if name.is_none() && email.is_none() {
        return Extraction::Skip("entry has neither name nor email");
    }

    match classify(entry) {
        EntryKind::Group { member_count } => Extraction::Keep(ExtractedAttendee {
            name: name.or_else(|| email.clone()).unwrap_or_else(|| "(group)".to_string()),
            email,
            is_group: true,
            member_count: Some(member_count),
        }),
        EntryKind::Individual => extract_individual(entry),
    }
}

/// Individual-path extraction, also used verbatim for group members.
/// Name resolution order: `name`, then the nested person full name, then the
/// email's local part, then `(unknown)`.
fn extract_individual(entry: &Value) -> Extraction {
    if !entry.is_object() {
        return Extraction::Skip("entry is not an object");
    }
    let name = str_field(entry, "name");
    let email = str_field(entry, "email");
    if name.is_none() && email.is_none() {
        return Extraction::Skip("entry has neither name nor email");
    }

    let name = name
        .or_else(|| {
            entry
                .pointer("/details/person/name/fullName")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .or_else(|| email.as_deref().map(|e| local_part(e).to_string()))
        .unwrap_or_else(|| "(unknown)".to_string());

    Extraction::Keep(ExtractedAttendee { name, email, is_group: false, member_count: None })
}

/// A group is exactly an entry whose `details.group.members` is a non-empty
/// array. Absence, a wrong type, or an empty array all mean individual.
fn classify(entry: &Value) -> EntryKind {
    match entry.pointer("/details/group/members").and_then(Value::as_array) {
        Some(members) if !members.is_empty() => EntryKind::Group { member_count: members.len() },
        _ => EntryKind::Individual,
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string)
}

fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CalendarEvent, EventOrganizer};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    fn doc_with(people: Value, organizer_email: Option<&str>) -> Document {
        Document {
            people: Some(people),
            google_calendar_event: organizer_email.map(|email| CalendarEvent {
                organizer: Some(EventOrganizer {
                    email: Some(email.to_string()),
                    display_name: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn non_object_people_yields_empty() {
        assert_eq!(extract_attendees(&Value::Null), vec![]);
        assert_eq!(extract_attendees(&json!("people")), vec![]);
        assert_eq!(extract_attendees(&json!([1, 2])), vec![]);
    }

    #[test]
    fn entries_without_name_or_email_are_skipped_uncounted() {
        let people = json!({
            "creator": {"details": {"person": {"name": {"fullName": "Ghost"}}}},
            "attendees": [{}, {"details": {}}, 42, null]
        });
        assert_eq!(extract_attendees(&people), vec![]);
    }

    #[test]
    fn creator_comes_first_then_attendees_in_order() {
        let people = json!({
            "creator": {"name": "Carol", "email": "carol@x.com"},
            "attendees": [
                {"name": "Alice", "email": "alice@x.com"},
                {"name": "Bob", "email": "bob@x.com"}
            ]
        });
        let names: Vec<_> =
            extract_attendees(&people).into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Carol", "Alice", "Bob"]);
    }

    #[test]
    fn first_seen_wins_on_case_insensitive_email_collision() {
        let people = json!({
            "attendees": [
                {"email": "sam@x.com"},
                {"name": "Samuel Fuller", "email": "SAM@X.COM"}
            ]
        });
        let out = extract_attendees(&people);
        assert_eq!(out.len(), 1);
        // The later, fuller entry is dropped; local part names the first.
        assert_eq!(out[0].name, "sam");
        assert_eq!(out[0].email.as_deref(), Some("sam@x.com"));
    }

    #[test_case(json!(3) ; "number members")]
    #[test_case(json!({"a": 1}) ; "object members")]
    #[test_case(json!("two") ; "string members")]
    #[test_case(json!([]) ; "empty members")]
    fn non_array_or_empty_members_means_individual(members: Value) {
        let people = json!({
            "attendees": [{"name": "Eng", "details": {"group": {"members": members}}}]
        });
        let out = extract_attendees(&people);
        assert_eq!(out.len(), 1);
        assert!(!out[0].is_group);
        assert_eq!(out[0].member_count, None);
    }

    #[test]
    fn group_entry_records_raw_member_count() {
        let people = json!({
            "attendees": [{
                "name": "Eng",
                "email": "eng@co.com",
                "details": {"group": {"members": [{"name": "Sam"}, {"name": "Sam"}]}}
            }]
        });
        let out = extract_attendees(&people);
        assert_eq!(out.len(), 1);
        assert!(out[0].is_group);
        assert_eq!(out[0].member_count, Some(2));
    }

    #[test]
    fn individual_name_resolution_falls_through() {
        let people = json!({
            "attendees": [
                {"name": "Named", "email": "n@x.com"},
                {"email": "local.part@x.com"},
                {"email": "full@x.com",
                 "details": {"person": {"name": {"fullName": "Full Name"}}}}
            ]
        });
        let names: Vec<_> =
            extract_attendees(&people).into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Named", "local.part", "Full Name"]);
    }

    #[test]
    fn idempotent_over_immutable_input() {
        let people = json!({
            "creator": {"name": "Carol"},
            "attendees": [
                {"email": "a@x.com"},
                {"name": "Grp", "details": {"group": {"members": [{"name": "M"}]}}}
            ]
        });
        assert_eq!(extract_attendees(&people), extract_attendees(&people));
    }

    #[test]
    fn organizer_borrows_display_name_and_is_removed_from_attendees() {
        let people = json!({
            "attendees": [
                {"name": "A", "email": "a@x.com"},
                {"name": "B", "email": "b@x.com"}
            ]
        });
        let doc = doc_with(people, Some("A@X.com"));
        let result = extract_participants(&doc, false);

        let organizer = result.organizer.expect("organizer resolved");
        assert_eq!(organizer.email.as_deref(), Some("A@X.com"));
        assert_eq!(organizer.name, "A");
        assert!(!organizer.is_group);

        let names: Vec<_> = result.attendees.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["B"]);
        assert!(result.expanded_groups.is_none());
    }

    #[test]
    fn organizer_without_attendee_match_uses_local_part() {
        let doc = doc_with(json!({"attendees": []}), Some("dana.q@corp.com"));
        let result = extract_participants(&doc, false);
        let organizer = result.organizer.unwrap();
        assert_eq!(organizer.name, "dana.q");
        assert!(result.attendees.is_empty());
    }

    #[test]
    fn no_organizer_email_means_no_removal() {
        let people = json!({"attendees": [{"name": "A", "email": "a@x.com"}]});
        let mut doc = doc_with(people, None);
        doc.google_calendar_event = Some(CalendarEvent::default());
        let result = extract_participants(&doc, false);
        assert!(result.organizer.is_none());
        assert_eq!(result.attendees.len(), 1);
    }

    #[test]
    fn group_expansion_is_additive_and_dedupes_only_true_key_collisions() {
        let people = json!({
            "attendees": [{
                "name": "Eng",
                "email": "eng@co.com",
                "details": {"group": {"members": [{"name": "Sam"}, {"email": "sam@co.com"}]}}
            }]
        });
        let doc = doc_with(people, None);
        let result = extract_participants(&doc, true);

        assert_eq!(result.attendees.len(), 1);
        assert!(result.attendees[0].is_group);
        assert_eq!(result.attendees[0].member_count, Some(2));

        let groups = result.expanded_groups.expect("expansion requested");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group.name, "Eng");
        assert_eq!(groups[0].group.member_count, Some(2));
        // "Sam" keys as "sam", the email-only member keys as "sam@co.com":
        // different keys, so both survive.
        let members: Vec<_> =
            groups[0].members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(members, vec!["Sam", "sam"]);
    }

    #[test]
    fn group_members_dedupe_within_group_only() {
        let people = json!({
            "attendees": [
                {"name": "Sam", "email": "sam@co.com"},
                {"name": "Eng", "email": "eng@co.com",
                 "details": {"group": {"members": [
                     {"email": "sam@co.com"},
                     {"email": "SAM@CO.COM"}
                 ]}}}
            ]
        });
        let doc = doc_with(people, None);
        let result = extract_participants(&doc, true);

        // Sam stays in the flat list even though the group also carries him.
        assert_eq!(result.attendees.len(), 2);
        let groups = result.expanded_groups.unwrap();
        assert_eq!(groups[0].members.len(), 1);
    }

    #[test]
    fn nameless_group_descriptor_falls_back_to_group_literal() {
        let people = json!({
            "attendees": [
                {"details": {"group": {"members": [{"name": "M"}]}}}
            ]
        });
        let doc = doc_with(people, None);
        let result = extract_participants(&doc, true);

        // The entry has neither name nor email, so the flat list skips it,
        // but the expansion pass still describes the group.
        assert!(result.attendees.is_empty());
        let groups = result.expanded_groups.unwrap();
        assert_eq!(groups[0].group.name, "(group)");
        assert_eq!(groups[0].members.len(), 1);
    }

    #[test]
    fn creator_group_is_never_expanded() {
        let people = json!({
            "creator": {"name": "List", "email": "list@co.com",
                        "details": {"group": {"members": [{"name": "M"}]}}},
            "attendees": []
        });
        let doc = doc_with(people, None);
        let result = extract_participants(&doc, true);
        assert_eq!(result.expanded_groups, Some(vec![]));
        assert_eq!(result.attendees.len(), 1);
        assert!(result.attendees[0].is_group);
    }

    #[test]
    fn serialized_shape_uses_camel_case_and_omits_absent_fields() {
        let doc = doc_with(
            json!({"attendees": [
                {"name": "Eng", "email": "eng@co.com",
                 "details": {"group": {"members": [{"name": "Sam"}]}}}
            ]}),
            None,
        );
        let value = serde_json::to_value(extract_participants(&doc, false)).unwrap();
        assert_eq!(
            value,
            json!({
                "attendees": [{
                    "name": "Eng",
                    "email": "eng@co.com",
                    "isGroup": true,
                    "memberCount": 1
                }]
            })
        );
    }
}
