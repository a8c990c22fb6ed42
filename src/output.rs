//! Terminal, JSON and markdown rendering.
//!
//! Human output follows the emoji-header style used across the commands;
//! `--json` mode prints the canonical shapes verbatim so scripts can rely on
//! field names (`isGroup`, `memberCount`, ...).

use anyhow::Result;
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::cache::{Document, TranscriptSegment};
use crate::people::{ExtractedAttendee, MeetingParticipants};

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `2025-03-01T10:00:00Z` → `2025-03-01 10:00` in local time; anything
/// unparseable passes through untouched.
pub fn format_timestamp(ts: Option<&str>) -> String {
    let Some(ts) = ts else {
        return "(no date)".to_string();
    };
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| ts.to_string())
}

pub fn document_line(doc: &Document) -> String {
    format!(
        "📋 {}  —  {}  [{}]",
        doc.display_title(),
        format_timestamp(doc.updated_at.as_deref().or(doc.created_at.as_deref())),
        doc.id
    )
}

pub fn print_document_list(docs: &[&Document]) {
    if docs.is_empty() {
        println!("No meetings found.");
        return;
    }
    for doc in docs {
        println!("{}", document_line(doc));
    }
    println!("\n{} meeting(s)", docs.len());
}

pub fn attendee_line(attendee: &ExtractedAttendee) -> String {
    let mut line = attendee.name.clone();
    if let Some(email) = &attendee.email {
        line.push_str(&format!(" <{}>", email));
    }
    if attendee.is_group {
        // memberCount is the raw directory size, not the deduped one.
        match attendee.member_count {
            Some(count) => line.push_str(&format!(" (group, {} members)", count)),
            None => line.push_str(" (group)"),
        }
    }
    line
}

pub fn print_participants(participants: &MeetingParticipants) {
    match &participants.organizer {
        Some(organizer) => println!("🗓  Organizer: {}", attendee_line(organizer)),
        None => println!("🗓  Organizer: (unknown)"),
    }
    println!("👥 Attendees ({}):", participants.attendees.len());
    for attendee in &participants.attendees {
        println!("   • {}", attendee_line(attendee));
    }
    if let Some(groups) = &participants.expanded_groups {
        for expanded in groups {
            println!("\n📣 {}", attendee_line(&expanded.group));
            for member in &expanded.members {
                println!("   ↳ {}", attendee_line(member));
            }
        }
    }
}

pub fn print_document_detail(doc: &Document, participants: &MeetingParticipants) {
    println!("📋 {}", doc.display_title());
    println!("   Updated: {}", format_timestamp(doc.updated_at.as_deref()));
    println!("   Id: {}", doc.id);
    if let Some(summary) = doc.summary.as_deref().filter(|s| !s.is_empty()) {
        println!("   Summary: {}", summary);
    }
    println!();
    print_participants(participants);
    let notes = doc
        .notes_markdown
        .as_deref()
        .or(doc.notes_plain.as_deref())
        .filter(|n| !n.is_empty());
    if let Some(notes) = notes {
        println!("\n📝 Notes:\n{}", notes);
    }
}

pub fn transcript_line(segment: &TranscriptSegment) -> String {
    match (&segment.source, &segment.start_timestamp) {
        (Some(source), Some(ts)) => format!("[{} @ {}] {}", source, ts, segment.text),
        (Some(source), None) => format!("[{}] {}", source, segment.text),
        (None, Some(ts)) => format!("[@ {}] {}", ts, segment.text),
        (None, None) => segment.text.clone(),
    }
}

pub fn print_transcript(title: &str, segments: &[TranscriptSegment]) {
    println!("🎙  Transcript: {}\n", title);
    if segments.is_empty() {
        println!("(no transcript segments)");
        return;
    }
    for segment in segments {
        println!("{}", transcript_line(segment));
    }
}

/// Markdown export of one meeting: header block, participants, notes.
pub fn markdown_export(doc: &Document, participants: &MeetingParticipants) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", doc.display_title()));
    out.push_str(&format!(
        "- **Date:** {}\n",
        format_timestamp(doc.created_at.as_deref().or(doc.updated_at.as_deref()))
    ));
    if let Some(organizer) = &participants.organizer {
        out.push_str(&format!("- **Organizer:** {}\n", attendee_line(organizer)));
    }
    if !participants.attendees.is_empty() {
        let attendees: Vec<String> =
            participants.attendees.iter().map(attendee_line).collect();
        out.push_str(&format!("- **Attendees:** {}\n", attendees.join(", ")));
    }
    if let Some(groups) = &participants.expanded_groups {
        for expanded in groups {
            out.push_str(&format!("\n## {}\n\n", attendee_line(&expanded.group)));
            for member in &expanded.members {
                out.push_str(&format!("- {}\n", attendee_line(member)));
            }
        }
    }
    if let Some(summary) = doc.summary.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!("\n## Summary\n\n{}\n", summary));
    }
    let notes = doc
        .notes_markdown
        .as_deref()
        .or(doc.notes_plain.as_deref())
        .filter(|n| !n.is_empty());
    if let Some(notes) = notes {
        out.push_str(&format!("\n## Notes\n\n{}\n", notes));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn attendee(name: &str, email: Option<&str>) -> ExtractedAttendee {
        ExtractedAttendee {
            name: name.to_string(),
            email: email.map(str::to_string),
            is_group: false,
            member_count: None,
        }
    }

    #[test]
    fn attendee_line_renders_group_with_raw_member_count() {
        let group = ExtractedAttendee {
            name: "Eng".to_string(),
            email: Some("eng@co.com".to_string()),
            is_group: true,
            member_count: Some(7),
        };
        assert_eq!(attendee_line(&group), "Eng <eng@co.com> (group, 7 members)");
        assert_eq!(attendee_line(&attendee("Sam", None)), "Sam");
    }

    #[test]
    fn transcript_line_prefixes_source_and_timestamp() {
        let seg = TranscriptSegment {
            text: "hello".to_string(),
            source: Some("microphone".to_string()),
            start_timestamp: Some("00:12".to_string()),
        };
        assert_eq!(transcript_line(&seg), "[microphone @ 00:12] hello");

        let bare =
            TranscriptSegment { text: "hi".to_string(), source: None, start_timestamp: None };
        assert_eq!(transcript_line(&bare), "hi");
    }

    #[test]
    fn unparseable_timestamp_passes_through() {
        assert_eq!(format_timestamp(Some("soon")), "soon");
        assert_eq!(format_timestamp(None), "(no date)");
    }

    #[test]
    fn markdown_export_lists_attendees_and_notes() {
        let doc = Document {
            id: "doc-1".to_string(),
            title: Some("Weekly Sync".to_string()),
            created_at: Some("2025-03-01T10:00:00Z".to_string()),
            notes_markdown: Some("- decided things".to_string()),
            ..Default::default()
        };
        let participants = MeetingParticipants {
            organizer: Some(attendee("A", Some("a@x.com"))),
            attendees: vec![attendee("B", Some("b@x.com"))],
            expanded_groups: None,
        };
        let md = markdown_export(&doc, &participants);
        assert!(md.starts_with("# Weekly Sync\n"));
        assert!(md.contains("- **Organizer:** A <a@x.com>"));
        assert!(md.contains("- **Attendees:** B <b@x.com>"));
        assert!(md.contains("## Notes\n\n- decided things"));
    }

    #[test]
    fn participants_json_shape_is_stable() {
        let participants = MeetingParticipants {
            organizer: None,
            attendees: vec![ExtractedAttendee {
                name: "Eng".to_string(),
                email: None,
                is_group: true,
                member_count: Some(2),
            }],
            expanded_groups: None,
        };
        let value = serde_json::to_value(&participants).unwrap();
        assert_eq!(
            value,
            json!({"attendees": [{"name": "Eng", "isGroup": true, "memberCount": 2}]})
        );
    }
}
