//! Status-feed parsing and incident classification.
//!
//! The remote status page publishes an Atom feed. Entries are extracted with
//! best-effort string scanning — a malformed feed yields an empty list rather
//! than an error, since "no incidents" is the safe default.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Incident
// ---------------------------------------------------------------------------

/// A classified status-feed entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub title: String,
    pub updated: String,
    pub content: String,
    pub link: String,
    #[serde(rename = "isIncident")]
    pub is_incident: bool,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Whether an entry describes an active incident.
///
/// Active iff the title mentions an incident without a resolution marker, or
/// the body carries an in-progress marker ("investigating", "identified",
/// "monitoring") without a resolution marker. Case-insensitive.
pub fn classify(title: &str, content: &str) -> bool {
    let title = title.to_lowercase();
    let content = content.to_lowercase();

    let title_active = title.contains("incident") && !title.contains("resolved");
    let content_active = (content.contains("investigating")
        || content.contains("identified")
        || content.contains("monitoring"))
        && !content.contains("resolved");

    title_active || content_active
}

/// Drop entries whose id has been dismissed.
pub fn filter_dismissed(entries: Vec<Incident>, dismissed: &[String]) -> Vec<Incident> {
    entries
        .into_iter()
        .filter(|e| !dismissed.iter().any(|d| d == &e.id))
        .collect()
}

// ---------------------------------------------------------------------------
// Feed parsing
// ---------------------------------------------------------------------------

/// Parse an Atom feed into classified incidents, newest-first as published.
///
/// Entries without any usable identifier are skipped. Never fails: malformed
/// input simply produces fewer (or zero) entries.
pub fn parse_feed(xml: &str) -> Vec<Incident> {
    let mut incidents = Vec::new();
    let mut rest = xml;
    while let Some(start) = rest.find("<entry") {
        let after = &rest[start..];
        let Some(end) = after.find("</entry>") else {
            break;
        };
        if let Some(incident) = parse_entry(&after[..end]) {
            incidents.push(incident);
        }
        rest = &after[end + "</entry>".len()..];
    }
    incidents
}

fn parse_entry(block: &str) -> Option<Incident> {
    let title = unescape(tag_text(block, "title").unwrap_or_default());
    let content = unescape(tag_text(block, "content").unwrap_or_default());
    let updated = tag_text(block, "updated").unwrap_or_default().to_string();
    let link = link_href(block).unwrap_or_default().to_string();

    // Prefer the Atom id; fall back to the permalink, then the title.
    let id = tag_text(block, "id")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| (!link.is_empty()).then(|| link.clone()))
        .or_else(|| (!title.is_empty()).then(|| title.clone()))?;

    let is_incident = classify(&title, &content);
    Some(Incident {
        id,
        title,
        updated,
        content,
        link,
        is_incident,
    })
}

/// Text between `<tag ...>` and `</tag>`, or `None` when absent.
fn tag_text<'a>(block: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let start = block.find(&open)?;
    let after_open = &block[start..];
    let gt = after_open.find('>')?;
    // Self-closing tag has no text.
    if after_open[..gt].ends_with('/') {
        return None;
    }
    let body = &after_open[gt + 1..];
    let end = body.find(&close)?;
    Some(&body[..end])
}

/// The `href` of the first `<link ...>` element.
fn link_href(block: &str) -> Option<&str> {
    let start = block.find("<link")?;
    let element = &block[start..block[start..].find('>')? + start];
    let href_at = element.find("href=\"")?;
    let value = &element[href_at + 6..];
    let end = value.find('"')?;
    Some(&value[..end])
}

fn unescape(raw: &str) -> String {
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
