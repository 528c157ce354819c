use std::sync::LazyLock;

use regex::Regex;

use crate::schedule::EventDraft;

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})\s+to\s+(\d{1,2}):(\d{2})").unwrap());
static LANES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+swimming\s+lanes?").unwrap());

/// Icon wrapper classes used on the schedule page, and the field each one labels.
const ICON_CLASSES: &[(&str, FieldKind)] = &[
    ("icon-clock-wrapper", FieldKind::Time),
    ("icon-pin-wrapper", FieldKind::Location),
    ("icon-avatar-wrapper", FieldKind::Instructor),
    ("icon-flag-outline-wrapper", FieldKind::Intensity),
    ("icon-infos-outline-wrapper", FieldKind::Lanes),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Time,
    Location,
    Instructor,
    Intensity,
    Lanes,
}

impl FieldKind {
    pub fn from_class(class: &str) -> Option<FieldKind> {
        ICON_CLASSES
            .iter()
            .find(|(c, _)| *c == class)
            .map(|(_, kind)| *kind)
    }

    /// First icon class in `classes` that names a field.
    pub fn from_classes<S: AsRef<str>>(classes: &[S]) -> Option<FieldKind> {
        classes.iter().find_map(|c| Self::from_class(c.as_ref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Time { start: String, end: String },
    Location(String),
    Instructor(String),
    Intensity(String),
    Lanes(u32),
}

impl FieldValue {
    pub fn apply(self, draft: &mut EventDraft) {
        match self {
            FieldValue::Time { start, end } => {
                draft.start = Some(start);
                draft.end = Some(end);
            }
            FieldValue::Location(v) => draft.location = Some(v),
            FieldValue::Instructor(v) => draft.instructor = Some(v),
            FieldValue::Intensity(v) => draft.intensity = Some(v),
            FieldValue::Lanes(n) => draft.lanes = Some(n),
        }
    }
}

/// Turn the text of one info span into a typed value. `None` when the text
/// does not have the expected shape.
pub fn normalize(kind: FieldKind, raw: &str) -> Option<FieldValue> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    match kind {
        FieldKind::Time => parse_time_range(text),
        FieldKind::Lanes => parse_lanes(text).map(FieldValue::Lanes),
        FieldKind::Location => Some(FieldValue::Location(text.to_string())),
        FieldKind::Instructor => Some(FieldValue::Instructor(text.to_string())),
        FieldKind::Intensity => Some(FieldValue::Intensity(text.to_lowercase())),
    }
}

/// "9:00 to 10:15" -> ("09:00", "10:15"). End before start is kept as-is.
fn parse_time_range(text: &str) -> Option<FieldValue> {
    let caps = TIME_RE.captures(text)?;
    let start = format!("{:02}:{}", caps[1].parse::<u8>().ok()?, &caps[2]);
    let end = format!("{:02}:{}", caps[3].parse::<u8>().ok()?, &caps[4]);
    Some(FieldValue::Time { start, end })
}

fn parse_lanes(text: &str) -> Option<u32> {
    LANES_RE.captures(text)?[1].parse().ok()
}
