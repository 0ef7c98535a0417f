use serde::Serialize;

use crate::document::Entry;

/// Keys whose annotations carry a lap estimate in parentheses.
pub const FUEL_KEYS: [&str; 2] = ["VirtualEnergySetting", "FuelCapacitySetting"];
/// Key whose annotation carries tyre wear and compound, e.g. `92% Medium`.
pub const COMPOUND_KEY: &str = "CompoundSetting";

/// Value shown for an entry: the annotation when present, otherwise the raw value.
pub fn display_value(entry: &Entry) -> String {
    let comment = entry.comment.trim();
    if comment.is_empty() {
        entry.value.clone()
    } else {
        comment.to_string()
    }
}

/// Display value normalised for equality checks.
///
/// Lap estimates are dropped from fuel and energy values and the wear
/// percentage is dropped from the tyre compound.
pub fn comparable_value(entry: &Entry) -> String {
    let value = display_value(entry);
    if value.is_empty() {
        return value;
    }

    if FUEL_KEYS.contains(&entry.key.as_str()) {
        return strip_parentheticals(&value);
    }
    if entry.key == COMPOUND_KEY {
        return strip_percent_prefix(&value).to_string();
    }
    value
}

fn strip_parentheticals(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(open) = rest.find('(') {
        let Some(close) = rest[open..].find(')').map(|offset| open + offset) else {
            break;
        };
        out.push_str(rest[..open].trim_end());
        rest = rest[close + 1..].trim_start();
    }
    out.push_str(rest);

    out.trim().to_string()
}

fn strip_percent_prefix(value: &str) -> &str {
    let trimmed = value.trim_start();
    let after_digits = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    let has_digits = after_digits.len() < trimmed.len();

    match after_digits.strip_prefix('%') {
        Some(rest) if has_digits => rest.trim(),
        _ => value.trim(),
    }
}

/// Highlight colour for a tyre compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundColor {
    Soft,
    Medium,
    Hard,
    Wet,
}

impl CompoundColor {
    pub fn hex(self) -> &'static str {
        match self {
            CompoundColor::Soft => "#f2f4f7",
            CompoundColor::Medium => "#FFDA0D",
            CompoundColor::Hard => "#E50B1B",
            CompoundColor::Wet => "#4BCCEC",
        }
    }
}

/// Colour for the compound entry's display value; `None` for any other entry.
pub fn compound_color(entry: &Entry, display_value: &str) -> Option<CompoundColor> {
    if entry.key != COMPOUND_KEY {
        return None;
    }

    let normalized = display_value.to_lowercase();
    [
        ("soft", CompoundColor::Soft),
        ("medium", CompoundColor::Medium),
        ("hard", CompoundColor::Hard),
        ("wet", CompoundColor::Wet),
    ]
    .into_iter()
    .find(|(needle, _)| normalized.contains(needle))
    .map(|(_, color)| color)
}
