use crate::compare::{count, display_value, ComparisonGroup, DiffMap};
use crate::labels::LabeledSection;
use crate::listing::TrackListing;

const MISSING: &str = "(missing)";

/// Format labeled sections as `[Group]` blocks of `label: value` lines.
///
/// Verbatim lines that are not entries are shown after a `#`.
pub fn format_groups(groups: &[LabeledSection]) -> String {
    let mut lines = Vec::new();
    for group in groups {
        lines.push(format!("[{}]", group.name));
        for entry in &group.entries {
            lines.push(format!("  {}: {}", entry.label, display_value(&entry.entry)));
        }
        for line in group.extra_lines() {
            lines.push(format!("  # {}", line.trim()));
        }
    }
    lines.join("\n")
}

/// Format aligned comparison rows.
///
/// Rows start with `~` when the values differ and `=` otherwise.
pub fn format_comparison(groups: &[ComparisonGroup], only_changed: bool) -> String {
    let mut lines = Vec::new();
    for group in groups {
        let rows: Vec<_> = group
            .rows
            .iter()
            .filter(|row| !only_changed || row.differs)
            .collect();
        if rows.is_empty() {
            continue;
        }

        lines.push(format!("[{}]", group.name));
        for row in rows {
            let marker = if row.differs { '~' } else { '=' };
            lines.push(format!(
                "{marker} {}: {} | {}",
                row.label,
                row.primary.as_deref().unwrap_or(MISSING),
                row.secondary.as_deref().unwrap_or(MISSING)
            ));
        }
    }
    lines.join("\n")
}

/// Format a one-line count of compared and changed fields.
pub fn format_summary(map: &DiffMap) -> String {
    format!("compared={} changed={}", map.len(), count(map))
}

/// Format a setup listing grouped by track.
pub fn format_listing(listings: &[TrackListing]) -> String {
    let mut lines = Vec::new();
    for listing in listings {
        match &listing.country_code {
            Some(code) => lines.push(format!("{} ({code})", listing.track_label)),
            None => lines.push(listing.track_label.clone()),
        }
        for item in &listing.items {
            match &item.identity {
                Some(identity) if !identity.class.is_empty() => lines.push(format!(
                    "  - {} [{}] {}",
                    item.name, identity.class, identity.display_name
                )),
                Some(identity) => {
                    lines.push(format!("  - {} {}", item.name, identity.display_name))
                }
                None => lines.push(format!("  - {}", item.name)),
            }
        }
    }
    lines.join("\n")
}
