use colored::{ColoredString, Colorize};
use setup_core::{
    format_comparison, format_groups, format_listing, format_summary, CarIdentity,
    ComparisonGroup, ComparisonRow, CompoundColor, DiffMap, LabeledSection, ParsedDocument,
    TrackListing,
};

use crate::config::TableSource;

/// Render the structure of one parsed setup.
pub fn render_inspect(document: &ParsedDocument, identity: Option<&CarIdentity>) -> String {
    let mut out = Vec::new();
    out.push(format!(
        "vehicle_class={}",
        document.metadata.vehicle_class.as_deref().unwrap_or("-")
    ));
    if let Some(identity) = identity {
        out.push(format!("car={}", render_identity(identity)));
    }
    out.push(format!(
        "sections={} entries={}",
        document.sections.len(),
        document.entry_count()
    ));
    for section in &document.sections {
        out.push(format!(
            "{} entries={} lines={}",
            format!("[{}]", section.name).bold(),
            section.entries.len(),
            section.lines.len()
        ));
    }
    out.join("\n")
}

/// Render labeled groups with bold group headers.
pub fn render_groups(groups: &[LabeledSection]) -> String {
    colorize_lines(&format_groups(groups), |line| {
        if line.starts_with('[') {
            line.bold()
        } else if line.trim_start().starts_with('#') {
            line.dimmed()
        } else {
            line.normal()
        }
    })
}

/// Render groups row by row following a layout.
pub fn render_layout(rows: &[Vec<LabeledSection>]) -> String {
    let mut out = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let names: Vec<&str> = row.iter().map(|group| group.name.as_str()).collect();
        out.push(format!("row {}: {}", index + 1, names.join(" | ")).cyan().to_string());
        out.push(render_groups(row));
    }
    out.join("\n")
}

/// Render an empty classification.
pub fn render_no_match(category: &str, available: &[String]) -> String {
    format!(
        "no settings in category '{category}'; available sections: {}",
        available.join(", ")
    )
    .yellow()
    .to_string()
}

/// Render comparison rows; changed rows in yellow, compound rows in their tyre colour.
pub fn render_comparison(groups: &[ComparisonGroup], only_changed: bool) -> String {
    let raw = format_comparison(groups, only_changed);

    // Same order format_comparison writes: a header, then the group's rows.
    let mut shown: Vec<Option<&ComparisonRow>> = Vec::new();
    for group in groups {
        let rows: Vec<&ComparisonRow> = group
            .rows
            .iter()
            .filter(|row| !only_changed || row.differs)
            .collect();
        if rows.is_empty() {
            continue;
        }
        shown.push(None);
        shown.extend(rows.into_iter().map(Some));
    }

    raw.lines()
        .zip(shown)
        .map(|(line, row)| match row {
            None => line.bold().to_string(),
            Some(row) => {
                let colored = match row.compound_color {
                    Some(color) => tyre_colored(line, color),
                    None if row.differs => line.yellow(),
                    None => line.normal(),
                };
                if row.differs {
                    colored.bold().to_string()
                } else {
                    colored.to_string()
                }
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render compared/changed counts.
pub fn render_summary(map: &DiffMap) -> String {
    format_summary(map).cyan().to_string()
}

/// Render a setup listing with bold track headers.
pub fn render_listing(listings: &[TrackListing]) -> String {
    if listings.is_empty() {
        return "no setups found".yellow().to_string();
    }
    colorize_lines(&format_listing(listings), |line| {
        if line.starts_with(' ') {
            line.normal()
        } else {
            line.bold()
        }
    })
}

/// Render resolved identities, one input per line.
pub fn render_identities(resolved: &[(String, Option<CarIdentity>)]) -> String {
    let mut out = Vec::new();
    for (input, identity) in resolved {
        match identity {
            Some(identity) if identity.is_fallback() => {
                out.push(format!("{input} -> {}", "unknown car".yellow()))
            }
            Some(identity) => out.push(format!("{input} -> {}", render_identity(identity))),
            None => out.push(format!("{input} -> {}", "no identity".yellow())),
        }
    }
    out.join("\n")
}

/// Render where each reference table was loaded from.
pub fn render_tables(sources: &[TableSource], category_ids: &[&str]) -> String {
    let mut out = Vec::new();
    for source in sources {
        out.push(format!(
            "- {}: entries={} source={}",
            source.file, source.entries, source.origin
        ));
    }
    out.push(format!("categories: {}", category_ids.join(", ")));
    out.join("\n")
}

fn render_identity(identity: &CarIdentity) -> String {
    if identity.class.is_empty() {
        identity.display_name.clone()
    } else {
        format!(
            "{} [{}/{}]",
            identity.display_name, identity.class, identity.brand
        )
    }
}

fn tyre_colored(line: &str, color: CompoundColor) -> ColoredString {
    match hex_rgb(color.hex()) {
        Some((r, g, b)) => line.truecolor(r, g, b),
        None => line.normal(),
    }
}

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn colorize_lines(raw: &str, paint: impl Fn(&str) -> ColoredString) -> String {
    raw.lines()
        .map(|line| paint(line).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
