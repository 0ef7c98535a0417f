use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use lmu_setup::config::{load_tables, LoadedTables};
use lmu_setup::report::{
    render_comparison, render_groups, render_identities, render_inspect, render_layout,
    render_no_match, render_summary, render_tables,
};
use serde::Serialize;
use setup_core::{
    apply_row_layout, classify, comparison_rows, count, diff, parse_bytes, CarIdentity,
    Category, ComparisonGroup, DiffMap, IdentityResolver, LabeledSection, ParsedDocument,
    ReferenceTables,
};
use tracing_subscriber::EnvFilter;

mod cli;
mod list_cmd;

use cli::{Cli, Command, DiffArgs, IdentifyArgs, InspectArgs, OutputFormat, ShowArgs, TablesArgs};

/// Category id used when `--category` is omitted.
const ALL_SECTIONS: &str = "all";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let loaded = load_tables(cli.tables_dir.as_deref()).context("failed to load reference tables")?;

    match cli.command {
        Command::Inspect(args) => run_inspect(args, &loaded.tables),
        Command::Show(args) => run_show(args, &loaded.tables),
        Command::Diff(args) => run_diff(args, &loaded.tables),
        Command::Identify(args) => run_identify(args, &loaded.tables),
        Command::List(args) => list_cmd::run_list(args, &loaded.tables),
        Command::Tables(args) => run_tables(args, &loaded),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_setup(path: &Path) -> Result<ParsedDocument> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_bytes(&bytes).with_context(|| format!("{} is not a readable setup file", path.display()))
}

fn resolve_category(tables: &ReferenceTables, id: Option<&str>) -> Result<Category> {
    match id {
        None => Ok(tables.categories.get_or_fallback(ALL_SECTIONS)),
        Some(id) => tables.categories.find(id).cloned().with_context(|| {
            format!(
                "unknown category '{id}' (known: {})",
                tables.categories.ids().join(", ")
            )
        }),
    }
}

#[derive(Serialize)]
struct InspectReport<'a> {
    document: &'a ParsedDocument,
    identity: Option<CarIdentity>,
}

fn run_inspect(args: InspectArgs, tables: &ReferenceTables) -> Result<()> {
    let document = read_setup(&args.file)?;
    let resolver = IdentityResolver::new(&tables.cars);
    let identity = document
        .metadata
        .vehicle_class
        .as_deref()
        .and_then(|technical| resolver.resolve(technical));

    match args.format {
        OutputFormat::Text => println!("{}", render_inspect(&document, identity.as_ref())),
        OutputFormat::Json => {
            let report = InspectReport {
                document: &document,
                identity,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ShowReport<'a> {
    category: &'a str,
    label: &'a str,
    groups: &'a [LabeledSection],
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<Vec<Vec<String>>>,
    available_section_names: &'a [String],
}

fn run_show(args: ShowArgs, tables: &ReferenceTables) -> Result<()> {
    let document = read_setup(&args.file)?;
    let category = resolve_category(tables, args.category.as_deref())?;
    let classification = classify(&document, &category, &tables.labels);
    let rows = args
        .layout
        .then(|| apply_row_layout(&classification.groups, &category.rows));

    match args.format {
        OutputFormat::Text => {
            if classification.is_empty() {
                println!(
                    "{}",
                    render_no_match(&category.id, &classification.available_section_names)
                );
            } else if let Some(rows) = &rows {
                println!("{}", render_layout(rows));
            } else {
                println!("{}", render_groups(&classification.groups));
            }
        }
        OutputFormat::Json => {
            let report = ShowReport {
                category: &category.id,
                label: &category.label,
                groups: &classification.groups,
                rows: rows.as_ref().map(|rows| {
                    rows.iter()
                        .map(|row| row.iter().map(|group| group.name.clone()).collect())
                        .collect()
                }),
                available_section_names: &classification.available_section_names,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct DiffReport<'a> {
    category: &'a str,
    changed: usize,
    diff: &'a DiffMap,
    groups: &'a [ComparisonGroup],
}

fn run_diff(args: DiffArgs, tables: &ReferenceTables) -> Result<()> {
    let primary = read_setup(&args.file1)?;
    let secondary = read_setup(&args.file2)?;
    let category = resolve_category(tables, args.category.as_deref())?;

    let map = diff(&category, &primary, &secondary, &tables.labels);

    if args.summary {
        match args.format {
            OutputFormat::Text => println!("{}", render_summary(&map)),
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({ "compared": map.len(), "changed": count(&map) })
            ),
        }
        return Ok(());
    }

    let left = classify(&primary, &category, &tables.labels);
    let right = classify(&secondary, &category, &tables.labels);
    let groups = comparison_rows(&left, &right, &map);

    match args.format {
        OutputFormat::Text => {
            if groups.is_empty() {
                println!(
                    "{}",
                    render_no_match(&category.id, &left.available_section_names)
                );
            } else {
                println!("{}", render_comparison(&groups, args.only_changed));
            }
            println!("{}", render_summary(&map));
        }
        OutputFormat::Json => {
            let report = DiffReport {
                category: &category.id,
                changed: count(&map),
                diff: &map,
                groups: &groups,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct IdentifyEntry {
    input: String,
    identity: Option<CarIdentity>,
}

fn run_identify(args: IdentifyArgs, tables: &ReferenceTables) -> Result<()> {
    let resolver = IdentityResolver::new(&tables.cars);
    let resolved: Vec<(String, Option<CarIdentity>)> = args
        .technical
        .into_iter()
        .map(|technical| {
            let identity = resolver.resolve(&technical);
            (technical, identity)
        })
        .collect();

    match args.format {
        OutputFormat::Text => println!("{}", render_identities(&resolved)),
        OutputFormat::Json => {
            let entries: Vec<IdentifyEntry> = resolved
                .into_iter()
                .map(|(input, identity)| IdentifyEntry { input, identity })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

fn run_tables(args: TablesArgs, loaded: &LoadedTables) -> Result<()> {
    let ids = loaded.tables.categories.ids();
    match args.format {
        OutputFormat::Text => println!("{}", render_tables(&loaded.sources, &ids)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "tables": loaded.sources,
                "categories": ids,
            }))?
        ),
    }
    Ok(())
}
