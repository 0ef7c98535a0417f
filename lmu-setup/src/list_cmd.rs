use anyhow::{Context, Result};
use lmu_setup::report::render_listing;
use lmu_setup::scan::scan_settings_dir;
use setup_core::{build_listing, IdentityResolver, ListingOptions, ReferenceTables};

use crate::cli::{ListArgs, OutputFormat};

pub fn run_list(args: ListArgs, tables: &ReferenceTables) -> Result<()> {
    let index = scan_settings_dir(&args.settings_dir, &tables.tracks)
        .with_context(|| format!("failed to scan {}", args.settings_dir.display()))?;
    let resolver = IdentityResolver::new(&tables.cars);
    let options = ListingOptions {
        exclude_key: args.exclude,
        class_filter: (!args.classes.is_empty()).then_some(args.classes),
        ..ListingOptions::default()
    };

    let listings = build_listing(&index, &tables.tracks, &resolver, &options);

    match args.format {
        OutputFormat::Text => println!("{}", render_listing(&listings)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listings)?),
    }

    Ok(())
}
