//! `pointconfig-explore`: Build a point set in F_p^n and report its incidence properties.
//!
//! **Usage:**
//! ```text
//! pointconfig-explore --prime 3 --dimension 2 --point 0,0 --point 1,0 --point 2,0
//! pointconfig-explore -p 5 -n 2 --point 0,0 --point 1,1 --remove 0,0 --direction 1,1 --json
//! ```
//!
//! Points are added in order, then removals are applied in order. Exits
//! non-zero if a removal names an absent point or the structure fails its
//! consistency check.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::{Context, Result};
use clap::Parser;
use pointconfig::{CacheConfig, Direction, LookupCache, Subset, DEFAULT_MAX_TABLE_CELLS};
use pointconfig_clients::{init_tracing, Coords};
use serde_json::{json, Value};
use tracing::info;

/// Explore the line and hyperplane incidence of a point set in F_p^n.
#[derive(Parser)]
#[command(
    name = "pointconfig-explore",
    about = "Report line and hyperplane incidence of a point set in F_p^n"
)]
struct Args {
    /// The prime p.
    #[arg(short, long)]
    prime: u32,

    /// The dimension n.
    #[arg(short = 'n', long)]
    dimension: usize,

    /// Point to add, as comma-separated coordinates (repeatable).
    #[arg(long = "point", value_name = "COORDS", allow_hyphen_values = true)]
    points: Vec<Coords>,

    /// Point to remove after all additions (repeatable).
    #[arg(long = "remove", value_name = "COORDS", allow_hyphen_values = true)]
    removals: Vec<Coords>,

    /// Also print per-line and per-hyperplane counts for this direction
    /// (repeatable; any nonzero multiple is accepted).
    #[arg(long = "direction", value_name = "COORDS", allow_hyphen_values = true)]
    directions: Vec<Coords>,

    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Refuse lookup tables with more cells than this.
    #[arg(long, default_value_t = DEFAULT_MAX_TABLE_CELLS)]
    max_table_cells: usize,

    /// Raise log verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut cache = LookupCache::with_config(CacheConfig {
        max_table_cells: args.max_table_cells,
    });
    let mut subset = Subset::new(&mut cache, args.prime, args.dimension)
        .with_context(|| format!("cannot set up F_{}^{}", args.prime, args.dimension))?;

    let added = subset
        .add_points(&args.points)
        .context("cannot add points")?;
    info!(added, requested = args.points.len(), "points added");

    for coords in &args.removals {
        subset
            .remove_point(coords.as_ref())
            .with_context(|| format!("cannot remove {coords}"))?;
    }

    subset.validate().context("incidence structure failed its consistency check")?;

    let directions = args
        .directions
        .iter()
        .map(|coords| {
            subset
                .space()
                .direction(coords.as_ref())
                .with_context(|| format!("invalid direction {coords}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let report = subset.report();
    if args.json {
        let mut value = serde_json::to_value(&report)?;
        if !directions.is_empty() {
            value["incidence"] = directions
                .iter()
                .map(|d| incidence_json(&subset, d))
                .collect::<Vec<_>>()
                .into();
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{report}");
    for direction in &directions {
        println!();
        print_incidence(&subset, direction);
    }
    Ok(())
}

fn incidence_json(subset: &Subset, direction: &Direction) -> Value {
    let lines: Vec<Value> = subset
        .line_incidence(direction)
        .into_iter()
        .flatten()
        .filter(|(_, count)| *count > 0)
        .map(|(line, count)| json!({ "intercept": line, "count": count }))
        .collect();
    json!({
        "direction": direction,
        "planes": subset.plane_incidence(direction),
        "lines": lines,
    })
}

fn print_incidence(subset: &Subset, direction: &Direction) {
    println!("direction {direction}");
    if let Some(planes) = subset.plane_incidence(direction) {
        let counts: Vec<String> = planes.iter().map(usize::to_string).collect();
        println!("  hyperplanes: [{}]", counts.join(", "));
    }
    for (line, count) in subset.line_incidence(direction).into_iter().flatten() {
        if count > 0 {
            println!("  line {line}: {count}");
        }
    }
}
