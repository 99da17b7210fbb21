//! `pointconfig-table`: Print the direction list and lookup table of F_p^n.
//!
//! **Usage:**
//! ```text
//! pointconfig-table --prime 3 --dimension 2
//! pointconfig-table -p 5 -n 3 --point 1,2,3 --json
//! ```
//!
//! Without `--point`, every point of the space is listed in index order.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::{Context, Result};
use clap::Parser;
use pointconfig::{CacheConfig, LookupCache, LookupEntry, Point, DEFAULT_MAX_TABLE_CELLS};
use pointconfig_clients::{init_tracing, Coords};
use serde_json::json;

/// Dump precomputed plane and line intercepts.
#[derive(Parser)]
#[command(
    name = "pointconfig-table",
    about = "Print directions and per-point intercepts of F_p^n"
)]
struct Args {
    /// The prime p.
    #[arg(short, long)]
    prime: u32,

    /// The dimension n.
    #[arg(short = 'n', long)]
    dimension: usize,

    /// Only list these points (repeatable).
    #[arg(long = "point", value_name = "COORDS", allow_hyphen_values = true)]
    points: Vec<Coords>,

    /// Only list the directions, not the per-point entries.
    #[arg(long)]
    directions_only: bool,

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
    let table = cache
        .get_or_build(args.prime, args.dimension)
        .with_context(|| format!("cannot build table for F_{}^{}", args.prime, args.dimension))?;
    let space = *table.space();

    let points: Vec<Point> = if args.directions_only {
        Vec::new()
    } else if args.points.is_empty() {
        space.points().collect()
    } else {
        args.points
            .iter()
            .map(|coords| {
                space
                    .point(coords.as_ref())
                    .with_context(|| format!("invalid point {coords}"))
            })
            .collect::<Result<_>>()?
    };

    let rows = points
        .iter()
        .map(|point| {
            table
                .entry(point)
                .map(|entry| (point, entry))
                .with_context(|| format!("no table entry for {point}"))
        })
        .collect::<Result<Vec<(&Point, &LookupEntry)>>>()?;

    if args.json {
        let entries: Vec<_> = rows
            .iter()
            .map(|(point, entry)| {
                json!({
                    "point": point,
                    "index": space.point_index(point),
                    "planes": entry.planes(),
                    "lines": entry.lines(),
                })
            })
            .collect();
        let value = json!({
            "space": space,
            "directions": table.directions(),
            "lines_per_direction": space.lines_per_direction(),
            "entries": entries,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "{space}: {} points, {} directions, {} lines per direction",
        space.point_count(),
        space.direction_count(),
        space.lines_per_direction()
    );
    println!();
    println!("directions:");
    for (index, direction) in table.directions().iter().enumerate() {
        println!("  [{index:>3}] {direction}");
    }
    if rows.is_empty() {
        return Ok(());
    }
    println!();
    println!("entries (plane intercept / line intercept per direction):");
    for (point, entry) in rows {
        let cells: Vec<String> = entry
            .planes()
            .iter()
            .zip(entry.lines())
            .map(|(plane, line)| format!("{plane}/{line}"))
            .collect();
        println!("  {point}  {}", cells.join("  "));
    }
    Ok(())
}
