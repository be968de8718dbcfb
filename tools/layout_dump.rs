//! layout_dump.rs - print the desk placement of a grid as CSV.
//!
//! USAGE:
//! ```bash
//! cargo run --bin layout_dump -- --columns 5 --rows 1 \
//!     --spacing-x 1 --aisle-every-cols 5 --aisle-width-x 2
//! ```
//!
//! Output is one `column,row,x,z` line per desk in row-major order, so the
//! result can be diffed or checked in as a fixture.

use anyhow::Context;
use clap::Parser;
use std::io::{self, BufWriter, Write};

use office_parkour::world::{LayoutSpec, OFFICE_LAYOUT, generate};

/// CLI options handled via `clap` derive.  Defaults reproduce the office.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    #[arg(long, default_value_t = OFFICE_LAYOUT.columns)]
    columns: usize,

    #[arg(long, default_value_t = OFFICE_LAYOUT.rows)]
    rows: usize,

    #[arg(long, default_value_t = OFFICE_LAYOUT.base_spacing_x)]
    spacing_x: f32,

    #[arg(long, default_value_t = OFFICE_LAYOUT.base_spacing_z)]
    spacing_z: f32,

    /// 0 disables column aisles
    #[arg(long, default_value_t = OFFICE_LAYOUT.aisle_every_cols)]
    aisle_every_cols: usize,

    /// 0 disables row aisles
    #[arg(long, default_value_t = OFFICE_LAYOUT.aisle_every_rows)]
    aisle_every_rows: usize,

    #[arg(long, default_value_t = OFFICE_LAYOUT.aisle_width_x)]
    aisle_width_x: f32,

    #[arg(long, default_value_t = OFFICE_LAYOUT.aisle_width_z)]
    aisle_width_z: f32,

    /// Print only the bounding box
    #[arg(long)]
    bounds: bool,
}

impl From<&Opts> for LayoutSpec {
    fn from(o: &Opts) -> Self {
        LayoutSpec {
            columns: o.columns,
            rows: o.rows,
            base_spacing_x: o.spacing_x,
            base_spacing_z: o.spacing_z,
            aisle_every_cols: o.aisle_every_cols,
            aisle_every_rows: o.aisle_every_rows,
            aisle_width_x: o.aisle_width_x,
            aisle_width_z: o.aisle_width_z,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let placement = generate(&LayoutSpec::from(&opts)).context("invalid layout")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if opts.bounds {
        let (lo, hi) = placement.bounds();
        writeln!(out, "min_x,min_z,max_x,max_z")?;
        writeln!(out, "{},{},{},{}", lo.x, lo.y, hi.x, hi.y)?;
        return Ok(());
    }

    writeln!(out, "column,row,x,z")?;
    for row in 0..placement.rows() {
        for column in 0..placement.columns() {
            if let Some(p) = placement.get(column, row) {
                writeln!(out, "{column},{row},{},{}", p.x, p.y)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
