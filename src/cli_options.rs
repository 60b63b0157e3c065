/*
cli_options.rs

Copyright 2025 Hervé Quatremain

This file is part of Spectre Tiling.

Spectre Tiling is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Spectre Tiling is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Spectre Tiling. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Process command-line options.
//!
//! These options are intended for developers checking the tiling engine.
//!
//! # Examples
//!
//! Print the Spectres covering a 1024x768 image at 10 pixels per edge, as Python calls:
//!
//! ```
//! $ spectre-tiling --format python --seed 12345
//! spectre('F', 0, [((x1,x1r3),(y1,y1r3)), ((x2,x2r3),(y2,y2r3)), ...])
//! ...
//! ```
//!
//! Choose a random 60x40 patch, and then print its tiles in raster order:
//!
//! ```
//! $ spectre-tiling --randomise --width 60 --height 40
//! 4:0152G
//! $ spectre-tiling --params 4:0152G --width 60 --height 40 --mode raster
//! ```

use clap::{Parser, ValueEnum};
use log::{debug, info};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use spectre_tiling::config::{
    COPYRIGHT_NOTICE, DEFAULT_HEIGHT, DEFAULT_SCALE, DEFAULT_SEED, DEFAULT_WIDTH,
    MAX_WINDOW_SIZE, VERSION,
};
use spectre_tiling::generator::context::{SpectreContext, seeded_rng};
use spectre_tiling::generator::hex_tiling::{self, PlacedHex};
use spectre_tiling::generator::hexagons::HexLabel;
use spectre_tiling::generator::params::SpectrePatchParams;
use spectre_tiling::generator::patch::{self, PatchWindow};
use spectre_tiling::generator::point::Point;
use spectre_tiling::generator::spectre::Spectre;

/// What to generate.
#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
enum Mode {
    /// Spectres, in breadth-first order
    Tiling,
    /// Spectres, in raster order
    Raster,
    /// Lowest-level hexagons
    Hexes,
}

/// How to print the tiles.
#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
enum Format {
    /// One JSON object per line
    Json,
    /// One Python function call per line
    Python,
}

/// Generate patches of the Spectre aperiodic tiling.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// What to generate
    #[arg(value_enum, short, long, default_value_t = Mode::Tiling)]
    mode: Mode,

    /// Seed for the random generator
    #[arg(short, long, default_value_t = DEFAULT_SEED.to_string())]
    seed: String,

    /// Width of the window: pixels, or units with --randomise and --params
    #[arg(long, default_value_t = DEFAULT_WIDTH, value_parser = window_size)]
    width: u32,

    /// Height of the window: pixels, or units with --randomise and --params
    #[arg(long, default_value_t = DEFAULT_HEIGHT, value_parser = window_size)]
    height: u32,

    /// Number of pixels per Spectre edge
    #[arg(long, default_value_t = DEFAULT_SCALE, value_parser = positive_scale)]
    scale: f64,

    /// Output format
    #[arg(value_enum, short, long, default_value_t = Format::Json)]
    format: Format,

    /// Colour the tiles with four colours
    #[arg(long, default_value_t = false)]
    four_colour: bool,

    /// Print the descriptor of a random patch
    #[arg(short, long, default_value_t = false, conflicts_with = "params")]
    randomise: bool,

    /// Print the tiles of the patch with the given descriptor
    #[arg(short, long)]
    params: Option<SpectrePatchParams>,

    /// Output file, instead of the standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Window side in pixels or units, up to the limit of descriptor windows.
///
/// Larger pixel windows are checked against the scale later.
fn window_size(s: &str) -> Result<u32, String> {
    let size: u32 = s.parse().map_err(|e| format!("{e}"))?;
    if size == 0 || size > MAX_WINDOW_SIZE {
        return Err(format!("must be between 1 and {MAX_WINDOW_SIZE}"));
    }
    Ok(size)
}

fn positive_scale(s: &str) -> Result<f64, String> {
    let scale: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !scale.is_finite() || scale <= 0.0 {
        return Err(String::from("must be a positive number"));
    }
    Ok(scale)
}

/// Record printed for each Spectre in JSON format.
#[derive(Serialize)]
struct SpectreRecord<'a> {
    hex: HexLabel,
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    colour: Option<u8>,
    coords: &'a [i32],
}

/// Parse and process command-line options.
pub fn parse() -> ExitCode {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();
    debug!("spectre-tiling {VERSION}");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut rng: StdRng = seeded_rng(&args.seed);

    if args.randomise {
        let params: SpectrePatchParams = patch::randomise(args.width, args.height, &mut rng);
        writeln!(out, "{params}")?;
        out.flush()?;
        return Ok(());
    }

    // Descriptor patches use a centred window in units, seeded ones an image window
    let (mut ctx, window): (SpectreContext, PatchWindow) = match &args.params {
        Some(params) => (
            SpectreContext::from_params(params)?,
            PatchWindow::centred(args.width, args.height),
        ),
        None => (
            SpectreContext::new_random(&mut rng),
            PatchWindow::from_pixels(args.width, args.height, args.scale)?,
        ),
    };
    if args.four_colour {
        ctx.randomise_colours();
    }
    debug!("Generating {:?} over {window:?}", args.mode);

    let mut status: io::Result<()> = Ok(());
    let count: usize = match args.mode {
        Mode::Tiling => window.breadth_first(&mut ctx, |s| {
            if status.is_ok() {
                status = write_spectre(&mut out, args, &window, s);
            }
        }),
        Mode::Raster => window.raster(&mut ctx, |s| {
            if status.is_ok() {
                status = write_spectre(&mut out, args, &window, s);
            }
        }),
        Mode::Hexes => {
            let orientation: usize = match args.params {
                Some(_) => ctx.orientation() / 2,
                None => rng.random_range(0..6),
            };
            hex_tiling::generate_hexes(
                &mut ctx,
                orientation,
                |p| window.contains(p),
                |h| {
                    if status.is_ok() {
                        status = write_hex(&mut out, args, &window, h);
                    }
                },
            )
        }
    };
    status?;
    out.flush()?;

    info!("{count} tiles written");
    Ok(())
}

/// Text form of a point as nested pairs of coefficients.
fn point_tuple(window: &PatchWindow, p: Point) -> String {
    let v: [i32; 4] = window.output_point(p);
    format!("(({},{}),({},{}))", v[0], v[1], v[2], v[3])
}

fn write_spectre(
    out: &mut dyn Write,
    args: &Args,
    window: &PatchWindow,
    spectre: &Spectre,
) -> io::Result<()> {
    let colour: Option<u8> = args.four_colour.then(|| spectre.colour());
    match args.format {
        Format::Json => {
            let coords: [i32; 56] = window.output_coords(spectre);
            let record: SpectreRecord = SpectreRecord {
                hex: spectre.coords.hex(),
                index: spectre.coords.index,
                colour,
                coords: &coords,
            };
            writeln!(out, "{}", serde_json::to_string(&record)?)
        }
        Format::Python => {
            let points: Vec<String> = spectre
                .vertices
                .iter()
                .map(|v| point_tuple(window, *v))
                .collect();
            let colour: String = colour.map(|c| format!(", colour={c}")).unwrap_or_default();
            writeln!(
                out,
                "spectre('{}', {}, [{}]{colour})",
                spectre.coords.hex(),
                spectre.coords.index,
                points.join(", ")
            )
        }
    }
}

fn write_hex(
    out: &mut dyn Write,
    args: &Args,
    window: &PatchWindow,
    hex: &PlacedHex,
) -> io::Result<()> {
    match args.format {
        Format::Json => writeln!(out, "{}", serde_json::to_string(hex)?),
        Format::Python => {
            let points: Vec<String> = hex
                .vertices
                .iter()
                .map(|v| point_tuple(window, *v))
                .collect();
            let colour: String = if args.four_colour {
                format!(", colour={}", hex.colour)
            } else {
                String::new()
            };
            writeln!(out, "hexagon('{}', [{}]{colour})", hex.hex, points.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_must_be_positive() {
        for scale in ["0", "-10", "inf", "NaN", "ten"] {
            assert!(Args::try_parse_from(["spectre-tiling", "--scale", scale]).is_err());
        }
        let args: Args = Args::try_parse_from(["spectre-tiling", "--scale", "2.5"]).unwrap();
        assert_eq!(args.scale, 2.5);
    }

    #[test]
    fn window_size_is_limited() {
        let too_large: String = (MAX_WINDOW_SIZE + 1).to_string();
        assert!(Args::try_parse_from(["spectre-tiling", "--width", "0"]).is_err());
        assert!(Args::try_parse_from(["spectre-tiling", "--height", too_large.as_str()]).is_err());
        let args: Args = Args::try_parse_from(["spectre-tiling", "--width", "60"]).unwrap();
        assert_eq!((args.width, args.height), (60, DEFAULT_HEIGHT));
    }
}
