use docopt::Docopt;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use stepmaze::{
    generators::{RecursiveBacktracker, StepResult},
    grid::RectGrid,
    units::{Height, Width},
};
use std::{fs::File, io, io::prelude::*, thread, time::Duration};

const USAGE: &str = "Stepmaze

Animates the generation of a perfect maze, one carved passage per tick.

Usage:
    stepmaze_driver -h | --help
    stepmaze_driver [--canvas-width=<px>] [--canvas-height=<px>] [--cell-pixels=<px>] [--tick-millis=<ms>] [--immediate] [--seed=<n>] [--runs=<n>] [--text-out=<path>]

Options:
    -h --help            Show this screen.
    --canvas-width=<px>  Canvas width in pixels [default: 600].
    --canvas-height=<px> Canvas height in pixels [default: 600].
    --cell-pixels=<px>   Side length of one grid cell in pixels. The grid is canvas-width / cell-pixels cells wide [default: 50].
    --tick-millis=<ms>   Pause between carved passages [default: 1].
    --immediate          Generate as fast as possible, with no pause between passages.
    --seed=<n>           Seed the random generator for a reproducible maze.
    --runs=<n>           Number of mazes to generate; each run after the first restarts the generator [default: 1].
    --text-out=<path>    Write the finished maze rendering to a file instead of stdout.
";

#[derive(Debug, Deserialize)]
struct DriverArgs {
    flag_canvas_width: usize,
    flag_canvas_height: usize,
    flag_cell_pixels: usize,
    flag_tick_millis: u64,
    flag_immediate: bool,
    flag_seed: Option<u64>,
    flag_runs: usize,
    flag_text_out: String,
}

// Everything `error_chain!` creates lives in this module; the rest of the
// driver just uses `Result` and `?`.
mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            BadDimensions(::stepmaze::units::InvalidDimension);
        }
    }
}
use crate::errors::*;
use error_chain::bail;

fn main() -> Result<()> {
    env_logger::init();

    let args: DriverArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    if args.flag_cell_pixels == 0 {
        bail!("--cell-pixels must be positive");
    }

    // Pixel space stays out here; the generator only ever sees cell counts.
    let cells_wide = Width(args.flag_canvas_width / args.flag_cell_pixels);
    let cells_high = Height(args.flag_canvas_height / args.flag_cell_pixels);
    let tick = Duration::from_millis(args.flag_tick_millis);

    let seed = args
        .flag_seed
        .unwrap_or_else(|| rand::thread_rng().gen());
    info!(
        "generating {} x {} maze(s), seed {}",
        cells_wide.0, cells_high.0, seed
    );

    let mut generator =
        RecursiveBacktracker::new(cells_wide, cells_high, XorShiftRng::seed_from_u64(seed))?;

    for run in 0..args.flag_runs.max(1) {
        if run > 0 {
            generator.reset(cells_wide, cells_high)?;
        }

        let maze = run_scheduler(&mut generator, tick, args.flag_immediate)?;

        if args.flag_text_out.is_empty() {
            println!("{}", maze);
        } else {
            write_text_to_file(&format!("{}", maze), &args.flag_text_out)
                .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
        }
    }

    Ok(())
}

/// Drive the generator to completion at a fixed cadence, accumulating each
/// carved passage into a grid for rendering.
///
/// `Backtracked` results are internal bookkeeping with nothing to draw, so
/// they never consume a tick.
fn run_scheduler(
    generator: &mut RecursiveBacktracker,
    tick: Duration,
    immediate: bool,
) -> Result<RectGrid> {
    let mut maze = RectGrid::new(generator.width(), generator.height())?;

    loop {
        match generator.step() {
            StepResult::EdgeCarved { from, to } => {
                maze.link(from, to)
                    .chain_err(|| "generator emitted an uncarvable edge")?;
                debug!(
                    "carved ({}, {}) -> ({}, {}), {} cells left",
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    generator.remaining()
                );
                if !immediate {
                    thread::sleep(tick);
                }
            }
            StepResult::Backtracked => {
                debug!("backtracked");
            }
            StepResult::Complete => break,
        }
    }

    info!("maze complete, {} passages carved", maze.links_count());
    Ok(maze)
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
