use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::cells::{
    is_within_dimensions, offset_coordinate, Cartesian2DCoordinate, CoordinateSmallVec,
    COMPASS_DIRECTIONS,
};
use crate::grid::RectGrid;
use crate::units::{validate_dimensions, Height, InvalidDimension, Width};
use crate::utils::{self, FnvHashSet};

/// The outcome of advancing maze construction by one unit of work.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum StepResult {
    /// A new passage was carved. `to` was unvisited until this step.
    EdgeCarved {
        from: Cartesian2DCoordinate,
        to: Cartesian2DCoordinate,
    },
    /// The frontier moved back to an earlier branch point. Nothing to draw.
    Backtracked,
    /// Every cell is part of the maze.
    Complete,
}

/// Incremental randomized depth-first maze generator.
///
/// Each call to `step` performs exactly one unit of work, carving at most one
/// passage, so a caller can animate generation at whatever cadence it likes.
/// The edges emitted over a full run form a spanning tree of the grid's
/// adjacency graph: every cell reachable, no cycles, `width * height - 1`
/// edges in total.
///
/// The generator owns its random source. Seeding the `XorShiftRng` makes the
/// emitted `StepResult` sequence reproducible.
#[derive(Debug)]
pub struct RecursiveBacktracker {
    width: Width,
    height: Height,
    unvisited: FnvHashSet<Cartesian2DCoordinate>,
    stack: Vec<Cartesian2DCoordinate>,
    current: Cartesian2DCoordinate,
    done: bool,
    rng: XorShiftRng,
}

impl RecursiveBacktracker {
    pub fn new(
        width: Width,
        height: Height,
        rng: XorShiftRng,
    ) -> Result<RecursiveBacktracker, InvalidDimension> {
        validate_dimensions(width, height)?;

        let mut generator = RecursiveBacktracker {
            width,
            height,
            unvisited: utils::fnv_hashset(width.0 * height.0),
            stack: Vec::new(),
            current: Cartesian2DCoordinate::new(0, 0),
            done: false,
            rng,
        };
        generator.start_run(width, height);
        Ok(generator)
    }

    /// Throw away the current run and start a fresh one on a `width x height`
    /// grid: a full unvisited set, an empty stack and a new random start cell.
    ///
    /// Fails without touching any state if either dimension is zero. Safe to
    /// call mid-run; no edge from the old run can be emitted afterwards.
    pub fn reset(&mut self, width: Width, height: Height) -> Result<(), InvalidDimension> {
        validate_dimensions(width, height)?;
        self.start_run(width, height);
        Ok(())
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    /// Cells not yet incorporated into the maze.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.unvisited.len()
    }

    /// Advance maze construction by one unit of work.
    ///
    /// Carves at most one passage per call. A `Backtracked` result means the
    /// frontier retreated to a branch point with unexplored neighbours;
    /// callers animating every carve should treat it as a non-visual tick and
    /// simply call `step` again. Once `Complete` has been returned, further
    /// calls are no-ops that report `Complete` again.
    pub fn step(&mut self) -> StepResult {
        if self.done {
            return StepResult::Complete;
        }

        let candidates = self.unvisited_neighbours(self.current);
        if !candidates.is_empty() {
            // Only branch points are worth returning to. A cell with a single
            // unvisited neighbour is exhausted the moment we leave it.
            if candidates.len() > 1 {
                self.stack.push(self.current);
            }

            let next = candidates[self.rng.gen_range(0..candidates.len())];
            self.unvisited.remove(&next);
            let from = self.current;
            self.current = next;
            return StepResult::EdgeCarved { from, to: next };
        }

        // Dead end: retreat to the nearest branch point that still has
        // somewhere unvisited to go.
        while let Some(branch_point) = self.stack.pop() {
            if !self.unvisited_neighbours(branch_point).is_empty() {
                self.current = branch_point;
                return StepResult::Backtracked;
            }
        }

        if !self.unvisited.is_empty() {
            // Cannot happen on a connected rectangular grid; a reachable cell
            // was somehow never reached.
            panic!(
                "backtrack stack exhausted with {} unvisited cells remaining",
                self.unvisited.len()
            );
        }

        self.done = true;
        StepResult::Complete
    }

    fn start_run(&mut self, width: Width, height: Height) {
        self.width = width;
        self.height = height;
        self.stack.clear();
        self.done = false;

        self.unvisited = utils::fnv_hashset(width.0 * height.0);
        for y in 0..height.0 {
            for x in 0..width.0 {
                self.unvisited
                    .insert(Cartesian2DCoordinate::new(x as u32, y as u32));
            }
        }

        let start_index = self.rng.gen_range(0..width.0 * height.0);
        self.current = Cartesian2DCoordinate::from_row_major_index(start_index, width);
        self.unvisited.remove(&self.current);
    }

    fn unvisited_neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        COMPASS_DIRECTIONS
            .iter()
            .filter_map(|&direction| offset_coordinate(coord, direction))
            .filter(|&neighbour| {
                is_within_dimensions(neighbour, self.width, self.height)
                    && self.unvisited.contains(&neighbour)
            })
            .collect()
    }
}

/// Carve a complete maze into `grid` with the recursive backtracker.
///
/// Same surface as the other whole-grid generation entry points: give it a
/// grid and an rng, get back a perfect maze.
pub fn recursive_backtracker(grid: &mut RectGrid, rng: &mut XorShiftRng) {
    let run_rng = XorShiftRng::seed_from_u64(rng.gen());
    let mut generator = RecursiveBacktracker::new(grid.width(), grid.height(), run_rng)
        .expect("grid construction already validated the dimensions");

    loop {
        match generator.step() {
            StepResult::EdgeCarved { from, to } => {
                grid.link(from, to)
                    .expect("backtracker emitted a non-adjacent or out-of-grid edge");
            }
            StepResult::Backtracked => {}
            StepResult::Complete => break,
        }
    }
}
