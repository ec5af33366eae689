use petgraph::graph::{self, Graph};
use petgraph::Undirected;
use rand::Rng;
use rand_xorshift::XorShiftRng;
use std::fmt;

use crate::cells::{
    is_within_dimensions, offset_coordinate, Cartesian2DCoordinate, CompassDirection,
    CoordinateSmallVec, COMPASS_DIRECTIONS,
};
use crate::units::{validate_dimensions, Height, InvalidDimension, Width};

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
}

impl fmt::Display for CellLinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CellLinkError::InvalidGridCoordinate => {
                write!(f, "cannot link a coordinate outside the grid")
            }
            CellLinkError::SelfLink => write!(f, "cannot link a cell to itself"),
        }
    }
}

impl std::error::Error for CellLinkError {}

/// A rectangular grid of cells where carved passages between adjacent cells
/// are stored as edges of an undirected graph.
///
/// The grid starts fully walled: no cell is linked to any other until
/// `link` is called.
#[derive(Debug)]
pub struct RectGrid {
    graph: Graph<(), (), Undirected, u32>,
    width: Width,
    height: Height,
}

impl RectGrid {
    pub fn new(width: Width, height: Height) -> Result<RectGrid, InvalidDimension> {
        validate_dimensions(width, height)?;

        let cells_count = width.0 * height.0;
        let edges_count_hint = 2 * cells_count; // at most 2wh - w - h adjacencies
        let mut grid = RectGrid {
            graph: Graph::with_capacity(cells_count, edges_count_hint),
            width,
            height,
        };
        for _ in 0..cells_count {
            let _ = grid.graph.add_node(());
        }

        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.width.0 * self.height.0
    }

    /// Count of carved passages.
    #[inline]
    pub fn links_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn random_cell(&self, rng: &mut XorShiftRng) -> Cartesian2DCoordinate {
        let index = rng.gen_range(0..self.size());
        Cartesian2DCoordinate::from_row_major_index(index, self.width)
    }

    /// Carve a passage between two cells.
    ///
    /// Linking a cell to itself or to a coordinate outside the grid is
    /// rejected. Re-linking an already linked pair is a no-op.
    pub fn link(
        &mut self,
        a: Cartesian2DCoordinate,
        b: Cartesian2DCoordinate,
    ) -> Result<(), CellLinkError> {
        if a == b {
            return Err(CellLinkError::SelfLink);
        }
        match (self.graph_index(a), self.graph_index(b)) {
            (Some(a_index), Some(b_index)) => {
                let _ = self.graph.update_edge(a_index, b_index, ());
                Ok(())
            }
            _ => Err(CellLinkError::InvalidGridCoordinate),
        }
    }

    /// Remove the passage between two cells, if one exists.
    /// Returns true if an unlink occurred.
    pub fn unlink(&mut self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        if let (Some(a_index), Some(b_index)) = (self.graph_index(a), self.graph_index(b)) {
            if let Some(edge_index) = self.graph.find_edge(a_index, b_index) {
                // Invalidates the last edge index in the graph, which is fine
                // as we never store edge indices.
                self.graph.remove_edge(edge_index);
                return true;
            }
        }
        false
    }

    /// Cells reachable from `coord` through a carved passage.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        let graph_node_index = self.graph_index(coord)?;
        let linked_cells = self
            .graph
            .neighbors(graph_node_index)
            .map(|node_index| {
                Cartesian2DCoordinate::from_row_major_index(node_index.index(), self.width)
            })
            .collect();
        Some(linked_cells)
    }

    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        match (self.graph_index(a), self.graph_index(b)) {
            (Some(a_index), Some(b_index)) => self.graph.find_edge(a_index, b_index).is_some(),
            _ => false,
        }
    }

    pub fn is_neighbour_linked(
        &self,
        coord: Cartesian2DCoordinate,
        direction: CompassDirection,
    ) -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour_coord| self.is_linked(coord, neighbour_coord))
    }

    /// Cells to the North, South, East or West of `coord`, linked or not.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        COMPASS_DIRECTIONS
            .iter()
            .filter_map(|&direction| self.neighbour_at_direction(coord, direction))
            .collect()
    }

    pub fn neighbour_at_direction(
        &self,
        coord: Cartesian2DCoordinate,
        direction: CompassDirection,
    ) -> Option<Cartesian2DCoordinate> {
        offset_coordinate(coord, direction)
            .filter(|&neighbour_coord| self.is_valid_coordinate(neighbour_coord))
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        is_within_dimensions(coord, self.width, self.height)
    }

    /// Row-major iterator over every cell coordinate in the grid.
    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            width: self.width,
            cells_count: self.size(),
        }
    }

    fn graph_index(&self, coord: Cartesian2DCoordinate) -> Option<graph::NodeIndex<u32>> {
        if self.is_valid_coordinate(coord) {
            Some(graph::NodeIndex::new(coord.to_row_major_index(self.width)))
        } else {
            None
        }
    }
}

impl fmt::Display for RectGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let columns = self.width.0;
        let rows = self.height.0;

        let mut output = String::with_capacity((4 * columns + 2) * (2 * rows + 1));

        // North boundary is always solid.
        output.push('+');
        for _ in 0..columns {
            output.push_str("---+");
        }
        output.push('\n');

        for y in 0..rows {
            let mut body_line = String::from("|");
            let mut south_line = String::from("+");

            for x in 0..columns {
                let coord = Cartesian2DCoordinate::new(x as u32, y as u32);

                body_line.push_str("   ");
                if self.is_neighbour_linked(coord, CompassDirection::East) {
                    body_line.push(' ');
                } else {
                    body_line.push('|');
                }

                if self.is_neighbour_linked(coord, CompassDirection::South) {
                    south_line.push_str("   +");
                } else {
                    south_line.push_str("---+");
                }
            }

            output.push_str(&body_line);
            output.push('\n');
            output.push_str(&south_line);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    width: Width,
    cells_count: usize,
}

impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord =
                Cartesian2DCoordinate::from_row_major_index(self.current_cell_number, self.width);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}

impl<'a> IntoIterator for &'a RectGrid {
    type Item = Cartesian2DCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools;
    use rand::SeedableRng;

    fn rect_grid(width: usize, height: usize) -> RectGrid {
        RectGrid::new(Width(width), Height(height)).unwrap()
    }

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    #[test]
    fn zero_sized_grids_are_rejected() {
        assert!(RectGrid::new(Width(0), Height(10)).is_err());
        assert!(RectGrid::new(Width(10), Height(0)).is_err());
        assert!(RectGrid::new(Width(0), Height(0)).is_err());
    }

    #[test]
    fn grid_size_is_rectangular() {
        let g = rect_grid(10, 4);
        assert_eq!(g.size(), 40);
        assert_eq!(g.width(), Width(10));
        assert_eq!(g.height(), Height(4));
    }

    #[test]
    fn neighbour_cells() {
        let g = rect_grid(10, 5);

        let check_expected_neighbours = |coord, expected_neighbours: &[Cartesian2DCoordinate]| {
            let neighbours: Vec<Cartesian2DCoordinate> =
                g.neighbours(coord).iter().cloned().sorted().collect();
            let expected: Vec<Cartesian2DCoordinate> =
                expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(neighbours, expected);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 4), &[gc(0, 3), gc(1, 4)]);
        check_expected_neighbours(gc(9, 4), &[gc(9, 3), gc(8, 4)]);

        // boundary edges
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(0, 2), gc(1, 1)]);
        check_expected_neighbours(gc(9, 3), &[gc(9, 2), gc(9, 4), gc(8, 3)]);

        // interior cell with 4 neighbours
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn neighbour_at_dir() {
        let g = rect_grid(2, 3);
        let check_neighbour = |coord, dir: CompassDirection, expected| {
            assert_eq!(g.neighbour_at_direction(coord, dir), expected);
        };
        check_neighbour(gc(0, 0), CompassDirection::North, None);
        check_neighbour(gc(0, 0), CompassDirection::South, Some(gc(0, 1)));
        check_neighbour(gc(0, 0), CompassDirection::East, Some(gc(1, 0)));
        check_neighbour(gc(0, 0), CompassDirection::West, None);

        check_neighbour(gc(1, 2), CompassDirection::North, Some(gc(1, 1)));
        check_neighbour(gc(1, 2), CompassDirection::South, None);
        check_neighbour(gc(1, 2), CompassDirection::East, None);
        check_neighbour(gc(1, 2), CompassDirection::West, Some(gc(0, 2)));
    }

    #[test]
    fn random_cell_is_always_in_bounds() {
        let g = rect_grid(4, 3);
        let mut rng = XorShiftRng::seed_from_u64(0xfeed);
        for _ in 0..1000 {
            let coord = g.random_cell(&mut rng);
            assert!(g.is_valid_coordinate(coord));
        }
    }

    #[test]
    fn cell_iter_is_row_major() {
        let g = rect_grid(3, 2);
        assert_eq!(
            g.iter().collect::<Vec<Cartesian2DCoordinate>>(),
            &[gc(0, 0), gc(1, 0), gc(2, 0), gc(0, 1), gc(1, 1), gc(2, 1)]
        );
    }

    #[test]
    fn linking_cells() {
        let mut g = rect_grid(4, 4);
        let a = gc(0, 1);
        let b = gc(0, 2);
        let c = gc(0, 3);

        let sorted_links = |grid: &RectGrid, coord| -> Vec<Cartesian2DCoordinate> {
            grid.links(coord).unwrap().iter().cloned().sorted().collect()
        };

        // Argument order must not matter to is_linked.
        macro_rules! bi_check_linked {
            ($x:expr, $y:expr) => {
                g.is_linked($x, $y) && g.is_linked($y, $x)
            };
        }

        assert!(!bi_check_linked!(a, b));
        assert!(!bi_check_linked!(b, c));
        assert_eq!(sorted_links(&g, a), vec![]);

        g.link(a, b).unwrap();
        assert!(bi_check_linked!(a, b));
        assert_eq!(sorted_links(&g, a), vec![b]);
        assert_eq!(sorted_links(&g, b), vec![a]);
        assert!(g.is_neighbour_linked(a, CompassDirection::South));
        assert!(!g.is_neighbour_linked(a, CompassDirection::North));
        assert_eq!(g.links_count(), 1);

        g.link(b, c).unwrap();
        assert!(bi_check_linked!(a, b));
        assert!(bi_check_linked!(b, c));
        assert!(!bi_check_linked!(a, c));
        assert_eq!(sorted_links(&g, b), vec![a, c]);
        assert_eq!(g.links_count(), 2);

        assert!(g.unlink(a, b));
        assert!(!bi_check_linked!(a, b));
        assert!(bi_check_linked!(b, c));
        assert_eq!(sorted_links(&g, a), vec![]);
        assert_eq!(sorted_links(&g, b), vec![c]);
        assert!(!g.unlink(a, b)); // nothing left to unlink
    }

    #[test]
    fn no_self_links() {
        let mut g = rect_grid(4, 4);
        let a = gc(0, 0);
        assert_eq!(g.link(a, a), Err(CellLinkError::SelfLink));
        assert!(g.links(a).unwrap().is_empty());
    }

    #[test]
    fn no_out_of_bounds_links() {
        let mut g = rect_grid(2, 2);
        assert_eq!(
            g.link(gc(0, 0), gc(5, 0)),
            Err(CellLinkError::InvalidGridCoordinate)
        );
        assert_eq!(g.links(gc(5, 0)), None);
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn duplicate_links_are_not_stored() {
        let mut g = rect_grid(4, 4);
        let a = gc(0, 0);
        let b = gc(0, 1);
        g.link(a, b).unwrap();
        g.link(a, b).unwrap();
        assert_eq!(g.links_count(), 1);

        g.unlink(a, b);
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn display_draws_walls_and_passages() {
        let mut g = rect_grid(2, 1);
        g.link(gc(0, 0), gc(1, 0)).unwrap();
        assert_eq!(format!("{}", g), "+---+---+\n|       |\n+---+---+\n");

        let mut tall = rect_grid(1, 2);
        tall.link(gc(0, 0), gc(0, 1)).unwrap();
        assert_eq!(format!("{}", tall), "+---+\n|   |\n+   +\n|   |\n+---+\n");
    }
}
