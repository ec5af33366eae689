use smallvec::SmallVec;

use crate::units::{Height, Width};

/// A cell position on the grid, identified by value.
#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    pub fn from_row_major_index(index: usize, width: Width) -> Cartesian2DCoordinate {
        let y = index / width.0;
        let x = index - (y * width.0);
        Cartesian2DCoordinate {
            x: x as u32,
            y: y as u32,
        }
    }

    pub fn to_row_major_index(self, width: Width) -> usize {
        self.y as usize * width.0 + self.x as usize
    }
}

// A cell has at most 4 neighbours, so these never spill to the heap.
pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassDirection {
    North,
    South,
    East,
    West,
}

pub const COMPASS_DIRECTIONS: [CompassDirection; 4] = [
    CompassDirection::North,
    CompassDirection::South,
    CompassDirection::East,
    CompassDirection::West,
];

/// The coordinate one cell away in the given direction.
///
/// Returns None when the offset walks off the north or west edge of the
/// coordinate space. Offsets beyond the east/south grid boundary are still
/// representable and must be bounds checked by the grid.
pub fn offset_coordinate(
    coord: Cartesian2DCoordinate,
    direction: CompassDirection,
) -> Option<Cartesian2DCoordinate> {
    let (x, y) = (coord.x, coord.y);
    match direction {
        CompassDirection::North => y.checked_sub(1).map(|new_y| Cartesian2DCoordinate::new(x, new_y)),
        CompassDirection::South => Some(Cartesian2DCoordinate::new(x, y + 1)),
        CompassDirection::East => Some(Cartesian2DCoordinate::new(x + 1, y)),
        CompassDirection::West => x.checked_sub(1).map(|new_x| Cartesian2DCoordinate::new(new_x, y)),
    }
}

/// Is the coordinate within a `width x height` grid?
pub fn is_within_dimensions(
    coord: Cartesian2DCoordinate,
    width: Width,
    height: Height,
) -> bool {
    (coord.x as usize) < width.0 && (coord.y as usize) < height.0
}
