use std::error::Error;
use std::fmt;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);

/// Rejected grid dimensions: a grid must be at least one cell wide and one cell high.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct InvalidDimension {
    pub width: usize,
    pub height: usize,
}

impl fmt::Display for InvalidDimension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "invalid grid dimensions {} x {}: width and height must both be positive",
            self.width, self.height
        )
    }
}

impl Error for InvalidDimension {}

/// Check that `width x height` describes a non-degenerate grid.
pub fn validate_dimensions(width: Width, height: Height) -> Result<(), InvalidDimension> {
    if width.0 == 0 || height.0 == 0 {
        Err(InvalidDimension {
            width: width.0,
            height: height.0,
        })
    } else {
        Ok(())
    }
}
