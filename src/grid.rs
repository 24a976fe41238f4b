//! Flow-line computational grids.
//!
//! A flow-line is represented as a 2-D grid with a full set of columns along flow and a
//! minimal cross-flow extent of three rows, periodic in `y`.  Only the center row carries
//! physical meaning; the others pad the domain for 2-D operators.
use crate::errors::FlowError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Number of cross-flow rows in a flow-line grid.
pub const FLOWLINE_ROWS: usize = 3;

/// Location of grid points relative to cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Registration {
    /// Grid points sit at cell corners; the outermost points lie on the domain boundary.
    Corner,
    /// Grid points sit at cell centers.
    Center,
}

/// Directions in which the domain wraps around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Periodicity {
    /// No periodic direction.
    None,
    /// Periodic in `x`.
    X,
    /// Periodic in `y`.
    Y,
    /// Periodic in both directions.
    XY,
}

impl Periodicity {
    /// True if the domain wraps around in `x`.
    pub fn x(self) -> bool {
        matches!(self, Periodicity::X | Periodicity::XY)
    }

    /// True if the domain wraps around in `y`.
    pub fn y(self) -> bool {
        matches!(self, Periodicity::Y | Periodicity::XY)
    }
}

/// Geometric description of a 2-D grid and its coordinate arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    lx: f64,
    ly: f64,
    x0: f64,
    y0: f64,
    mx: usize,
    my: usize,
    dx: f64,
    dy: f64,
    registration: Registration,
    periodicity: Periodicity,
    x: Vec<f64>,
    y: Vec<f64>,
}

/// Spacing and coordinates along one axis.
fn axis(
    half: f64,
    center: f64,
    spacing: Option<f64>,
    n: usize,
    periodic: bool,
    reg: Registration,
) -> (f64, Vec<f64>) {
    let d = match spacing {
        Some(d) => d,
        None if periodic => 2.0 * half / n as f64,
        None => match reg {
            Registration::Corner if n > 1 => 2.0 * half / (n - 1) as f64,
            _ => 2.0 * half / n as f64,
        },
    };
    let offset = if spacing.is_some() {
        // evenly spaced by `d` and centered on `center`
        center - 0.5 * (n - 1) as f64 * d
    } else if periodic || reg == Registration::Center {
        center - half + 0.5 * d
    } else {
        center - half
    };
    let coords = (0..n).map(|i| offset + i as f64 * d).collect();
    (d, coords)
}

impl Grid {
    /// Build a grid from half-extents, center, point counts, registration and periodicity.
    /// Spacing follows from the extents.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lx: f64,
        ly: f64,
        x0: f64,
        y0: f64,
        mx: usize,
        my: usize,
        registration: Registration,
        periodicity: Periodicity,
    ) -> Result<Self, FlowError> {
        Grid::build(lx, ly, x0, y0, mx, my, None, registration, periodicity)
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        lx: f64,
        ly: f64,
        x0: f64,
        y0: f64,
        mx: usize,
        my: usize,
        dx: Option<f64>,
        registration: Registration,
        periodicity: Periodicity,
    ) -> Result<Self, FlowError> {
        if !(lx.is_finite() && lx > 0.0 && ly.is_finite() && ly > 0.0) {
            return Err(FlowError::InvalidGrid(format!(
                "half-extents must be positive, got Lx = {}, Ly = {}",
                lx, ly
            )));
        }
        if mx < 2 || my < 1 {
            return Err(FlowError::InvalidGrid(format!(
                "need at least 2 x 1 points, got {} x {}",
                mx, my
            )));
        }
        let (dx, x) = axis(lx, x0, dx, mx, periodicity.x(), registration);
        let (dy, y) = axis(ly, y0, None, my, periodicity.y(), registration);
        debug!(
            "grid: Lx = {}, Ly = {}, x0 = {}, y0 = {}, Mx = {}, My = {}, dx = {}, dy = {}",
            lx, ly, x0, y0, mx, my, dx, dy
        );
        Ok(Grid {
            lx,
            ly,
            x0,
            y0,
            mx,
            my,
            dx,
            dy,
            registration,
            periodicity,
            x,
            y,
        })
    }

    /// Allocate a flow-line grid covering `[x_min, x_max]` with spacing `dx`.
    ///
    /// The column count is `floor((x_max - x_min) / dx) + 1`, so the last column may
    /// fall short of `x_max` by less than `dx`.  Columns are evenly spaced by `dx` and
    /// centered on the middle of the domain.  The grid has three rows, periodic in `y`,
    /// with cross-flow half-width `dx`.
    ///
    /// # Examples
    /// ```
    /// use flowline::prelude::*;
    /// let grid = Grid::flowline(-25e3, 175e3, 500.0)?;
    /// assert_eq!(grid.mx(), 401);
    /// assert_eq!(grid.my(), 3);
    /// assert_eq!(grid.x0(), 75e3);
    /// # Ok::<(), FlowError>(())
    /// ```
    pub fn flowline(x_min: f64, x_max: f64, dx: f64) -> Result<Self, FlowError> {
        if !(x_min.is_finite() && x_max.is_finite() && x_max > x_min) {
            return Err(FlowError::InvalidGrid(format!(
                "need x_max > x_min, got [{}, {}]",
                x_min, x_max
            )));
        }
        if !(dx.is_finite() && dx > 0.0) {
            return Err(FlowError::InvalidGrid(format!("need dx > 0, got {}", dx)));
        }
        let x0 = (x_max + x_min) / 2.0;
        let lx = (x_max - x_min) / 2.0;
        let mx = ((x_max - x_min) / dx).floor() as usize + 1;
        Grid::build(
            lx,
            dx,
            x0,
            0.0,
            mx,
            FLOWLINE_ROWS,
            Some(dx),
            Registration::Corner,
            Periodicity::Y,
        )
    }

    /// Half-width in `x`.
    pub fn lx(&self) -> f64 {
        self.lx
    }

    /// Half-width in `y`.
    pub fn ly(&self) -> f64 {
        self.ly
    }

    /// Center in `x`.
    pub fn x0(&self) -> f64 {
        self.x0
    }

    /// Center in `y`.
    pub fn y0(&self) -> f64 {
        self.y0
    }

    /// Number of columns.
    pub fn mx(&self) -> usize {
        self.mx
    }

    /// Number of rows.
    pub fn my(&self) -> usize {
        self.my
    }

    /// Column spacing.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Row spacing.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Registration of grid points.
    pub fn registration(&self) -> Registration {
        self.registration
    }

    /// Periodic directions.
    pub fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    /// Column coordinates.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Row coordinates.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Coordinate of column `i`.
    pub fn x_at(&self, i: usize) -> f64 {
        self.x[i]
    }

    /// Index of the physically meaningful row of a flow-line grid.
    pub fn center_row(&self) -> usize {
        self.my / 2
    }

    /// Number of grid points.
    pub fn size(&self) -> usize {
        self.mx * self.my
    }

    /// Storage index of point `(i, j)`.
    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.mx + i
    }

    /// True if `other` has the same point layout.
    pub fn same_shape(&self, other: &Grid) -> bool {
        self.mx == other.mx && self.my == other.my
    }

    /// Iterate over all `(i, j)` points, rows outer and columns inner, matching storage order.
    pub fn points(&self) -> impl Iterator<Item = (usize, usize)> {
        let mx = self.mx;
        (0..self.my).flat_map(move |j| (0..mx).map(move |i| (i, j)))
    }
}

/// Allocate a flow-line grid, see [Grid::flowline](struct.Grid.html#method.flowline).
pub fn grid(x_min: f64, x_max: f64, dx: f64) -> Result<Grid, FlowError> {
    Grid::flowline(x_min, x_max, dx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn flowline_parameters() {
        let g = grid(-25e3, 175e3, 500.0).unwrap();
        assert_eq!(g.mx(), 401);
        assert_eq!(g.my(), 3);
        assert_eq!(g.x0(), 75e3);
        assert_eq!(g.y0(), 0.0);
        assert_eq!(g.lx(), 100e3);
        assert_eq!(g.ly(), 500.0);
        assert_eq!(g.registration(), Registration::Corner);
        assert_eq!(g.periodicity(), Periodicity::Y);
        assert_eq!(g.center_row(), 1);
    }

    #[test]
    fn flowline_coordinates() {
        let g = grid(-25e3, 175e3, 500.0).unwrap();
        let x = g.x();
        assert!((x[0] - -25e3).abs() < g.dx());
        assert!((x[x.len() - 1] - 175e3).abs() < g.dx());
        assert_relative_eq!(x[0], -25e3, epsilon = 1e-9);
        assert_relative_eq!(x[400], 175e3, epsilon = 1e-9);
        assert!(x.windows(2).all(|w| (w[1] - w[0] - 500.0).abs() < 1e-9));
        assert_relative_eq!(g.y()[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn truncated_domain_stays_centered() {
        let g = grid(0.0, 1000.0, 300.0).unwrap();
        assert_eq!(g.mx(), 4);
        let x = g.x();
        assert_relative_eq!(x[0], 50.0, epsilon = 1e-9);
        assert_relative_eq!(x[3], 950.0, epsilon = 1e-9);
        assert_relative_eq!((x[0] + x[3]) / 2.0, g.x0(), epsilon = 1e-9);
        assert!(x[0] - 0.0 < 300.0 && 1000.0 - x[3] < 300.0);
    }

    #[test]
    fn points_follow_storage_order() {
        let g = grid(0.0, 2000.0, 1000.0).unwrap();
        let pts: Vec<(usize, usize)> = g.points().collect();
        assert_eq!(pts.len(), g.size());
        for (k, (i, j)) in pts.iter().enumerate() {
            assert_eq!(g.index(*i, *j), k);
        }
        assert_eq!(pts[0], (0, 0));
        assert_eq!(pts[1], (1, 0));
        assert_eq!(pts[3], (0, 1));
    }

    #[test]
    fn corner_grid_spans_extents() {
        let g = Grid::new(10.0, 5.0, 0.0, 0.0, 11, 3, Registration::Corner, Periodicity::None).unwrap();
        assert_relative_eq!(g.dx(), 2.0);
        assert_relative_eq!(g.x()[0], -10.0);
        assert_relative_eq!(g.x()[10], 10.0);
        assert_relative_eq!(g.y()[2], 5.0);
    }

    #[test]
    fn rejects_bad_domains() {
        assert!(grid(10.0, 10.0, 1.0).is_err());
        assert!(grid(10.0, 0.0, 1.0).is_err());
        assert!(grid(0.0, 10.0, 0.0).is_err());
        assert!(grid(0.0, 10.0, -1.0).is_err());
    }
}
