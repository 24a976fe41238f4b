/*!
* # Flowline - Helpers for setting up flow-line ice sheet experiments.
* A flow line is a thin strip of an ice sheet following the direction of ice flow.  Models such as PISM
* treat it as a grid three cells wide and periodic across the flow, so that a two-dimensional model
* behaves like a one-dimensional one.  The functions in this crate build such grids, fill them with
* real or synthetic bed and surface profiles, estimate orographic precipitation over the resulting ice
* surface with the linear theory of Smith & Barstad (2004), and write the climate and ocean forcing files
* a model run needs.
*
* Synthetic profiles are piecewise Gaussian "bumps": a peak elevation at the ice divide, falling to
* different minimum elevations with different widths on either side.
*
*  ## Quick Start
*
*  - Load the crate prelude in the preamble of your `main.rs`.
*  - Build a synthetic geometry and estimate precipitation over it:
* ```rust
* use flowline::prelude::*;
* use std::sync::Arc;
*
* fn main() -> Result<(), FlowError> {
*     // 200 km flow line with 500 m spacing
*     let grid = Arc::new(Grid::flowline(-25e3, 175e3, 500.0)?);
*     let geometry = synthetic_geometry(&grid, &Bump::synthetic_bed(), &Bump::synthetic_surface())?;
*
*     // precipitation along the center row, m / year
*     let precip = ltop(&geometry, OrographicOptions::flowline_tuned())?;
*     assert_eq!(precip.len(), grid.mx());
*     assert!(precip.iter().all(|p| *p >= 0.0));
*     Ok(())
* }
* ```
*
* Profiles are built with setters, starting from [new](profile/struct.Bump.html#method.new) or one of the
* presets.  Widths must be positive:
*
* ```rust
* use flowline::prelude::*;
*
* let divide = Bump::new().x0(10e3).zmax(2000.0).sigma_left(5e3)?.sigma_right(20e3)?;
* assert_eq!(divide.eval(10e3), 2000.0);
* assert!(Bump::new().sigma_left(0.0).is_err());
* # Ok::<(), FlowError>(())
* ```
*/

#![warn(missing_docs)]
pub mod animate;
pub mod atmosphere;
pub mod config;
pub mod errors;
pub mod field;
pub mod forcing;
pub mod geometry;
pub mod grid;
pub mod io;
pub mod plot;
pub mod profile;
pub mod setup;
pub mod utils;

/// Commonly used types and functions.
pub mod prelude {
    pub use crate::animate::{animate, AnimationOptions, History, MemoryHistory};
    #[cfg(feature = "netcdf")]
    pub use crate::animate::NetcdfHistory;
    pub use crate::atmosphere::{ltop, Atmosphere, OrographicPrecipitation, UniformAtmosphere};
    pub use crate::config::{Constants, ForcingOptions, OrographicOptions, SECONDS_PER_YEAR};
    pub use crate::errors::FlowError;
    pub use crate::field::{Field2, FieldAccess};
    pub use crate::forcing;
    pub use crate::geometry::{CellType, Geometry};
    pub use crate::grid::{grid, Grid, Periodicity, Registration};
    pub use crate::io::{Format, Output};
    pub use crate::plot;
    pub use crate::profile::{bump, Bump};
    pub use crate::setup::{real_geometry, synthetic_geometry};
    pub use crate::utils::Profile;
}
