//! Ice geometry on a grid: bed, thickness, sea level, and the fields derived from them.
use crate::config::Constants;
use crate::errors::FlowError;
use crate::field::Field2;
use crate::grid::Grid;
use crate::io::Output;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Classification of a grid cell, stored in the `mask` field with PISM's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellType {
    /// Land without ice.
    IceFreeBedrock = 0,
    /// Ice resting on the bed.
    Grounded = 2,
    /// Ice floating on the ocean.
    Floating = 3,
    /// Ocean without ice.
    IceFreeOcean = 4,
}

impl CellType {
    /// Decode a `mask` value.
    pub fn from_code(code: f64) -> Option<CellType> {
        match code as i64 {
            0 => Some(CellType::IceFreeBedrock),
            2 => Some(CellType::Grounded),
            3 => Some(CellType::Floating),
            4 => Some(CellType::IceFreeOcean),
            _ => None,
        }
    }
}

/// Ice geometry fields on a shared grid.
#[derive(Debug, Clone)]
pub struct Geometry {
    /// Bed elevation, m.
    pub bed_elevation: Field2,
    /// Ice thickness, m.
    pub ice_thickness: Field2,
    /// Sea level elevation, m.
    pub sea_level_elevation: Field2,
    /// Ice surface elevation, m.  Derived by [ensure_consistency](#method.ensure_consistency).
    pub ice_surface_elevation: Field2,
    /// Cell type mask.  Derived by [ensure_consistency](#method.ensure_consistency).
    pub cell_type: Field2,
    constants: Constants,
}

impl Geometry {
    /// Allocate zero-filled geometry fields on `grid`.
    pub fn new(grid: &Arc<Grid>) -> Self {
        Geometry {
            bed_elevation: Field2::new(grid, "topg", "m").long_name("bedrock surface elevation"),
            ice_thickness: Field2::new(grid, "thk", "m").long_name("land ice thickness"),
            sea_level_elevation: Field2::new(grid, "sea_level", "m")
                .long_name("sea level elevation above datum"),
            ice_surface_elevation: Field2::new(grid, "usurf", "m")
                .long_name("ice top surface elevation"),
            cell_type: Field2::new(grid, "mask", "1")
                .long_name("ice-type (ice-free/grounded/floating/ocean) integer mask"),
            constants: Constants::default(),
        }
    }

    /// Physical constants used by this geometry.
    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    /// Grid shared by all fields.
    pub fn grid(&self) -> &Arc<Grid> {
        self.bed_elevation.grid()
    }

    /// Cell type at point `(i, j)` as of the last consistency pass.
    pub fn cell(&self, i: usize, j: usize) -> Option<CellType> {
        CellType::from_code(self.cell_type.get(i, j))
    }

    /// Make derived fields agree with bed, thickness and sea level.
    ///
    /// Thickness that is negative or at most `ice_free_thickness_threshold` is set to
    /// zero.  Ice floats where `rho_ice * H < rho_sea_water * (sea_level - bed)`; the
    /// surface of floating ice and of ice-free ocean sits at its flotation freeboard above
    /// sea level, elsewhere it is `bed + H`.
    pub fn ensure_consistency(&mut self, ice_free_thickness_threshold: f64) -> Result<(), FlowError> {
        for field in [&self.bed_elevation, &self.ice_thickness, &self.sea_level_elevation].iter() {
            if let Some(k) = field.values().iter().position(|v| !v.is_finite()) {
                return Err(FlowError::InvalidField(format!(
                    "{} is not finite at storage index {}",
                    field.name(),
                    k
                )));
            }
        }

        let ratio = self.constants.ice_density / self.constants.sea_water_density;
        let grid = Arc::clone(self.grid());
        let bed = &self.bed_elevation;
        let sea_level = &self.sea_level_elevation;

        let mut clipped = 0usize;
        {
            let mut thk = self.ice_thickness.access();
            for (i, j) in grid.points() {
                if thk[(i, j)] < 0.0 || thk[(i, j)] <= ice_free_thickness_threshold {
                    if thk[(i, j)] != 0.0 {
                        clipped += 1;
                    }
                    thk[(i, j)] = 0.0;
                }
            }
        }
        let thk = &self.ice_thickness;
        let mut mask = self.cell_type.access();
        let mut surface = self.ice_surface_elevation.access();
        for (i, j) in grid.points() {
            let (b, h, z) = (bed.get(i, j), thk.get(i, j), sea_level.get(i, j));
            let floating = ratio * h < z - b;
            let cell = match (h > 0.0, floating) {
                (true, false) => CellType::Grounded,
                (true, true) => CellType::Floating,
                (false, true) => CellType::IceFreeOcean,
                (false, false) => CellType::IceFreeBedrock,
            };
            mask[(i, j)] = cell as i64 as f64;
            surface[(i, j)] = if floating { z + (1.0 - ratio) * h } else { b + h };
        }
        if clipped > 0 {
            debug!("set thickness to zero at {} points", clipped);
        }
        Ok(())
    }

    /// Write all geometry fields to `path`.
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<(), FlowError> {
        info!("writing geometry to {}", path.as_ref().display());
        let mut out = Output::prepare(path, self.grid())?;
        out.write(&self.bed_elevation)?;
        out.write(&self.ice_thickness)?;
        out.write(&self.ice_surface_elevation)?;
        out.write(&self.sea_level_elevation)?;
        out.write(&self.cell_type)?;
        out.close()
    }
}
