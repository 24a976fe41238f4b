//! Initial ice geometries for flow-line runs.
//!
//! Both constructors fill every row with the same values, since the setup has a single
//! physical row, set sea level to zero and finish with a consistency pass.
use crate::errors::FlowError;
use crate::geometry::Geometry;
use crate::grid::Grid;
use crate::profile::Bump;
use crate::utils;
use log::info;
use std::path::Path;
use std::sync::Arc;

/// Build a geometry from two bump profiles: one for the bed and one for the ice surface.
///
/// Thickness is `max(surface - bed, 0)`.
///
/// # Examples
/// ```
/// use flowline::prelude::*;
/// use std::sync::Arc;
///
/// let grid = Arc::new(Grid::flowline(-25e3, 175e3, 500.0)?);
/// let geometry = synthetic_geometry(&grid, &Bump::synthetic_bed(), &Bump::synthetic_surface())?;
/// assert!(geometry.ice_thickness.values().iter().all(|h| *h >= 0.0));
/// # Ok::<(), FlowError>(())
/// ```
pub fn synthetic_geometry(grid: &Arc<Grid>, bed: &Bump, surface: &Bump) -> Result<Geometry, FlowError> {
    info!("building synthetic geometry on {} columns", grid.mx());
    let b = bed.eval_slice(grid.x());
    let s = surface.eval_slice(grid.x());

    let mut geometry = Geometry::new(grid);
    {
        let mut topg = geometry.bed_elevation.access();
        let mut thk = geometry.ice_thickness.access();
        for (i, j) in grid.points() {
            topg[(i, j)] = b[i];
            thk[(i, j)] = (s[i] - b[i]).max(0.0);
        }
    }
    geometry.sea_level_elevation.set(0.0);
    geometry.ensure_consistency(0.0)?;
    Ok(geometry)
}

/// Build a geometry from bed elevation and ice thickness tables.
///
/// Each table is comma-separated with one header row, positions in column 1 and values in
/// column 3.  Values are linearly interpolated onto the grid; grid columns outside a
/// table's range take the nearest end value.
pub fn real_geometry<P, Q>(grid: &Arc<Grid>, bed_csv: P, thickness_csv: Q) -> Result<Geometry, FlowError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    info!(
        "loading geometry from {} and {}",
        bed_csv.as_ref().display(),
        thickness_csv.as_ref().display()
    );
    let bed = utils::read_profile(bed_csv)?;
    let thickness = utils::read_profile(thickness_csv)?;
    profile_geometry(grid, &bed, &thickness)
}

/// Build a geometry from bed elevation and ice thickness profiles already in memory.
pub fn profile_geometry(
    grid: &Arc<Grid>,
    bed: &utils::Profile,
    thickness: &utils::Profile,
) -> Result<Geometry, FlowError> {
    let b = bed.sample(grid.x());
    let h = thickness.sample(grid.x());

    let mut geometry = Geometry::new(grid);
    {
        let mut topg = geometry.bed_elevation.access();
        let mut thk = geometry.ice_thickness.access();
        for (i, j) in grid.points() {
            topg[(i, j)] = b[i];
            thk[(i, j)] = h[i];
        }
    }
    geometry.sea_level_elevation.set(0.0);
    geometry.ensure_consistency(0.0)?;
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CellType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn flowline() -> Arc<Grid> {
        Arc::new(Grid::flowline(-25e3, 175e3, 500.0).unwrap())
    }

    #[test]
    fn synthetic_thickness_never_negative() {
        let grid = flowline();
        // surface dips below the bed far to the right
        let bed = Bump::new().x0(32e3).zmax(1625.0).zmin_right(100.0);
        let surface = Bump::new().x0(32e3).zmax(2000.0).zmin_right(-500.0);
        let g = synthetic_geometry(&grid, &bed, &surface).unwrap();
        assert!(g.ice_thickness.values().iter().all(|h| *h >= 0.0));
        assert_eq!(g.ice_thickness.get(grid.mx() - 1, 1), 0.0);
    }

    #[test]
    fn synthetic_values_follow_profiles() {
        let grid = flowline();
        let bed = Bump::synthetic_bed();
        let surface = Bump::synthetic_surface();
        let g = synthetic_geometry(&grid, &bed, &surface).unwrap();
        for (i, j) in grid.points() {
            let x = grid.x_at(i);
            assert_eq!(g.bed_elevation.get(i, j), bed.eval(x));
            assert_eq!(g.ice_thickness.get(i, j), (surface.eval(x) - bed.eval(x)).max(0.0));
            assert_eq!(g.sea_level_elevation.get(i, j), 0.0);
        }
        // the summit is grounded ice
        let summit = grid.x().iter().position(|x| *x == 32e3).unwrap();
        assert_eq!(g.cell(summit, 1), Some(CellType::Grounded));
        assert_eq!(g.ice_surface_elevation.get(summit, 1), 2000.0);
    }

    #[test]
    fn rows_are_identical() {
        let grid = flowline();
        let g = synthetic_geometry(&grid, &Bump::synthetic_bed(), &Bump::synthetic_surface()).unwrap();
        assert_eq!(g.bed_elevation.row(0), g.bed_elevation.row(1));
        assert_eq!(g.ice_thickness.row(2), g.ice_thickness.row(1));
    }

    fn table(x: &[f64], v: &[f64]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "fid,distance,name,value").unwrap();
        for (k, (xi, vi)) in x.iter().zip(v.iter()).enumerate() {
            writeln!(file, "{},{},p{},{}", k, xi, k, vi).unwrap();
        }
        file
    }

    #[test]
    fn loader_reproduces_values_on_matching_grid() {
        let grid = flowline();
        let x = grid.x().to_vec();
        let b: Vec<f64> = x.iter().map(|xi| 1000.0 - xi * 1e-3).collect();
        let h: Vec<f64> = x.iter().map(|xi| (xi * 1e-4).sin().abs() * 800.0).collect();
        let bed = table(&x, &b);
        let thk = table(&x, &h);
        let g = real_geometry(&grid, bed.path(), thk.path()).unwrap();
        assert_eq!(g.bed_elevation.center_row(), &b[..]);
        assert_eq!(g.ice_thickness.center_row(), &h[..]);
    }

    #[test]
    fn loader_interpolates_and_clamps() {
        let grid = flowline();
        let bed = table(&[0.0, 100e3], &[200.0, 100.0]);
        let thk = table(&[0.0, 100e3], &[0.0, 1000.0]);
        let g = real_geometry(&grid, bed.path(), thk.path()).unwrap();
        // x = -25 km lies left of the table
        assert_eq!(g.bed_elevation.get(0, 1), 200.0);
        // x = 50 km is halfway
        let mid = grid.x().iter().position(|x| *x == 50e3).unwrap();
        assert_eq!(g.bed_elevation.get(mid, 1), 150.0);
        assert_eq!(g.ice_thickness.get(mid, 1), 500.0);
        // x = 175 km lies right of the table
        assert_eq!(g.ice_thickness.get(grid.mx() - 1, 1), 1000.0);
    }

    #[test]
    fn loader_propagates_format_errors() {
        let grid = flowline();
        let mut bad = NamedTempFile::new().unwrap();
        writeln!(bad, "fid,distance\n0,1.0").unwrap();
        let thk = table(&[0.0, 1.0], &[0.0, 0.0]);
        assert!(matches!(
            real_geometry(&grid, bad.path(), thk.path()),
            Err(FlowError::DataFormat(_))
        ));
    }

    #[test]
    fn loader_rejects_nan_position() {
        let grid = flowline();
        let mut bed = NamedTempFile::new().unwrap();
        writeln!(bed, "fid,distance,name,value\n0,nan,p,100").unwrap();
        let thk = table(&[0.0, 1.0], &[0.0, 0.0]);
        assert!(matches!(
            real_geometry(&grid, bed.path(), thk.path()),
            Err(FlowError::DataFormat(_))
        ));
    }

    #[test]
    fn synthetic_geometry_dumps_all_fields() {
        let grid = flowline();
        let g = synthetic_geometry(&grid, &Bump::synthetic_bed(), &Bump::synthetic_surface()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synth_geometry.csv");
        g.dump(&path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(|h| h.to_string()).collect();
        assert_eq!(
            headers,
            vec!["x", "y", "topg (m)", "thk (m)", "usurf (m)", "sea_level (m)", "mask (1)"]
        );
        assert_eq!(rdr.records().count(), grid.size());
    }
}
