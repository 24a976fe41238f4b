//! Climate, ocean and mask fields used as forcing and boundary conditions.
use crate::config::ForcingOptions;
use crate::errors::FlowError;
use crate::field::Field2;
use crate::grid::Grid;
use crate::io::Output;
use std::path::Path;
use std::sync::Arc;

/// Fill `field` with `f(x)` column by column.
fn by_column<F: Fn(f64) -> f64>(field: &mut Field2, f: F) {
    let grid = Arc::clone(field.grid());
    let mut a = field.access();
    for (i, j) in grid.points() {
        a[(i, j)] = f(grid.x_at(i));
    }
}

fn indicator(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}

/// Placeholder precipitation, replaced at run time by the orographic model.
pub fn precipitation(grid: &Arc<Grid>, options: &ForcingOptions) -> Field2 {
    let mut p = Field2::new(grid, "precipitation", "kg m-2 year-1");
    p.set(options.precipitation);
    p
}

/// Uniform near-surface air temperature.
pub fn air_temperature(grid: &Arc<Grid>, options: &ForcingOptions) -> Field2 {
    let mut t = Field2::new(grid, "air_temp", "Celsius");
    t.set(options.air_temp);
    t
}

/// Ocean potential temperature, stepping from the western to the eastern value at the divide.
pub fn theta_ocean(grid: &Arc<Grid>, options: &ForcingOptions) -> Field2 {
    let mut t = Field2::new(grid, "theta_ocean", "Celsius");
    let o = *options;
    by_column(&mut t, |x| if x > o.ocean_divide { o.theta_east } else { o.theta_west });
    t
}

/// Ocean salinity, stepping from the western to the eastern value at the divide.
pub fn salinity_ocean(grid: &Arc<Grid>, options: &ForcingOptions) -> Field2 {
    let mut s = Field2::new(grid, "salinity_ocean", "g/kg");
    let o = *options;
    by_column(&mut s, |x| if x > o.ocean_divide { o.salinity_east } else { o.salinity_west });
    s
}

/// Maximum ice extent: 1 strictly inside `(extent_min, extent_max)`, 0 elsewhere.
pub fn ice_extent_mask(grid: &Arc<Grid>, options: &ForcingOptions) -> Field2 {
    let mut m = Field2::new(grid, "land_ice_area_fraction_retreat", "1");
    let o = *options;
    by_column(&mut m, |x| indicator(x > o.extent_min && x < o.extent_max));
    m
}

/// Precipitation scaling: 1 west of `precip_cutoff`, 0 from there on.
pub fn precipitation_scaling(grid: &Arc<Grid>, options: &ForcingOptions) -> Field2 {
    let mut f = Field2::new(grid, "frac_P", "1");
    let o = *options;
    by_column(&mut f, |x| indicator(x < o.precip_cutoff));
    f
}

/// Write precipitation and air temperature to `path`.
pub fn write_climate<P: AsRef<Path>>(grid: &Arc<Grid>, options: &ForcingOptions, path: P) -> Result<(), FlowError> {
    let mut out = Output::prepare(path, grid)?;
    out.write(&precipitation(grid, options))?;
    out.write(&air_temperature(grid, options))?;
    out.close()
}

/// Write ocean temperature and salinity to `path`.
pub fn write_ocean<P: AsRef<Path>>(grid: &Arc<Grid>, options: &ForcingOptions, path: P) -> Result<(), FlowError> {
    let mut out = Output::prepare(path, grid)?;
    out.write(&theta_ocean(grid, options))?;
    out.write(&salinity_ocean(grid, options))?;
    out.close()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flowline() -> Arc<Grid> {
        Arc::new(Grid::flowline(-25e3, 175e3, 500.0).unwrap())
    }

    fn column(grid: &Grid, x: f64) -> usize {
        grid.x().iter().position(|xi| *xi == x).unwrap()
    }

    #[test]
    fn climate_is_uniform() {
        let grid = flowline();
        let o = ForcingOptions::default();
        let t = air_temperature(&grid, &o);
        assert_eq!(t.units(), "Celsius");
        assert!(t.values().iter().all(|v| *v == -15.0));
        let p = precipitation(&grid, &o);
        assert_eq!(p.units(), "kg m-2 year-1");
        assert!(p.values().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn ocean_steps_at_divide() {
        let grid = flowline();
        let o = ForcingOptions::default();
        let t = theta_ocean(&grid, &o);
        let s = salinity_ocean(&grid, &o);
        let divide = column(&grid, 35e3);
        assert_eq!(t.get(divide, 1), 0.23);
        assert_eq!(t.get(divide + 1, 1), -2.2);
        assert_eq!(s.get(divide, 0), 34.70);
        assert_eq!(s.get(divide + 1, 2), 34.84);
    }

    #[test]
    fn extent_mask_is_open_interval() {
        let grid = flowline();
        let m = ice_extent_mask(&grid, &ForcingOptions::default());
        assert_eq!(m.get(column(&grid, 20e3), 1), 0.0);
        assert_eq!(m.get(column(&grid, 20.5e3), 1), 1.0);
        assert_eq!(m.get(column(&grid, 149.5e3), 1), 1.0);
        assert_eq!(m.get(column(&grid, 150e3), 1), 0.0);
    }

    #[test]
    fn scaling_removes_downwind_precipitation() {
        let grid = flowline();
        let f = precipitation_scaling(&grid, &ForcingOptions::default());
        assert_eq!(f.get(column(&grid, 89.5e3), 1), 1.0);
        assert_eq!(f.get(column(&grid, 90e3), 1), 0.0);
        assert_eq!(f.units(), "1");
    }

    fn headers(path: &Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn forcing_files_hold_their_fields() {
        let grid = flowline();
        let o = ForcingOptions::default();
        let dir = tempfile::tempdir().unwrap();

        let climate = dir.path().join("climate.csv");
        write_climate(&grid, &o, &climate).unwrap();
        assert_eq!(
            headers(&climate),
            vec!["x", "y", "precipitation (kg m-2 year-1)", "air_temp (Celsius)"]
        );

        let ocean = dir.path().join("ocean.csv");
        write_ocean(&grid, &o, &ocean).unwrap();
        assert_eq!(
            headers(&ocean),
            vec!["x", "y", "theta_ocean (Celsius)", "salinity_ocean (g/kg)"]
        );
        let rows = csv::Reader::from_path(&ocean).unwrap().records().count();
        assert_eq!(rows, grid.size());
    }
}
