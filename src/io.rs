//! Writing fields to disk.
//!
//! Files ending in `.csv` hold one row per grid point with columns `x`, `y` and one
//! column per field, headed `name (units)`.  Files ending in `.nc` are NetCDF with
//! dimensions `(y, x)` and are available with the `netcdf` feature.
use crate::errors::FlowError;
use crate::field::Field2;
use crate::grid::Grid;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// On-disk layout of an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Comma-separated text, one row per grid point.
    Csv,
    /// NetCDF classic with `(y, x)` dimensions.
    Netcdf,
}

impl Format {
    /// Pick the format from the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Format, FlowError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => Ok(Format::Csv),
            Some("nc") => Ok(Format::Netcdf),
            _ => Err(FlowError::Unsupported(format!(
                "no output format for {}",
                path.display()
            ))),
        }
    }

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Netcdf => "nc",
        }
    }

    /// True if this build can write the format.
    pub fn available(self) -> bool {
        match self {
            Format::Csv => true,
            Format::Netcdf => cfg!(feature = "netcdf"),
        }
    }
}

struct Column {
    name: String,
    units: String,
    long_name: String,
    values: Vec<f64>,
}

/// An output file being assembled.  Fields are collected by [write](#method.write) and
/// stored by [close](#method.close).
pub struct Output {
    path: PathBuf,
    format: Format,
    grid: Arc<Grid>,
    columns: Vec<Column>,
}

impl Output {
    /// Start an output file at `path` for fields on `grid`.
    pub fn prepare<P: AsRef<Path>>(path: P, grid: &Arc<Grid>) -> Result<Self, FlowError> {
        let path = path.as_ref().to_path_buf();
        let format = Format::from_path(&path)?;
        if !format.available() {
            return Err(FlowError::Unsupported(format!(
                "{} needs the netcdf feature",
                path.display()
            )));
        }
        debug!("preparing {:?} output {}", format, path.display());
        Ok(Output {
            path,
            format,
            grid: Arc::clone(grid),
            columns: Vec::new(),
        })
    }

    /// Add `field` to the file.  A field of the same name replaces the earlier one.
    pub fn write(&mut self, field: &Field2) -> Result<(), FlowError> {
        if !self.grid.same_shape(field.grid()) {
            return Err(FlowError::ShapeMismatch(format!(
                "{} is {} x {}, {} expects {} x {}",
                field.name(),
                field.grid().mx(),
                field.grid().my(),
                self.path.display(),
                self.grid.mx(),
                self.grid.my()
            )));
        }
        let column = Column {
            name: field.name().to_string(),
            units: field.units().to_string(),
            long_name: field.description().to_string(),
            values: field.values().to_vec(),
        };
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(c) => *c = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Store the collected fields.
    pub fn close(self) -> Result<(), FlowError> {
        info!(
            "writing {} field(s) to {}",
            self.columns.len(),
            self.path.display()
        );
        match self.format {
            Format::Csv => self.close_csv(),
            Format::Netcdf => self.close_netcdf(),
        }
    }

    fn close_csv(self) -> Result<(), FlowError> {
        let mut wtr = csv::Writer::from_path(&self.path)?;
        let mut header = vec!["x".to_string(), "y".to_string()];
        for c in self.columns.iter() {
            header.push(format!("{} ({})", c.name, c.units));
        }
        wtr.write_record(&header)?;
        for (i, j) in self.grid.points() {
            let k = self.grid.index(i, j);
            let mut row = vec![self.grid.x()[i].to_string(), self.grid.y()[j].to_string()];
            for c in self.columns.iter() {
                row.push(c.values[k].to_string());
            }
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    #[cfg(feature = "netcdf")]
    fn close_netcdf(self) -> Result<(), FlowError> {
        let mut file = netcdf::create(&self.path)?;
        file.add_dimension("y", self.grid.my())?;
        file.add_dimension("x", self.grid.mx())?;
        {
            let mut x = file.add_variable::<f64>("x", &["x"])?;
            x.put_attribute("units", "m")?;
            x.put_attribute("axis", "X")?;
            x.put_values(self.grid.x(), ..)?;
        }
        {
            let mut y = file.add_variable::<f64>("y", &["y"])?;
            y.put_attribute("units", "m")?;
            y.put_attribute("axis", "Y")?;
            y.put_values(self.grid.y(), ..)?;
        }
        for c in self.columns.iter() {
            let mut var = file.add_variable::<f64>(&c.name, &["y", "x"])?;
            var.put_attribute("units", c.units.as_str())?;
            if !c.long_name.is_empty() {
                var.put_attribute("long_name", c.long_name.as_str())?;
            }
            var.put_values(&c.values, ..)?;
        }
        Ok(())
    }

    #[cfg(not(feature = "netcdf"))]
    fn close_netcdf(self) -> Result<(), FlowError> {
        Err(FlowError::Unsupported(format!(
            "{} needs the netcdf feature",
            self.path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/b.csv")).unwrap(), Format::Csv);
        assert_eq!(Format::from_path(Path::new("climate.nc")).unwrap(), Format::Netcdf);
        assert!(Format::from_path(Path::new("climate.txt")).is_err());
        assert!(Format::from_path(Path::new("climate")).is_err());
    }

    #[test]
    fn csv_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fields.csv");
        let grid = Arc::new(Grid::flowline(0.0, 2000.0, 1000.0).unwrap());
        let mut a = Field2::new(&grid, "air_temp", "Celsius");
        a.set(-15.0);
        let mut b = Field2::new(&grid, "precipitation", "kg m-2 year-1");
        b.access()[(2, 1)] = 3.0;

        let mut out = Output::prepare(&path, &grid).unwrap();
        out.write(&a).unwrap();
        out.write(&b).unwrap();
        out.close().unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<&str>>(),
            vec!["x", "y", "air_temp (Celsius)", "precipitation (kg m-2 year-1)"]
        );
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), grid.size());
        let center = &rows[grid.index(2, 1)];
        assert_eq!(center[0].parse::<f64>().unwrap(), 2000.0);
        assert_eq!(center[2].parse::<f64>().unwrap(), -15.0);
        assert_eq!(center[3].parse::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn rejects_foreign_grid() {
        let grid = Arc::new(Grid::flowline(0.0, 2000.0, 1000.0).unwrap());
        let other = Arc::new(Grid::flowline(0.0, 5000.0, 1000.0).unwrap());
        let mut out = Output::prepare("unused.csv", &grid).unwrap();
        assert!(out.write(&Field2::new(&other, "thk", "m")).is_err());
    }
}
