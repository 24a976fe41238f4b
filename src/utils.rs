use crate::errors::FlowError;
use log::{debug, warn};
use std::path::Path;

/// Column holding positions in a profile table.
pub const POSITION_COLUMN: usize = 1;
/// Column holding values in a profile table.
pub const VALUE_COLUMN: usize = 3;

/// Positions and values read from a profile table.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    x: Vec<f64>,
    value: Vec<f64>,
}

impl Profile {
    /// Build a profile from matching position and value vectors.
    pub fn new(x: Vec<f64>, value: Vec<f64>) -> Result<Self, FlowError> {
        if x.len() != value.len() {
            return Err(FlowError::DataFormat(format!(
                "{} positions but {} values",
                x.len(),
                value.len()
            )));
        }
        if x.is_empty() {
            return Err(FlowError::DataFormat("empty profile".to_string()));
        }
        if let Some(k) = x.iter().chain(value.iter()).position(|v| !v.is_finite()) {
            return Err(FlowError::DataFormat(format!(
                "non-finite entry at row {}",
                k % x.len()
            )));
        }
        if let Some(k) = x.windows(2).position(|w| !(w[1] > w[0])) {
            return Err(FlowError::Unsorted(format!(
                "position {} is followed by {}",
                x[k],
                x[k + 1]
            )));
        }
        Ok(Profile { x, value })
    }

    /// Positions along the flow line, strictly increasing.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Value at each position.
    pub fn value(&self) -> &[f64] {
        &self.value
    }

    /// Linearly interpolate the profile onto `positions`.
    pub fn sample(&self, positions: &[f64]) -> Vec<f64> {
        let first = self.x[0];
        let last = self.x[self.x.len() - 1];
        let outside = positions.iter().filter(|p| **p < first || **p > last).count();
        if outside > 0 {
            warn!(
                "{} of {} positions lie outside [{}, {}], using end values",
                outside,
                positions.len(),
                first,
                last
            );
        }
        interp(positions, &self.x, &self.value)
    }
}

fn parse_cell(record: &csv::StringRecord, column: usize, path: &Path, line: u64) -> Result<f64, FlowError> {
    let cell = record.get(column).ok_or_else(|| {
        FlowError::DataFormat(format!(
            "{}:{}: expected at least {} columns, found {}",
            path.display(),
            line,
            column + 1,
            record.len()
        ))
    })?;
    match cell.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FlowError::DataFormat(format!(
            "{}:{}: column {} is not a finite number: {:?}",
            path.display(),
            line,
            column,
            cell
        ))),
    }
}

/// Read a comma-separated table with one header row, taking positions from column
/// `POSITION_COLUMN` and values from column `VALUE_COLUMN`.
pub fn read_profile<P: AsRef<Path>>(path: P) -> Result<Profile, FlowError> {
    read_columns(path, POSITION_COLUMN, VALUE_COLUMN)
}

/// Read positions from column `xcol` and values from column `vcol` of a comma-separated
/// table with one header row.
pub fn read_columns<P: AsRef<Path>>(path: P, xcol: usize, vcol: usize) -> Result<Profile, FlowError> {
    let path = path.as_ref();
    let var = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(var);
    let mut x = Vec::new();
    let mut value = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        x.push(parse_cell(&row, xcol, path, line)?);
        value.push(parse_cell(&row, vcol, path, line)?);
    }
    debug!("read {} rows from {}", x.len(), path.display());
    Profile::new(x, value).map_err(|e| match e {
        FlowError::DataFormat(msg) => FlowError::DataFormat(format!("{}: {}", path.display(), msg)),
        FlowError::Unsorted(msg) => FlowError::Unsorted(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

/// Read every row of a comma-separated table with one header row into `T`.
pub fn read_records<T, P>(path: P) -> Result<Vec<T>, FlowError>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let mut dat = Vec::new();
    let var = std::fs::File::open(path)?;
    let mut rdr = csv::Reader::from_reader(var);
    for result in rdr.records() {
        let row = result?;
        let row: T = row.deserialize(None)?;
        dat.push(row);
    }
    Ok(dat)
}

/// One-dimensional linear interpolation of `(xp, fp)` at `x`.  NaN positions give NaN.
///  - `xp` must be strictly increasing and the same length as `fp`.
///  - Positions left of `xp[0]` get `fp[0]`; right of the last position get the last value.
///
/// # Examples
///
/// ```rust
/// let v = flowline::utils::interp(&[-1.0, 0.5, 3.0], &[0.0, 1.0, 2.0], &[0.0, 10.0, 30.0]);
/// assert_eq!(v, vec![0.0, 5.0, 30.0]);
/// ```
pub fn interp(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    let n = xp.len();
    x.iter()
        .map(|xi| {
            if xi.is_nan() {
                return f64::NAN;
            }
            if *xi <= xp[0] {
                return fp[0];
            }
            if *xi >= xp[n - 1] {
                return fp[n - 1];
            }
            // first index with xp[k] > xi, so xp[k - 1] <= xi < xp[k]
            let k = xp.partition_point(|p| p <= xi);
            let t = (xi - xp[k - 1]) / (xp[k] - xp[k - 1]);
            fp[k - 1] + t * (fp[k] - fp[k - 1])
        })
        .collect()
}

/// Largest value of a slice, NaN if empty.
pub fn max(numbers: &[f64]) -> f64 {
    numbers.iter().cloned().fold(f64::NAN, f64::max)
}

/// Smallest value of a slice, NaN if empty.
pub fn min(numbers: &[f64]) -> f64 {
    numbers.iter().cloned().fold(f64::NAN, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", text).unwrap();
        file
    }

    #[test]
    fn reads_position_and_value_columns() {
        let file = table("id,x,lat,value\n0,0.0,60.1,100\n1,500.0,60.2,150\n2,1000.0,60.3,125\n");
        let p = read_profile(file.path()).unwrap();
        assert_eq!(p.x(), &[0.0, 500.0, 1000.0]);
        assert_eq!(p.value(), &[100.0, 150.0, 125.0]);
    }

    #[test]
    fn missing_column_is_a_format_error() {
        let file = table("id,x,lat,value\n0,0.0,60.1,100\n1,500.0\n");
        match read_profile(file.path()) {
            Err(FlowError::DataFormat(msg)) => assert!(msg.contains(":3:")),
            other => panic!("expected a data format error, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_value_is_a_format_error() {
        let file = table("id,x,lat,value\n0,0.0,60.1,abc\n");
        assert!(matches!(read_profile(file.path()), Err(FlowError::DataFormat(_))));
    }

    #[test]
    fn empty_table_is_a_format_error() {
        let file = table("id,x,lat,value\n");
        assert!(matches!(read_profile(file.path()), Err(FlowError::DataFormat(_))));
    }

    #[test]
    fn decreasing_positions_are_rejected() {
        let file = table("id,x,lat,value\n0,10.0,0,1\n1,5.0,0,2\n");
        assert!(matches!(read_profile(file.path()), Err(FlowError::Unsorted(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(read_profile("no/such/bed.csv"), Err(FlowError::IoError(_))));
    }

    #[test]
    fn interp_identity_on_nodes() {
        let xp = vec![-25e3, -24.5e3, -24e3, 0.0, 175e3];
        let fp = vec![1.0, -2.0, 3.5, 7.25, 0.0];
        assert_eq!(interp(&xp, &xp, &fp), fp);
    }

    #[test]
    fn interp_clamps_outside() {
        let v = interp(&[-10.0, 0.25, 10.0], &[0.0, 1.0], &[4.0, 8.0]);
        assert_eq!(v, vec![4.0, 5.0, 8.0]);
    }

    #[test]
    fn nan_position_is_a_format_error() {
        let file = table("fid,distance,name,value\n0,nan,p,100\n");
        assert!(matches!(read_profile(file.path()), Err(FlowError::DataFormat(_))));
        let file = table("fid,distance,name,value\n0,0.0,p,100\n1,500.0,p,inf\n");
        assert!(matches!(read_profile(file.path()), Err(FlowError::DataFormat(_))));
    }

    #[test]
    fn profile_checks_its_input() {
        assert!(Profile::new(vec![], vec![]).is_err());
        assert!(Profile::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(matches!(
            Profile::new(vec![f64::NAN], vec![1.0]),
            Err(FlowError::DataFormat(_))
        ));
        let p = Profile::new(vec![5.0], vec![2.0]).unwrap();
        assert_eq!(p.sample(&[0.0, 5.0, 10.0]), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn interp_passes_nan_through() {
        let v = interp(&[f64::NAN, 0.5], &[0.0, 1.0], &[4.0, 8.0]);
        assert!(v[0].is_nan());
        assert_eq!(v[1], 6.0);
        assert!(interp(&[f64::NAN], &[0.0], &[4.0])[0].is_nan());
    }
}
