//! Scalar fields on a 2-D grid.
use crate::errors::FlowError;
use crate::grid::Grid;
use crate::io::Output;
use log::trace;
use std::ops::{Index, IndexMut};
use std::path::Path;
use std::sync::Arc;

/// A named scalar field on a [Grid](../grid/struct.Grid.html), stored row-major.
///
/// Reads go through [get](#method.get), [values](#method.values) and
/// [row](#method.row).  Writes go through the guard returned by
/// [access](#method.access), which logs the end of the write when dropped.
#[derive(Debug, Clone)]
pub struct Field2 {
    name: String,
    units: String,
    long_name: String,
    grid: Arc<Grid>,
    data: Vec<f64>,
}

impl Field2 {
    /// Allocate a zero-filled field called `name` with units `units`.
    pub fn new(grid: &Arc<Grid>, name: &str, units: &str) -> Self {
        Field2 {
            name: name.to_string(),
            units: units.to_string(),
            long_name: String::new(),
            grid: Arc::clone(grid),
            data: vec![0.0; grid.size()],
        }
    }

    /// Attach a descriptive name used in output files.
    pub fn long_name(mut self, long_name: &str) -> Self {
        self.long_name = long_name.to_string();
        self
    }

    /// Short name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units of the field.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Descriptive name, empty if none was given.
    pub fn description(&self) -> &str {
        &self.long_name
    }

    /// Grid the field lives on.
    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    /// Value at point `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.grid.index(i, j)]
    }

    /// All values, row-major.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Values of row `j`.
    pub fn row(&self, j: usize) -> &[f64] {
        let mx = self.grid.mx();
        &self.data[j * mx..(j + 1) * mx]
    }

    /// Values of the center row, the physical row of a flow-line grid.
    pub fn center_row(&self) -> &[f64] {
        self.row(self.grid.center_row())
    }

    /// Set every value to `value`.
    pub fn set(&mut self, value: f64) {
        self.access().fill(value);
    }

    /// Begin writing to the field.  The returned guard indexes by `(i, j)`; access ends
    /// when it goes out of scope.
    pub fn access(&mut self) -> FieldAccess<'_> {
        trace!("begin access: {}", self.name);
        FieldAccess { field: self }
    }

    /// Write this field alone to `path`.
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<(), FlowError> {
        let mut out = Output::prepare(path, &self.grid)?;
        out.write(self)?;
        out.close()
    }
}

/// Write access to a [Field2](struct.Field2.html), released on drop.
pub struct FieldAccess<'a> {
    field: &'a mut Field2,
}

impl<'a> FieldAccess<'a> {
    /// Set every value to `value`.
    pub fn fill(&mut self, value: f64) {
        for v in self.field.data.iter_mut() {
            *v = value;
        }
    }

    /// All values, row-major, for writing.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.field.data
    }
}

impl<'a> Index<(usize, usize)> for FieldAccess<'a> {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.field.data[self.field.grid.index(i, j)]
    }
}

impl<'a> IndexMut<(usize, usize)> for FieldAccess<'a> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        let k = self.field.grid.index(i, j);
        &mut self.field.data[k]
    }
}

impl<'a> Drop for FieldAccess<'a> {
    fn drop(&mut self) {
        trace!("end access: {}", self.field.name);
    }
}
