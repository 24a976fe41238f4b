//! Atmosphere models providing precipitation and air temperature to an ice-sheet model.
//!
//! [UniformAtmosphere](struct.UniformAtmosphere.html) supplies constant fields.
//! [OrographicPrecipitation](struct.OrographicPrecipitation.html) wraps another model and
//! replaces its precipitation with the linear theory of orographic precipitation
//! (Smith & Barstad, 2004), evaluated spectrally on a copy of the surface that is
//! zero-padded along non-periodic directions.
use crate::config::{Constants, OrographicOptions, SECONDS_PER_TROPICAL_YEAR, SECONDS_PER_YEAR};
use crate::errors::FlowError;
use crate::field::Field2;
use crate::geometry::Geometry;
use crate::grid::Grid;
use log::{debug, info};
use rayon::prelude::*;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;

/// Earth's angular velocity, rad s-1.
const EARTH_ROTATION_RATE: f64 = 7.292115e-5;

/// Source of precipitation and air temperature.
pub trait Atmosphere {
    /// Prepare the model for `geometry`.
    fn init(&mut self, geometry: &Geometry) -> Result<(), FlowError>;
    /// Bring the model to the interval `[t, t + dt]`, in seconds.
    fn update(&mut self, geometry: &Geometry, t: f64, dt: f64) -> Result<(), FlowError>;
    /// Mean precipitation over the last interval, kg m-2 s-1.
    fn mean_precipitation(&self) -> &Field2;
    /// Mean near-surface air temperature over the last interval, K.
    fn air_temperature(&self) -> &Field2;
}

/// Constant precipitation and air temperature.
#[derive(Debug, Clone)]
pub struct UniformAtmosphere {
    precipitation: Field2,
    temperature: Field2,
}

impl UniformAtmosphere {
    /// Uniform atmosphere with 1000 kg m-2 year-1 of precipitation at 263.15 K.
    pub fn new(grid: &Arc<Grid>) -> Self {
        UniformAtmosphere::with_values(grid, 1000.0 / SECONDS_PER_YEAR, 263.15)
    }

    /// Uniform atmosphere with `precipitation` in kg m-2 s-1 and `temperature` in K.
    pub fn with_values(grid: &Arc<Grid>, precipitation: f64, temperature: f64) -> Self {
        let mut p = Field2::new(grid, "precipitation", "kg m-2 s-1");
        p.set(precipitation);
        let mut t = Field2::new(grid, "air_temp", "K");
        t.set(temperature);
        UniformAtmosphere {
            precipitation: p,
            temperature: t,
        }
    }
}

impl Atmosphere for UniformAtmosphere {
    fn init(&mut self, _geometry: &Geometry) -> Result<(), FlowError> {
        info!(
            "uniform atmosphere: precipitation {} kg m-2 s-1, temperature {} K",
            self.precipitation.get(0, 0),
            self.temperature.get(0, 0)
        );
        Ok(())
    }

    fn update(&mut self, _geometry: &Geometry, _t: f64, _dt: f64) -> Result<(), FlowError> {
        Ok(())
    }

    fn mean_precipitation(&self) -> &Field2 {
        &self.precipitation
    }

    fn air_temperature(&self) -> &Field2 {
        &self.temperature
    }
}

/// Planned transforms and wavenumbers for one extended domain.
struct Spectral {
    nx: usize,
    ny: usize,
    i0: usize,
    j0: usize,
    kx: Vec<f64>,
    ky: Vec<f64>,
    forward_x: Arc<dyn RealToComplex<f64>>,
    inverse_x: Arc<dyn ComplexToReal<f64>>,
    forward_y: Arc<dyn Fft<f64>>,
    inverse_y: Arc<dyn Fft<f64>>,
}

/// Angular wavenumbers of an `n`-point transform with spacing `d`, in FFT order.
fn wavenumbers(n: usize, d: f64) -> Vec<f64> {
    (0..n)
        .map(|k| {
            let k = if k <= n / 2 { k as f64 } else { k as f64 - n as f64 };
            2.0 * PI * k / (n as f64 * d)
        })
        .collect()
}

impl Spectral {
    /// Periodic directions are transformed as they are; the others are zero-padded to
    /// `factor` times their length.
    fn new(grid: &Grid, factor: usize) -> Self {
        let periodicity = grid.periodicity();
        let nx = if periodicity.x() { grid.mx() } else { factor * grid.mx() };
        let ny = if periodicity.y() { grid.my() } else { factor * grid.my() };
        let mut real_planner = RealFftPlanner::<f64>::new();
        let mut planner = FftPlanner::<f64>::new();
        let mut kx = wavenumbers(nx, grid.dx());
        kx.truncate(nx / 2 + 1);
        debug!("orographic precipitation: extended grid {} x {}", nx, ny);
        Spectral {
            nx,
            ny,
            i0: (nx - grid.mx()) / 2,
            j0: (ny - grid.my()) / 2,
            kx,
            ky: wavenumbers(ny, grid.dy()),
            forward_x: real_planner.plan_fft_forward(nx),
            inverse_x: real_planner.plan_fft_inverse(nx),
            forward_y: planner.plan_fft_forward(ny),
            inverse_y: planner.plan_fft_inverse(ny),
        }
    }

    /// Columns of the half spectrum, stored column-major (`kx` outer, `ky` inner).
    fn forward(&self, rows: &mut [f64]) -> Result<Vec<Complex<f64>>, FlowError> {
        let nxc = self.nx / 2 + 1;
        let mut spectrum = vec![Complex::new(0.0, 0.0); nxc * self.ny];
        spectrum
            .par_chunks_mut(nxc)
            .zip(rows.par_chunks_mut(self.nx))
            .try_for_each(|(out, row)| self.forward_x.process(row, out).map_err(|e| e.to_string()))
            .map_err(FlowError::FftError)?;

        let mut columns = transpose(&spectrum, self.ny, nxc);
        columns
            .par_chunks_mut(self.ny)
            .for_each(|col| self.forward_y.process(col));
        Ok(columns)
    }

    fn inverse(&self, columns: &mut [Complex<f64>]) -> Result<Vec<f64>, FlowError> {
        let nxc = self.nx / 2 + 1;
        columns
            .par_chunks_mut(self.ny)
            .for_each(|col| self.inverse_y.process(col));
        let mut spectrum = transpose(columns, nxc, self.ny);

        let nx = self.nx;
        let mut rows = vec![0.0; nx * self.ny];
        spectrum
            .par_chunks_mut(nxc)
            .zip(rows.par_chunks_mut(nx))
            .try_for_each(|(row_spectrum, row)| {
                row_spectrum[0].im = 0.0;
                if nx % 2 == 0 {
                    row_spectrum[nxc - 1].im = 0.0;
                }
                self.inverse_x.process(row_spectrum, row).map_err(|e| e.to_string())
            })
            .map_err(FlowError::FftError)?;

        let norm = 1.0 / (self.nx * self.ny) as f64;
        rows.iter_mut().for_each(|v| *v *= norm);
        Ok(rows)
    }
}

/// Transpose a row-major `rows x cols` array.
fn transpose(a: &[Complex<f64>], rows: usize, cols: usize) -> Vec<Complex<f64>> {
    let mut t = vec![Complex::new(0.0, 0.0); a.len()];
    for r in 0..rows {
        for c in 0..cols {
            t[c * rows + r] = a[r * cols + c];
        }
    }
    t
}

/// Linear-theory orographic precipitation on top of an input atmosphere model.
pub struct OrographicPrecipitation<A: Atmosphere> {
    input: A,
    options: OrographicOptions,
    grid: Arc<Grid>,
    precipitation: Field2,
    spectral: Option<Spectral>,
    surface: Option<Vec<f64>>,
}

impl<A: Atmosphere> OrographicPrecipitation<A> {
    /// Orographic precipitation on `grid`, taking air temperature from `input`.
    pub fn new(grid: &Arc<Grid>, input: A, options: OrographicOptions) -> Self {
        OrographicPrecipitation {
            input,
            options,
            grid: Arc::clone(grid),
            precipitation: Field2::new(grid, "precipitation", "kg m-2 s-1")
                .long_name("precipitation rate"),
            spectral: None,
            surface: None,
        }
    }

    fn check_options(&self) -> Result<(), FlowError> {
        let o = &self.options;
        let non_negative = [
            ("wind_speed", o.wind_speed),
            ("water_vapor_scale_height", o.water_vapor_scale_height),
            ("moist_stability_frequency", o.moist_stability_frequency),
            ("conversion_time", o.conversion_time),
            ("fallout_time", o.fallout_time),
            ("reference_density", o.reference_density),
        ];
        for (name, value) in non_negative.iter() {
            if !(value.is_finite() && *value >= 0.0) {
                return Err(FlowError::InvalidOptions(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        if o.lapse_rate == 0.0 || !o.lapse_rate.is_finite() {
            return Err(FlowError::InvalidOptions(format!(
                "lapse_rate must be non-zero, got {}",
                o.lapse_rate
            )));
        }
        if o.grid_size_factor < 1 {
            return Err(FlowError::InvalidOptions(
                "grid_size_factor must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Precipitation in mm hr-1 before backgrounds, truncation and scaling.
    fn orographic_response(&self, spectral: &Spectral, surface: &Field2) -> Result<Vec<f64>, FlowError> {
        let o = &self.options;
        let direction = o.wind_direction.to_radians();
        let u = -direction.sin() * o.wind_speed;
        let v = -direction.cos() * o.wind_speed;
        let f = 2.0 * EARTH_ROTATION_RATE * o.coriolis_latitude.to_radians().sin();
        let cw = o.reference_density * o.moist_adiabatic_lapse_rate / o.lapse_rate;
        let (nm, hw, tau_c, tau_f) = (
            o.moist_stability_frequency,
            o.water_vapor_scale_height,
            o.conversion_time,
            o.fallout_time,
        );

        let (nx, ny, i0, j0) = (spectral.nx, spectral.ny, spectral.i0, spectral.j0);
        let mut rows = vec![0.0; nx * ny];
        for j in 0..self.grid.my() {
            let start = (j + j0) * nx + i0;
            rows[start..start + self.grid.mx()].copy_from_slice(surface.row(j));
        }

        let mut columns = spectral.forward(&mut rows)?;
        let ky = &spectral.ky;
        columns
            .par_chunks_mut(ny)
            .zip(spectral.kx.par_iter())
            .for_each(|(col, kx)| {
                for (h, l) in col.iter_mut().zip(ky.iter()) {
                    let sigma = u * kx + v * l;
                    if sigma == 0.0 {
                        *h = Complex::new(0.0, 0.0);
                        continue;
                    }
                    let mut denominator = sigma * sigma - f * f;
                    if denominator.abs() < 1e-18 {
                        denominator = 1e-18_f64.copysign(denominator);
                    }
                    let m2 = (nm * nm - sigma * sigma) * (kx * kx + l * l) / denominator;
                    // propagating waves tilt against the flow, evanescent ones decay
                    let vertical = if m2 >= 0.0 {
                        Complex::new(1.0, -sigma.signum() * m2.sqrt() * hw)
                    } else {
                        Complex::new(1.0 + (-m2).sqrt() * hw, 0.0)
                    };
                    let numerator = Complex::new(0.0, cw * sigma);
                    let denominator = vertical
                        * Complex::new(1.0, sigma * tau_c)
                        * Complex::new(1.0, sigma * tau_f);
                    *h = *h * numerator / denominator;
                }
            });

        let rows = spectral.inverse(&mut columns)?;
        let mut response = Vec::with_capacity(self.grid.size());
        for j in 0..self.grid.my() {
            let start = (j + j0) * nx + i0;
            // kg m-2 s-1 to mm hr-1
            response.extend(rows[start..start + self.grid.mx()].iter().map(|p| p * 3600.0));
        }
        Ok(response)
    }
}

impl<A: Atmosphere> Atmosphere for OrographicPrecipitation<A> {
    fn init(&mut self, geometry: &Geometry) -> Result<(), FlowError> {
        self.check_options()?;
        if !self.grid.same_shape(geometry.grid()) {
            return Err(FlowError::ShapeMismatch(
                "geometry and orographic precipitation grids differ".to_string(),
            ));
        }
        self.input.init(geometry)?;
        info!("orographic precipitation: {:?}", self.options);
        self.spectral = Some(Spectral::new(&self.grid, self.options.grid_size_factor));
        self.surface = None;
        Ok(())
    }

    fn update(&mut self, geometry: &Geometry, t: f64, dt: f64) -> Result<(), FlowError> {
        self.input.update(geometry, t, dt)?;
        let surface = &geometry.ice_surface_elevation;
        if !self.grid.same_shape(surface.grid()) {
            return Err(FlowError::ShapeMismatch(
                "geometry and orographic precipitation grids differ".to_string(),
            ));
        }
        if self.surface.as_deref() == Some(surface.values()) {
            debug!("surface unchanged, keeping precipitation");
            return Ok(());
        }
        let spectral = match self.spectral.as_ref() {
            Some(s) => s,
            None => {
                return Err(FlowError::InvalidOptions(
                    "orographic precipitation used before init".to_string(),
                ))
            }
        };

        let response = self.orographic_response(spectral, surface)?;
        let o = self.options;
        let mut p = self.precipitation.access();
        for (value, r) in p.values_mut().iter_mut().zip(response.iter()) {
            let mut mm_per_hour = r + o.background_precip_pre;
            if o.truncate {
                mm_per_hour = mm_per_hour.max(0.0);
            }
            mm_per_hour = mm_per_hour * o.scale_factor + o.background_precip_post;
            *value = mm_per_hour / 3600.0;
        }
        drop(p);
        self.surface = Some(surface.values().to_vec());
        Ok(())
    }

    fn mean_precipitation(&self) -> &Field2 {
        &self.precipitation
    }

    fn air_temperature(&self) -> &Field2 {
        self.input.air_temperature()
    }
}

/// Run orographic precipitation once on `geometry` and return the precipitation of the
/// center row in meters of water per year.
pub fn ltop(geometry: &Geometry, options: OrographicOptions) -> Result<Vec<f64>, FlowError> {
    let grid = geometry.grid();
    let mut model = OrographicPrecipitation::new(grid, UniformAtmosphere::new(grid), options);
    model.init(geometry)?;
    model.update(geometry, 0.0, 1.0)?;
    Ok(to_meters_per_year(model.mean_precipitation().center_row(), geometry.constants()))
}

/// Convert precipitation from kg m-2 s-1 to meters of water per tropical year.
pub fn to_meters_per_year(precipitation: &[f64], constants: &Constants) -> Vec<f64> {
    precipitation
        .iter()
        .map(|p| SECONDS_PER_TROPICAL_YEAR * p / constants.fresh_water_density)
        .collect()
}
