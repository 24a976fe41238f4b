//! Piecewise-Gaussian "bump" profiles used to synthesize bed and surface elevations.
use crate::errors::FlowError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Parameters of a Gaussian bump centered at `x0` with height `zmax`.
///
/// The left side (`x <= x0`) rises from `zmin_left` to `zmax` over a span controlled by
/// `sigma_left`; the right side (`x > x0`) falls from `zmax` to `zmin_right` over
/// `sigma_right`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BumpRecord")]
pub struct Bump {
    x0: f64,
    zmin_left: f64,
    zmin_right: f64,
    zmax: f64,
    sigma_left: f64,
    sigma_right: f64,
}

impl Default for Bump {
    fn default() -> Self {
        Bump {
            x0: 0.0,
            zmin_left: -300.0,
            zmin_right: 50.0,
            zmax: 2000.0,
            sigma_left: 10e3,
            sigma_right: 25e3,
        }
    }
}

fn check_width(sigma: f64, side: &str) -> Result<f64, FlowError> {
    if sigma.is_finite() && sigma > 0.0 {
        Ok(sigma)
    } else {
        Err(FlowError::InvalidProfile(format!(
            "sigma_{} must be positive, got {}",
            side, sigma
        )))
    }
}

/// Unchecked form of a [Bump](struct.Bump.html) as read from a record.
#[derive(Deserialize)]
struct BumpRecord {
    x0: f64,
    zmin_left: f64,
    zmin_right: f64,
    zmax: f64,
    sigma_left: f64,
    sigma_right: f64,
}

impl TryFrom<BumpRecord> for Bump {
    type Error = FlowError;

    fn try_from(rec: BumpRecord) -> Result<Self, Self::Error> {
        Ok(Bump {
            x0: rec.x0,
            zmin_left: rec.zmin_left,
            zmin_right: rec.zmin_right,
            zmax: rec.zmax,
            sigma_left: check_width(rec.sigma_left, "left")?,
            sigma_right: check_width(rec.sigma_right, "right")?,
        })
    }
}

impl Bump {
    /// Create bumps using a builder pattern.  Calling new() returns the default bump
    /// (`x0 = 0`, `zmax = 2000`, `zmin_left = -300`, `zmin_right = 50`, `sigma_left = 10 km`,
    /// `sigma_right = 25 km`), which the setters then adjust.
    ///
    /// # Examples
    /// ```
    /// use flowline::prelude::*;
    /// let bed = Bump::new()
    ///     .x0(32e3)
    ///     .zmax(1625.0)
    ///     .sigma_left(7.5e3)?;
    /// assert_eq!(bed.eval(32e3), 1625.0);
    /// # Ok::<(), FlowError>(())
    /// ```
    pub fn new() -> Self {
        Bump::default()
    }

    /// Bed of the synthetic flow-line setup.
    pub fn synthetic_bed() -> Self {
        Bump {
            x0: 32e3,
            zmin_left: -300.0,
            zmin_right: -650.0,
            zmax: 1625.0,
            sigma_left: 7.5e3,
            sigma_right: 20e3,
        }
    }

    /// Ice surface of the synthetic flow-line setup.
    pub fn synthetic_surface() -> Self {
        Bump {
            x0: 32e3,
            zmin_left: -200.0,
            zmin_right: 30.0,
            zmax: 2000.0,
            sigma_left: 10e3,
            sigma_right: 30e3,
        }
    }

    /// Assign the center of the bump.
    pub fn x0(mut self, x0: f64) -> Self {
        self.x0 = x0;
        self
    }

    /// Assign the height at the center.
    pub fn zmax(mut self, zmax: f64) -> Self {
        self.zmax = zmax;
        self
    }

    /// Assign the far-field elevation on the left.
    pub fn zmin_left(mut self, zmin: f64) -> Self {
        self.zmin_left = zmin;
        self
    }

    /// Assign the far-field elevation on the right.
    pub fn zmin_right(mut self, zmin: f64) -> Self {
        self.zmin_right = zmin;
        self
    }

    /// Assign the decay width on the left.  Fails unless `sigma` is positive and finite.
    pub fn sigma_left(mut self, sigma: f64) -> Result<Self, FlowError> {
        self.sigma_left = check_width(sigma, "left")?;
        Ok(self)
    }

    /// Assign the decay width on the right.  Fails unless `sigma` is positive and finite.
    pub fn sigma_right(mut self, sigma: f64) -> Result<Self, FlowError> {
        self.sigma_right = check_width(sigma, "right")?;
        Ok(self)
    }

    /// Evaluate the bump at a single location `x`.
    pub fn eval(&self, x: f64) -> f64 {
        let d2 = (x - self.x0) * (x - self.x0);
        if x <= self.x0 {
            self.zmin_left
                + (self.zmax - self.zmin_left) * (-d2 / (2.0 * self.sigma_left.powi(2))).exp()
        } else {
            self.zmin_right
                + (self.zmax - self.zmin_right) * (-d2 / (2.0 * self.sigma_right.powi(2))).exp()
        }
    }

    /// Evaluate the bump at every location in `x`.
    pub fn eval_slice(&self, x: &[f64]) -> Vec<f64> {
        x.par_iter().map(|xi| self.eval(*xi)).collect()
    }
}

/// Evaluate `params` at every location in `x`.
pub fn bump(x: &[f64], params: &Bump) -> Vec<f64> {
    params.eval_slice(x)
}
