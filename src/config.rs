//! Physical constants and model options.
//!
//! Options are plain records with defaults and chained setters, passed by value to the
//! code that reads them.
use serde::{Deserialize, Serialize};

/// Seconds in a 365-day year.
pub const SECONDS_PER_YEAR: f64 = 365.0 * 86400.0;

/// Seconds in a mean tropical year of 365.242198781 days, the udunits `year`.
pub const SECONDS_PER_TROPICAL_YEAR: f64 = 365.242198781 * 86400.0;

/// Physical constants shared by geometry and atmosphere code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    /// Ice density, kg m-3.
    pub ice_density: f64,
    /// Sea water density, kg m-3.
    pub sea_water_density: f64,
    /// Fresh water density, kg m-3.
    pub fresh_water_density: f64,
}

impl Default for Constants {
    fn default() -> Self {
        Constants {
            ice_density: 910.0,
            sea_water_density: 1028.0,
            fresh_water_density: 1000.0,
        }
    }
}

/// Options of the linear-theory orographic precipitation model.
///
/// Defaults follow the values PISM ships with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrographicOptions {
    /// Wind speed, m s-1.
    pub wind_speed: f64,
    /// Direction the wind blows from, degrees clockwise from north.
    pub wind_direction: f64,
    /// Water vapor scale height `Hw`, m.
    pub water_vapor_scale_height: f64,
    /// Moist stability (Brunt-Väisälä) frequency `Nm`, s-1.
    pub moist_stability_frequency: f64,
    /// Time for conversion of cloud water to hydrometeors, s.
    pub conversion_time: f64,
    /// Time for hydrometeors to fall out, s.
    pub fallout_time: f64,
    /// Environmental lapse rate, K km-1.
    pub lapse_rate: f64,
    /// Moist adiabatic lapse rate, K km-1.
    pub moist_adiabatic_lapse_rate: f64,
    /// Saturation water vapor density at the surface, kg m-3.
    pub reference_density: f64,
    /// Latitude used for the Coriolis parameter, degrees north.
    pub coriolis_latitude: f64,
    /// Precipitation added before truncation and scaling, mm hr-1.
    pub background_precip_pre: f64,
    /// Precipitation added after truncation and scaling, mm hr-1.
    pub background_precip_post: f64,
    /// Multiplier applied after truncation.
    pub scale_factor: f64,
    /// Clip negative precipitation to zero.
    pub truncate: bool,
    /// Factor by which the FFT domain extends the model domain.
    pub grid_size_factor: usize,
}

impl Default for OrographicOptions {
    fn default() -> Self {
        OrographicOptions {
            wind_speed: 15.0,
            wind_direction: 270.0,
            water_vapor_scale_height: 2500.0,
            moist_stability_frequency: 0.05,
            conversion_time: 1000.0,
            fallout_time: 1000.0,
            lapse_rate: -5.8,
            moist_adiabatic_lapse_rate: -6.5,
            reference_density: 7.4e-3,
            coriolis_latitude: 0.0,
            background_precip_pre: 0.0,
            background_precip_post: 0.0,
            scale_factor: 1.0,
            truncate: true,
            grid_size_factor: 2,
        }
    }
}

impl OrographicOptions {
    /// Options with default values.
    pub fn new() -> Self {
        OrographicOptions::default()
    }

    /// Set the wind speed in m s-1.
    pub fn wind_speed(mut self, speed: f64) -> Self {
        self.wind_speed = speed;
        self
    }

    /// Set the wind direction in degrees.
    pub fn wind_direction(mut self, degrees: f64) -> Self {
        self.wind_direction = degrees;
        self
    }

    /// Set the water vapor scale height in m.
    pub fn water_vapor_scale_height(mut self, height: f64) -> Self {
        self.water_vapor_scale_height = height;
        self
    }

    /// Set the moist stability frequency in s-1.
    pub fn moist_stability_frequency(mut self, frequency: f64) -> Self {
        self.moist_stability_frequency = frequency;
        self
    }

    /// Set the conversion time in s.
    pub fn conversion_time(mut self, time: f64) -> Self {
        self.conversion_time = time;
        self
    }

    /// Set the fallout time in s.
    pub fn fallout_time(mut self, time: f64) -> Self {
        self.fallout_time = time;
        self
    }

    /// Set the Coriolis latitude in degrees north.
    pub fn coriolis_latitude(mut self, latitude: f64) -> Self {
        self.coriolis_latitude = latitude;
        self
    }

    /// Set the pre-truncation background precipitation in mm hr-1.
    pub fn background_precip_pre(mut self, precip: f64) -> Self {
        self.background_precip_pre = precip;
        self
    }

    /// Set the post-scaling background precipitation in mm hr-1.
    pub fn background_precip_post(mut self, precip: f64) -> Self {
        self.background_precip_post = precip;
        self
    }

    /// Set the precipitation scale factor.
    pub fn scale_factor(mut self, factor: f64) -> Self {
        self.scale_factor = factor;
        self
    }

    /// Turn truncation of negative precipitation on or off.
    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    /// Set the FFT domain extension factor (at least 1).
    pub fn grid_size_factor(mut self, factor: usize) -> Self {
        self.grid_size_factor = factor.max(1);
        self
    }

    /// Options used to tune the model against regional climate output for the flow-line setup.
    pub fn flowline_tuned() -> Self {
        OrographicOptions::new()
            .wind_speed(10.0)
            .water_vapor_scale_height(2500.0)
            .fallout_time(1000.0)
            .conversion_time(1000.0)
            .truncate(true)
            .background_precip_post(0.04)
            .grid_size_factor(2)
            .scale_factor(0.78)
    }
}

/// Values used to build forcing files for the flow-line setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForcingOptions {
    /// Air temperature, Celsius.
    pub air_temp: f64,
    /// Placeholder precipitation, kg m-2 year-1.
    pub precipitation: f64,
    /// Position separating the western and eastern ocean, m.
    pub ocean_divide: f64,
    /// Ocean potential temperature west of the divide, Celsius.
    pub theta_west: f64,
    /// Ocean potential temperature east of the divide, Celsius.
    pub theta_east: f64,
    /// Ocean salinity west of the divide, g/kg.
    pub salinity_west: f64,
    /// Ocean salinity east of the divide, g/kg.
    pub salinity_east: f64,
    /// Western limit of the allowed ice extent, m.
    pub extent_min: f64,
    /// Eastern limit of the allowed ice extent, m.
    pub extent_max: f64,
    /// Precipitation is kept west of this position and removed east of it, m.
    pub precip_cutoff: f64,
}

impl Default for ForcingOptions {
    fn default() -> Self {
        ForcingOptions {
            air_temp: -15.0,
            precipitation: 0.0,
            ocean_divide: 35e3,
            theta_west: 0.23,
            theta_east: -2.2,
            salinity_west: 34.70,
            salinity_east: 34.84,
            extent_min: 20e3,
            extent_max: 150e3,
            precip_cutoff: 90e3,
        }
    }
}
