//! Animated profiles of model output along the flow line.
//!
//! Frames come from a [History](trait.History.html): a sequence of time records holding
//! center-row profiles of named variables.  PISM's spatial output files provide one with
//! the `netcdf` feature; [MemoryHistory](struct.MemoryHistory.html) holds profiles built
//! in memory.
use crate::config::SECONDS_PER_YEAR;
use crate::errors::FlowError;
use crate::utils;
use log::info;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use std::collections::HashMap;
use std::path::Path;

/// Time series of center-row profiles.
pub trait History {
    /// Positions along the flow line, m.
    fn x(&self) -> &[f64];
    /// Model times of each record, s.
    fn times(&self) -> &[f64];
    /// Profile of `variable` at record `index`.
    fn profile(&self, variable: &str, index: usize) -> Result<Vec<f64>, FlowError>;
}

/// Profiles kept in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    x: Vec<f64>,
    times: Vec<f64>,
    frames: Vec<HashMap<String, Vec<f64>>>,
}

impl MemoryHistory {
    /// Empty history over positions `x`.
    pub fn new(x: Vec<f64>) -> Self {
        MemoryHistory {
            x,
            times: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Append a record at time `t` holding the named profiles.
    pub fn push(&mut self, t: f64, frame: HashMap<String, Vec<f64>>) -> Result<(), FlowError> {
        for (name, values) in frame.iter() {
            if values.len() != self.x.len() {
                return Err(FlowError::ShapeMismatch(format!(
                    "{} has {} values, expected {}",
                    name,
                    values.len(),
                    self.x.len()
                )));
            }
        }
        if let Some(last) = self.times.last() {
            if t <= *last {
                return Err(FlowError::Unsorted(format!("time {} after {}", t, last)));
            }
        }
        self.times.push(t);
        self.frames.push(frame);
        Ok(())
    }
}

impl History for MemoryHistory {
    fn x(&self) -> &[f64] {
        &self.x
    }

    fn times(&self) -> &[f64] {
        &self.times
    }

    fn profile(&self, variable: &str, index: usize) -> Result<Vec<f64>, FlowError> {
        let frame = self.frames.get(index).ok_or_else(|| {
            FlowError::DataFormat(format!("no record {} of {}", index, self.frames.len()))
        })?;
        frame
            .get(variable)
            .cloned()
            .ok_or_else(|| FlowError::DataFormat(format!("no variable {} in record {}", variable, index)))
    }
}

/// History read from a PISM spatial output file with variables shaped `(time, y, x)`.
#[cfg(feature = "netcdf")]
pub struct NetcdfHistory {
    file: netcdf::File,
    x: Vec<f64>,
    times: Vec<f64>,
    row: usize,
}

#[cfg(feature = "netcdf")]
impl NetcdfHistory {
    /// Open `path` and read its coordinates.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FlowError> {
        let file = netcdf::open(path.as_ref())?;
        let x = Self::coordinate(&file, "x")?;
        let times = Self::coordinate(&file, "time")?;
        let ny = file
            .dimension("y")
            .map(|d| d.len())
            .ok_or_else(|| FlowError::DataFormat("missing dimension y".to_string()))?;
        info!(
            "{}: {} records on {} points",
            path.as_ref().display(),
            times.len(),
            x.len()
        );
        Ok(NetcdfHistory {
            file,
            x,
            times,
            row: ny / 2,
        })
    }

    fn coordinate(file: &netcdf::File, name: &str) -> Result<Vec<f64>, FlowError> {
        let var = file
            .variable(name)
            .ok_or_else(|| FlowError::DataFormat(format!("missing variable {}", name)))?;
        Ok(var.get_values::<f64, _>(..)?)
    }
}

#[cfg(feature = "netcdf")]
impl History for NetcdfHistory {
    fn x(&self) -> &[f64] {
        &self.x
    }

    fn times(&self) -> &[f64] {
        &self.times
    }

    fn profile(&self, variable: &str, index: usize) -> Result<Vec<f64>, FlowError> {
        let var = self
            .file
            .variable(variable)
            .ok_or_else(|| FlowError::DataFormat(format!("missing variable {}", variable)))?;
        Ok(var.get_values::<f64, _>((index, self.row, ..))?)
    }
}

/// Settings of an animation.
#[derive(Debug, Clone)]
pub struct AnimationOptions {
    /// Frames per second.
    pub fps: u32,
    /// Lower limit of the vertical axis, m.
    pub ymin: f64,
    /// Upper limit of the vertical axis, m.
    pub ymax: f64,
    /// Image size in pixels.
    pub size: (u32, u32),
    /// Variables drawn in each frame.
    pub variables: Vec<String>,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        AnimationOptions {
            fps: 15,
            ymin: -600.0,
            ymax: 2100.0,
            size: (640, 480),
            variables: vec!["usurf".to_string(), "topg".to_string()],
        }
    }
}

/// Caption of the frame at model time `t` (s), in years.
pub fn frame_title(t: f64) -> String {
    format!("Time: {}", t / SECONDS_PER_YEAR)
}

const PALETTE: [RGBColor; 4] = [BLUE, BLACK, RED, GREEN];

/// Render one frame per time record of `history` into a gif at `path`.
pub fn animate<H: History, P: AsRef<Path>>(
    history: &H,
    options: &AnimationOptions,
    path: P,
) -> Result<(), Box<dyn std::error::Error>> {
    if options.fps == 0 {
        return Err(Box::new(FlowError::InvalidOptions("fps must be positive".to_string())));
    }
    let x: Vec<f64> = history.x().iter().map(|xi| xi * 1e-3).collect();
    if x.is_empty() {
        return Err(Box::new(FlowError::DataFormat("empty flow line".to_string())));
    }
    let (xmin, xmax) = (utils::min(&x), utils::max(&x));

    let root = BitMapBackend::gif(path.as_ref(), options.size, 1000 / options.fps)?.into_drawing_area();
    for (index, t) in history.times().iter().enumerate() {
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(frame_title(*t), ("sans-serif", 20).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(xmin..xmax, options.ymin..options.ymax)?;
        chart.configure_mesh().x_desc("distance, km").y_desc("m").draw()?;

        for (k, variable) in options.variables.iter().enumerate() {
            let values = history.profile(variable, index)?;
            let color = PALETTE[k % PALETTE.len()];
            chart
                .draw_series(LineSeries::new(
                    x.iter().cloned().zip(values.into_iter()),
                    color.stroke_width(2),
                ))?
                .label(variable.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }
        chart
            .configure_series_labels()
            .background_style(WHITE.filled())
            .border_style(&BLACK)
            .draw()?;
        root.present()?;
    }
    info!("wrote {} frames to {}", history.times().len(), path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(usurf: f64) -> HashMap<String, Vec<f64>> {
        let mut f = HashMap::new();
        f.insert("usurf".to_string(), vec![usurf; 3]);
        f.insert("topg".to_string(), vec![-100.0, 0.0, 100.0]);
        f
    }

    #[test]
    fn memory_history_records() {
        let mut h = MemoryHistory::new(vec![0.0, 500.0, 1000.0]);
        h.push(0.0, frame(10.0)).unwrap();
        h.push(SECONDS_PER_YEAR, frame(20.0)).unwrap();
        assert_eq!(h.times(), &[0.0, SECONDS_PER_YEAR]);
        assert_eq!(h.profile("usurf", 1).unwrap(), vec![20.0; 3]);
        assert!(h.profile("thk", 0).is_err());
        assert!(h.profile("usurf", 2).is_err());
    }

    #[test]
    fn memory_history_checks_input() {
        let mut h = MemoryHistory::new(vec![0.0, 500.0]);
        assert!(h.push(0.0, frame(1.0)).is_err());
        let mut h = MemoryHistory::new(vec![0.0, 500.0, 1000.0]);
        h.push(5.0, frame(1.0)).unwrap();
        assert!(h.push(5.0, frame(1.0)).is_err());
    }

    #[test]
    fn titles_in_years() {
        assert_eq!(frame_title(0.0), "Time: 0");
        assert_eq!(frame_title(2.5 * SECONDS_PER_YEAR), "Time: 2.5");
    }

    #[test]
    fn renders_gif() {
        let mut h = MemoryHistory::new(vec![0.0, 500.0, 1000.0]);
        h.push(0.0, frame(10.0)).unwrap();
        h.push(SECONDS_PER_YEAR, frame(20.0)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flowline.gif");
        let options = AnimationOptions {
            size: (160, 120),
            ..AnimationOptions::default()
        };
        // frames carry text, which needs system fonts
        match animate(&h, &options, &path) {
            Ok(()) => assert!(std::fs::metadata(&path).unwrap().len() > 0),
            Err(e) => assert!(e.to_string().to_lowercase().contains("font"), "{}", e),
        }

        let stopped = AnimationOptions {
            fps: 0,
            ..AnimationOptions::default()
        };
        assert!(animate(&h, &stopped, dir.path().join("none.gif")).is_err());
    }
}
