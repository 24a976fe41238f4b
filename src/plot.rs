use crate::errors::FlowError;
use crate::geometry::Geometry;
use crate::utils;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use serde::Deserialize;
use std::path::Path;

const LIGHT_BLUE: RGBColor = RGBColor(135, 206, 250);
const GREY: RGBColor = RGBColor(128, 128, 128);

/// Precipitation estimates from other models, read from a csv file with columns
/// position (km), RACMO and SB04 (m year-1).
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    /// Position, km.
    pub x: Vec<f64>,
    /// Regional climate model precipitation, m year-1.
    pub racmo: Vec<f64>,
    /// Smith & Barstad (2004) model precipitation, m year-1.
    pub sb04: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ComparisonRow(f64, f64, f64);

impl Comparison {
    /// Read a comparison table, shifting positions by `offset_km`.
    pub fn read<P: AsRef<Path>>(path: P, offset_km: f64) -> Result<Comparison, FlowError> {
        let rows: Vec<ComparisonRow> = utils::read_records(path)?;
        let mut c = Comparison::default();
        for ComparisonRow(x, racmo, sb04) in rows {
            c.x.push(x + offset_km);
            c.racmo.push(racmo);
            c.sb04.push(sb04);
        }
        Ok(c)
    }
}

/// Smallest and largest value over several series, padded by 5% of the range.
fn bounds(series: &[&[f64]]) -> (f64, f64) {
    let lo = series.iter().map(|s| utils::min(s)).fold(f64::INFINITY, f64::min);
    let hi = series.iter().map(|s| utils::max(s)).fold(f64::NEG_INFINITY, f64::max);
    let pad = if hi > lo { 0.05 * (hi - lo) } else { 1.0 };
    (lo - pad, hi + pad)
}

fn km(x: &[f64]) -> Vec<f64> {
    x.iter().map(|xi| xi * 1e-3).collect()
}

/// Plot observed and synthetic geometries along the center row.
pub fn geometry<P: AsRef<Path>>(real: &Geometry, synth: &Geometry, path: P) -> Result<(), Box<dyn std::error::Error>> {
    let x = km(real.grid().x());
    let top = real.ice_surface_elevation.center_row();
    let bottom: Vec<f64> = top
        .iter()
        .zip(real.ice_thickness.center_row().iter())
        .map(|(s, h)| s - h)
        .collect();
    let bed = real.bed_elevation.center_row();
    let synth_bed = synth.bed_elevation.center_row();
    let synth_top = synth.ice_surface_elevation.center_row();

    let (ymin, ymax) = bounds(&[top, &bottom[..], bed, synth_bed, synth_top]);
    let (xmin, xmax) = (x[0], x[x.len() - 1]);

    let root = BitMapBackend::new(path.as_ref(), (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Geometry", ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(xmin..xmax, ymin..ymax)?;

    chart
        .configure_mesh()
        .x_labels(10)
        .y_labels(6)
        .y_label_formatter(&|y| format!("{:.0}", y))
        .x_desc("distance, km")
        .y_desc("elevation, m")
        .draw()?;

    let lines: [(&str, &[f64], ShapeStyle); 5] = [
        ("bottom surface", &bottom[..], LIGHT_BLUE.stroke_width(2)),
        ("top surface", top, BLUE.stroke_width(2)),
        ("bed", bed, BLACK.stroke_width(2)),
        ("synthetic bed", synth_bed, GREY.stroke_width(1)),
        ("synthetic surface", synth_top, CYAN.stroke_width(1)),
    ];
    for (label, values, style) in lines.iter() {
        let style = *style;
        chart
            .draw_series(LineSeries::new(
                x.iter().cloned().zip(values.iter().cloned()),
                style,
            ))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.filled())
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Plot modeled precipitation (m year-1) along the flow line against optional model
/// comparisons, with the ice surface scaled so that a quarter of its maximum maps to one.
pub fn precipitation<P: AsRef<Path>>(
    x: &[f64],
    modeled: &[f64],
    surface: &[f64],
    comparison: Option<&Comparison>,
    path: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let x = km(x);
    let peak = utils::max(surface);
    let scaled: Vec<f64> = surface.iter().map(|s| s / (0.25 * peak)).collect();

    let mut series: Vec<&[f64]> = vec![modeled, &scaled];
    let mut xs: Vec<&[f64]> = vec![&x];
    if let Some(c) = comparison {
        series.push(&c.racmo);
        series.push(&c.sb04);
        xs.push(&c.x);
    }
    let (ymin, ymax) = bounds(&series);
    let (xmin, xmax) = bounds(&xs);

    let root = BitMapBackend::new(path.as_ref(), (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Precipitation in m/year", ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(xmin..xmax, ymin..ymax)?;

    chart
        .configure_mesh()
        .y_label_formatter(&|y| format!("{:.2}", y))
        .x_desc("distance, km")
        .y_desc("m / year")
        .draw()?;

    chart
        .draw_series(LineSeries::new(x.iter().cloned().zip(modeled.iter().cloned()), &BLUE))?
        .label("LTOP")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
    if let Some(c) = comparison {
        chart
            .draw_series(LineSeries::new(c.x.iter().cloned().zip(c.racmo.iter().cloned()), &RED))?
            .label("RACMO")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
        chart
            .draw_series(LineSeries::new(c.x.iter().cloned().zip(c.sb04.iter().cloned()), &GREEN))?
            .label("SB04")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &GREEN));
    }
    chart
        .draw_series(LineSeries::new(x.iter().cloned().zip(scaled.iter().cloned()), &GREY))?
        .label("scaled surface elevation")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &GREY));

    chart
        .configure_series_labels()
        .background_style(WHITE.filled())
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn comparison_is_shifted() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "x,RACMO,SB04\n0.0,1.5,2.0\n10.0,1.0,1.25").unwrap();
        let c = Comparison::read(file.path(), 35.0).unwrap();
        assert_eq!(c.x, vec![35.0, 45.0]);
        assert_eq!(c.racmo, vec![1.5, 1.0]);
        assert_eq!(c.sb04, vec![2.0, 1.25]);
    }

    #[test]
    fn bounds_pad_range() {
        let (lo, hi) = bounds(&[&[0.0, 10.0][..], &[-10.0, 5.0][..]]);
        assert_eq!(lo, -11.0);
        assert_eq!(hi, 11.0);
        let (lo, hi) = bounds(&[&[3.0, 3.0][..]]);
        assert_eq!((lo, hi), (2.0, 4.0));
    }

    /// Rendering draws text, so machines without system fonts only get a font error.
    fn check_rendered(result: Result<(), Box<dyn std::error::Error>>, path: &Path) {
        match result {
            Ok(()) => assert!(std::fs::metadata(path).unwrap().len() > 0),
            Err(e) => assert!(e.to_string().to_lowercase().contains("font"), "{}", e),
        }
    }

    #[test]
    fn charts_are_rendered() {
        use crate::grid::Grid;
        use crate::profile::Bump;
        use crate::setup::synthetic_geometry;
        use std::sync::Arc;

        let grid = Arc::new(Grid::flowline(-25e3, 175e3, 5e3).unwrap());
        let synth = synthetic_geometry(&grid, &Bump::synthetic_bed(), &Bump::synthetic_surface()).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("geometry.png");
        check_rendered(geometry(&synth, &synth, &path), &path);

        let modeled: Vec<f64> = grid.x().iter().map(|x| 1.0 + (x * 1e-5).sin()).collect();
        let comparison = Comparison {
            x: vec![0.0, 50.0, 100.0],
            racmo: vec![1.0, 2.0, 0.5],
            sb04: vec![1.5, 2.5, 0.25],
        };
        let path = dir.path().join("precipitation.png");
        let result = precipitation(
            grid.x(),
            &modeled,
            synth.ice_surface_elevation.center_row(),
            Some(&comparison),
            &path,
        );
        check_rendered(result, &path);
    }
}
