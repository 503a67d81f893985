//! Per-parameter boxplots rendered to PNG.
//!
//! Landclass parameters get one box per class label, riverclass parameters
//! one box per basin. Each chart is independent: a failure is recorded in
//! the [`ChartReport`] and the batch moves on.

pub mod color;
pub mod font;

use std::path::{Path, PathBuf};

use log::{error, info};
use plotters::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::data::filter::{grouped_values, parameter_subset, GroupAxis};
use crate::data::model::{Corpus, Family};
use crate::stats::BoxStats;

/// Fewest observations a parameter needs before it is charted.
pub const MIN_POINTS: usize = 2;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("only {found} observation(s), need at least {need}")]
    TooFewPoints { found: usize, need: usize },

    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("pixel buffer does not match {width}x{height}")]
    Buffer { width: u32, height: u32 },

    #[error("cannot write PNG: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    /// Fraction of the whisker span added above and below.
    pub y_padding: f64,
    /// Whether a font is available for captions and axis labels.
    pub draw_text: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            width: 1200,
            height: 800,
            y_padding: 0.05,
            draw_text: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Batch results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ChartArtifact {
    pub family: Family,
    pub parameter: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartFailure {
    pub family: Family,
    pub parameter: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartReport {
    pub written: Vec<ChartArtifact>,
    pub failed: Vec<ChartFailure>,
}

/// `Param_Land_{parameter}.png` / `Param_River_{parameter}.png`.
/// Global parameters are not charted.
pub fn file_name(family: Family, parameter: &str) -> Option<String> {
    let tag = match family {
        Family::Landclass => "Land",
        Family::Riverclass => "River",
        Family::Global => return None,
    };
    Some(format!("Param_{tag}_{parameter}.png"))
}

/// Render every landclass and riverclass parameter into `out_dir`.
pub fn render_all(corpus: &Corpus, out_dir: &Path, opts: &ChartOptions) -> ChartReport {
    let mut report = ChartReport::default();

    for family in [Family::Landclass, Family::Riverclass] {
        let Some(axis) = GroupAxis::for_family(family) else {
            continue;
        };
        for parameter in corpus.parameters(family) {
            let Some(name) = file_name(family, parameter) else {
                continue;
            };
            let path = out_dir.join(name);
            match render_parameter(corpus, family, parameter, axis, &path, opts) {
                Ok(()) => {
                    info!("wrote {}", path.display());
                    report.written.push(ChartArtifact {
                        family,
                        parameter: parameter.to_string(),
                        path,
                    });
                }
                Err(e) => {
                    error!("{family} parameter '{parameter}': {e}");
                    report.failed.push(ChartFailure {
                        family,
                        parameter: parameter.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    report
}

/// Draw one parameter's boxplot and write it to `path`.
pub fn render_parameter(
    corpus: &Corpus,
    family: Family,
    parameter: &str,
    axis: GroupAxis,
    path: &Path,
    opts: &ChartOptions,
) -> Result<(), ChartError> {
    let subset = parameter_subset(corpus, family, parameter);
    let too_few = ChartError::TooFewPoints {
        found: subset.len(),
        need: MIN_POINTS,
    };
    if subset.len() < MIN_POINTS {
        return Err(too_few);
    }

    let all_values: Vec<f64> = subset.iter().map(|r| r.value).collect();
    let overall = BoxStats::new(&all_values).ok_or(too_few)?;
    let y_range = overall.padded_whisker_range(opts.y_padding);

    let groups: Vec<(String, BoxStats)> = grouped_values(&subset, axis)
        .into_iter()
        .filter_map(|(label, values)| BoxStats::new(&values).map(|b| (label, b)))
        .collect();

    let title = format!(
        "{parameter} by {} ({} values)",
        axis.label().to_lowercase(),
        all_values.len()
    );

    let mut buf = vec![0u8; opts.width as usize * opts.height as usize * 3];
    draw_boxplot(&mut buf, &title, axis, &groups, y_range, opts)
        .map_err(|e| ChartError::Draw(e.to_string()))?;

    image::RgbImage::from_raw(opts.width, opts.height, buf)
        .ok_or(ChartError::Buffer {
            width: opts.width,
            height: opts.height,
        })?
        .save(path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

const BOX_HALF_WIDTH: f64 = 0.3;
const CAP_HALF_WIDTH: f64 = 0.15;

/// Intersect `lo..=hi` with the y-window; `None` when they do not overlap.
///
/// The window is computed over the whole parameter, so a group made only of
/// outliers can sit entirely outside it.
fn clip_span(lo: f64, hi: f64, (y_lo, y_hi): (f64, f64)) -> Option<(f64, f64)> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if hi < y_lo || lo > y_hi {
        return None;
    }
    Some((lo.max(y_lo), hi.min(y_hi)))
}

fn draw_boxplot(
    buf: &mut [u8],
    title: &str,
    axis: GroupAxis,
    groups: &[(String, BoxStats)],
    (y_lo, y_hi): (f64, f64),
    opts: &ChartOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::with_buffer(buf, (opts.width, opts.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let n = groups.len();
    let mut builder = ChartBuilder::on(&root);
    builder.margin(24);
    if opts.draw_text {
        builder
            .caption(title, (font::FAMILY, 28))
            .x_label_area_size(48)
            .y_label_area_size(80);
    }
    let mut chart = builder.build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_lo..y_hi)?;

    let labels: Vec<&str> = groups.iter().map(|(label, _)| label.as_str()).collect();
    let x_formatter = |x: &f64| {
        let i = x.round();
        if (x - i).abs() < 1e-6 && i >= 0.0 {
            labels.get(i as usize).map(|s| s.to_string()).unwrap_or_default()
        } else {
            String::new()
        }
    };

    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh();
    if opts.draw_text {
        mesh.x_desc(axis.label())
            .y_desc("Value")
            .x_labels(n + 1)
            .x_label_formatter(&x_formatter)
            .label_style((font::FAMILY, 16));
    } else {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw()?;

    let palette = color::generate_palette(n);
    let window = (y_lo, y_hi);
    for (i, ((_, stats), fill)) in groups.iter().zip(&palette).enumerate() {
        let x = i as f64;
        let in_window = |v: f64| (y_lo..=y_hi).contains(&v);

        if let Some((lo, hi)) = clip_span(stats.q1, stats.q3, window) {
            let corners = [(x - BOX_HALF_WIDTH, lo), (x + BOX_HALF_WIDTH, hi)];
            chart.draw_series(std::iter::once(Rectangle::new(corners, fill.filled())))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                corners,
                BLACK.stroke_width(1),
            )))?;
        }

        let mut whiskers = Vec::new();
        for (from, to) in [(stats.q3, stats.whisker_high), (stats.whisker_low, stats.q1)] {
            if let Some((lo, hi)) = clip_span(from, to, window) {
                whiskers.push(vec![(x, lo), (x, hi)]);
            }
        }
        for cap in [stats.whisker_low, stats.whisker_high] {
            if in_window(cap) {
                whiskers.push(vec![(x - CAP_HALF_WIDTH, cap), (x + CAP_HALF_WIDTH, cap)]);
            }
        }
        if in_window(stats.median) {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![
                    (x - BOX_HALF_WIDTH, stats.median),
                    (x + BOX_HALF_WIDTH, stats.median),
                ],
                BLACK.stroke_width(2),
            )))?;
        }
        chart.draw_series(
            whiskers
                .into_iter()
                .map(|points| PathElement::new(points, BLACK.stroke_width(1))),
        )?;
        chart.draw_series(
            stats
                .outliers
                .iter()
                .filter(|v| in_window(**v))
                .map(|v| Circle::new((x, *v), 3, BLACK.stroke_width(1))),
        )?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ObservationRecord;

    fn rec(parameter: &str, family: Family, class: &str, basin: &str, value: f64) -> ObservationRecord {
        ObservationRecord {
            parameter: parameter.into(),
            class_type: "land".into(),
            source: "s".into(),
            set_number: "1".into(),
            basin: basin.into(),
            class_label: class.into(),
            value,
            family,
        }
    }

    #[test]
    fn chart_file_names() {
        assert_eq!(
            file_name(Family::Landclass, "fm").as_deref(),
            Some("Param_Land_fm.png")
        );
        assert_eq!(
            file_name(Family::Riverclass, "flz").as_deref(),
            Some("Param_River_flz.png")
        );
        assert_eq!(file_name(Family::Global, "a5"), None);
    }

    #[test]
    fn renders_png_and_reports_degenerate_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = Corpus::new(vec![
            rec("ak", Family::Landclass, "forest", "bow", 1.0),
            rec("ak", Family::Landclass, "forest", "bow", 2.0),
            rec("ak", Family::Landclass, "wetland", "bow", 5.0),
            rec("ak", Family::Landclass, "wetland", "bow", 40.0),
            rec("ds", Family::Landclass, "forest", "bow", 1.0),
            rec("flz", Family::Riverclass, "main", "bow", 1e-4),
            rec("flz", Family::Riverclass, "main", "elbow", 3e-4),
            rec("a5", Family::Global, "all", "bow", 1.0),
            rec("a5", Family::Global, "all", "bow", 2.0),
        ]);
        let opts = ChartOptions {
            width: 320,
            height: 240,
            ..ChartOptions::default()
        };

        let report = render_all(&corpus, dir.path(), &opts);

        let written: Vec<_> = report.written.iter().map(|a| a.parameter.as_str()).collect();
        assert_eq!(written, vec!["ak", "flz"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].parameter, "ds");

        let png = image::open(dir.path().join("Param_Land_ak.png")).unwrap();
        assert_eq!((png.width(), png.height()), (320, 240));
        assert!(dir.path().join("Param_River_flz.png").exists());
        assert!(!dir.path().join("Param_Land_ds.png").exists());
    }

    #[test]
    fn spans_are_clipped_to_the_window() {
        assert_eq!(clip_span(2.0, 4.0, (0.0, 10.0)), Some((2.0, 4.0)));
        assert_eq!(clip_span(8.0, 14.0, (0.0, 10.0)), Some((8.0, 10.0)));
        assert_eq!(clip_span(4.0, -3.0, (0.0, 10.0)), Some((0.0, 4.0)));
        assert_eq!(clip_span(12.0, 14.0, (0.0, 10.0)), None);
        assert_eq!(clip_span(-5.0, -1.0, (0.0, 10.0)), None);
    }

    #[test]
    fn group_above_the_window_leaves_no_box() {
        let dir = tempfile::tempdir().unwrap();
        let mut records: Vec<_> = (1..=20)
            .map(|v| rec("ak", Family::Landclass, "forest", "bow", v as f64))
            .collect();
        records.push(rec("ak", Family::Landclass, "wetland", "bow", 1000.0));
        records.push(rec("ak", Family::Landclass, "wetland", "bow", 1001.0));
        let corpus = Corpus::new(records);
        let opts = ChartOptions {
            width: 320,
            height: 240,
            ..ChartOptions::default()
        };
        let path = dir.path().join("ak.png");
        render_parameter(&corpus, Family::Landclass, "ak", GroupAxis::ClassLabel, &path, &opts)
            .unwrap();

        let palette = color::generate_palette(2);
        let png = image::open(&path).unwrap().to_rgb8();
        let has = |c: &RGBColor| png.pixels().any(|p| p.0 == [c.0, c.1, c.2]);
        assert!(has(&palette[0]));
        assert!(!has(&palette[1]));
    }

    #[test]
    fn text_is_drawn_with_the_bundled_font() {
        assert!(font::install(None));
        let dir = tempfile::tempdir().unwrap();
        let corpus = Corpus::new(vec![
            rec("ak", Family::Landclass, "forest", "bow", 1.0),
            rec("ak", Family::Landclass, "forest", "bow", 2.0),
            rec("ak", Family::Landclass, "wetland", "bow", 3.0),
        ]);
        let opts = ChartOptions {
            width: 400,
            height: 300,
            draw_text: true,
            ..ChartOptions::default()
        };
        let path = dir.path().join("ak.png");
        render_parameter(&corpus, Family::Landclass, "ak", GroupAxis::ClassLabel, &path, &opts)
            .unwrap();

        // Left label strip, clear of the axis line and tick marks.
        let png = image::open(&path).unwrap().to_rgb8();
        let dark = (24..90)
            .flat_map(|x| (24..200).map(move |y| (x, y)))
            .filter(|&(x, y)| png.get_pixel(x, y).0.iter().all(|&c| c < 100))
            .count();
        assert!(dark > 0);
    }

    #[test]
    fn too_few_points_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = Corpus::new(vec![rec("r3", Family::Landclass, "forest", "bow", 1.0)]);
        let err = render_parameter(
            &corpus,
            Family::Landclass,
            "r3",
            GroupAxis::ClassLabel,
            &dir.path().join("x.png"),
            &ChartOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::TooFewPoints { found: 1, need: 2 }));
    }
}
