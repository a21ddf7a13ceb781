use crate::stats::RunStatistics;
use anyhow::{ensure, Context, Result};
use itertools::{Itertools, MinMaxResult};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process::Command;

// encode the template SVG file at compile time as a string literal
const TEMPLATE_SVG: &str = include_str!("histogram_template.svg");

/// Number of bins in every histogram, regardless of the data.
pub const BINS: usize = 50;

const PANEL_W: f64 = 500.0;
const PANEL_H: f64 = 400.0;
const MARGIN_LEFT: f64 = 75.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 60.0;
const TICK_LEN: f64 = 5.0;
const X_TICKS: usize = 6;

/// Counts of values falling into equal-width bins spanning `[lo, hi]`. The last bin is closed on
/// both sides, so the maximum value is always counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub lo: f64,
    pub hi: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins `values` over their own range. If every value is the same, the range is widened to
    /// one unit centred on that value; an empty histogram spans `[0, 1]`.
    pub fn new(values: &[f64], bins: usize) -> Self {
        let (lo, hi) = match values.iter().copied().minmax() {
            MinMaxResult::NoElements => (0.0, 1.0),
            MinMaxResult::OneElement(v) => (v - 0.5, v + 0.5),
            MinMaxResult::MinMax(lo, hi) if lo == hi => (lo - 0.5, hi + 0.5),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };

        let mut counts = vec![0; bins];
        let width = (hi - lo) / (bins as f64);
        for v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self { lo, hi, counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

#[derive(Serialize)]
struct Figure {
    width: f64,
    height: f64,
    panels: Vec<Panel>,
}

#[derive(Serialize)]
struct Panel {
    x: f64,
    y: f64,
    plot_w: f64,
    plot_h: f64,
    title: String,
    title_x: f64,
    xlabel: String,
    xlabel_y: f64,
    ylabel: String,
    ylabel_y: f64,
    bars: Vec<Bar>,
    xticks: Vec<Tick>,
    yticks: Vec<Tick>,
}

#[derive(Serialize)]
struct Bar {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

/// `pos` runs along the axis; `start`, `end` and `text` are offsets across it.
#[derive(Serialize)]
struct Tick {
    pos: f64,
    start: f64,
    end: f64,
    text: f64,
    label: String,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Rounds a raw y-axis step up to 1, 2 or 5 times a power of ten.
fn nice_step(max_count: usize) -> usize {
    let raw = (max_count as f64) / 5.0;
    if raw <= 1.0 {
        return 1;
    }
    let mag = 10f64.powf(raw.log10().floor());
    let nice = match raw / mag {
        n if n <= 1.0 => 1.0,
        n if n <= 2.0 => 2.0,
        n if n <= 5.0 => 5.0,
        _ => 10.0,
    };
    (nice * mag).round() as usize
}

fn format_tick(v: f64, span: f64) -> String {
    if span >= 20.0 {
        format!("{v:.0}")
    } else if span >= 2.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.2}")
    }
}

fn panel(hist: &Histogram, col: usize, row: usize, title: &str, xlabel: &str) -> Panel {
    let plot_w = PANEL_W - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = PANEL_H - MARGIN_TOP - MARGIN_BOTTOM;

    let step = nice_step(hist.max_count());
    let y_max = (hist.max_count().div_ceil(step) * step).max(step);
    let y_scale = plot_h / (y_max as f64);

    let bar_w = plot_w / (hist.counts.len() as f64);
    let bars = hist
        .counts
        .iter()
        .enumerate()
        .filter(|(_, c)| **c > 0)
        .map(|(i, c)| {
            let h = (*c as f64) * y_scale;
            Bar {
                x: round2(i as f64 * bar_w),
                y: round2(plot_h - h),
                w: round2(bar_w),
                h: round2(h),
            }
        })
        .collect();

    let span = hist.hi - hist.lo;
    let xticks = (0..X_TICKS)
        .map(|i| {
            let frac = (i as f64) / ((X_TICKS - 1) as f64);
            Tick {
                pos: round2(frac * plot_w),
                start: plot_h,
                end: plot_h + TICK_LEN,
                text: plot_h + TICK_LEN + 13.0,
                label: format_tick(hist.lo + frac * span, span),
            }
        })
        .collect();

    let yticks = (0..=y_max)
        .step_by(step)
        .map(|c| Tick {
            pos: round2(plot_h - (c as f64) * y_scale),
            start: -TICK_LEN,
            end: 0.0,
            text: -TICK_LEN - 3.0,
            label: c.to_string(),
        })
        .collect();

    Panel {
        x: (col as f64) * PANEL_W + MARGIN_LEFT,
        y: (row as f64) * PANEL_H + MARGIN_TOP,
        plot_w,
        plot_h,
        title: title.to_string(),
        title_x: plot_w / 2.0,
        xlabel: xlabel.to_string(),
        xlabel_y: plot_h + 45.0,
        ylabel: "Frequency".to_string(),
        ylabel_y: plot_h / 2.0,
        bars,
        xticks,
        yticks,
    }
}

fn as_f64(v: &[usize]) -> Vec<f64> {
    v.iter().map(|x| *x as f64).collect()
}

/// Renders the 2x2 grid of length and quality histograms, before and after filtering, as SVG.
pub fn render_histograms(stats: &RunStatistics, writer: impl Write) -> Result<()> {
    let all_len = Histogram::new(&as_f64(&stats.all_lengths), BINS);
    let all_qual = Histogram::new(&stats.all_quals, BINS);
    let kept_len = Histogram::new(&as_f64(&stats.retained_lengths), BINS);
    let kept_qual = Histogram::new(&stats.retained_quals, BINS);

    let figure = Figure {
        width: 2.0 * PANEL_W,
        height: 2.0 * PANEL_H,
        panels: vec![
            panel(&all_len, 0, 0, "All Read Lengths Histogram", "Read Length (bp)"),
            panel(&all_qual, 1, 0, "All Quality Scores Histogram", "Quality Score"),
            panel(&kept_len, 0, 1, "Retained Read Lengths Histogram", "Read Length (bp)"),
            panel(&kept_qual, 1, 1, "Retained Quality Scores Histogram", "Quality Score"),
        ],
    };

    let data = serde_json::to_value(&figure).context("Could not serialize histograms")?;

    let reg = handlebars::Handlebars::new();
    reg.render_template_to_write(TEMPLATE_SVG, &data, writer)?;

    Ok(())
}

/// Writes the histograms to an SVG file at `path`.
pub fn save_histograms(stats: &RunStatistics, path: &str) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Unable to create file {path}"))?;
    let mut writer = BufWriter::new(file);

    render_histograms(stats, &mut writer)
        .with_context(|| format!("Could not render histograms to {path}"))?;
    writer.flush()?;

    info!("Saved histograms to {path}");
    Ok(())
}

/// Opens `path` in the platform's default viewer.
pub fn show(path: &str) -> Result<()> {
    let (program, args): (&str, &[&str]) = if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    };

    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .with_context(|| format!("Could not launch {program}"))?;
    ensure!(status.success(), "{program} exited with {status}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_span_data_range() {
        let values: Vec<f64> = (0..=100).map(|v| v as f64).collect();
        let hist = Histogram::new(&values, BINS);

        assert_eq!(hist.counts.len(), BINS);
        assert_eq!(hist.lo, 0.0);
        assert_eq!(hist.hi, 100.0);
        assert_eq!(hist.total(), 101);
        // 0 and 1 in the first bin, 98, 99 and 100 in the closed last bin
        assert_eq!(hist.counts[0], 2);
        assert_eq!(hist.counts[BINS - 1], 3);
    }

    #[test]
    fn single_value() {
        let hist = Histogram::new(&[7.0, 7.0, 7.0], BINS);
        assert_eq!(hist.lo, 6.5);
        assert_eq!(hist.hi, 7.5);
        assert_eq!(hist.total(), 3);
        assert_eq!(hist.max_count(), 3);
        assert_eq!(hist.counts.iter().filter(|c| **c > 0).count(), 1);
    }

    #[test]
    fn empty() {
        let hist = Histogram::new(&[], BINS);
        assert_eq!(hist.counts, vec![0; BINS]);
        assert_eq!(hist.max_count(), 0);
    }

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(0), 1);
        assert_eq!(nice_step(4), 1);
        assert_eq!(nice_step(9), 2);
        assert_eq!(nice_step(23), 5);
        assert_eq!(nice_step(48), 10);
        assert_eq!(nice_step(1234), 500);
    }

    #[test]
    fn renders_four_panels() {
        let mut stats = RunStatistics::new();
        stats.all_lengths = vec![10, 20, 30];
        stats.all_quals = vec![5.0, 15.5, 30.25];
        stats.retained_lengths = vec![20, 30];
        stats.retained_quals = vec![15.5, 30.25];

        let mut out = Vec::new();
        render_histograms(&stats, &mut out).unwrap();
        let svg = String::from_utf8(out).unwrap();

        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<g transform").count(), 4);
        assert!(svg.contains("All Read Lengths Histogram"));
        assert!(svg.contains("Retained Quality Scores Histogram"));
        // three bars before filtering, two after, for both lengths and qualities
        assert_eq!(svg.matches("fill=\"#1f77b4\"").count(), 10);
    }

    #[test]
    fn renders_empty_statistics() {
        let mut out = Vec::new();
        render_histograms(&RunStatistics::new(), &mut out).unwrap();
        let svg = String::from_utf8(out).unwrap();
        assert!(!svg.contains("fill=\"#1f77b4\""));
        assert_eq!(svg.matches("Frequency").count(), 4);
    }
}
