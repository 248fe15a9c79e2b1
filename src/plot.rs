//! Error-curve rendering.
//!
//! Renders the training (and optional test) error history as a standalone
//! SVG line chart — a dependency-free stand-in for the image plots of the
//! original tooling. External collaborator: consumes only the public
//! training-session data.

use crate::error::Result;
use crate::training::TrainingSession;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;

/// Chart dimensions in pixels.
#[derive(Debug, Clone, Copy)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 500,
            height: 300,
        }
    }
}

const MARGIN: f64 = 30.0;

/// Render one or two error curves as an SVG document.
///
/// The training curve is drawn in blue; the test curve, when present, in
/// red. Returns the SVG markup as a string.
pub fn render_error_curves(train: &[f64], test: Option<&[f64]>, options: PlotOptions) -> String {
    let width = options.width as f64;
    let height = options.height as f64;

    let mut all: Vec<f64> = train.to_vec();
    if let Some(test) = test {
        all.extend_from_slice(test);
    }
    let min = all.iter().cloned().fold(f64::INFINITY, f64::min).min(0.0);
    let max = all.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        options.width, options.height, options.width, options.height
    );
    let _ = writeln!(
        svg,
        r#"  <rect width="{}" height="{}" fill="white" stroke="none"/>"#,
        options.width, options.height
    );
    // Axes
    let _ = writeln!(
        svg,
        r#"  <line x1="{m}" y1="{m}" x2="{m}" y2="{b}" stroke="black"/>"#,
        m = MARGIN,
        b = height - MARGIN
    );
    let _ = writeln!(
        svg,
        r#"  <line x1="{m}" y1="{b}" x2="{r}" y2="{b}" stroke="black"/>"#,
        m = MARGIN,
        b = height - MARGIN,
        r = width - MARGIN
    );

    let mut draw = |values: &[f64], color: &str| {
        if values.is_empty() {
            return;
        }
        let step = (width - 2.0 * MARGIN) / values.len().max(2).saturating_sub(1) as f64;
        let points: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let x = MARGIN + i as f64 * step;
                let y = height - MARGIN - (v - min) / span * (height - 2.0 * MARGIN);
                format!("{x:.1},{y:.1}")
            })
            .collect();
        let _ = writeln!(
            svg,
            r#"  <polyline fill="none" stroke="{color}" stroke-width="1.5" points="{}"/>"#,
            points.join(" ")
        );
    };

    draw(train, "blue");
    if let Some(test) = test {
        draw(test, "red");
    }

    let _ = writeln!(
        svg,
        r#"  <text x="{m}" y="20" font-size="12" fill="blue">dataset</text>"#,
        m = MARGIN
    );
    if test.is_some() {
        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="20" font-size="12" fill="red">testset</text>"#,
            MARGIN + 70.0
        );
    }
    svg.push_str("</svg>\n");

    svg
}

/// Render a training session's curves (test curve included when tracked).
pub fn render_session(session: &TrainingSession, options: PlotOptions) -> String {
    let test = (!session.test_errors.is_empty()).then_some(session.test_errors.as_slice());
    render_error_curves(&session.errors, test, options)
}

/// Write rendered curves to an SVG file.
pub fn save_error_curves<P: AsRef<Path>>(
    session: &TrainingSession,
    path: P,
    options: PlotOptions,
) -> Result<()> {
    let svg = render_session(session, options);
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(svg.as_bytes())?;
    writer.flush()?;
    Ok(())
}
