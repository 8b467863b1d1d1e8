//! Chart rendering.
//!
//! Charts are rendered to standalone SVG documents as plain strings, so
//! rendering never touches the filesystem. The pipeline hands the result
//! to an [`crate::output::ArtifactSink`].

mod svg;

use crate::models::{TypeCount, YearlyCounts};
use svg::{escape, Frame};

const TREND_WIDTH: f64 = 800.0;
const TREND_HEIGHT: f64 = 480.0;
const BAR_WIDTH: f64 = 1200.0;
const BAR_HEIGHT: f64 = 600.0;

/// Line chart of incidents per year.
pub fn year_trend_svg(counts: &YearlyCounts) -> String {
    let frame = Frame::new(TREND_WIDTH, TREND_HEIGHT, 70.0);
    let mut doc = frame.open("Incidents per year (start_date)");

    let (Some(first), Some(last)) = (counts.first_year(), counts.last_year()) else {
        doc.push_str(&frame.close());
        return doc;
    };

    let y_max = nice_max(counts.iter().map(|(_, c)| c).max().unwrap_or(0));
    let span = (last - first).max(1) as f64;
    let x_of = |year: i32| {
        if first == last {
            frame.left + frame.plot_width() / 2.0
        } else {
            frame.left + (year - first) as f64 / span * frame.plot_width()
        }
    };
    let y_of = |count: u64| frame.bottom() - count as f64 / y_max as f64 * frame.plot_height();

    doc.push_str(&frame.axes("Year", "Number of incidents"));

    // Y ticks
    for i in 0..=5u64 {
        let value = y_max * i / 5;
        let y = y_of(value);
        doc.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"#dddddd\"/>\n",
            frame.left,
            y,
            frame.right(),
            y
        ));
        doc.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\">{}</text>\n",
            frame.left - 6.0,
            y + 4.0,
            value
        ));
    }

    // X ticks, thinned out for long series
    let step = ((counts.len() + 11) / 12).max(1);
    for (year, _) in counts.iter().step_by(step) {
        doc.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\">{}</text>\n",
            x_of(year),
            frame.bottom() + 16.0,
            year
        ));
    }

    let points: Vec<String> = counts
        .iter()
        .map(|(year, count)| format!("{:.1},{:.1}", x_of(year), y_of(count)))
        .collect();
    doc.push_str(&format!(
        "<polyline fill=\"none\" stroke=\"#1f77b4\" stroke-width=\"2\" points=\"{}\"/>\n",
        points.join(" ")
    ));
    for (year, count) in counts.iter() {
        doc.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"#1f77b4\"><title>{}: {}</title></circle>\n",
            x_of(year),
            y_of(count),
            year,
            count
        ));
    }

    doc.push_str(&frame.close());
    doc
}

/// Horizontal bar chart of the most frequent incident types.
///
/// `types` is expected most frequent first; that bar is drawn on top.
/// The title names the requested `top_n`, which may exceed the number of
/// distinct types in the dataset.
pub fn top_types_svg(types: &[TypeCount], top_n: usize) -> String {
    let longest = types
        .iter()
        .map(|t| t.incident_type.chars().count())
        .max()
        .unwrap_or(0);
    let left = (longest as f64 * 6.5 + 20.0).clamp(80.0, 480.0);

    let frame = Frame::new(BAR_WIDTH, BAR_HEIGHT, left);
    let mut doc = frame.open(&format!("Top {} incident types", top_n));

    if types.is_empty() {
        doc.push_str(&frame.close());
        return doc;
    }

    doc.push_str(&frame.axes("Count", "Incident type"));

    let x_max = nice_max(types.iter().map(|t| t.count as u64).max().unwrap_or(0));
    let slot = frame.plot_height() / types.len() as f64;
    let bar = slot * 0.7;

    for i in 0..=5u64 {
        let value = x_max * i / 5;
        let x = frame.left + value as f64 / x_max as f64 * frame.plot_width();
        doc.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\">{}</text>\n",
            x,
            frame.bottom() + 16.0,
            value
        ));
    }

    for (i, t) in types.iter().enumerate() {
        let y = frame.top + i as f64 * slot + (slot - bar) / 2.0;
        let w = t.count as f64 / x_max as f64 * frame.plot_width();
        doc.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"#1f77b4\"><title>{}</title></rect>\n",
            frame.left,
            y,
            w,
            bar,
            t.count
        ));
        doc.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\">{}</text>\n",
            frame.left - 6.0,
            y + bar / 2.0 + 4.0,
            escape(&t.incident_type)
        ));
    }

    doc.push_str(&frame.close());
    doc
}

/// Round an axis maximum up to 1, 2 or 5 times a power of ten.
fn nice_max(max: u64) -> u64 {
    if max == 0 {
        return 1;
    }
    let mut magnitude = 1u64;
    while magnitude * 10 <= max {
        magnitude *= 10;
    }
    [1, 2, 5, 10]
        .iter()
        .map(|m| m * magnitude)
        .find(|v| *v >= max)
        .unwrap_or(max)
}
