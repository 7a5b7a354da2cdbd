use anyhow::Result;
use plotly::common::Title;
use plotly::layout::{Axis, BarMode};
use plotly::{Bar, Layout, Plot};
use std::fs;

use crate::metrics::groups::GroupStats;

fn rate_trace(
    groups: &[GroupStats],
    name: &str,
    rate: impl Fn(&GroupStats) -> Option<f64>,
) -> Option<Box<Bar<String, f64>>> {
    let (xs, ys): (Vec<String>, Vec<f64>) = groups
        .iter()
        .filter_map(|g| rate(g).map(|v| (g.group.clone(), v)))
        .unzip();
    if ys.is_empty() {
        return None;
    }
    Some(Bar::new(xs, ys).name(name))
}

/// Grouped bar chart of the per-group rates, written as inline HTML. Groups
/// with an undefined rate are simply absent from that trace.
pub fn write_rate_bars(groups: &[GroupStats], path: &str) -> Result<()> {
    let mut plot = Plot::new();
    let traces = [
        rate_trace(groups, "positive rate", |g| Some(g.positive_rate)),
        rate_trace(groups, "TPR", |g| g.true_positive_rate),
        rate_trace(groups, "FPR", |g| g.false_positive_rate),
    ];
    for trace in traces.into_iter().flatten() {
        plot.add_trace(trace);
    }

    let layout = Layout::new()
        .title(Title::new("Per-group prediction rates"))
        .bar_mode(BarMode::Group)
        .y_axis(Axis::new().title(Title::new("rate")).range(vec![0.0, 1.0]));
    plot.set_layout(layout);

    fs::write(path, plot.to_inline_html(None))?;
    Ok(())
}
