//! Donut chart of the five status counts.
//!
//! The SVG is built once; only the stroke dash attributes and legend numbers
//! follow the stats signal.

use leptos::prelude::*;

use crate::chart::{self, CENTER, RADIUS, STROKE_WIDTH, VIEWBOX};
use crate::model::Stats;

#[component]
pub fn StatusChart(stats: RwSignal<Stats>) -> impl IntoView {
    let segments = Memo::new(move |_| chart::segments(&stats.get()));
    // Colors and labels are fixed; read them once
    let layout = chart::segments(&stats.get_untracked());
    let view_box = format!("0 0 {} {}", VIEWBOX, VIEWBOX);

    let rings = layout
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let color = segment.color;
            view! {
                <circle
                    cx=CENTER.to_string()
                    cy=CENTER.to_string()
                    r=RADIUS.to_string()
                    fill="transparent"
                    stroke=color
                    stroke-width=STROKE_WIDTH.to_string()
                    stroke-dasharray=move || segments.with(|s| s[i].dasharray())
                    stroke-dashoffset=move || segments.with(|s| s[i].dashoffset())
                />
            }
        })
        .collect::<Vec<_>>();

    let legend = layout
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let color = format!("background-color: {}", segment.color);
            view! {
                <li class="legend-item">
                    <span class="legend-swatch" style=color></span>
                    <span class="legend-label">{segment.label}</span>
                    <span class="legend-value">{move || segments.with(|s| s[i].value)}</span>
                </li>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <div class="chart-container">
            <svg id="grafico-status" class="status-chart" viewBox=view_box>
                <circle
                    cx=CENTER.to_string()
                    cy=CENTER.to_string()
                    r=RADIUS.to_string()
                    fill="transparent"
                    stroke="#ecf0f1"
                    stroke-width=STROKE_WIDTH.to_string()
                />
                <g transform=format!("rotate(-90 {} {})", CENTER, CENTER)>{rings}</g>
            </svg>
            <ul class="chart-legend">{legend}</ul>
        </div>
    }
}
