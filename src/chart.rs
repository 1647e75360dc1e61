//! Geometry of the status donut chart.
//!
//! The ring is one SVG circle per status whose radius gives a circumference
//! of exactly 100, so stroke dash lengths are percentages of the total.

use crate::model::{Stats, Status};

pub const VIEWBOX: f64 = 42.0;
pub const CENTER: f64 = VIEWBOX / 2.0;
/// 100 / (2 * pi)
pub const RADIUS: f64 = 15.915_494_309_189_533;
pub const STROKE_WIDTH: f64 = 6.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DonutSegment {
    pub label: &'static str,
    pub color: &'static str,
    pub value: u32,
    /// Share of the ring, 0..=100.
    pub length: f64,
    /// Where the segment starts along the ring, 0..100.
    pub start: f64,
}

impl DonutSegment {
    pub fn dasharray(&self) -> String {
        format!("{:.3} {:.3}", self.length, 100.0 - self.length)
    }

    /// Negative offset walks the dash forward along the ring.
    pub fn dashoffset(&self) -> String {
        format!("{:.3}", 0.0 - self.start)
    }
}

/// Five segments in fixed order. An empty total yields zero-length segments.
pub fn segments(stats: &Stats) -> Vec<DonutSegment> {
    let total = stats.total();
    let mut start = 0.0;

    Status::ALL
        .iter()
        .map(|status| {
            let value = stats.count(*status);
            let length = if total == 0 {
                0.0
            } else {
                f64::from(value) * 100.0 / total as f64
            };
            let segment = DonutSegment {
                label: status.label(),
                color: status.color(),
                value,
                length,
                start,
            };
            start += length;
            segment
        })
        .collect()
}
