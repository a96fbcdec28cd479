//! Toolkit-independent description of the spectrum chart.

use freqscope_messages::Snapshot;

pub const SERIES_LABEL: &str = "Frequency Magnitudes";
pub const X_AXIS_TITLE: &str = "Frequency (Hz)";
pub const Y_AXIS_TITLE: &str = "Magnitude";

/// Teal used for the stroke; the filled area uses the same hue, translucent.
pub const SERIES_COLOR: [u8; 3] = [75, 192, 192];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisOptions {
    pub title: &'static str,
    /// Keep zero inside the visible range.
    pub begin_at_zero: bool,
}

/// Everything a chart backend needs to draw one snapshot.
///
/// Both axes are continuous numeric axes; `x[i]` pairs with `y[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub label: &'static str,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub x_axis: AxisOptions,
    pub y_axis: AxisOptions,
    pub color: [u8; 3],
    /// Fill the area between the line and zero.
    pub filled: bool,
}

impl ChartSpec {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            label: SERIES_LABEL,
            x: snapshot.frequencies().to_vec(),
            y: snapshot.magnitudes().to_vec(),
            x_axis: AxisOptions {
                title: X_AXIS_TITLE,
                begin_at_zero: false,
            },
            y_axis: AxisOptions {
                title: Y_AXIS_TITLE,
                begin_at_zero: true,
            },
            color: SERIES_COLOR,
            filled: true,
        }
    }

    pub fn points(&self) -> Vec<[f64; 2]> {
        self.x.iter().zip(&self.y).map(|(&x, &y)| [x, y]).collect()
    }

    pub fn x_range(&self) -> Option<(f64, f64)> {
        axis_range(&self.x, self.x_axis.begin_at_zero)
    }

    pub fn y_range(&self) -> Option<(f64, f64)> {
        axis_range(&self.y, self.y_axis.begin_at_zero)
    }
}

/// Min and max of the finite values, widened to include zero if asked.
fn axis_range(values: &[f64], begin_at_zero: bool) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    if begin_at_zero {
        Some((lo.min(0.0), hi.max(0.0)))
    } else {
        Some((lo, hi))
    }
}

/// A drawing library that can build and tear down chart instances.
pub trait ChartBackend {
    type Instance;

    fn create(&mut self, spec: ChartSpec) -> Self::Instance;

    /// Release everything the instance holds.
    fn destroy(&mut self, instance: Self::Instance);
}
