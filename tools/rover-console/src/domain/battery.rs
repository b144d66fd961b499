//! Battery gauge.
//!
//! The gauge is drawn as a depleting bar: the shaded overlay covers
//! `100 - level` percent of the track.

/// Colour band for the battery label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryBand {
    /// Above 70%
    Green,
    /// Above 30%, up to 70%
    Amber,
    /// 30% or less
    Red,
}

/// A battery reading clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryGauge {
    percent: f64,
}

impl BatteryGauge {
    pub fn new(raw: f64) -> Self {
        let percent = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 100.0) };
        Self { percent }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Width of the depletion overlay, in percent of the track.
    pub fn fill_width_percent(&self) -> f64 {
        100.0 - self.percent
    }

    pub fn band(&self) -> BatteryBand {
        if self.percent > 70.0 {
            BatteryBand::Green
        } else if self.percent > 30.0 {
            BatteryBand::Amber
        } else {
            BatteryBand::Red
        }
    }

    /// Whole-percent label, e.g. "45%".
    pub fn label(&self) -> String {
        format!("{}%", self.percent.round() as i64)
    }

    /// Text bar of `width` cells: charge on the left, depletion on the right.
    pub fn bar(&self, width: usize) -> String {
        let depleted = ((self.fill_width_percent() / 100.0) * width as f64).round() as usize;
        let depleted = depleted.min(width);
        format!("{}{}", "█".repeat(width - depleted), "░".repeat(depleted))
    }
}
