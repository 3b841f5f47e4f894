//! Slider and toggle state backing the settings panel

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("not a number: {0:?}")]
    NotANumber(String),
}

/// A range slider: clamped to `[min, max]` and snapped to `step`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeControl {
    min: f64,
    max: f64,
    step: f64,
    value: f64,
}

impl RangeControl {
    /// Unit-interval slider used for confidence thresholds
    pub fn unit(step: f64, value: f64) -> Self {
        Self::new(0.0, 1.0, step, value)
    }

    pub fn new(min: f64, max: f64, step: f64, value: f64) -> Self {
        let mut control = Self {
            min,
            max,
            step,
            value: min,
        };
        control.set(value);
        control
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set from a number, returning the value actually taken
    pub fn set(&mut self, value: f64) -> f64 {
        let clamped = if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        };

        self.value = if self.step > 0.0 {
            let steps = ((clamped - self.min) / self.step).round();
            // Round away float noise so 0.1 + 0.2 style values label cleanly
            let snapped = self.min + steps * self.step;
            ((snapped * 1e9).round() / 1e9).clamp(self.min, self.max)
        } else {
            clamped
        };

        self.value
    }

    /// Set from operator text; unparsable text leaves the value unchanged
    pub fn set_raw(&mut self, raw: &str) -> Result<f64, ControlError> {
        let parsed: f64 = raw
            .trim()
            .parse()
            .map_err(|_| ControlError::NotANumber(raw.to_string()))?;
        if !parsed.is_finite() {
            return Err(ControlError::NotANumber(raw.to_string()));
        }
        Ok(self.set(parsed))
    }

    /// Text for the live value label
    pub fn label(&self) -> String {
        format!("{:.2}", self.value)
    }
}
