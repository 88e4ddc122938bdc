/// The single tweakable scalar exposed in the debug panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressControl {
    min: f32,
    max: f32,
    step: f32,
    value: f32,
}

impl Default for ProgressControl {
    fn default() -> Self {
        Self::new(0.0, 1.0, 0.1, 0.0)
    }
}

impl ProgressControl {
    pub fn new(min: f32, max: f32, step: f32, initial: f32) -> Self {
        let mut control = Self {
            min,
            max,
            step,
            value: min,
        };
        control.set(initial);
        control
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Snaps `raw` to the step grid anchored at `min`, then clamps.
    /// Non-finite input leaves the value untouched.
    pub fn set(&mut self, raw: f32) -> f32 {
        if !raw.is_finite() {
            return self.value;
        }
        let snapped = if self.step > 0.0 {
            ((raw - self.min) / self.step).round() * self.step + self.min
        } else {
            raw
        };
        self.value = snapped.clamp(self.min, self.max);
        self.value
    }
}
