//! [`TemplatePicker`] implementations.

use crate::traits::TemplatePicker;

/// Uniform pick: `floor(random() * len)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPicker;

impl TemplatePicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        let index = (rand::random::<f64>() * len as f64).floor() as usize;
        index.min(len.saturating_sub(1))
    }
}

/// Always returns the same index, clamped to the candidate count.
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl TemplatePicker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}
