//! Upload progress as a whole percentage.

/// Percentage of request bytes sent, 0..=100.
///
/// Never decreases during one request; `reset` starts the next one at 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressState {
    percent: u8,
}

impl ProgressState {
    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn reset(&mut self) {
        self.percent = 0;
    }

    /// Apply a progress event. Ignored when `total` is unknown (zero).
    pub fn update(&mut self, sent: u64, total: u64) -> u8 {
        if let Some(p) = Self::percent_of(sent, total) {
            self.percent = self.percent.max(p);
        }
        self.percent
    }

    /// `round(sent * 100 / total)`, halves rounding up, capped at 100.
    pub fn percent_of(sent: u64, total: u64) -> Option<u8> {
        if total == 0 {
            return None;
        }
        let sent = sent.min(total) as u128;
        let total = total as u128;
        let rounded = (sent * 200 + total) / (total * 2);
        Some(rounded.min(100) as u8)
    }
}
