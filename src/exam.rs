//! Fixed-length scored exam overlay.

/// A bounded, scored sub-session layered over the normal question flow.
/// One `remaining` unit is consumed per answered question; when it reaches
/// zero the exam deactivates and the final score stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExamState {
    pub active: bool,
    pub remaining: usize,
    pub correct: usize,
    pub length: usize,
}

impl ExamState {
    /// Start an exam of up to `length` questions, clamped to the pool size.
    pub fn start(length: usize, pool_size: usize) -> Self {
        let length = length.min(pool_size);
        Self {
            active: true,
            remaining: length,
            correct: 0,
            length,
        }
    }

    pub fn record_correct(&mut self) {
        if self.active {
            self.correct += 1;
        }
    }

    /// Consume one question slot. Returns true when this consumption ends
    /// the exam.
    pub fn consume(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
            true
        } else {
            false
        }
    }

    /// Final (or running) score as correct out of length.
    pub fn score(&self) -> (usize, usize) {
        (self.correct, self.length)
    }
}
