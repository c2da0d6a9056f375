/// Aggregated view of session progress, useful for the shell's counter line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub skipped: usize,
    /// 0-based index of the question on screen.
    pub current: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// `"Question 3 / 40"`-style 1-based position.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.current + 1, self.total)
    }
}
