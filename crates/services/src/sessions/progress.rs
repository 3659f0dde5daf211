/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based position of the current round, capped at `total`.
    pub position: usize,
    pub total: usize,
    pub remaining: usize,
    pub is_finished: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn new(round: usize, total: usize) -> Self {
        Self {
            position: (round + 1).min(total),
            total,
            remaining: total.saturating_sub(round),
            is_finished: round >= total,
        }
    }

    /// Completed share of the session in percent, 0 for an empty session.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = self.position * 100 / self.total;
        u8::try_from(pct.min(100)).unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_tracks_position_and_remaining() {
        let p = SessionProgress::new(0, 10);
        assert_eq!((p.position, p.remaining, p.is_finished), (1, 10, false));
        assert_eq!(p.percent(), 10);

        let p = SessionProgress::new(10, 10);
        assert_eq!((p.position, p.remaining, p.is_finished), (10, 0, true));
        assert_eq!(p.percent(), 100);
    }

    #[test]
    fn empty_session_is_finished_at_zero() {
        let p = SessionProgress::new(0, 0);
        assert_eq!(p.position, 0);
        assert!(p.is_finished);
        assert_eq!(p.percent(), 0);
    }
}
