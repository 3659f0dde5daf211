use std::fmt;
use std::sync::Arc;

use quiz_core::model::Question;
use rand::Rng;

use super::order::{PlayOrder, build_order};
use super::progress::SessionProgress;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Mutable part of a session. Rebuilt from scratch on restart or stage change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    pub round: usize,
    pub selected_index: Option<usize>,
    pub answer_revealed: bool,
    pub score: u32,
    pub lost: bool,
}

/// Transition produced by selecting an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Nothing changed: answer already revealed, session lost or finished.
    Ignored,
    /// Score incremented; the caller should schedule an auto-advance.
    Correct,
    /// Session lost; only a restart continues play.
    Wrong,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One play-through of a stage's pool.
///
/// Picks up to `target_rounds` questions in random order and steps through
/// them. All transitions are local to this value.
#[derive(Clone)]
pub struct QuizSession {
    pool: Arc<[Question]>,
    order: PlayOrder,
    state: SessionState,
}

impl QuizSession {
    /// Start a fresh session over `pool` with a newly shuffled play order.
    pub fn new<R: Rng + ?Sized>(pool: Arc<[Question]>, target_rounds: usize, rng: &mut R) -> Self {
        let order = build_order(pool.len(), target_rounds, rng);
        Self {
            pool,
            order,
            state: SessionState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn order(&self) -> &PlayOrder {
        &self.order
    }

    #[must_use]
    pub fn pool(&self) -> &[Question] {
        &self.pool
    }

    /// Number of rounds in this session.
    #[must_use]
    pub fn total(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.round >= self.total()
    }

    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.state.lost
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::new(self.state.round, self.total())
    }

    /// The question for the current round, `None` once finished.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.order
            .get(self.state.round)
            .and_then(|index| self.pool.get(index))
    }

    /// Answer the current question with option `index`.
    ///
    /// A second selection while the answer is revealed is ignored, as is any
    /// selection after the session was lost or finished.
    pub fn select_answer(&mut self, index: usize) -> Selection {
        if self.state.answer_revealed || self.state.lost {
            return Selection::Ignored;
        }
        let Some(question) = self.current_question() else {
            return Selection::Ignored;
        };
        let correct = question.is_correct(index);

        self.state.selected_index = Some(index);
        self.state.answer_revealed = true;
        if correct {
            self.state.score = self.state.score.saturating_add(1);
            Selection::Correct
        } else {
            self.state.lost = true;
            Selection::Wrong
        }
    }

    /// Move to the next round.
    ///
    /// Past the last round `round` becomes `total`, which marks the session
    /// finished. Returns false if the session was already finished.
    pub fn advance(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        let next = self.state.round + 1;
        self.state.round = next;
        if next < self.total() {
            self.state.selected_index = None;
            self.state.answer_revealed = false;
        }
        true
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("pool_len", &self.pool.len())
            .field("order", &self.order)
            .field("state", &self.state)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
