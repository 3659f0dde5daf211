use quiz_core::model::{Question, Stage};

use super::progress::SessionProgress;

/// How the last pool load went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No load has completed yet.
    Pending,
    Loaded { count: usize },
    /// The resource was read but held no questions.
    Empty,
    /// The loader failed; the stage runs with an empty pool.
    Failed,
}

/// What the player can do once a session is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    NextStage(Stage),
    Restart,
}

/// Terminal result of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub score: u32,
    pub total: usize,
    pub stage: Stage,
    pub follow_up: FollowUp,
}

impl Outcome {
    #[must_use]
    pub fn new(score: u32, total: usize, stage: Stage) -> Self {
        let follow_up = stage.next().map_or(FollowUp::Restart, FollowUp::NextStage);
        Self {
            score,
            total,
            stage,
            follow_up,
        }
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        usize::try_from(self.score).is_ok_and(|score| score == self.total)
    }
}

/// Question shown for the current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl CurrentQuestion {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            prompt: question.prompt().to_owned(),
            options: question.options().to_vec(),
            correct_index: question.correct_index(),
        }
    }
}

/// Snapshot of engine state for a presentation layer.
///
/// Presentation-agnostic: no pre-formatted strings, no localization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineView {
    pub loading: bool,
    pub stage: Stage,
    pub load_status: LoadStatus,
    pub round: usize,
    pub total: usize,
    pub score: u32,
    pub selected_index: Option<usize>,
    pub answer_revealed: bool,
    pub lost: bool,
    pub finished: bool,
    pub question: Option<CurrentQuestion>,
    pub outcome: Option<Outcome>,
}

impl EngineView {
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::new(self.round, self.total)
    }

    /// Whether option buttons should accept input.
    #[must_use]
    pub fn accepts_selection(&self) -> bool {
        !self.loading && !self.finished && !self.lost && !self.answer_revealed
    }
}
