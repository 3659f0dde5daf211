use quiz_core::model::Stage;
use services::{FollowUp, LoadStatus, Outcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultAction {
    NextStage,
    Restart,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultScreenVm {
    pub stage_label: String,
    pub score_label: String,
    pub message: String,
    pub notice: Option<String>,
    pub action: ResultAction,
    pub action_label: String,
}

impl ResultScreenVm {
    /// Result screen for a stage whose questions never arrived.
    #[must_use]
    pub fn unavailable(stage: Stage, status: LoadStatus) -> Self {
        map_result_screen(&Outcome::new(0, 0, stage), status)
    }
}

fn notice_for(status: LoadStatus) -> Option<String> {
    match status {
        LoadStatus::Failed => Some("Questions could not be loaded.".into()),
        LoadStatus::Empty => Some("No questions available for this stage.".into()),
        LoadStatus::Pending | LoadStatus::Loaded { .. } => None,
    }
}

#[must_use]
pub fn map_result_screen(outcome: &Outcome, status: LoadStatus) -> ResultScreenVm {
    let (message, action, action_label) = match outcome.follow_up {
        FollowUp::NextStage(_) => (
            "Congratulations, you made it to the next stage!",
            ResultAction::NextStage,
            "Next stage",
        ),
        FollowUp::Restart => (
            "Congratulations, you won!",
            ResultAction::Restart,
            "New game",
        ),
    };

    ResultScreenVm {
        stage_label: format!("Stage {}", outcome.stage),
        score_label: format!("{} / {}", outcome.score, outcome.total),
        message: message.to_string(),
        notice: notice_for(status),
        action,
        action_label: action_label.to_string(),
    }
}
