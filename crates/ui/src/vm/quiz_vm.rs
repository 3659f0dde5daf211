use services::{EngineView, LoadStatus};

use super::result_vm::{ResultScreenVm, map_result_screen};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Idle,
    /// Picked, answer not revealed yet.
    Selected,
    Correct,
    Wrong,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    /// 1-based number shown next to the option.
    pub number: usize,
    pub label: String,
    pub state: OptionState,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionScreenVm {
    pub stage_label: String,
    pub progress_label: String,
    pub progress_percent: u8,
    pub score_label: String,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub status_label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizScreenVm {
    Loading,
    Question(QuestionScreenVm),
    Result(ResultScreenVm),
}

/// Highlight state per option.
///
/// Once revealed, the correct option is marked and a wrong pick is flagged;
/// before that only the picked option is.
#[must_use]
pub fn map_option_states(
    option_count: usize,
    correct_index: usize,
    selected_index: Option<usize>,
    answer_revealed: bool,
) -> Vec<OptionState> {
    (0..option_count)
        .map(|index| {
            let selected = selected_index == Some(index);
            if answer_revealed && index == correct_index {
                OptionState::Correct
            } else if answer_revealed && selected {
                OptionState::Wrong
            } else if selected && !answer_revealed {
                OptionState::Selected
            } else {
                OptionState::Idle
            }
        })
        .collect()
}

#[must_use]
pub fn map_quiz_screen(view: &EngineView) -> QuizScreenVm {
    if view.loading {
        return QuizScreenVm::Loading;
    }
    if let Some(outcome) = view.outcome {
        return QuizScreenVm::Result(map_result_screen(&outcome, view.load_status));
    }
    let Some(question) = view.question.as_ref() else {
        // Not loading, not finished, yet no question: treat as a load problem.
        return QuizScreenVm::Result(ResultScreenVm::unavailable(view.stage, LoadStatus::Failed));
    };

    let progress = view.progress();
    let enabled = view.accepts_selection();
    let states = map_option_states(
        question.options.len(),
        question.correct_index,
        view.selected_index,
        view.answer_revealed,
    );
    let options = question
        .options
        .iter()
        .zip(states)
        .enumerate()
        .map(|(index, (label, state))| OptionVm {
            number: index + 1,
            label: label.clone(),
            state,
            enabled,
        })
        .collect();

    QuizScreenVm::Question(QuestionScreenVm {
        stage_label: format!("Stage {}", view.stage),
        progress_label: format!("{} / {}", progress.position, progress.total),
        progress_percent: progress.percent(),
        score_label: format!("Score: {}", view.score),
        prompt: question.prompt.clone(),
        options,
        status_label: view.lost.then(|| "Game over".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Stage;
    use services::CurrentQuestion;

    fn base_view() -> EngineView {
        EngineView {
            loading: false,
            stage: Stage::One,
            load_status: LoadStatus::Loaded { count: 12 },
            round: 2,
            total: 10,
            score: 2,
            selected_index: None,
            answer_revealed: false,
            lost: false,
            finished: false,
            question: Some(CurrentQuestion {
                prompt: "Largest planet?".into(),
                options: vec!["Mars".into(), "Jupiter".into(), "Venus".into()],
                correct_index: 1,
            }),
            outcome: None,
        }
    }

    fn question_screen(view: &EngineView) -> QuestionScreenVm {
        match map_quiz_screen(view) {
            QuizScreenVm::Question(screen) => screen,
            other => panic!("expected question screen, got {other:?}"),
        }
    }

    #[test]
    fn maps_progress_and_labels() {
        let screen = question_screen(&base_view());
        assert_eq!(screen.stage_label, "Stage 1");
        assert_eq!(screen.progress_label, "3 / 10");
        assert_eq!(screen.progress_percent, 30);
        assert_eq!(screen.score_label, "Score: 2");
        assert_eq!(screen.options[1].number, 2);
        assert!(screen.options.iter().all(|o| o.enabled && o.state == OptionState::Idle));
        assert_eq!(screen.status_label, None);
    }

    #[test]
    fn wrong_pick_marks_both_options_and_disables_input() {
        let mut view = base_view();
        view.selected_index = Some(2);
        view.answer_revealed = true;
        view.lost = true;

        let screen = question_screen(&view);
        let states: Vec<_> = screen.options.iter().map(|o| o.state).collect();
        assert_eq!(
            states,
            vec![OptionState::Idle, OptionState::Correct, OptionState::Wrong]
        );
        assert!(screen.options.iter().all(|o| !o.enabled));
        assert_eq!(screen.status_label.as_deref(), Some("Game over"));
    }

    #[test]
    fn pending_pick_is_only_selected() {
        assert_eq!(
            map_option_states(3, 0, Some(2), false),
            vec![OptionState::Idle, OptionState::Idle, OptionState::Selected]
        );
        assert_eq!(
            map_option_states(2, 0, Some(0), true),
            vec![OptionState::Correct, OptionState::Idle]
        );
    }

    #[test]
    fn loading_view_maps_to_loading_screen() {
        let mut view = base_view();
        view.loading = true;
        assert_eq!(map_quiz_screen(&view), QuizScreenVm::Loading);
    }
}
