use std::sync::Arc;

use quiz_core::model::{Question, Stage};
use services::{QuizConfig, QuizEngine};
use storage::InMemoryPoolLoader;
use ui::vm::{OptionState, QuizScreenVm, ResultAction};
use ui::{map_quiz_screen, render_screen};

fn build_pool(len: usize) -> Vec<Question> {
    (0..len)
        .map(|i| Question::new(format!("Q{i}"), vec!["yes".into(), "no".into()], 0).unwrap())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn screens_follow_engine_through_a_stage() {
    let loader = InMemoryPoolLoader::new().with_pool(Stage::One, build_pool(2));
    let mut engine = QuizEngine::start(Arc::new(loader), QuizConfig::new().with_shuffle_seed(1)).await;

    let QuizScreenVm::Question(screen) = map_quiz_screen(&engine.view()) else {
        panic!("expected question screen");
    };
    assert_eq!(screen.progress_label, "1 / 2");

    engine.select_answer(0);
    let QuizScreenVm::Question(screen) = map_quiz_screen(&engine.view()) else {
        panic!("expected question screen");
    };
    assert_eq!(screen.options[0].state, OptionState::Correct);
    assert!(!screen.options[0].enabled);

    engine.run_pending_advance().await;
    engine.select_answer(0);
    engine.run_pending_advance().await;

    let screen = map_quiz_screen(&engine.view());
    let QuizScreenVm::Result(result) = &screen else {
        panic!("expected result screen");
    };
    assert_eq!(result.score_label, "2 / 2");
    assert_eq!(result.action, ResultAction::NextStage);
    assert!(render_screen(&screen).contains("n: Next stage"));
}

#[tokio::test]
async fn missing_stage_two_renders_notice() {
    let loader = InMemoryPoolLoader::new().with_pool(Stage::One, Vec::new());
    let mut engine = QuizEngine::start(Arc::new(loader), QuizConfig::new()).await;
    engine.advance_stage().await;

    let text = render_screen(&map_quiz_screen(&engine.view()));
    assert!(text.contains("Stage 2"));
    assert!(text.contains("0 / 0"));
    assert!(text.contains("Questions could not be loaded."));
    assert!(text.contains("r: New game"));
}
