//! Plain-text rendering of quiz screens for terminal hosts.

use std::fmt::Write;

use crate::vm::{OptionState, QuestionScreenVm, QuizScreenVm, ResultAction, ResultScreenVm};

const TITLE: &str = "Quiz";
const BAR_WIDTH: usize = 20;

#[must_use]
pub fn render_screen(screen: &QuizScreenVm) -> String {
    match screen {
        QuizScreenVm::Loading => format!("{TITLE}\n\nLoading...\n"),
        QuizScreenVm::Question(question) => render_question(question),
        QuizScreenVm::Result(result) => render_result(result),
    }
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn marker(state: OptionState) -> &'static str {
    match state {
        OptionState::Idle => "  ",
        OptionState::Selected => "> ",
        OptionState::Correct => "+ ",
        OptionState::Wrong => "x ",
    }
}

fn render_question(screen: &QuestionScreenVm) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE} - {}", screen.stage_label);
    let _ = writeln!(
        out,
        "{} {}   {}",
        progress_bar(screen.progress_percent),
        screen.progress_label,
        screen.score_label
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", screen.prompt);
    let _ = writeln!(out);
    for option in &screen.options {
        let _ = writeln!(out, "{}{}. {}", marker(option.state), option.number, option.label);
    }
    let _ = writeln!(out);

    let enabled = screen.options.iter().any(|option| option.enabled);
    if let Some(status) = &screen.status_label {
        let _ = writeln!(out, "{status}");
    }
    if enabled {
        let _ = writeln!(out, "Pick an option (1-{}), r: new game, q: quit", screen.options.len());
    } else {
        let _ = writeln!(out, "r: new game, q: quit");
    }
    out
}

fn render_result(screen: &ResultScreenVm) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE} - {}", screen.stage_label);
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", screen.score_label);
    let _ = writeln!(out);
    if let Some(notice) = &screen.notice {
        let _ = writeln!(out, "{notice}");
    }
    let _ = writeln!(out, "{}", screen.message);
    let key = match screen.action {
        ResultAction::NextStage => "n",
        ResultAction::Restart => "r",
    };
    let _ = writeln!(out, "{key}: {}, q: quit", screen.action_label);
    out
}
