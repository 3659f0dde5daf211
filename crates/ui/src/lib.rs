pub mod text;
pub mod vm;

pub use text::render_screen;
pub use vm::{QuizIntent, QuizScreenVm, map_quiz_screen};
