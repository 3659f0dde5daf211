mod intent;
mod quiz_vm;
mod result_vm;

pub use intent::QuizIntent;
pub use quiz_vm::{
    OptionState, OptionVm, QuestionScreenVm, QuizScreenVm, map_option_states, map_quiz_screen,
};
pub use result_vm::{ResultAction, ResultScreenVm, map_result_screen};
