mod question;
mod stage;

pub use question::{Question, QuestionError};
pub use stage::Stage;
