mod engine;
mod order;
mod progress;
mod service;
mod timer;
mod view;

// Public API of the session subsystem.
pub use engine::{QuizEngine, StageChange};
pub use order::{PlayOrder, build_order};
pub use progress::SessionProgress;
pub use service::{QuizSession, SessionState, Selection};
pub use timer::{AdvanceTimer, TimerHandle};
pub use view::{CurrentQuestion, EngineView, FollowUp, LoadStatus, Outcome};
