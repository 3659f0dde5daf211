#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod sessions;

pub use sessions as session;

pub use config::QuizConfig;
pub use error::ConfigError;

pub use sessions::{
    AdvanceTimer, CurrentQuestion, EngineView, FollowUp, LoadStatus, Outcome, PlayOrder,
    QuizEngine, QuizSession, Selection, SessionProgress, SessionState, StageChange, TimerHandle,
};
