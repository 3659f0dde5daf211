#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::{DEFAULT_REQUEST_TIMEOUT, HttpPoolLoader, JsonDirLoader, decode_pool};
pub use repository::{
    InMemoryPoolLoader, PoolLoader, QuestionRecord, StageResources, StorageError,
};
