use async_trait::async_trait;
use quiz_core::model::{Question, QuestionError, Stage};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by pool loaders.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("resource not found: {resource}")]
    NotFound { resource: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("malformed question pool: {0}")]
    Malformed(String),

    #[error("loader unavailable: {0}")]
    Unavailable(String),
}

/// Wire shape of a question as stored in the JSON resources.
///
/// Read-only: loaders deserialize it and validate through `into_question`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl QuestionRecord {
    /// Convert the record into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the record violates a question invariant.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(self.prompt, self.options, self.correct_index)
    }
}

/// Resource names addressed by stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResources {
    stage_one: String,
    stage_two: String,
}

impl Default for StageResources {
    fn default() -> Self {
        Self {
            stage_one: "questions.json".into(),
            stage_two: "questions-round-2.json".into(),
        }
    }
}

impl StageResources {
    #[must_use]
    pub fn new(stage_one: impl Into<String>, stage_two: impl Into<String>) -> Self {
        Self {
            stage_one: stage_one.into(),
            stage_two: stage_two.into(),
        }
    }

    #[must_use]
    pub fn resource_for(&self, stage: Stage) -> &str {
        match stage {
            Stage::One => &self.stage_one,
            Stage::Two => &self.stage_two,
        }
    }
}

/// Source of question pools, one per stage.
#[async_trait]
pub trait PoolLoader: Send + Sync {
    /// Load the question pool for a stage.
    ///
    /// An empty pool is a valid result.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the resource is missing, unreadable, or not a
    /// JSON array.
    async fn load_pool(&self, stage: Stage) -> Result<Vec<Question>, StorageError>;
}

#[derive(Debug, Clone)]
enum Preset {
    Pool(Vec<Question>),
    Failure(String),
}

/// Simple in-memory loader for testing and prototyping.
///
/// Stages without a preset behave like a missing resource.
#[derive(Clone, Default)]
pub struct InMemoryPoolLoader {
    presets: Arc<Mutex<HashMap<Stage, Preset>>>,
    calls: Arc<Mutex<Vec<Stage>>>,
}

impl InMemoryPoolLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pool(self, stage: Stage, pool: Vec<Question>) -> Self {
        self.set(stage, Preset::Pool(pool));
        self
    }

    #[must_use]
    pub fn with_failure(self, stage: Stage, reason: impl Into<String>) -> Self {
        self.set(stage, Preset::Failure(reason.into()));
        self
    }

    /// Stages requested so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<Stage> {
        self.calls
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn set(&self, stage: Stage, preset: Preset) {
        if let Ok(mut guard) = self.presets.lock() {
            guard.insert(stage, preset);
        }
    }
}

#[async_trait]
impl PoolLoader for InMemoryPoolLoader {
    async fn load_pool(&self, stage: Stage) -> Result<Vec<Question>, StorageError> {
        self.calls
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
            .push(stage);

        let guard = self
            .presets
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        match guard.get(&stage) {
            Some(Preset::Pool(pool)) => Ok(pool.clone()),
            Some(Preset::Failure(reason)) => Err(StorageError::Unavailable(reason.clone())),
            None => Err(StorageError::NotFound {
                resource: format!("stage {stage}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_question(id: usize) -> Question {
        Question::new(format!("Q{id}"), vec!["a".into(), "b".into()], id % 2).unwrap()
    }

    #[test]
    fn record_converts_into_question() {
        let record = QuestionRecord {
            prompt: "Q3".into(),
            options: vec!["a".into(), "b".into()],
            correct_index: 1,
        };
        assert_eq!(record.into_question().unwrap(), build_question(3));
    }

    #[test]
    fn record_rejects_invalid_question() {
        let record = QuestionRecord {
            prompt: "Q".into(),
            options: vec!["a".into()],
            correct_index: 4,
        };
        assert!(matches!(
            record.into_question(),
            Err(QuestionError::CorrectIndexOutOfRange { .. })
        ));
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let json = r#"{"prompt":"Q","options":["a","b"],"correctIndex":1}"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.correct_index, 1);
    }

    #[test]
    fn resources_are_addressed_by_stage() {
        let resources = StageResources::default();
        assert_eq!(resources.resource_for(Stage::One), "questions.json");
        assert_eq!(resources.resource_for(Stage::Two), "questions-round-2.json");
    }

    #[tokio::test]
    async fn in_memory_loader_serves_presets_and_counts_calls() {
        let loader = InMemoryPoolLoader::new()
            .with_pool(Stage::One, vec![build_question(1), build_question(2)])
            .with_failure(Stage::Two, "offline");

        assert_eq!(loader.load_pool(Stage::One).await.unwrap().len(), 2);
        let err = loader.load_pool(Stage::Two).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert_eq!(loader.calls(), vec![Stage::One, Stage::Two]);
    }

    #[tokio::test]
    async fn in_memory_loader_reports_missing_stage() {
        let loader = InMemoryPoolLoader::new();
        let err = loader.load_pool(Stage::Two).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }
}
