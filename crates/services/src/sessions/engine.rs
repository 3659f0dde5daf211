use std::fmt;
use std::sync::Arc;

use quiz_core::model::{Question, Stage};
use rand::SeedableRng;
use rand::rngs::StdRng;
use storage::PoolLoader;

use super::service::{QuizSession, Selection};
use super::timer::{AdvanceTimer, TimerHandle};
use super::view::{CurrentQuestion, EngineView, LoadStatus, Outcome};
use crate::config::QuizConfig;

/// Result of asking the engine to move past a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageChange {
    /// A new stage was loaded and a fresh session started.
    Advanced(Stage),
    /// No further stage exists; the session restarted on the same pool.
    Restarted,
    /// The session is still in progress or no pool is loaded.
    Ignored,
}

/// Drives quiz sessions across stages.
///
/// Owns the loaded pool, the current session and the auto-advance timer.
/// Every operation runs to completion on the caller's task; the only await
/// point is the pool load during a stage change.
pub struct QuizEngine {
    loader: Arc<dyn PoolLoader>,
    config: QuizConfig,
    rng: StdRng,
    stage: Stage,
    pool: Arc<[Question]>,
    load_status: LoadStatus,
    session: Option<QuizSession>,
    timer: AdvanceTimer,
}

impl QuizEngine {
    /// Create an engine with nothing loaded yet.
    #[must_use]
    pub fn new(loader: Arc<dyn PoolLoader>, config: QuizConfig) -> Self {
        let rng = match config.shuffle_seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            loader,
            config,
            rng,
            stage: Stage::One,
            pool: Arc::from(Vec::new()),
            load_status: LoadStatus::Pending,
            session: None,
            timer: AdvanceTimer::new(),
        }
    }

    /// Create an engine and load the first stage.
    pub async fn start(loader: Arc<dyn PoolLoader>, config: QuizConfig) -> Self {
        let mut engine = Self::new(loader, config);
        engine.load_stage(Stage::One).await;
        engine
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    /// True while no session exists (before or during a pool load).
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.session.is_none()
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Replace the pool with `stage`'s and start a fresh session on it.
    ///
    /// Load failures fall back to an empty pool.
    pub async fn load_stage(&mut self, stage: Stage) {
        self.timer.cancel();
        self.session = None;
        self.stage = stage;

        let (pool, status) = match self.loader.load_pool(stage).await {
            Ok(pool) if pool.is_empty() => {
                tracing::warn!(%stage, "question pool is empty");
                (pool, LoadStatus::Empty)
            }
            Ok(pool) => {
                let count = pool.len();
                (pool, LoadStatus::Loaded { count })
            }
            Err(err) => {
                tracing::warn!(%stage, error = %err, "failed to load question pool, continuing with an empty pool");
                (Vec::new(), LoadStatus::Failed)
            }
        };

        self.pool = Arc::from(pool);
        self.load_status = status;
        self.start_session();
    }

    fn start_session(&mut self) {
        let session = QuizSession::new(
            Arc::clone(&self.pool),
            self.config.target_rounds(),
            &mut self.rng,
        );
        tracing::info!(
            stage = %self.stage,
            pool = self.pool.len(),
            total = session.total(),
            "session started"
        );
        self.session = Some(session);
    }

    /// Answer the current question.
    ///
    /// A correct answer schedules the auto-advance, replacing any pending one.
    pub fn select_answer(&mut self, index: usize) -> Selection {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(index, "selection ignored while loading");
            return Selection::Ignored;
        };

        let selection = session.select_answer(index);
        let state = session.state();
        match selection {
            Selection::Correct => {
                let handle = self.timer.schedule(self.config.advance_delay());
                tracing::debug!(
                    round = state.round,
                    score = state.score,
                    timer = handle.id(),
                    "correct answer"
                );
            }
            Selection::Wrong => {
                tracing::info!(round = state.round, score = state.score, "wrong answer, session lost");
            }
            Selection::Ignored => {
                tracing::debug!(index, round = state.round, "selection ignored");
            }
        }
        selection
    }

    /// Move to the next round, canceling any pending auto-advance first.
    pub fn advance(&mut self) -> bool {
        self.timer.cancel();
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let moved = session.advance();
        if moved && session.is_finished() {
            tracing::info!(
                stage = %self.stage,
                score = session.state().score,
                total = session.total(),
                "session finished"
            );
        }
        moved
    }

    /// The auto-advance waiting to fire, if any.
    #[must_use]
    pub fn pending_advance(&self) -> Option<TimerHandle> {
        self.timer.pending()
    }

    /// Fire an elapsed auto-advance.
    ///
    /// Stale handles (canceled, replaced, or not yet due) are ignored.
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        if !self.timer.claim(handle) {
            tracing::debug!(timer = handle.id(), "stale auto-advance ignored");
            return false;
        }
        self.advance()
    }

    /// Wait for the pending auto-advance and fire it.
    ///
    /// Returns false immediately when nothing is pending.
    pub async fn run_pending_advance(&mut self) -> bool {
        let Some(handle) = self.pending_advance() else {
            return false;
        };
        handle.elapsed().await;
        self.fire(handle)
    }

    /// Start over on the currently loaded pool with a fresh play order.
    ///
    /// The stage is unchanged and the loader is not called.
    pub fn restart(&mut self) -> bool {
        self.timer.cancel();
        if self.session.is_none() {
            tracing::debug!("restart ignored while loading");
            return false;
        }
        self.start_session();
        true
    }

    /// Continue after a finished session: load the next stage, or restart
    /// when the current stage is the last one.
    pub async fn advance_stage(&mut self) -> StageChange {
        let finished = self.session.as_ref().is_some_and(QuizSession::is_finished);
        if !finished {
            tracing::debug!(stage = %self.stage, "stage advance ignored, session not finished");
            return StageChange::Ignored;
        }

        self.timer.cancel();
        match self.stage.next() {
            Some(next) => {
                tracing::info!(from = %self.stage, to = %next, "advancing stage");
                self.load_stage(next).await;
                StageChange::Advanced(next)
            }
            None => {
                self.restart();
                StageChange::Restarted
            }
        }
    }

    /// Terminal result, once the current session is finished.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        let session = self.session.as_ref().filter(|s| s.is_finished())?;
        Some(Outcome::new(session.state().score, session.total(), self.stage))
    }

    #[must_use]
    pub fn view(&self) -> EngineView {
        let Some(session) = self.session.as_ref() else {
            return EngineView {
                loading: true,
                stage: self.stage,
                load_status: self.load_status,
                round: 0,
                total: 0,
                score: 0,
                selected_index: None,
                answer_revealed: false,
                lost: false,
                finished: false,
                question: None,
                outcome: None,
            };
        };

        let state = session.state();
        EngineView {
            loading: false,
            stage: self.stage,
            load_status: self.load_status,
            round: state.round,
            total: session.total(),
            score: state.score,
            selected_index: state.selected_index,
            answer_revealed: state.answer_revealed,
            lost: state.lost,
            finished: session.is_finished(),
            question: session.current_question().map(CurrentQuestion::from_question),
            outcome: self.outcome(),
        }
    }

    /// Cancel any pending auto-advance. Call before discarding the engine.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.timer.cancel() {
            tracing::debug!(timer = handle.id(), "pending auto-advance canceled on dispose");
        }
    }
}

impl fmt::Debug for QuizEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizEngine")
            .field("config", &self.config)
            .field("stage", &self.stage)
            .field("pool_len", &self.pool.len())
            .field("load_status", &self.load_status)
            .field("session", &self.session)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use storage::InMemoryPoolLoader;

    fn build_pool(len: usize) -> Vec<Question> {
        (0..len)
            .map(|i| {
                Question::new(format!("Q{i}"), vec!["a".into(), "b".into()], i % 2).unwrap()
            })
            .collect()
    }

    fn config() -> QuizConfig {
        QuizConfig::new().with_shuffle_seed(9)
    }

    fn correct(engine: &QuizEngine) -> usize {
        engine.view().question.unwrap().correct_index
    }

    async fn build_engine(len: usize) -> (QuizEngine, InMemoryPoolLoader) {
        let loader = InMemoryPoolLoader::new().with_pool(Stage::One, build_pool(len));
        let engine = QuizEngine::start(Arc::new(loader.clone()), config()).await;
        (engine, loader)
    }

    #[tokio::test]
    async fn new_engine_is_loading_and_ignores_input() {
        let loader = InMemoryPoolLoader::new();
        let mut engine = QuizEngine::new(Arc::new(loader.clone()), config());

        assert!(engine.is_loading());
        assert!(engine.view().loading);
        assert_eq!(engine.load_status(), LoadStatus::Pending);
        assert_eq!(engine.select_answer(0), Selection::Ignored);
        assert!(!engine.restart());
        assert!(loader.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn correct_answer_schedules_single_advance() {
        let (mut engine, _) = build_engine(3).await;
        let index = correct(&engine);

        assert_eq!(engine.select_answer(index), Selection::Correct);
        let handle = engine.pending_advance().unwrap();
        assert_eq!(engine.select_answer(index), Selection::Ignored);
        assert_eq!(engine.pending_advance(), Some(handle));
        assert_eq!(engine.view().score, 1);

        assert!(engine.run_pending_advance().await);
        let view = engine.view();
        assert_eq!(view.round, 1);
        assert!(!view.answer_revealed);
        assert_eq!(view.selected_index, None);
        assert!(engine.pending_advance().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn advance_fires_after_configured_delay() {
        let (mut engine, _) = build_engine(3).await;
        let start = tokio::time::Instant::now();
        engine.select_answer(correct(&engine));

        let handle = engine.pending_advance().unwrap();
        assert_eq!(handle.deadline() - start, Duration::from_millis(650));
        assert!(!engine.fire(handle), "must not fire early");

        tokio::time::advance(Duration::from_millis(650)).await;
        assert!(engine.fire(handle));
        assert_eq!(engine.view().round, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_cancels_pending_advance() {
        let (mut engine, loader) = build_engine(5).await;
        engine.select_answer(correct(&engine));
        let handle = engine.pending_advance().unwrap();

        assert!(engine.restart());
        handle.elapsed().await;
        assert!(!engine.fire(handle));

        let view = engine.view();
        assert_eq!((view.round, view.score), (0, 0));
        assert!(!view.answer_revealed);
        assert_eq!(loader.calls(), vec![Stage::One]);
    }

    #[tokio::test]
    async fn wrong_answer_blocks_until_restart() {
        let (mut engine, _) = build_engine(4).await;
        let wrong = 1 - correct(&engine);

        assert_eq!(engine.select_answer(wrong), Selection::Wrong);
        assert!(engine.pending_advance().is_none());
        assert_eq!(engine.select_answer(correct(&engine)), Selection::Ignored);

        let view = engine.view();
        assert!(view.lost);
        assert!(!view.finished);
        assert!(!view.accepts_selection());

        assert!(engine.restart());
        let view = engine.view();
        assert!(!view.lost);
        assert!(view.accepts_selection());
    }

    #[tokio::test]
    async fn stage_advance_ignored_mid_session() {
        let (mut engine, loader) = build_engine(4).await;
        assert_eq!(engine.advance_stage().await, StageChange::Ignored);
        assert_eq!(engine.stage(), Stage::One);
        assert_eq!(loader.calls(), vec![Stage::One]);
    }

    #[tokio::test]
    async fn final_stage_restarts_on_same_pool() {
        let loader = InMemoryPoolLoader::new()
            .with_pool(Stage::One, Vec::new())
            .with_pool(Stage::Two, build_pool(2));
        let mut engine = QuizEngine::start(Arc::new(loader.clone()), config()).await;

        assert_eq!(engine.advance_stage().await, StageChange::Advanced(Stage::Two));
        while let Some(question) = engine.view().question {
            engine.select_answer(question.correct_index);
            engine.advance();
        }
        assert_eq!(engine.outcome().unwrap().score, 2);

        assert_eq!(engine.advance_stage().await, StageChange::Restarted);
        assert_eq!(engine.stage(), Stage::Two);
        assert_eq!(engine.view().round, 0);
        assert_eq!(loader.calls(), vec![Stage::One, Stage::Two]);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_cancels_pending_advance() {
        let (mut engine, _) = build_engine(2).await;
        engine.select_answer(correct(&engine));
        let handle = engine.pending_advance().unwrap();

        engine.dispose();
        engine.dispose();
        assert!(engine.pending_advance().is_none());
        handle.elapsed().await;
        assert!(!engine.fire(handle));
        assert_eq!(engine.view().round, 0);
    }

    #[tokio::test]
    async fn load_status_reflects_loader_result() {
        let (engine, _) = build_engine(3).await;
        assert_eq!(engine.load_status(), LoadStatus::Loaded { count: 3 });

        let loader = InMemoryPoolLoader::new().with_pool(Stage::One, Vec::new());
        let engine = QuizEngine::start(Arc::new(loader), config()).await;
        assert_eq!(engine.load_status(), LoadStatus::Empty);

        let loader = InMemoryPoolLoader::new().with_failure(Stage::One, "offline");
        let engine = QuizEngine::start(Arc::new(loader), config()).await;
        assert_eq!(engine.load_status(), LoadStatus::Failed);
        assert!(engine.view().finished);
    }

    #[tokio::test]
    async fn seeded_engines_shuffle_identically() {
        let (a, _) = build_engine(12).await;
        let (b, _) = build_engine(12).await;
        assert_eq!(
            a.session().unwrap().order(),
            b.session().unwrap().order()
        );
    }
}
