//! Adaptive review scheduling for a kana reading quiz.
//!
//! A [`Deck`] holds one [`LearningRecord`] per character of the [`Inventory`]. Each answer
//! grows or shrinks the record's review interval, records come back once that interval has
//! elapsed, and characters are introduced group by group. [`KanaQuiz`] ties a deck to a
//! [`BlobStore`] so progress survives restarts.

mod active_set;
mod answer;
mod coerce;
mod deck;
mod persistence;
mod policy;
mod question;
mod record;
mod review;
mod simulation;
mod stats;
mod timer;

use std::sync::{Arc, LazyLock};

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use stash::{BlobStore, DirtyTracker};

pub use answer::apply_answer;
pub use deck::Deck;
pub use kana_utils::{Group, Inventory, KanaCharacter};
pub use persistence::{LEARNING_DATA_KEY, PersistenceError, RecordStore, WELCOME_KEY};
pub use policy::{PolicyError, SchedulingPolicy};
pub use question::{Question, generate_question};
pub use record::{LearningRecord, RecordMap, initial_records};
pub use review::{ReviewInfo, due_records};
pub use stats::{Progress, RecordSummary, format_time};
pub use timer::QuestionTimer;

// forcing LOGGER twice is a no-op
static LOGGER: LazyLock<()> = LazyLock::new(|| {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_ok() {
        log::info!("Logging initialized");
    }
});

/// Installs `env_logger` unless a logger is already set.
pub fn init_logging() {
    LazyLock::force(&LOGGER);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NextQuestion {
    Ask(Question),
    /// Every character is completed.
    Finished,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    /// The record after the answer was applied.
    pub record: LearningRecord,
}

/// One learner's quiz session.
pub struct KanaQuiz<S, R> {
    store: RecordStore<S>,
    deck: DirtyTracker<Deck>,
    rng: R,
    timer: QuestionTimer,
    current: Option<Question>,
    previous_symbol: Option<String>,
}

impl<S: BlobStore, R: Rng> KanaQuiz<S, R> {
    /// Loads stored progress, or starts fresh if there is none or it cannot be read.
    /// A policy that fails [`SchedulingPolicy::validate`] is replaced by the default.
    pub async fn open(
        blobs: S,
        inventory: Arc<Inventory>,
        policy: SchedulingPolicy,
        rng: R,
    ) -> Self {
        init_logging();

        let policy = match policy.validate() {
            Ok(()) => policy,
            Err(e) => {
                log::warn!("Invalid scheduling policy ({e}), using the default one");
                SchedulingPolicy::default()
            }
        };
        let store = RecordStore::new(blobs);
        let deck = store.load_deck(inventory, policy).await;
        let mut quiz = Self {
            store,
            deck,
            rng,
            timer: QuestionTimer::default(),
            current: None,
            previous_symbol: None,
        };
        quiz.save().await;
        quiz
    }

    pub fn deck(&self) -> &Deck {
        self.deck.get()
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    /// False after a failed write, until a later write succeeds.
    pub fn is_saved(&self) -> bool {
        !self.deck.is_dirty()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// Picks the next character and shows a question for it. Starts the answer timer.
    pub fn next_question(&mut self, now: DateTime<Utc>) -> NextQuestion {
        let deck = self.deck.get();
        let Some(target) = deck.pick_next(now, self.previous_symbol.as_deref(), &mut self.rng)
        else {
            self.current = None;
            self.timer.stop();
            return NextQuestion::Finished;
        };
        let question = deck.generate_question(target, &mut self.rng);

        self.previous_symbol = Some(question.target_symbol.clone());
        self.current = Some(question.clone());
        self.timer.start(now);
        NextQuestion::Ask(question)
    }

    /// Grades `option` against the current question and records the result.
    ///
    /// Returns `None` if no question is showing.
    pub async fn answer(&mut self, option: &str, now: DateTime<Utc>) -> Option<AnswerOutcome> {
        let question = self.current.take()?;
        let correct = question.is_correct(option);
        let elapsed = self.timer.elapsed(now);
        self.timer.stop();

        let deck = self
            .record_answer(&question.target_symbol, correct, elapsed, now)
            .await;
        let record = deck.record(&question.target_symbol)?.clone();
        Some(AnswerOutcome {
            correct,
            correct_answer: question.correct_answer,
            record,
        })
    }

    /// Applies an answer and persists the whole mapping. Returns the updated deck.
    pub async fn record_answer(
        &mut self,
        symbol: &str,
        is_correct: bool,
        elapsed: TimeDelta,
        now: DateTime<Utc>,
    ) -> &Deck {
        if self.deck.get().record(symbol).is_some() {
            self.deck
                .get_mut()
                .apply_answer(symbol, is_correct, elapsed, now);
        } else {
            log::warn!("Ignoring answer for unknown symbol {symbol:?}");
        }
        self.save().await;
        self.deck.get()
    }

    pub fn on_background(&mut self) {
        self.timer.on_background();
    }

    pub fn on_foreground(&mut self, now: DateTime<Utc>) {
        self.timer.on_foreground(now);
    }

    /// Deletes stored progress and starts over with fresh records.
    ///
    /// The fresh deck is written with the next answer.
    pub async fn reset(&mut self) {
        let _ = self
            .store
            .reset()
            .await
            .inspect_err(|e| log::error!("{e}"));

        let current = self.deck.get();
        let fresh = Deck::new(current.inventory().clone(), current.policy().clone());
        self.deck.replace(fresh);
        self.current = None;
        self.previous_symbol = None;
        self.timer.stop();
        log::info!("Learning progress reset");
    }

    /// Brings back the welcome screen without touching progress.
    pub async fn start_over(&mut self) {
        let _ = self
            .store
            .start_over()
            .await
            .inspect_err(|e| log::error!("{e}"));
    }

    pub async fn welcome_dismissed(&self) -> bool {
        self.store.welcome_dismissed().await
    }

    pub async fn dismiss_welcome(&mut self) {
        let _ = self
            .store
            .set_welcome_dismissed()
            .await
            .inspect_err(|e| log::error!("{e}"));
    }

    pub fn review_info(&self, now: DateTime<Utc>) -> ReviewInfo<'_> {
        self.deck.get().review_info(now)
    }

    pub fn progress(&self) -> Progress {
        self.deck.get().progress()
    }

    pub fn statistics(&self) -> Vec<RecordSummary> {
        self.deck.get().statistics()
    }

    async fn save(&mut self) {
        if !self.deck.is_dirty() {
            return;
        }
        match self.store.save(self.deck.get().records()).await {
            Ok(()) => self.deck.mark_clean(),
            // keep the deck dirty so the next update tries again
            Err(e) => log::error!("{e}"),
        }
    }
}
