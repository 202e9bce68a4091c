//! Session orchestrator: a fixed-length practice session of ten questions.
//!
//! Owns all ephemeral session state (index, live question, dedup keys,
//! pacing) and serializes every durable mutation through the store as one
//! read-modify-write of the whole progress record.
//!
//! Flow per question: `submit_answer` resolves the prompt (first terminal
//! event wins; a losing submission or stale timeout gets `None`), then the
//! host waits `feedback_delay` and calls `next_question`, which arms the
//! next countdown. Keeping the advance explicit means nothing can race the
//! feedback pause into the following prompt.

use tokio::time::Duration;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::dedup::SessionDedup;
use crate::domain::{AnswerRecord, PlayerProgress, Question};
use crate::feedback::FeedbackPicker;
use crate::generator::generate;
use crate::pacing::PacingController;
use crate::progression::apply_outcome;
use crate::rewards::update_rewards;
use crate::store::ProgressStore;
use crate::util::{format_ms, now_ms};

/// Questions per session.
pub const SESSION_LENGTH: usize = 10;

/// Feedback pauses before the next prompt. Wrong answers get strictly more
/// time than right ones so the learner can absorb the correction.
pub const CORRECT_FEEDBACK_DELAY: Duration = Duration::from_millis(550);
pub const INCORRECT_FEEDBACK_DELAY: Duration = Duration::from_millis(2_500);

/// Everything a host needs to react to one answered question.
#[derive(Clone, Debug)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub value: Option<i64>,
    pub timed_out: bool,
    /// Phrase for the feedback toast (positive or encouraging bank).
    pub feedback: &'static str,
    /// Set when this answer earned a new badge.
    pub new_badge_label: Option<String>,
    pub updated_progress: PlayerProgress,
    /// True after the tenth answer; `next_question` will return `None`.
    pub session_complete: bool,
}

pub struct PracticeSession {
    id: Uuid,
    store: ProgressStore,
    progress: PlayerProgress,
    dedup: SessionDedup,
    feedback: FeedbackPicker,
    /// 1-based, <= SESSION_LENGTH.
    index: usize,
    question: Question,
    pacing: PacingController,
    answered: bool,
    complete: bool,
    started_ts: i64,
}

impl PracticeSession {
    /// Load progress through the store, generate question 1, and arm the
    /// countdown.
    pub fn start(store: ProgressStore) -> Self {
        let progress = store.load();
        let id = Uuid::new_v4();

        let mut rng = rand::thread_rng();
        let dedup = SessionDedup::new();
        let (op, level, cfg) = (progress.operation, progress.level, &progress.config);
        let question = dedup.next_unique(|| generate(&mut rng, op, level, cfg));
        let pacing = PacingController::arm(progress.level, progress.streak, &progress.config);

        info!(
            target: "session",
            %id,
            op = ?progress.operation,
            level = progress.level,
            streak = progress.streak,
            budget = %format_ms(pacing.limit_ms()),
            "Session started"
        );

        Self {
            id,
            store,
            progress,
            dedup,
            feedback: FeedbackPicker::new(),
            index: 1,
            question,
            pacing,
            answered: false,
            complete: false,
            started_ts: now_ms(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The live question for the current prompt.
    pub fn question(&self) -> &Question {
        &self.question
    }

    /// 1-based index of the current question.
    pub fn question_index(&self) -> usize {
        self.index
    }

    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn started_ts(&self) -> i64 {
        self.started_ts
    }

    /// Budget for the current question, in milliseconds.
    pub fn time_limit_ms(&self) -> i64 {
        self.pacing.limit_ms()
    }

    /// Elapsed share of the countdown in [0, 1], for a host progress bar.
    pub fn elapsed_fraction(&self) -> f64 {
        self.pacing.elapsed_fraction()
    }

    /// Await the current countdown's deadline. A host timeout task awaits
    /// this and then calls `submit_answer(None)`.
    pub async fn expired(&self) {
        self.pacing.expired().await;
    }

    /// How long to linger on feedback before `next_question`.
    pub fn feedback_delay(correct: bool) -> Duration {
        if correct {
            CORRECT_FEEDBACK_DELAY
        } else {
            INCORRECT_FEEDBACK_DELAY
        }
    }

    /// Apply one terminal event for the current question. `None` value means
    /// the countdown ran out. Returns `None` when the prompt was already
    /// resolved (a submission losing the race against a timeout, or vice
    /// versa) or the session is over; the losing event has no effect.
    #[instrument(level = "info", skip(self), fields(session = %self.id, index = self.index))]
    pub fn submit_answer(&mut self, value: Option<i64>) -> Option<AnswerOutcome> {
        if self.complete || !self.pacing.try_resolve() {
            return None;
        }
        self.answered = true;

        let timed_out = value.is_none();
        let correct = matches!(value, Some(v) if v == self.question.answer);
        let answer_time_ms = self.pacing.elapsed_ms().clamp(0, 60_000);

        self.progress.totals.played += 1;
        self.progress.totals.total_answer_time_ms += answer_time_ms;
        if correct {
            self.progress.totals.correct += 1;
        }
        apply_outcome(&mut self.progress, correct);
        let new_badge_label = update_rewards(&mut self.progress);

        self.progress.history.push(AnswerRecord {
            ts: now_ms(),
            op: self.question.op,
            a: self.question.a,
            b: self.question.b,
            correct,
            answer_time_ms,
            timed_out,
            value,
        });

        if correct {
            self.dedup.mark_solved(&self.question);
        }

        // Persist the whole record; a failed save is logged, not retried.
        if let Err(e) = self.store.save(&mut self.progress) {
            error!(target: "store", session = %self.id, error = %e, "Failed to persist progress");
        }

        let mut rng = rand::thread_rng();
        let feedback = self.feedback.pick(&mut rng, correct);

        let session_complete = self.index >= SESSION_LENGTH;
        if session_complete {
            self.complete = true;
            info!(
                target: "session",
                session = %self.id,
                played = self.progress.totals.played,
                level = self.progress.level,
                "Session complete"
            );
        }

        info!(
            target: "session",
            correct,
            timed_out,
            answer_time_ms,
            streak = self.progress.streak,
            "Answer applied"
        );

        Some(AnswerOutcome {
            correct,
            value,
            timed_out,
            feedback,
            new_badge_label,
            updated_progress: self.progress.clone(),
            session_complete,
        })
    }

    /// Advance to the next prompt and arm its countdown. Returns `None` if
    /// the current question has not been answered yet or the session is
    /// over.
    pub fn next_question(&mut self) -> Option<&Question> {
        if self.complete || !self.answered {
            return None;
        }
        self.index += 1;
        self.answered = false;

        let mut rng = rand::thread_rng();
        let (op, level, cfg) = (self.progress.operation, self.progress.level, &self.progress.config);
        self.question = self.dedup.next_unique(|| generate(&mut rng, op, level, cfg));
        self.pacing = PacingController::arm(self.progress.level, self.progress.streak, &self.progress.config);
        Some(&self.question)
    }

    /// Teardown without an answer (navigation away): stops the countdown so
    /// no stale timeout fires against a discarded session. The session state
    /// is dropped; durable progress keeps whatever was already persisted.
    pub fn abandon(&mut self) {
        if !self.complete {
            info!(target: "session", session = %self.id, index = self.index, "Session abandoned");
        }
        self.pacing.cancel();
        self.complete = true;
    }
}
