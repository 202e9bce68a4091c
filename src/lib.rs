//! Mathis Cool · Practice Session Engine
//!
//! Adaptive mental-arithmetic drills for young children. A host application
//! (any UI, any platform) drives a fixed ten-question session through a
//! narrow API; the engine owns question generation, pacing, progression,
//! rewards, and the single persisted progress record.
//!
//! Important env variables:
//!   MATHIS_STATE_PATH  : persisted progress JSON (default ./mathis_cool_state_v1.json)
//!   ENGINE_CONFIG_PATH : optional TOML overriding the built-in config defaults
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"
//!
//! Typical host loop:
//! ```no_run
//! use mathiscool::{PracticeSession, ProgressStore};
//!
//! let mut session = PracticeSession::start(ProgressStore::from_env());
//! loop {
//!     // render session.question(), poll session.elapsed_fraction() ...
//!     let outcome = match session.submit_answer(Some(42)) {
//!         Some(o) => o,
//!         None => continue, // lost the race against the timeout
//!     };
//!     if outcome.session_complete {
//!         break;
//!     }
//!     // sleep for PracticeSession::feedback_delay(outcome.correct), then:
//!     session.next_question();
//! }
//! ```

pub mod telemetry;
pub mod util;
pub mod domain;
pub mod config;
pub mod curve;
pub mod generator;
pub mod dedup;
pub mod progression;
pub mod rewards;
pub mod feedback;
pub mod pacing;
pub mod store;
pub mod session;

pub use config::{EngineConfig, Theme};
pub use domain::{AnswerRecord, Operation, PlayerProgress, Question, Rewards, Totals};
pub use pacing::PacingController;
pub use session::{AnswerOutcome, PracticeSession, SESSION_LENGTH};
pub use store::ProgressStore;
