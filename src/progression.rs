//! Level/streak progression: one-step transitions driven by answer outcomes.
//!
//! Correct answers extend the streak and level up on every
//! `streak_to_level_up` multiple. A miss resets the streak and, once enough
//! questions have been played with low rolling accuracy, eases the level
//! down one step. Never more than one level step per answer.

use tracing::info;

use crate::domain::PlayerProgress;
use crate::util::accuracy;

/// Demotion only kicks in after this many total answers.
pub const DEMOTION_MIN_PLAYED: i64 = 12;
/// Rolling accuracy below this triggers the one-step demotion.
pub const DEMOTION_ACCURACY: f64 = 0.45;

/// Apply one answer outcome to streak and level. Expects `progress.totals`
/// to already include the answer being applied.
pub fn apply_outcome(progress: &mut PlayerProgress, correct: bool) {
    if correct {
        progress.streak += 1;
        if progress.streak % progress.config.streak_to_level_up.max(1) == 0 {
            let next = (progress.level + 1).min(progress.config.level_max);
            if next != progress.level {
                info!(target: "session", level = next, streak = progress.streak, "Level up");
            }
            progress.level = next;
        }
    } else {
        progress.streak = 0;
        let acc = accuracy(&progress.totals);
        if progress.totals.played >= DEMOTION_MIN_PLAYED && acc < DEMOTION_ACCURACY {
            let next = (progress.level - 1).max(1);
            if next != progress.level {
                info!(target: "session", level = next, accuracy = acc, "Easing level down");
            }
            progress.level = next;
        }
    }
}
