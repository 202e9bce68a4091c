//! Rewards: idempotent badge evaluation plus the star counter.
//!
//! Badges are re-evaluated after every answer against the full cumulative
//! totals. Awarding is a set union: once present, a badge is never
//! re-awarded or removed. Stars increment exactly when the cumulative
//! correct count lands on a positive multiple of five.

use tracing::info;

use crate::domain::{PlayerProgress, Rewards};
use crate::util::accuracy;

pub struct Milestone {
    pub n: i64,
    pub id: &'static str,
    pub label: &'static str,
}

pub const MILESTONES: [Milestone; 4] = [
    Milestone { n: 10, id: "m10", label: "Badge 10 questions" },
    Milestone { n: 25, id: "m25", label: "Badge 25 questions" },
    Milestone { n: 50, id: "m50", label: "Badge 50 questions" },
    Milestone { n: 100, id: "m100", label: "Badge 100 questions" },
];

pub const ACC80_LABEL: &str = "Badge précision 80%";
pub const ACC90_LABEL: &str = "Badge précision 90%";

pub const STAR_EVERY_CORRECT: i64 = 5;

fn ensure_badge(rewards: &mut Rewards, id: &str, label: &str, earned: &mut Option<String>) {
    if rewards.has_badge(id) {
        return;
    }
    rewards.badges.push(id.to_string());
    *earned = Some(label.to_string());
}

/// Evaluate badges and stars against the post-answer totals. Returns the
/// label of a badge earned by this call, if any, so hosts can celebrate it.
pub fn update_rewards(progress: &mut PlayerProgress) -> Option<String> {
    let played = progress.totals.played;
    let correct = progress.totals.correct;
    let acc = accuracy(&progress.totals);

    let mut earned = None;
    for m in &MILESTONES {
        if played >= m.n {
            ensure_badge(&mut progress.rewards, m.id, m.label, &mut earned);
        }
    }
    if played >= 20 && acc >= 0.8 {
        ensure_badge(&mut progress.rewards, "acc80", ACC80_LABEL, &mut earned);
    }
    if played >= 50 && acc >= 0.9 {
        ensure_badge(&mut progress.rewards, "acc90", ACC90_LABEL, &mut earned);
    }

    // Fires on the transition: the session bumps `correct` by at most one
    // before each evaluation, so a multiple of five is seen exactly once.
    if correct > 0 && correct % STAR_EVERY_CORRECT == 0 {
        progress.rewards.stars += 1;
        info!(target: "session", stars = progress.rewards.stars, "Star earned");
    }

    if let Some(label) = &earned {
        info!(target: "session", badge = %label, played, "Badge earned");
    }
    earned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Totals;

    fn progress_with(played: i64, correct: i64) -> PlayerProgress {
        let mut p = PlayerProgress::default();
        p.totals = Totals { played, correct, total_answer_time_ms: 0 };
        p
    }

    #[test]
    fn tenth_question_awards_m10_and_a_star() {
        // totals={played:9,correct:9}, then one more correct answer.
        let mut p = progress_with(10, 10);
        let earned = update_rewards(&mut p);
        assert!(p.rewards.has_badge("m10"));
        assert_eq!(earned.as_deref(), Some("Badge 10 questions"));
        assert_eq!(p.rewards.stars, 1);
    }

    #[test]
    fn badge_evaluation_is_idempotent() {
        let mut p = progress_with(10, 3);
        update_rewards(&mut p);
        let badges_once = p.rewards.badges.clone();
        update_rewards(&mut p);
        assert_eq!(p.rewards.badges, badges_once);
        assert_eq!(p.rewards.badges.iter().filter(|b| *b == "m10").count(), 1);
    }

    #[test]
    fn accuracy_badges_require_volume_and_rate() {
        let mut p = progress_with(19, 19);
        update_rewards(&mut p);
        assert!(!p.rewards.has_badge("acc80"));

        let mut p = progress_with(20, 16);
        update_rewards(&mut p);
        assert!(p.rewards.has_badge("acc80"));
        assert!(!p.rewards.has_badge("acc90"));

        let mut p = progress_with(50, 45);
        update_rewards(&mut p);
        assert!(p.rewards.has_badge("acc90"));
    }

    #[test]
    fn stars_only_on_positive_multiples_of_five() {
        let mut p = progress_with(6, 5);
        update_rewards(&mut p);
        assert_eq!(p.rewards.stars, 1);

        let mut p = progress_with(7, 6);
        update_rewards(&mut p);
        assert_eq!(p.rewards.stars, 0);

        let mut p = progress_with(3, 0);
        update_rewards(&mut p);
        assert_eq!(p.rewards.stars, 0);
    }

    #[test]
    fn badges_are_never_removed() {
        let mut p = progress_with(20, 16);
        update_rewards(&mut p);
        assert!(p.rewards.has_badge("acc80"));
        // Accuracy later drops below the bar; the badge stays.
        p.totals = Totals { played: 40, correct: 20, total_answer_time_ms: 0 };
        update_rewards(&mut p);
        assert!(p.rewards.has_badge("acc80"));
    }
}
