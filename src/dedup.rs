//! Session deduplicator: keeps track of questions already answered correctly
//! in the current session and asks the generator to retry (bounded) so the
//! same problem is not posed twice.
//!
//! Only correct answers register a key. A miss or timeout leaves the question
//! free to come back later in the session.

use std::collections::HashSet;

use crate::domain::{Operation, Question};

/// Generation retry budget per prompt. When exhausted we accept a repeat
/// rather than loop forever.
pub const MAX_UNIQUE_ATTEMPTS: usize = 60;

/// Normalized identity of a question. Commutative operations (add, mul) use
/// the unordered operand pair; sub and div keep operand order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QuestionKey {
    op: Operation,
    a: i64,
    b: i64,
}

impl QuestionKey {
    pub fn of(q: &Question) -> Self {
        if q.op.is_commutative() && q.b < q.a {
            Self { op: q.op, a: q.b, b: q.a }
        } else {
            Self { op: q.op, a: q.a, b: q.b }
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionDedup {
    solved: HashSet<QuestionKey>,
}

impl SessionDedup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a correctly answered question.
    pub fn mark_solved(&mut self, q: &Question) {
        self.solved.insert(QuestionKey::of(q));
    }

    pub fn is_solved(&self, q: &Question) -> bool {
        self.solved.contains(&QuestionKey::of(q))
    }

    /// Call `generate` until it yields a question whose key has not been
    /// solved this session, up to `MAX_UNIQUE_ATTEMPTS` draws. On exhaustion
    /// the last draw is returned as-is.
    pub fn next_unique<F: FnMut() -> Question>(&self, mut generate: F) -> Question {
        let mut q = generate();
        for _ in 1..MAX_UNIQUE_ATTEMPTS {
            if !self.is_solved(&q) {
                return q;
            }
            q = generate();
        }
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Operation::*;

    fn q(op: Operation, a: i64, b: i64) -> Question {
        let answer = match op {
            Add => a + b,
            Sub => a - b,
            Mul => a * b,
            Div => {
                if b == 0 {
                    0
                } else {
                    a / b
                }
            }
        };
        Question { op, a, b, answer }
    }

    #[test]
    fn commutative_keys_ignore_operand_order() {
        assert_eq!(QuestionKey::of(&q(Add, 3, 7)), QuestionKey::of(&q(Add, 7, 3)));
        assert_eq!(QuestionKey::of(&q(Mul, 2, 9)), QuestionKey::of(&q(Mul, 9, 2)));
    }

    #[test]
    fn ordered_keys_distinguish_operand_order() {
        assert_ne!(QuestionKey::of(&q(Sub, 7, 3)), QuestionKey::of(&q(Sub, 3, 7)));
        assert_ne!(QuestionKey::of(&q(Div, 8, 4)), QuestionKey::of(&q(Div, 4, 8)));
    }

    #[test]
    fn keys_are_tagged_with_the_operation() {
        assert_ne!(QuestionKey::of(&q(Add, 3, 7)), QuestionKey::of(&q(Mul, 3, 7)));
    }

    #[test]
    fn next_unique_skips_solved_questions() {
        let mut dedup = SessionDedup::new();
        dedup.mark_solved(&q(Add, 3, 7));

        // Generator alternates between the solved question and a fresh one.
        let mut flip = false;
        let picked = dedup.next_unique(|| {
            flip = !flip;
            if flip { q(Add, 7, 3) } else { q(Add, 1, 2) }
        });
        assert!(!dedup.is_solved(&picked));
        assert_eq!(picked, q(Add, 1, 2));
    }

    #[test]
    fn exhausted_attempts_accept_a_repeat() {
        let mut dedup = SessionDedup::new();
        dedup.mark_solved(&q(Sub, 5, 2));

        let mut calls = 0usize;
        let picked = dedup.next_unique(|| {
            calls += 1;
            q(Sub, 5, 2)
        });
        assert_eq!(calls, MAX_UNIQUE_ATTEMPTS);
        assert!(dedup.is_solved(&picked));
    }

    #[test]
    fn unsolved_questions_do_not_block_reappearance() {
        let dedup = SessionDedup::new();
        // Nothing marked: the first draw is always accepted.
        let mut calls = 0usize;
        let picked = dedup.next_unique(|| {
            calls += 1;
            q(Div, 8, 4)
        });
        assert_eq!(calls, 1);
        assert_eq!(picked, q(Div, 8, 4));
    }
}
