//! Question generator: produces one well-formed arithmetic problem for an
//! operation, level, and per-operation configured cap.
//!
//! Correctness rules by operation:
//! - sub: operands swap so the result is never negative
//! - div: exact integer division, with the cap bounding the dividend
//! Degenerate configurations (cap below the level window) collapse the draw
//! window instead of failing; the generator always returns a question and
//! never emits an operand beyond the configured cap.

use rand::Rng;

use crate::config::EngineConfig;
use crate::curve::{div_limits, operand_range};
use crate::domain::{Operation, Question};

/// Inclusive uniform draw. Inverted bounds collapse to `lo`.
fn rand_int<R: Rng>(rng: &mut R, lo: i64, hi: i64) -> i64 {
    if hi <= lo {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

/// Re-roll a zero to a nonzero value when the window permits one.
fn reroll_zero<R: Rng>(rng: &mut R, v: i64, lo: i64, hi: i64) -> i64 {
    if v != 0 {
        return v;
    }
    let lo = lo.max(1);
    if hi >= lo {
        rand_int(rng, lo, hi)
    } else {
        v
    }
}

/// Cap-aware draw window for a level range: `[min(min, hi), min(max, cap)]`.
fn window(min: i64, max: i64, cap: i64) -> (i64, i64) {
    let hi = max.min(cap);
    (min.min(hi), hi)
}

pub fn generate<R: Rng>(rng: &mut R, op: Operation, level: i64, cfg: &EngineConfig) -> Question {
    match op {
        Operation::Add => {
            let r = operand_range(level, op);
            let (lo, hi) = window(r.min, r.max, cfg.max_add);
            let a0 = rand_int(rng, lo, hi);
            let a = reroll_zero(rng, a0, lo, hi);
            let b0 = rand_int(rng, lo, hi);
            let b = reroll_zero(rng, b0, lo, hi);
            Question { op, a, b, answer: a + b }
        }
        Operation::Sub => {
            let r = operand_range(level, op);
            let (lo, hi) = window(r.min, r.max, cfg.max_sub);
            let a0 = rand_int(rng, lo, hi);
            let mut a = reroll_zero(rng, a0, lo, hi);
            let b0 = rand_int(rng, lo, hi);
            let mut b = reroll_zero(rng, b0, lo, hi);
            if b > a {
                std::mem::swap(&mut a, &mut b);
            }
            if b == 0 && a >= 1 {
                b = rand_int(rng, 1, a.min(hi));
            }
            Question { op, a, b, answer: a - b }
        }
        Operation::Mul => {
            let r = operand_range(level, op);
            let (lo, hi) = window(r.min, r.max, cfg.max_mul);
            let a = rand_int(rng, lo, hi);
            let b = rand_int(rng, lo, hi);
            Question { op, a, b, answer: a * b }
        }
        Operation::Div => {
            let lim = div_limits(level);
            let cap = cfg.max_div.max(1);
            let divisor = rand_int(rng, 1, lim.divisor_max.min(cap));
            let quotient = rand_int(rng, 0, lim.quotient_max.min(cap / divisor).max(0));
            Question { op, a: divisor * quotient, b: divisor, answer: quotient }
        }
    }
}
