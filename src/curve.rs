//! Difficulty curve: pure functions mapping a level to operand ranges per
//! operation and mapping level + streak to the per-question time budget.
//!
//! Levels group into six fixed tiers (1–2, 3–4, 5–6, 7–8, 9–10, 11–12). The
//! add/sub table matches the original game; mul/div grow slower so products
//! and dividends stay tractable for a child.

use crate::config::EngineConfig;
use crate::domain::Operation;

pub const LEVEL_FLOOR: i64 = 1;
pub const LEVEL_CEIL: i64 = 12;

/// Inclusive operand window for a tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperandRange {
    pub min: i64,
    pub max: i64,
}

/// Per-tier bounds for division: the divisor draw and the quotient draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DivLimits {
    pub divisor_max: i64,
    pub quotient_max: i64,
}

const ADD_SUB_TIERS: [OperandRange; 6] = [
    OperandRange { min: 0, max: 5 },
    OperandRange { min: 0, max: 9 },
    OperandRange { min: 3, max: 12 },
    OperandRange { min: 5, max: 18 },
    OperandRange { min: 8, max: 25 },
    OperandRange { min: 10, max: 40 },
];

const MUL_TIERS: [OperandRange; 6] = [
    OperandRange { min: 1, max: 4 },
    OperandRange { min: 2, max: 5 },
    OperandRange { min: 2, max: 7 },
    OperandRange { min: 3, max: 9 },
    OperandRange { min: 4, max: 10 },
    OperandRange { min: 5, max: 12 },
];

const DIV_TIERS: [DivLimits; 6] = [
    DivLimits { divisor_max: 3, quotient_max: 3 },
    DivLimits { divisor_max: 5, quotient_max: 5 },
    DivLimits { divisor_max: 7, quotient_max: 7 },
    DivLimits { divisor_max: 9, quotient_max: 9 },
    DivLimits { divisor_max: 10, quotient_max: 10 },
    DivLimits { divisor_max: 12, quotient_max: 12 },
];

fn tier_index(level: i64) -> usize {
    ((level.clamp(LEVEL_FLOOR, LEVEL_CEIL) - 1) / 2) as usize
}

/// Operand window for a level and operation. For Div this is the divisor
/// window; use `div_limits` for the full divisor/quotient pair.
pub fn operand_range(level: i64, op: Operation) -> OperandRange {
    let tier = tier_index(level);
    match op {
        Operation::Add | Operation::Sub => ADD_SUB_TIERS[tier],
        Operation::Mul => MUL_TIERS[tier],
        Operation::Div => OperandRange { min: 1, max: DIV_TIERS[tier].divisor_max },
    }
}

pub fn div_limits(level: i64) -> DivLimits {
    DIV_TIERS[tier_index(level)]
}

/// Time budget for the current question:
/// `start − (level−1)·2·step − floor(streak/speedup)·step`, clamped into
/// `[min_time_ms, start_time_ms]`. Non-increasing in both level and streak.
pub fn time_limit_ms(level: i64, streak: i64, cfg: &EngineConfig) -> i64 {
    let level_penalty = (level.max(LEVEL_FLOOR) - 1) * cfg.time_step_ms * 2;
    let streak_penalty = (streak.max(0) / cfg.streak_to_speed_up.max(1)) * cfg.time_step_ms;
    let budget = cfg.start_time_ms - level_penalty - streak_penalty;
    // Tolerate an unnormalized config rather than panic on an inverted clamp.
    let hi = cfg.start_time_ms.max(cfg.min_time_ms);
    budget.clamp(cfg.min_time_ms, hi)
}
