//! Domain models used by the engine: operations, questions, answer records,
//! totals, rewards, and the persisted player progress record.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Which arithmetic operation is being practiced?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
  Add,
  Sub,
  Mul,
  Div,
}

impl Default for Operation {
  fn default() -> Self { Operation::Add }
}

impl Operation {
  /// Display symbol used by hosts when rendering a prompt.
  pub fn symbol(&self) -> &'static str {
    match self {
      Operation::Add => "+",
      Operation::Sub => "−",
      Operation::Mul => "×",
      Operation::Div => "÷",
    }
  }

  /// Add and Mul pose the same problem regardless of operand order.
  pub fn is_commutative(&self) -> bool {
    matches!(self, Operation::Add | Operation::Mul)
  }
}

/// A single arithmetic problem. Ephemeral: created per prompt, consumed once
/// by answer evaluation, then discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Question {
  pub op: Operation,
  pub a: i64,
  pub b: i64,
  pub answer: i64,
}

impl Question {
  /// "7 − 3"-style prompt text.
  pub fn display(&self) -> String {
    format!("{} {} {}", self.a, self.op.symbol(), self.b)
  }
}

/// One entry of the answer history. Append-only, immutable once created.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnswerRecord {
  /// Unix timestamp in milliseconds.
  pub ts: i64,
  pub op: Operation,
  pub a: i64,
  pub b: i64,
  pub correct: bool,
  /// Clamped to [0, 60000] at record time.
  pub answer_time_ms: i64,
  pub timed_out: bool,
  /// The submitted value; `None` on timeout or empty submission.
  pub value: Option<i64>,
}

/// Cumulative counters over the lifetime of the progress record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Totals {
  pub played: i64,
  pub correct: i64,
  pub total_answer_time_ms: i64,
}

/// Stars and badges. Badges behave as a set: unique ids, never removed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rewards {
  pub stars: i64,
  pub badges: Vec<String>,
}

impl Rewards {
  pub fn has_badge(&self, id: &str) -> bool {
    self.badges.iter().any(|b| b == id)
  }
}

/// The single durable record: everything the engine persists, as one unit.
/// Always read-modify-written as a whole through `ProgressStore`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerProgress {
  pub version: u32,
  pub config: EngineConfig,
  pub operation: Operation,
  pub level: i64,
  pub streak: i64,
  pub totals: Totals,
  pub history: Vec<AnswerRecord>,
  pub rewards: Rewards,
}

impl Default for PlayerProgress {
  fn default() -> Self {
    Self {
      version: 1,
      config: EngineConfig::default(),
      operation: Operation::Add,
      level: 1,
      streak: 0,
      totals: Totals::default(),
      history: Vec::new(),
      rewards: Rewards::default(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn operation_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Operation::Add).unwrap(), "\"add\"");
    assert_eq!(serde_json::to_string(&Operation::Div).unwrap(), "\"div\"");
  }

  #[test]
  fn question_display_uses_operation_symbol() {
    let q = Question { op: Operation::Sub, a: 7, b: 3, answer: 4 };
    assert_eq!(q.display(), "7 − 3");
  }

  #[test]
  fn progress_defaults_start_at_level_one() {
    let p = PlayerProgress::default();
    assert_eq!(p.level, 1);
    assert_eq!(p.streak, 0);
    assert!(p.history.is_empty());
    assert_eq!(p.rewards.stars, 0);
  }

  #[test]
  fn answer_record_reads_camel_case_fields() {
    let r: AnswerRecord = serde_json::from_str(
      r#"{"ts":1,"op":"add","a":2,"b":3,"correct":true,"answerTimeMs":900,"timedOut":false,"value":5}"#,
    )
    .unwrap();
    assert_eq!(r.answer_time_ms, 900);
    assert_eq!(r.value, Some(5));
  }
}
