//! Small utility helpers used across modules.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::Totals;

/// Rolling accuracy over the cumulative totals. 0.0 when nothing played yet.
pub fn accuracy(totals: &Totals) -> f64 {
  if totals.played <= 0 {
    return 0.0;
  }
  totals.correct as f64 / totals.played as f64
}

/// Mean answer time across everything played. 0.0 when nothing played yet.
pub fn avg_answer_time_ms(totals: &Totals) -> f64 {
  if totals.played <= 0 {
    return 0.0;
  }
  totals.total_answer_time_ms as f64 / totals.played as f64
}

/// "4.9s"-style display used in host toasts and log lines.
pub fn format_ms(ms: i64) -> String {
  if ms <= 0 {
    return "0.0s".into();
  }
  format!("{:.1}s", ms as f64 / 1000.0)
}

/// Unix timestamp in milliseconds (wall clock).
pub fn now_ms() -> i64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_millis() as i64)
    .unwrap_or(0)
}
