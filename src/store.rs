//! Persistence: the single serialized progress record, default backfill for
//! partial/legacy data, and the bulk export/import JSON envelope.
//!
//! Loading never fails: missing or corrupt data falls back to defaults, and
//! partial records are merged field by field so older persisted state keeps
//! loading with sensible defaults for whatever it lacks. Saving normalizes
//! the config and writes the whole record in one step (temp file + rename).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::config::{load_default_config_from_env, EngineConfig, Theme};
use crate::domain::{AnswerRecord, Operation, PlayerProgress};
use crate::util::now_ms;

/// Storage key of the original app; doubles as the default file stem.
pub const STORAGE_KEY: &str = "mathis_cool_state_v1";
pub const EXPORT_APP: &str = "mathis-cool";
pub const SCHEMA_VERSION: u32 = 1;

/// Ceiling applied to persisted per-answer times (same as at record time).
const MAX_ANSWER_TIME_MS: i64 = 60_000;

/// Owns the persisted record. All durable mutations go through `update` (or
/// `save`) as one read-modify-write step, so concurrent call sites cannot
/// interleave partial writes.
#[derive(Clone, Debug)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// MATHIS_STATE_PATH, or `./mathis_cool_state_v1.json`.
    pub fn from_env() -> Self {
        let path = std::env::var("MATHIS_STATE_PATH").unwrap_or_else(|_| format!("./{STORAGE_KEY}.json"));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the progress record. Never fails; missing or corrupt data falls
    /// back to the default record.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> PlayerProgress {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) => {
                info!(target: "store", error = %e, "No persisted state; starting fresh");
                return default_progress();
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(v) => {
                let mut p = merge_progress(default_progress(), &v);
                p.config.normalize();
                p
            }
            Err(e) => {
                warn!(target: "store", error = %e, "Corrupt persisted state; falling back to defaults");
                default_progress()
            }
        }
    }

    /// Persist the whole record. Normalizes the config as a side effect.
    /// A failed save is reported, not retried.
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    pub fn save(&self, progress: &mut PlayerProgress) -> Result<(), String> {
        progress.config.normalize();
        let json = serde_json::to_string(progress).map_err(|e| e.to_string())?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(|e| format!("write {}: {e}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| format!("rename {}: {e}", self.path.display()))?;
        Ok(())
    }

    /// Atomic read-modify-write of the whole record.
    pub fn update<F: FnOnce(&mut PlayerProgress)>(&self, mutate: F) -> Result<PlayerProgress, String> {
        let mut progress = self.load();
        mutate(&mut progress);
        self.save(&mut progress)?;
        Ok(progress)
    }

    /// Switch the practice mode (home-screen operation picker).
    pub fn set_operation(&self, op: Operation) -> Result<PlayerProgress, String> {
        self.update(|p| p.operation = op)
    }

    /// Drop all persisted state ("Réinitialiser"). Missing file is fine.
    pub fn reset(&self) -> Result<(), String> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("remove {}: {e}", self.path.display())),
        }
    }

    /// Bulk export of the persisted record as a JSON envelope.
    pub fn export_json(&self) -> Result<String, String> {
        let progress = self.load();
        let state = serde_json::to_value(&progress).map_err(|e| e.to_string())?;
        let envelope = ExportEnvelope {
            app: EXPORT_APP.into(),
            version: SCHEMA_VERSION,
            exported_at: now_ms(),
            state,
        };
        serde_json::to_string_pretty(&envelope).map_err(|e| e.to_string())
    }

    /// Import a previously exported envelope. Malformed input is a
    /// recoverable error: reported to the caller, persisted state untouched.
    pub fn import_json(&self, raw: &str) -> Result<PlayerProgress, String> {
        let envelope: ExportEnvelope =
            serde_json::from_str(raw).map_err(|e| format!("invalid export file: {e}"))?;
        if envelope.app != EXPORT_APP {
            return Err(format!("unrecognized export (app \"{}\")", envelope.app));
        }
        if envelope.version > SCHEMA_VERSION {
            return Err(format!("unsupported export version {}", envelope.version));
        }
        let mut progress = merge_progress(default_progress(), &envelope.state);
        self.save(&mut progress)?;
        info!(target: "store", path = %self.path.display(), "Imported progress");
        Ok(progress)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportEnvelope {
    app: String,
    version: u32,
    exported_at: i64,
    state: Value,
}

/// Default record, with ENGINE_CONFIG_PATH overrides applied when present.
pub fn default_progress() -> PlayerProgress {
    let mut p = PlayerProgress::default();
    if let Some(cfg) = load_default_config_from_env() {
        p.config = cfg;
    }
    p
}

fn get_i64(v: &Value, key: &str) -> Option<i64> {
    v.get(key).and_then(Value::as_i64)
}

/// Explicit field-by-field backfill merge: every recognized field of the
/// incoming value overrides the base; everything missing or malformed keeps
/// its default. Non-numeric noise in one field never rejects the record.
pub fn merge_progress(mut base: PlayerProgress, v: &Value) -> PlayerProgress {
    if !v.is_object() {
        return base;
    }

    if let Some(c) = v.get("config") {
        merge_config(&mut base.config, c);
    }
    if let Some(op) = v.get("operation") {
        if let Ok(op) = serde_json::from_value::<Operation>(op.clone()) {
            base.operation = op;
        }
    }
    if let Some(n) = get_i64(v, "level") {
        base.level = n;
    }
    if let Some(n) = get_i64(v, "streak") {
        base.streak = n.max(0);
    }
    if let Some(t) = v.get("totals") {
        if let Some(n) = get_i64(t, "played") {
            base.totals.played = n.max(0);
        }
        if let Some(n) = get_i64(t, "correct") {
            base.totals.correct = n.max(0);
        }
        if let Some(n) = get_i64(t, "totalAnswerTimeMs") {
            base.totals.total_answer_time_ms = n.max(0);
        }
        base.totals.correct = base.totals.correct.min(base.totals.played);
    }
    if let Some(h) = v.get("history").and_then(Value::as_array) {
        base.history = h
            .iter()
            .filter_map(|r| serde_json::from_value::<AnswerRecord>(r.clone()).ok())
            .map(|mut r| {
                r.answer_time_ms = r.answer_time_ms.clamp(0, MAX_ANSWER_TIME_MS);
                r
            })
            .collect();
    }
    if let Some(r) = v.get("rewards") {
        if let Some(n) = get_i64(r, "stars") {
            base.rewards.stars = n.max(0);
        }
        if let Some(badges) = r.get("badges").and_then(Value::as_array) {
            base.rewards.badges.clear();
            for b in badges.iter().filter_map(Value::as_str) {
                if !base.rewards.has_badge(b) {
                    base.rewards.badges.push(b.to_string());
                }
            }
        }
    }

    base.config.normalize();
    base.level = base.level.clamp(1, base.config.level_max);
    base
}

fn merge_config(cfg: &mut EngineConfig, v: &Value) {
    if let Some(b) = v.get("soundOn").and_then(Value::as_bool) {
        cfg.sound_on = b;
    }
    if let Some(t) = v.get("theme") {
        if let Ok(t) = serde_json::from_value::<Theme>(t.clone()) {
            cfg.theme = t;
        }
    }
    if let Some(n) = get_i64(v, "maxAdd") {
        cfg.max_add = n;
    }
    if let Some(n) = get_i64(v, "maxSub") {
        cfg.max_sub = n;
    }
    if let Some(n) = get_i64(v, "maxMul") {
        cfg.max_mul = n;
    }
    if let Some(n) = get_i64(v, "maxDiv") {
        cfg.max_div = n;
    }
    if let Some(n) = get_i64(v, "minTimeMs") {
        cfg.min_time_ms = n;
    }
    if let Some(n) = get_i64(v, "startTimeMs") {
        cfg.start_time_ms = n;
    }
    if let Some(n) = get_i64(v, "timeStepMs") {
        cfg.time_step_ms = n;
    }
    if let Some(n) = get_i64(v, "streakToSpeedUp") {
        cfg.streak_to_speed_up = n;
    }
    if let Some(n) = get_i64(v, "streakToLevelUp") {
        cfg.streak_to_level_up = n;
    }
    if let Some(n) = get_i64(v, "levelMax") {
        cfg.level_max = n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_ALLOWED_MIN_TIME_MS;
    use crate::domain::Totals;

    fn temp_store() -> (tempfile::TempDir, ProgressStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("state.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_loads_defaults() {
        let (_dir, store) = temp_store();
        let p = store.load();
        assert_eq!(p.level, 1);
        assert_eq!(p.totals, Totals::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "{not json at all").unwrap();
        let p = store.load();
        assert_eq!(p.level, 1);
    }

    #[test]
    fn partial_legacy_record_backfills_missing_fields() {
        let (_dir, store) = temp_store();
        // An old add/sub-only record: no caps, no theme, no version.
        std::fs::write(
            store.path(),
            r#"{"config":{"soundOn":false,"startTimeMs":8000},"operation":"sub","level":3,
                "totals":{"played":7,"correct":5}}"#,
        )
        .unwrap();
        let p = store.load();
        assert!(!p.config.sound_on);
        assert_eq!(p.config.start_time_ms, 8_000);
        assert_eq!(p.config.max_mul, 12); // backfilled default
        assert_eq!(p.operation, Operation::Sub);
        assert_eq!(p.level, 3);
        assert_eq!(p.totals.played, 7);
        assert_eq!(p.totals.correct, 5);
        assert!(p.history.is_empty());
    }

    #[test]
    fn non_numeric_config_values_keep_defaults() {
        let (_dir, store) = temp_store();
        std::fs::write(
            store.path(),
            r#"{"config":{"minTimeMs":"soon","startTimeMs":9000},"level":"high"}"#,
        )
        .unwrap();
        let p = store.load();
        assert_eq!(p.config.min_time_ms, 2_200);
        assert_eq!(p.config.start_time_ms, 9_000);
        assert_eq!(p.level, 1);
    }

    #[test]
    fn out_of_range_values_are_repaired_on_load() {
        let (_dir, store) = temp_store();
        std::fs::write(
            store.path(),
            r#"{"config":{"minTimeMs":10,"startTimeMs":999999},"level":40,"streak":-4}"#,
        )
        .unwrap();
        let p = store.load();
        assert_eq!(p.config.min_time_ms, MIN_ALLOWED_MIN_TIME_MS);
        assert_eq!(p.config.start_time_ms, 120_000);
        assert_eq!(p.level, p.config.level_max);
        assert_eq!(p.streak, 0);
    }

    #[test]
    fn save_load_round_trip_is_byte_stable() {
        let (_dir, store) = temp_store();
        let mut p = store.load();
        p.level = 4;
        p.totals.played = 3;
        store.save(&mut p).unwrap();
        let first = std::fs::read(store.path()).unwrap();

        let mut again = store.load();
        store.save(&mut again).unwrap();
        let second = std::fs::read(store.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn update_is_read_modify_write() {
        let (_dir, store) = temp_store();
        store.update(|p| p.totals.played = 9).unwrap();
        let p = store.update(|p| p.totals.played += 1).unwrap();
        assert_eq!(p.totals.played, 10);
        assert_eq!(store.load().totals.played, 10);
    }

    #[test]
    fn set_operation_persists() {
        let (_dir, store) = temp_store();
        store.set_operation(Operation::Div).unwrap();
        assert_eq!(store.load().operation, Operation::Div);
    }

    #[test]
    fn reset_tolerates_missing_file() {
        let (_dir, store) = temp_store();
        store.reset().unwrap();
        store.update(|p| p.level = 5).unwrap();
        store.reset().unwrap();
        assert_eq!(store.load().level, 1);
    }

    #[test]
    fn export_import_round_trips() {
        let (_dir, store) = temp_store();
        store
            .update(|p| {
                p.level = 6;
                p.totals = Totals { played: 30, correct: 25, total_answer_time_ms: 40_000 };
                p.rewards.stars = 5;
            })
            .unwrap();
        let exported = store.export_json().unwrap();

        let (_dir2, other) = temp_store();
        let imported = other.import_json(&exported).unwrap();
        assert_eq!(imported.level, 6);
        assert_eq!(imported.totals.played, 30);
        assert_eq!(imported.rewards.stars, 5);
        assert_eq!(other.load().level, 6);
    }

    #[test]
    fn malformed_import_reports_and_leaves_state_alone() {
        let (_dir, store) = temp_store();
        store.update(|p| p.level = 2).unwrap();

        assert!(store.import_json("definitely not json").is_err());
        assert!(store.import_json(r#"{"app":"other-game","version":1,"exportedAt":0,"state":{}}"#).is_err());
        assert!(store.import_json(r#"{"app":"mathis-cool","version":99,"exportedAt":0,"state":{}}"#).is_err());

        assert_eq!(store.load().level, 2);
    }
}
