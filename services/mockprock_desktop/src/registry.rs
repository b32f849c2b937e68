//! In-memory exam and attempt registry. Nothing survives a restart.

use serde_json::{json, Value};
use std::collections::HashMap;

/// A fresh 32-hex-digit identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Default)]
pub struct Registry {
    exams: HashMap<String, Value>,
    attempts: HashMap<(String, String), Value>,
}

impl Registry {
    pub fn create_exam(&mut self, exam: Value) -> String {
        let id = new_id();
        self.exams.insert(id.clone(), exam);
        id
    }

    /// Store `exam` under `id`. Returns whether an exam was already there.
    pub fn put_exam(&mut self, id: &str, exam: Value) -> bool {
        self.exams.insert(id.to_string(), exam).is_some()
    }

    pub fn exam(&self, id: &str) -> Option<&Value> {
        self.exams.get(id)
    }

    /// The exam's `config` object, or `{}`.
    pub fn exam_config(&self, id: &str) -> Value {
        self.exam(id)
            .and_then(|e| e.get("config"))
            .cloned()
            .unwrap_or_else(|| json!({}))
    }

    pub fn create_attempt(&mut self, exam_id: &str, attempt: Value) -> String {
        let id = new_id();
        self.attempts
            .insert((exam_id.to_string(), id.clone()), attempt);
        id
    }

    pub fn attempt(&self, exam_id: &str, attempt_id: &str) -> Option<&Value> {
        self.attempts
            .get(&(exam_id.to_string(), attempt_id.to_string()))
    }

    /// Merge the top-level keys of `patch` into a stored attempt.
    /// Returns the merged attempt, or `None` when it does not exist.
    pub fn update_attempt(
        &mut self,
        exam_id: &str,
        attempt_id: &str,
        patch: &Value,
    ) -> Option<Value> {
        let attempt = self
            .attempts
            .get_mut(&(exam_id.to_string(), attempt_id.to_string()))?;
        if let (Some(stored), Some(fields)) = (attempt.as_object_mut(), patch.as_object()) {
            for (k, v) in fields {
                stored.insert(k.clone(), v.clone());
            }
        }
        Some(attempt.clone())
    }

    /// Where an attempt wants its callbacks sent.
    pub fn lms_host(&self, exam_id: &str, attempt_id: &str) -> Option<String> {
        self.attempt(exam_id, attempt_id)?
            .get("lms_host")?
            .as_str()
            .map(|h| h.trim_end_matches('/').to_string())
    }
}
