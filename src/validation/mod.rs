// Declarative input validation
//
// A rule set is plain data: an ordered table of field rules. `validate` walks
// the whole table against a request body and either hands back the
// normalized fields or every violation it found, in table order.

pub mod rules;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use rules::{CREATE_TASK, UPDATE_TASK};

/// A single field-level rule failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absent or null produces the rule's violation.
    Required,
    /// Absent or null means "not provided"; the rule is skipped.
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    /// Strip surrounding whitespace from string values.
    Trim,
}

impl Normalize {
    fn apply(&self, value: Value) -> Value {
        match (self, value) {
            (Normalize::Trim, Value::String(s)) => Value::String(s.trim().to_string()),
            (_, other) => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// String whose length in characters lies in `min..=max`.
    Length { min: usize, max: usize },
    /// JSON boolean.
    Boolean,
}

impl Check {
    fn passes(&self, value: &Value) -> bool {
        match self {
            Check::Length { min, max } => match value {
                Value::String(s) => {
                    let len = s.chars().count();
                    len >= *min && len <= *max
                }
                _ => false,
            },
            Check::Boolean => value.is_boolean(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub presence: Presence,
    pub normalize: Option<Normalize>,
    pub check: Check,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct RuleSet {
    pub name: &'static str,
    pub rules: &'static [FieldRule],
}

/// Normalized input that passed every rule of its rule set.
///
/// Only fields named by the rule set survive, and only when they were
/// provided; an optional field the caller left out is absent here too.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedFields(Map<String, Value>);

impl ValidatedFields {
    pub fn str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn bool(&self, field: &str) -> Option<bool> {
        self.0.get(field).and_then(Value::as_bool)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Evaluate every rule of `rule_set` against `body`.
///
/// Rules never short-circuit each other: a request with three bad fields gets
/// three violations back. Normalization happens before the check, and the
/// normalized value is what later rules and the caller see.
pub fn validate(rule_set: &RuleSet, body: &Value) -> Result<ValidatedFields, Vec<Violation>> {
    let Some(input) = body.as_object() else {
        return Err(vec![Violation::new("body", "Request body must be a JSON object")]);
    };

    let mut normalized = Map::new();
    let mut violations = Vec::new();

    for rule in rule_set.rules {
        // A field may carry several rules; later rules see earlier normalization.
        let current = normalized
            .get(rule.field)
            .or_else(|| input.get(rule.field))
            .filter(|v| !v.is_null())
            .cloned();

        let Some(raw) = current else {
            if rule.presence == Presence::Required {
                violations.push(Violation::new(rule.field, rule.message));
            }
            continue;
        };

        let value = match rule.normalize {
            Some(n) => n.apply(raw),
            None => raw,
        };

        if !rule.check.passes(&value) {
            violations.push(Violation::new(rule.field, rule.message));
        }
        normalized.insert(rule.field.to_string(), value);
    }

    if violations.is_empty() {
        Ok(ValidatedFields(normalized))
    } else {
        tracing::debug!(
            "Rule set '{}' rejected input with {} violation(s)",
            rule_set.name,
            violations.len()
        );
        Err(violations)
    }
}
