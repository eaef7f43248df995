//! Field rules for wizard steps.
//!
//! A step validates its own sub-object of the serialized draft. Field paths are
//! dotted (`times.filling_start`) and relative to that sub-object.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::signature::normalize_signature;

// HH:MM with optional seconds, fraction and offset, e.g. "08:05" or "08:05:00+00"
static RE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):[0-5]\d(:[0-5]\d(\.\d+)?)?(Z|[+-]\d{2}(:?\d{2})?)?$").unwrap()
});

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    Min(f64),
    Max(f64),
    Time,
    Signature,
}

#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub path: String,
    pub label: String,
    pub rules: Vec<Rule>,
}

impl FieldSchema {
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            rules: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.rules.push(Rule::Required);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.rules.push(Rule::Min(min));
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.rules.push(Rule::Max(max));
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn time(mut self) -> Self {
        self.rules.push(Rule::Time);
        self
    }

    pub fn signature(mut self) -> Self {
        self.rules.push(Rule::Signature);
        self
    }

    /// First failing rule's message, if any.
    fn check(&self, value: Option<&Value>) -> Option<String> {
        let Some(value) = value.filter(|v| !is_blank(v)) else {
            return self
                .rules
                .contains(&Rule::Required)
                .then(|| format!("{} is required", self.label));
        };

        for rule in &self.rules {
            let failure = match rule {
                Rule::Required => None,
                Rule::Min(min) => match value.as_f64() {
                    Some(n) if n < *min => Some(format!("{} must be at least {}", self.label, min)),
                    Some(_) => None,
                    None => Some(format!("{} must be a number", self.label)),
                },
                Rule::Max(max) => match value.as_f64() {
                    Some(n) if n > *max => Some(format!("{} must be at most {}", self.label, max)),
                    Some(_) => None,
                    None => Some(format!("{} must be a number", self.label)),
                },
                Rule::Time => match value.as_str() {
                    Some(s) if RE_TIME.is_match(s) => None,
                    _ => Some(format!("{} must be a time (HH:MM)", self.label)),
                },
                Rule::Signature => match value.as_str().map(normalize_signature) {
                    Some(Ok(_)) => None,
                    _ => Some(format!("{} must be a captured signature", self.label)),
                },
            };
            if failure.is_some() {
                return failure;
            }
        }
        None
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |node, key| node.get(key))
}

/// One wizard step: the draft key it owns and the rules for its fields.
#[derive(Debug, Clone)]
pub struct StepSchema {
    pub key: &'static str,
    pub title: &'static str,
    pub fields: Vec<FieldSchema>,
}

impl StepSchema {
    pub fn new(key: &'static str, title: &'static str) -> Self {
        Self {
            key,
            title,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates this step's sub-object of `draft`.
    pub fn validate(&self, draft: &Value) -> Result<(), FieldErrors> {
        let section = draft.get(self.key).unwrap_or(&Value::Null);
        let mut errors = FieldErrors::default();

        for field in &self.fields {
            if let Some(message) = field.check(lookup(section, &field.path)) {
                errors.insert(format!("{}.{}", self.key, field.path), message);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Field-level messages keyed by `<step>.<path>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Reads a numeric text input. Empty or unparsable input is "no value", never `0`.
pub fn parse_numeric_input(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
