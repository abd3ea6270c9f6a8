use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Record;

/// One named extraction rule as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub description: String,
}

impl FieldRule {
    pub fn new(name: &str, pattern: &str, description: &str) -> Self {
        Self { name: name.to_string(), pattern: pattern.to_string(), description: description.to_string() }
    }
}

/// The rule table used when configuration does not provide one.
///
/// Digit classes and word boundaries are ASCII-only.
pub fn default_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new("timestamp", r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2},[0-9]{3}", "The exact time the log entry was recorded."),
        FieldRule::new("logLevel", r"(DEBUG|INFO|WARN|ERROR)", "The level of logging: DEBUG, INFO, WARN, ERROR."),
        FieldRule::new("email", r"(?-u:\b)[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,7}(?-u:\b)", "The email address of the user involved in the log."),
        FieldRule::new("key", r"[A-Za-z0-9_-]{20,}", "A unique key, token, or identifier for the session or action."),
        FieldRule::new("policyNumber", r"(?-u:\b)[0-9]{9}(?-u:\b)", "A policy number associated with the log entry."),
        FieldRule::new("otherData", r"(?-u:\b)[0-9]{10,}(?-u:\b)", "Any other numerical data found in the log."),
    ]
}

#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: FieldRule,
    regex: Regex,
}

impl CompiledRule {
    pub fn name(&self) -> &str { &self.rule.name }
    pub fn pattern(&self) -> &str { &self.rule.pattern }
    pub fn description(&self) -> &str { &self.rule.description }
}

/// Applies an ordered rule table to single lines.
///
/// Rules are evaluated independently; each stores its first match under its
/// name. Lines are processed statelessly, so the same line always yields the
/// same record.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    rules: Vec<CompiledRule>,
}

impl FieldExtractor {
    pub fn new(rules: &[FieldRule]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            if rule.name.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("rule with pattern '{}' has an empty name", rule.pattern)));
            }
            let regex = Regex::new(&rule.pattern)
                .map_err(|source| Error::InvalidRule { name: rule.name.clone(), source })?;
            compiled.push(CompiledRule { rule: rule.clone(), regex });
        }
        tracing::debug!(rules = compiled.len(), "compiled extraction rules");
        Ok(Self { rules: compiled })
    }

    pub fn with_default_rules() -> Result<Self> { Self::new(&default_rules()) }

    pub fn extract(&self, line: &str) -> Record {
        let mut record = Record::new();
        for rule in &self.rules {
            if record.contains(rule.name()) { continue; }
            if let Some(m) = rule.regex.find(line) { record.insert_if_absent(rule.name(), m.as_str()); }
        }
        record
    }

    pub fn rules(&self) -> &[CompiledRule] { &self.rules }
}
