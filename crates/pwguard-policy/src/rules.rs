//! Lenient readers for a policy definition's rule map.
//!
//! Rule values are typed in by administrators, so nothing here fails:
//! a missing, negative, or unparsable value yields the caller's default.

use serde_json::{Map, Value};

/// Read-only view over a definition's `validation_rules`.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet<'a> {
    rules: Option<&'a Map<String, Value>>,
}

impl<'a> RuleSet<'a> {
    /// Wrap a rule map. `None` behaves like an empty map.
    pub fn new(rules: Option<&'a Map<String, Value>>) -> Self {
        Self { rules }
    }

    /// An empty rule set; every lookup returns its default.
    pub fn empty() -> Self {
        Self { rules: None }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.rules.and_then(|rules| rules.get(key))
    }

    /// Read a non-negative integer given as a JSON number or numeric string.
    pub fn u32_or(&self, key: &str, default: u32) -> u32 {
        let parsed = match self.get(key) {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
                .and_then(|v| u32::try_from(v).ok()),
            Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
            _ => None,
        };
        parsed.unwrap_or(default)
    }

    /// Like [`Self::u32_or`], but zero also falls back to the default.
    pub fn positive_u32_or(&self, key: &str, default: u32) -> u32 {
        match self.u32_or(key, default) {
            0 => default,
            v => v,
        }
    }

    /// Read a string value; non-string values fall back to the default.
    pub fn string_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            _ => default.to_string(),
        }
    }
}
