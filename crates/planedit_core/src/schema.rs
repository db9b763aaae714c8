//! Per-type storage schema for autosave records.
//!
//! The stored representation is flatter than the in-memory working copy.
//! Each item type declares a list of `(path, transform)` rules; a path
//! segment ending in `[]` applies the rest of the path to every element of
//! that array.

use crate::types::{Fields, ItemType};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

/// Shape change between working copy and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTransform {
    /// Scalar in memory, one-element list in storage.
    Singleton,
    /// Date/time value, stored as an RFC 3339 UTC instant.
    Instant,
}

/// A single schema rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Dotted field path, `[]` marks array fan-out.
    pub path: &'static str,
    /// Transform applied at that path.
    pub transform: FieldTransform,
}

const fn rule(path: &'static str, transform: FieldTransform) -> FieldRule {
    FieldRule { path, transform }
}

const EVENT_RULES: &[FieldRule] = &[
    rule("location", FieldTransform::Singleton),
    rule("dates.start", FieldTransform::Instant),
    rule("dates.end", FieldTransform::Instant),
];

const PLANNING_RULES: &[FieldRule] = &[
    rule("planning_date", FieldTransform::Instant),
    rule("coverages[].planning.genre", FieldTransform::Singleton),
    rule("coverages[].planning.scheduled", FieldTransform::Instant),
];

/// Storage schema of one item type.
#[derive(Debug, Clone, Copy)]
pub struct ItemSchema {
    rules: &'static [FieldRule],
}

impl ItemSchema {
    /// Returns the schema for an item type.
    pub fn for_type(item_type: ItemType) -> Self {
        let rules = match item_type {
            ItemType::Event => EVENT_RULES,
            ItemType::Planning => PLANNING_RULES,
        };
        Self { rules }
    }

    /// Returns the schema rules.
    pub fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }

    /// Converts working-copy fields into their stored shape.
    pub fn project(&self, fields: &mut Fields) {
        for rule in self.rules {
            let mut apply = |map: &mut Fields, key: &str| match rule.transform {
                FieldTransform::Singleton => wrap_singleton(map, key),
                FieldTransform::Instant => normalize_instant(map, key),
            };
            walk(fields, &segments(rule.path), &mut apply);
        }
    }

    /// Converts stored fields back into the working-copy shape.
    pub fn denormalize(&self, fields: &mut Fields) {
        for rule in self.rules {
            let mut apply = |map: &mut Fields, key: &str| match rule.transform {
                FieldTransform::Singleton => unwrap_singleton(map, key),
                FieldTransform::Instant => normalize_instant(map, key),
            };
            walk(fields, &segments(rule.path), &mut apply);
        }
    }
}

/// Parses a stored instant.
pub fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Formats an instant the way records store it.
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn segments(path: &str) -> Vec<&str> {
    path.split('.').collect()
}

fn walk(map: &mut Fields, segments: &[&str], apply: &mut dyn FnMut(&mut Fields, &str)) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        apply(map, head);
        return;
    }

    if let Some(name) = head.strip_suffix("[]") {
        if let Some(Value::Array(items)) = map.get_mut(name) {
            for item in items.iter_mut() {
                if let Value::Object(child) = item {
                    walk(child, rest, apply);
                }
            }
        }
    } else if let Some(Value::Object(child)) = map.get_mut(*head) {
        walk(child, rest, apply);
    }
}

fn wrap_singleton(map: &mut Fields, key: &str) {
    if let Some(value) = map.get_mut(key) {
        if !value.is_null() && !value.is_array() {
            let scalar = value.take();
            *value = Value::Array(vec![scalar]);
        }
    }
}

fn unwrap_singleton(map: &mut Fields, key: &str) {
    let first = match map.get(key) {
        Some(Value::Array(items)) => items.first().cloned(),
        Some(Value::Null) => None,
        _ => return,
    };
    match first {
        Some(value) => {
            map.insert(key.to_string(), value);
        }
        None => {
            map.remove(key);
        }
    }
}

fn normalize_instant(map: &mut Fields, key: &str) {
    let Some(value) = map.get_mut(key) else {
        return;
    };
    if value.is_null() {
        return;
    }
    match parse_instant(value) {
        Some(instant) => *value = Value::String(format_instant(&instant)),
        None => debug!(field = key, "leaving unparseable instant as stored"),
    }
}
