//! Pluggable validation of working copies against form profiles.

use crate::types::{Fields, ItemType, ValidationErrors};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Per-field rules of a form profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldProfile {
    /// The field must be present and non-empty.
    pub required: bool,
    /// Maximum length in characters for string values.
    pub max_length: Option<usize>,
}

/// Form profile of one item type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormProfile {
    /// Field name → rules.
    pub schema: BTreeMap<String, FieldProfile>,
}

/// Form profiles keyed by item type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormProfiles {
    /// Item type → profile.
    pub profiles: BTreeMap<ItemType, FormProfile>,
}

impl FormProfiles {
    /// Returns the profile for an item type.
    pub fn get(&self, item_type: ItemType) -> Option<&FormProfile> {
        self.profiles.get(&item_type)
    }

    /// Adds or replaces a profile.
    pub fn with_profile(mut self, item_type: ItemType, profile: FormProfile) -> Self {
        self.profiles.insert(item_type, profile);
        self
    }
}

/// Validation collaborator.
///
/// Implementations add entries to `errors` keyed by field path and push
/// human-readable summaries to `messages`. The caller starts both empty.
pub trait Validator {
    /// Validates `diff` for an item type.
    fn validate(
        &self,
        item_type: ItemType,
        diff: &Fields,
        profiles: &FormProfiles,
        errors: &mut ValidationErrors,
        messages: &mut Vec<String>,
    );
}

impl<F> Validator for F
where
    F: Fn(ItemType, &Fields, &FormProfiles, &mut ValidationErrors, &mut Vec<String>),
{
    fn validate(
        &self,
        item_type: ItemType,
        diff: &Fields,
        profiles: &FormProfiles,
        errors: &mut ValidationErrors,
        messages: &mut Vec<String>,
    ) {
        self(item_type, diff, profiles, errors, messages)
    }
}

/// Validator that enforces `required` and `max_length` from form profiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileValidator;

impl Validator for ProfileValidator {
    fn validate(
        &self,
        item_type: ItemType,
        diff: &Fields,
        profiles: &FormProfiles,
        errors: &mut ValidationErrors,
        messages: &mut Vec<String>,
    ) {
        let Some(profile) = profiles.get(item_type) else {
            return;
        };

        for (field, rules) in &profile.schema {
            let value = diff.get(field);

            if rules.required && is_empty(value) {
                let message = format!("{} is required", field);
                errors.entry(field.clone()).or_default().push(message.clone());
                messages.push(message);
                continue;
            }

            if let (Some(max), Some(Value::String(s))) = (rules.max_length, value) {
                let len = s.chars().count();
                if len > max {
                    let message = format!("{} is too long ({} > {})", field, len, max);
                    errors.entry(field.clone()).or_default().push(message.clone());
                    messages.push(message);
                }
            }
        }
    }
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

/// Runs a validator from a clean slate.
pub fn run_validation(
    validator: &dyn Validator,
    item_type: ItemType,
    diff: &Fields,
    profiles: &FormProfiles,
) -> (ValidationErrors, Vec<String>) {
    let mut errors = ValidationErrors::new();
    let mut messages = Vec::new();
    validator.validate(item_type, diff, profiles, &mut errors, &mut messages);
    (errors, messages)
}
