//! Merging field edits into a working copy and deciding dirtiness.
//!
//! All functions here are pure: they take the working copy and the last
//! accepted item by reference and return or mutate only what they are given.

use crate::types::{is_bookkeeping_field, Fields, Item};
use serde_json::Value;

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Splits `coverages[0].planning.genre` or `coverages.0.planning.genre`.
fn parse_path(path: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    for part in path.split('.').filter(|p| !p.is_empty()) {
        let (name, mut rest) = match part.find('[') {
            Some(pos) => (&part[..pos], &part[pos..]),
            None => (part, ""),
        };

        if !name.is_empty() {
            match name.parse::<usize>() {
                Ok(idx) => segments.push(Segment::Index(idx)),
                Err(_) => segments.push(Segment::Key(name)),
            }
        }

        while let Some(end) = rest.find(']') {
            if let Ok(idx) = rest[1..end].parse::<usize>() {
                segments.push(Segment::Index(idx));
            }
            rest = &rest[end + 1..];
        }
    }
    segments
}

/// Largest number of nulls an index segment may pad an array with.
pub const MAX_INDEX_GAP: usize = 64;

/// Sets `value` at `path` inside `diff`, creating intermediate containers.
///
/// An index segment creates an array and pads it with nulls; a key segment
/// creates an object. A container of the wrong shape on the way is replaced.
///
/// Returns false and leaves `diff` untouched when the path names no field or
/// an index lies more than [`MAX_INDEX_GAP`] past the end of its array.
pub fn apply_field(diff: &mut Fields, path: &str, value: Value) -> bool {
    let segments = parse_path(path);
    let Some((Segment::Key(first), rest)) = segments.split_first() else {
        return false;
    };

    if rest.is_empty() {
        diff.insert((*first).to_string(), value);
        return true;
    }

    let mut slot = diff.get(*first).cloned().unwrap_or(Value::Null);
    if !set_in(&mut slot, rest, value) {
        return false;
    }
    diff.insert((*first).to_string(), slot);
    true
}

fn set_in(slot: &mut Value, segments: &[Segment<'_>], value: Value) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        *slot = value;
        return true;
    };

    match head {
        Segment::Key(key) => {
            if !slot.is_object() {
                *slot = Value::Object(Fields::new());
            }
            match slot {
                Value::Object(map) => {
                    let child = map.entry((*key).to_string()).or_insert(Value::Null);
                    set_in(child, rest, value)
                }
                _ => false,
            }
        }
        Segment::Index(idx) => {
            if !slot.is_array() {
                *slot = Value::Array(Vec::new());
            }
            match slot {
                Value::Array(items) => {
                    if idx.saturating_sub(items.len()) > MAX_INDEX_GAP {
                        return false;
                    }
                    if items.len() <= *idx {
                        items.resize(*idx + 1, Value::Null);
                    }
                    set_in(&mut items[*idx], rest, value)
                }
                _ => false,
            }
        }
    }
}

/// Semantic view of a field map: bookkeeping fields and nulls dropped.
pub fn semantic_projection(fields: &Fields) -> Fields {
    fields
        .iter()
        .filter(|(key, value)| !is_bookkeeping_field(key) && !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Compares two field maps by their semantic projection. Absent maps are empty.
pub fn items_equal(a: Option<&Fields>, b: Option<&Fields>) -> bool {
    let empty = Fields::new();
    let a = a.unwrap_or(&empty);
    let b = b.unwrap_or(&empty);

    let semantic = |(key, value): (&String, &Value)| !is_bookkeeping_field(key) && !value.is_null();
    a.iter().filter(|e| semantic(*e)).count() == b.iter().filter(|e| semantic(*e)).count()
        && a.iter()
            .filter(|e| semantic(*e))
            .all(|(key, value)| b.get(key) == Some(value))
}

/// Returns true when the working copy differs semantically from the item.
pub fn is_dirty(diff: &Fields, item: Option<&Item>) -> bool {
    !items_equal(Some(diff), item.map(Item::fields))
}

/// Rebuilds the working copy on top of a newer item.
///
/// A field is a local edit when its value in `diff` differs from `previous`.
/// Local edits win; every other field takes the value from `updated`. Fields
/// the user removed stay removed. Bookkeeping fields always come from `updated`.
pub fn rebase_edits(previous: Option<&Item>, diff: &Fields, updated: &Item) -> Fields {
    let empty = Fields::new();
    let previous = previous.map(Item::fields).unwrap_or(&empty);
    let mut rebased = updated.fields().clone();

    for (key, value) in diff {
        if is_bookkeeping_field(key) {
            continue;
        }
        if previous.get(key) != Some(value) {
            rebased.insert(key.clone(), value.clone());
        }
    }

    for key in previous.keys() {
        if !is_bookkeeping_field(key) && !diff.contains_key(key) {
            rebased.remove(key);
        }
    }

    rebased
}

/// Merges rehydrated autosave fields over a working copy.
///
/// Nulls and bookkeeping fields in the record are not merged.
pub fn merge_rehydrated(diff: &mut Fields, rehydrated: Fields) {
    for (key, value) in rehydrated {
        if is_bookkeeping_field(&key) || value.is_null() {
            continue;
        }
        diff.insert(key, value);
    }
}
