//! Deep merge of JSON documents.
//!
//! Rules, applied recursively from the root:
//!
//! | destination | source | result |
//! |-------------|--------|--------|
//! | object      | object | key-by-key merge; keys only in source are added |
//! | array       | array  | decided by [`ArrayMergeStrategy`] |
//! | anything    | other  | source value replaces destination |
//!
//! ## `merge` arrays
//!
//! Each source element is placed with the first rule that applies:
//!
//! 1. It is an object with a string `name`, and the destination holds an
//!    object with the same `name`: the two objects are deep-merged.
//! 2. Its index exists in the destination: objects deep-merge, anything
//!    else replaces the destination element.
//! 3. Otherwise it is appended.
//!
//! Nested arrays inside merged elements use the same strategy.

use serde_json::Value;

use crate::domain::entities::ArrayMergeStrategy;

/// Merge `source` into `destination` in place.
pub fn deep_merge(destination: &mut Value, source: &Value, strategy: ArrayMergeStrategy) {
    match (destination, source) {
        (Value::Object(dest), Value::Object(src)) => {
            for (key, src_value) in src {
                match dest.get_mut(key) {
                    Some(dest_value) => deep_merge(dest_value, src_value, strategy),
                    None => {
                        dest.insert(key.clone(), src_value.clone());
                    }
                }
            }
        }
        (Value::Array(dest), Value::Array(src)) => merge_arrays(dest, src, strategy),
        (dest, src) => *dest = src.clone(),
    }
}

/// Convenience wrapper returning the merged document.
pub fn merged(mut destination: Value, source: &Value, strategy: ArrayMergeStrategy) -> Value {
    deep_merge(&mut destination, source, strategy);
    destination
}

fn merge_arrays(dest: &mut Vec<Value>, src: &[Value], strategy: ArrayMergeStrategy) {
    match strategy {
        ArrayMergeStrategy::Append => dest.extend(src.iter().cloned()),
        ArrayMergeStrategy::Replace => *dest = src.to_vec(),
        ArrayMergeStrategy::Merge => {
            for (index, item) in src.iter().enumerate() {
                if let Some(slot) = named_match(dest, item) {
                    deep_merge(&mut dest[slot], item, strategy);
                } else if let Some(existing) = dest.get_mut(index) {
                    if existing.is_object() && item.is_object() {
                        deep_merge(existing, item, strategy);
                    } else {
                        *existing = item.clone();
                    }
                } else {
                    dest.push(item.clone());
                }
            }
        }
    }
}

fn named_match(dest: &[Value], item: &Value) -> Option<usize> {
    let name = item.get("name")?.as_str()?;
    dest.iter()
        .position(|candidate| candidate.get("name").and_then(Value::as_str) == Some(name))
}
