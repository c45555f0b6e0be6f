//! Field-path edits for drafts.
//!
//! HTTP callers describe a mutation as a list of edits addressed by a
//! `/`-separated path into the draft's JSON form (JSON Pointer syntax: `~1`
//! escapes `/`, `~0` escapes `~`):
//!
//! ```text
//! { "op": "set",    "path": "/Breads/0/price", "value": "45" }
//! { "op": "push",   "path": "/Breads",         "value": { "name": "Naan", "price": "40" } }
//! { "op": "remove", "path": "/Breads" }
//! ```
//!
//! Edits are applied to a copy; the result must still deserialize into the
//! draft type, otherwise the whole list is rejected.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FieldEdit {
    /// Replace the value at `path` (object keys are created; array indices
    /// must exist, `-` appends).
    Set { path: String, value: Value },
    /// Remove an object key or an array element.
    Remove { path: String },
    /// Append to the array at `path`.
    Push { path: String, value: Value },
}

impl FieldEdit {
    pub fn path(&self) -> &str {
        match self {
            FieldEdit::Set { path, .. }
            | FieldEdit::Remove { path }
            | FieldEdit::Push { path, .. } => path,
        }
    }
}

/// Apply `edits` in order to a copy of `draft`.
pub fn apply_edits<D>(draft: &D, edits: &[FieldEdit]) -> Result<D, CoreError>
where
    D: Serialize + DeserializeOwned,
{
    let mut value = serde_json::to_value(draft)
        .map_err(|e| CoreError::Internal(format!("Draft is not serializable: {e}")))?;

    for edit in edits {
        apply_one(&mut value, edit)
            .map_err(|reason| CoreError::Validation(format!("{} ({})", reason, edit.path())))?;
    }

    serde_json::from_value(value)
        .map_err(|e| CoreError::Validation(format!("Edit does not fit the draft: {e}")))
}

fn apply_one(root: &mut Value, edit: &FieldEdit) -> Result<(), String> {
    match edit {
        FieldEdit::Push { path, value } => match lookup(root, checked(path)?)? {
            Value::Array(items) => {
                items.push(value.clone());
                Ok(())
            }
            _ => Err("push target is not a list".into()),
        },
        FieldEdit::Set { path, value } => {
            let Some((parent, last)) = split_last(path)? else {
                *root = value.clone();
                return Ok(());
            };
            match lookup(root, parent)? {
                Value::Object(map) => {
                    map.insert(last, value.clone());
                    Ok(())
                }
                Value::Array(items) if last == "-" => {
                    items.push(value.clone());
                    Ok(())
                }
                Value::Array(items) => {
                    let index = parse_index(&last, items.len())?;
                    items[index] = value.clone();
                    Ok(())
                }
                _ => Err("parent is neither an object nor a list".into()),
            }
        }
        FieldEdit::Remove { path } => {
            let (parent, last) =
                split_last(path)?.ok_or_else(|| "cannot remove the whole draft".to_string())?;
            match lookup(root, parent)? {
                Value::Object(map) => map
                    .remove(&last)
                    .map(|_| ())
                    .ok_or_else(|| format!("no field named '{last}'")),
                Value::Array(items) => {
                    let index = parse_index(&last, items.len())?;
                    items.remove(index);
                    Ok(())
                }
                _ => Err("parent is neither an object nor a list".into()),
            }
        }
    }
}

fn checked(path: &str) -> Result<&str, String> {
    if path.is_empty() || path.starts_with('/') {
        Ok(path)
    } else {
        Err("path must start with '/'".into())
    }
}

/// Split a pointer into its parent pointer and unescaped last segment;
/// `None` for the root.
fn split_last(path: &str) -> Result<Option<(&str, String)>, String> {
    let path = checked(path)?;
    Ok(path.rfind('/').map(|at| {
        let last = path[at + 1..].replace("~1", "/").replace("~0", "~");
        (&path[..at], last)
    }))
}

fn lookup<'a>(root: &'a mut Value, pointer: &str) -> Result<&'a mut Value, String> {
    root.pointer_mut(pointer)
        .ok_or_else(|| format!("nothing at '{pointer}'"))
}

fn parse_index(segment: &str, len: usize) -> Result<usize, String> {
    match segment.parse::<usize>() {
        Ok(i) if i < len => Ok(i),
        Ok(i) => Err(format!("index {i} is out of range")),
        Err(_) => Err(format!("'{segment}' is not a list index")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Item {
        name: String,
        price: String,
    }

    type Catalog = BTreeMap<String, Vec<Item>>;

    fn catalog() -> Catalog {
        let mut c = Catalog::new();
        c.insert(
            "Rice".into(),
            vec![Item {
                name: "Pulao".into(),
                price: "80".into(),
            }],
        );
        c
    }

    #[test]
    fn set_nested_field() {
        let edits = vec![FieldEdit::Set {
            path: "/Rice/0/price".into(),
            value: json!("90"),
        }];
        let next = apply_edits(&catalog(), &edits).unwrap();
        assert_eq!(next["Rice"][0].price, "90");
    }

    #[test]
    fn escaped_slash_addresses_category_with_slash() {
        let edits = vec![FieldEdit::Set {
            path: "/Roti ~1 Bread".into(),
            value: json!([]),
        }];
        let next = apply_edits(&catalog(), &edits).unwrap();
        assert!(next.contains_key("Roti / Bread"));
    }

    #[test]
    fn push_then_remove() {
        let edits = vec![
            FieldEdit::Push {
                path: "/Rice".into(),
                value: json!({ "name": "Jeera Rice", "price": "60" }),
            },
            FieldEdit::Remove {
                path: "/Rice/0".into(),
            },
        ];
        let next = apply_edits(&catalog(), &edits).unwrap();
        assert_eq!(next["Rice"].len(), 1);
        assert_eq!(next["Rice"][0].name, "Jeera Rice");
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let edits = vec![FieldEdit::Set {
            path: "/Rice/5/price".into(),
            value: json!("1"),
        }];
        let err = apply_edits(&catalog(), &edits).unwrap_err();
        assert!(err.to_string().contains("/Rice/5/price"));
    }

    #[test]
    fn missing_parent_is_rejected() {
        let edits = vec![FieldEdit::Remove {
            path: "/Sweets/0".into(),
        }];
        let err = apply_edits(&catalog(), &edits).unwrap_err();
        assert_matches!(err, CoreError::Validation(reason) if reason == "nothing at '/Sweets' (/Sweets/0)");
    }

    #[test]
    fn escaped_parent_is_walked() {
        let mut c = catalog();
        c.insert("Roti / Bread".into(), vec![Item::default()]);
        let edits = vec![FieldEdit::Set {
            path: "/Roti ~1 Bread/0/name".into(),
            value: json!("Tandoori Roti"),
        }];
        let next = apply_edits(&c, &edits).unwrap();
        assert_eq!(next["Roti / Bread"][0].name, "Tandoori Roti");
    }

    #[test]
    fn relative_path_is_rejected() {
        let edits = vec![FieldEdit::Remove {
            path: "Rice".into(),
        }];
        let err = apply_edits(&catalog(), &edits).unwrap_err();
        assert!(err.to_string().contains("must start with '/'"));
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let edits = vec![FieldEdit::Set {
            path: "/Rice/0/price".into(),
            value: json!({ "not": "a string" }),
        }];
        let err = apply_edits(&catalog(), &edits).unwrap_err();
        assert!(err.to_string().contains("does not fit"));
    }

    #[test]
    fn edit_ops_deserialize_from_tagged_json() {
        let edit: FieldEdit =
            serde_json::from_value(json!({ "op": "remove", "path": "/Rice" })).unwrap();
        assert_eq!(
            edit,
            FieldEdit::Remove {
                path: "/Rice".into()
            }
        );
    }
}
