use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a key could not be placed in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyConflict {
    #[error("'{key}' passes through the text entry '{leaf}'")]
    ThroughLeaf { key: String, leaf: String },

    #[error("'{key}' is already a group of keys")]
    IsGroup { key: String },

    #[error("'{key}' already holds \"{existing}\"")]
    Occupied { key: String, existing: String },

    #[error("'{key}' is not a valid key path")]
    Malformed { key: String },
}

/// Nested, ordered mapping of one locale: module, then key path, then text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceTree {
    root: Map<String, Value>,
}

impl ResourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Insert `text` at the dot-path `key`, creating groups as needed.
    ///
    /// Inserting the same text twice is a no-op.
    pub fn insert(&mut self, key: &str, text: &str) -> Result<(), KeyConflict> {
        let segments: Vec<&str> = key.split('.').collect();
        if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
            return Err(KeyConflict::Malformed {
                key: key.to_string(),
            });
        }

        let (leaf, groups) = segments.split_last().ok_or_else(|| KeyConflict::Malformed {
            key: key.to_string(),
        })?;

        let mut current = &mut self.root;
        for (depth, segment) in groups.iter().enumerate() {
            let node = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = match node {
                Value::Object(map) => map,
                _ => {
                    return Err(KeyConflict::ThroughLeaf {
                        key: key.to_string(),
                        leaf: segments[..=depth].join("."),
                    });
                }
            };
        }

        if let Some(existing) = current.get(*leaf) {
            return match existing {
                Value::String(existing) if existing == text => Ok(()),
                Value::String(existing) => Err(KeyConflict::Occupied {
                    key: key.to_string(),
                    existing: existing.clone(),
                }),
                _ => Err(KeyConflict::IsGroup {
                    key: key.to_string(),
                }),
            };
        }

        current.insert(leaf.to_string(), Value::String(text.to_string()));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let mut node = self.root.get(segments.next()?)?;
        for segment in segments {
            node = node.as_object()?.get(segment)?;
        }
        Some(node)
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Top-level modules in insertion order.
    pub fn modules(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.root.iter()
    }

    pub fn set_module(&mut self, name: &str, content: Value) {
        self.root.insert(name.to_string(), content);
    }

    /// Every `(key, text)` leaf in depth-first order.
    pub fn leaves(&self) -> Vec<(String, String)> {
        let mut leaves = Vec::new();
        for (name, value) in &self.root {
            collect_leaves(name, value, &mut leaves);
        }
        leaves
    }

    /// Copy the tree structure, replacing every text via `f(key, text)`.
    pub fn map_texts<F>(&self, mut f: F) -> ResourceTree
    where
        F: FnMut(&str, &str) -> String,
    {
        let root = self
            .root
            .iter()
            .map(|(name, value)| (name.clone(), map_value(name, value, &mut f)))
            .collect();
        ResourceTree { root }
    }

    /// Add every leaf of `other` not yet present here.
    pub fn merge_missing(&mut self, other: &ResourceTree) -> Vec<KeyConflict> {
        other
            .leaves()
            .into_iter()
            .filter_map(|(key, text)| self.insert(&key, &text).err())
            .collect()
    }
}

fn collect_leaves(path: &str, value: &Value, leaves: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                collect_leaves(&format!("{}.{}", path, key), child, leaves);
            }
        }
        Value::String(text) => leaves.push((path.to_string(), text.clone())),
        other => leaves.push((path.to_string(), other.to_string())),
    }
}

fn map_value<F>(path: &str, value: &Value, f: &mut F) -> Value
where
    F: FnMut(&str, &str) -> String,
{
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, child)| {
                    let child_path = format!("{}.{}", path, key);
                    (key.clone(), map_value(&child_path, child, f))
                })
                .collect(),
        ),
        Value::String(text) => Value::String(f(path, text)),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_insert_creates_groups() {
        let mut tree = ResourceTree::new();
        tree.insert("User.form.name", "姓名").unwrap();
        tree.insert("User.title", "用户").unwrap();
        tree.insert("Common.submit", "提交").unwrap();

        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({
                "User": { "form": { "name": "姓名" }, "title": "用户" },
                "Common": { "submit": "提交" }
            })
        );
        assert_eq!(tree.get_text("User.form.name"), Some("姓名"));
        assert_eq!(tree.get_text("User.form"), None);
    }

    #[test]
    fn test_insert_conflicts() {
        let mut tree = ResourceTree::new();
        tree.insert("User.name", "姓名").unwrap();

        assert!(tree.insert("User.name", "姓名").is_ok());
        assert!(matches!(
            tree.insert("User.name", "名字"),
            Err(KeyConflict::Occupied { .. })
        ));
        assert!(matches!(
            tree.insert("User.name.first", "名"),
            Err(KeyConflict::ThroughLeaf { leaf, .. }) if leaf == "User.name"
        ));
        assert!(matches!(
            tree.insert("User", "用户"),
            Err(KeyConflict::Malformed { .. })
        ));

        tree.insert("User.group.a", "甲").unwrap();
        assert!(matches!(
            tree.insert("User.group", "组"),
            Err(KeyConflict::IsGroup { .. })
        ));
    }

    #[test]
    fn test_leaves_in_order() {
        let mut tree = ResourceTree::new();
        tree.insert("B.x", "一").unwrap();
        tree.insert("A.y.z", "二").unwrap();

        assert_eq!(
            tree.leaves(),
            vec![
                ("B.x".to_string(), "一".to_string()),
                ("A.y.z".to_string(), "二".to_string()),
            ]
        );
    }

    #[test]
    fn test_map_texts_preserves_structure() {
        let mut tree = ResourceTree::new();
        tree.insert("User.form.name", "姓名").unwrap();
        tree.insert("User.title", "用户").unwrap();

        let mapped = tree.map_texts(|key, text| format!("{}={}", key, text));
        assert_eq!(mapped.get_text("User.form.name"), Some("User.form.name=姓名"));
        assert_eq!(mapped.get_text("User.title"), Some("User.title=用户"));
    }

    #[test]
    fn test_merge_missing() {
        let mut tree = ResourceTree::new();
        tree.insert("User.a", "甲").unwrap();

        let mut other = ResourceTree::new();
        other.insert("User.a", "乙").unwrap();
        other.insert("User.b", "丙").unwrap();

        let conflicts = tree.merge_missing(&other);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(tree.get_text("User.a"), Some("甲"));
        assert_eq!(tree.get_text("User.b"), Some("丙"));
    }
}
