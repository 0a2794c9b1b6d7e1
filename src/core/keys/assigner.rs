use std::collections::{BTreeMap, HashMap};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use super::resource_tree::{KeyConflict, ResourceTree};
use crate::config::{Config, KeyStrategy};
use crate::core::extract::{CapturedExpression, LiteralOccurrence};
use crate::utils::capitalize;

/// Short phrases with a conventional English key name.
const PHRASE_DICTIONARY: &[(&str, &str)] = &[
    ("提交", "submit"),
    ("取消", "cancel"),
    ("确认", "confirm"),
    ("确定", "confirm"),
    ("删除", "delete"),
    ("编辑", "edit"),
    ("保存", "save"),
    ("添加", "add"),
    ("新增", "add"),
    ("搜索", "search"),
    ("查询", "query"),
    ("重置", "reset"),
    ("返回", "back"),
    ("首页", "home"),
    ("用户", "user"),
    ("管理", "management"),
    ("设置", "settings"),
    ("登录", "login"),
    ("退出", "logout"),
    ("注册", "register"),
    ("导出", "export"),
    ("导入", "import"),
    ("上传", "upload"),
    ("下载", "download"),
    ("操作", "action"),
    ("状态", "status"),
    ("正常", "normal"),
    ("禁用", "disabled"),
    ("启用", "enabled"),
    ("成功", "success"),
    ("失败", "failed"),
    ("警告", "warning"),
    ("错误", "error"),
    ("提示", "tips"),
];

/// Resource key assigned to one occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    pub key: String,
    /// `(safe name, source expression)` pairs for interpolated text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<CapturedExpression>,
}

/// An occurrence left without a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnassignedOccurrence {
    pub location_key: String,
    pub conflict: KeyConflict,
}

#[derive(Debug, Default)]
pub struct Assignment {
    /// Location key to assigned key.
    pub entries: BTreeMap<String, KeyEntry>,
    pub tree: ResourceTree,
    pub unassigned: Vec<UnassignedOccurrence>,
}

/// `h = h * 31 + unit` over UTF-16 code units in 32-bit wrapping arithmetic,
/// rendered as the absolute value in base 36.
pub fn text_hash(text: &str) -> String {
    let hash = text.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
    });
    to_base36(hash.unsigned_abs())
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

enum PrefixMatcher {
    Glob(Pattern),
    Substring(String),
}

impl PrefixMatcher {
    fn matches(&self, file: &str) -> bool {
        match self {
            PrefixMatcher::Glob(pattern) => pattern.matches(file),
            PrefixMatcher::Substring(needle) => file.to_lowercase().contains(needle),
        }
    }
}

/// Maps occurrence texts to resource keys.
///
/// All counters live on the instance: one assigner per run.
pub struct KeyAssigner {
    overrides: BTreeMap<String, String>,
    strategy: KeyStrategy,
    prefixes: Vec<(PrefixMatcher, String)>,
    default_prefix: String,
    /// Normalized text to the key it was first given.
    by_text: HashMap<String, String>,
    /// Key to the text it holds.
    by_key: HashMap<String, String>,
    /// Next suffix to try per base key.
    suffixes: HashMap<String, usize>,
    tree: ResourceTree,
}

impl KeyAssigner {
    pub fn new(config: &Config) -> Self {
        let prefixes = config
            .key_prefixes
            .iter()
            .filter_map(|rule| {
                let matcher = if rule.pattern.contains('*') || rule.pattern.contains('?') {
                    PrefixMatcher::Glob(Pattern::new(&rule.pattern).ok()?)
                } else {
                    PrefixMatcher::Substring(rule.pattern.to_lowercase())
                };
                Some((matcher, normalize_prefix(&rule.prefix)))
            })
            .collect();

        Self {
            overrides: config
                .key_mappings
                .iter()
                .map(|(text, key)| (text.clone(), normalize_key(key)))
                .collect(),
            strategy: config.key_strategy,
            prefixes,
            default_prefix: normalize_prefix(&config.default_key_prefix),
            by_text: HashMap::new(),
            by_key: HashMap::new(),
            suffixes: HashMap::new(),
            tree: ResourceTree::new(),
        }
    }

    /// Start from an existing tree, so known texts keep their keys and new
    /// texts never take an occupied key.
    pub fn with_existing(mut self, tree: ResourceTree) -> Self {
        for (key, text) in tree.leaves() {
            self.by_text.entry(text.clone()).or_insert_with(|| key.clone());
            self.by_key.insert(key, text);
        }
        self.tree = tree;
        self
    }

    /// Capitalized module prefix for a file: first matching rule, else the default.
    pub fn module_prefix(&self, file: &str) -> &str {
        self.prefixes
            .iter()
            .find(|(matcher, _)| matcher.matches(file))
            .map(|(_, prefix)| prefix.as_str())
            .unwrap_or(&self.default_prefix)
    }

    /// Key for `text` found in `file`, reusing the key of an identical text.
    pub fn key_for(&mut self, file: &str, text: &str) -> String {
        if let Some(key) = self.overrides.get(text) {
            return key.clone();
        }
        if let Some(key) = self.by_text.get(text) {
            return key.clone();
        }

        let prefix = self.module_prefix(file).to_string();
        let base = match self.strategy {
            KeyStrategy::Semantic => match dictionary_word(text) {
                Some(word) => format!("{}.{}", prefix, word),
                None => format!("{}.text{}", prefix, text_hash(text)),
            },
            KeyStrategy::Hash => format!("{}.text{}", prefix, text_hash(text)),
        };

        self.unique(base, text)
    }

    fn unique(&mut self, base: String, text: &str) -> String {
        let free = |assigner: &Self, key: &str| {
            assigner
                .by_key
                .get(key)
                .is_none_or(|existing| existing == text)
                && !assigner.overrides.values().any(|k| k == key)
        };

        if free(self, &base) {
            return base;
        }
        loop {
            let counter = self.suffixes.entry(base.clone()).or_insert(0);
            *counter += 1;
            let candidate = format!("{}{}", base, counter);
            if free(self, &candidate) {
                return candidate;
            }
        }
    }

    /// Assign keys to every occurrence, in the given order.
    pub fn assign(mut self, occurrences: &[LiteralOccurrence]) -> Assignment {
        let mut entries = BTreeMap::new();
        let mut unassigned = Vec::new();

        for occurrence in occurrences {
            let key = self.key_for(&occurrence.file, &occurrence.text);
            if let Err(conflict) = self.tree.insert(&key, &occurrence.text) {
                tracing::warn!(
                    location = occurrence.location_key.as_str(),
                    "cannot assign key: {}",
                    conflict
                );
                unassigned.push(UnassignedOccurrence {
                    location_key: occurrence.location_key.clone(),
                    conflict,
                });
                continue;
            }

            tracing::debug!(
                location = occurrence.location_key.as_str(),
                key = key.as_str(),
                "key assigned"
            );
            self.by_text
                .entry(occurrence.text.clone())
                .or_insert_with(|| key.clone());
            self.by_key.insert(key.clone(), occurrence.text.clone());
            entries.insert(
                occurrence.location_key.clone(),
                KeyEntry {
                    key,
                    bindings: occurrence.captured.clone(),
                },
            );
        }

        Assignment {
            entries,
            tree: self.tree,
            unassigned,
        }
    }
}

fn dictionary_word(text: &str) -> Option<&'static str> {
    PHRASE_DICTIONARY
        .iter()
        .find(|(phrase, _)| *phrase == text)
        .map(|(_, word)| *word)
}

fn normalize_prefix(prefix: &str) -> String {
    capitalize(prefix.trim().trim_end_matches('.'))
}

/// Capitalize the module segment, so override keys land in the same module
/// files as generated ones.
fn normalize_key(key: &str) -> String {
    match key.trim().split_once('.') {
        Some((module, rest)) => format!("{}.{}", capitalize(module), rest),
        None => key.trim().to_string(),
    }
}
