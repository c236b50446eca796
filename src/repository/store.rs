//! JSON file store: one pretty-printed file per named collection.
//!
//! A collection `key` lives in `<dir>/<key>.json` as `{"<key>": [records...]}`.
//! Loading never fails: a missing, unreadable or malformed file yields an
//! empty collection together with a [`StoreIssue`] for the caller to report.
//! Saving rewrites the whole file through a temporary sibling and a rename,
//! with object keys sorted and non-ASCII text written literally.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{ser::PrettyFormatter, Map, Value};
use std::{
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::error::AppResult;

/// Why a collection was loaded empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreIssue {
    Missing { path: PathBuf },
    Unreadable { path: PathBuf, reason: String },
    Malformed { path: PathBuf, reason: String },
}

impl StoreIssue {
    pub fn path(&self) -> &Path {
        match self {
            StoreIssue::Missing { path }
            | StoreIssue::Unreadable { path, .. }
            | StoreIssue::Malformed { path, .. } => path,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, StoreIssue::Missing { .. })
    }
}

impl fmt::Display for StoreIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreIssue::Missing { path } => {
                write!(f, "{} not found, starting with an empty collection", path.display())
            }
            StoreIssue::Unreadable { path, reason } => write!(
                f,
                "Could not read {} ({}), starting with an empty collection",
                path.display(),
                reason
            ),
            StoreIssue::Malformed { path, reason } => write!(
                f,
                "{} is malformed ({}), starting with an empty collection",
                path.display(),
                reason
            ),
        }
    }
}

/// Result of loading one collection
#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub issue: Option<StoreIssue>,
}

impl<T> Loaded<T> {
    fn empty(issue: StoreIssue) -> Self {
        Self {
            records: Vec::new(),
            issue: Some(issue),
        }
    }
}

/// Directory-backed store of named JSON collections
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Load the collection stored under `key`
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Loaded<T> {
        let path = self.path_for(key);

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("Store {} not found at {}", key, path.display());
                return Loaded::empty(StoreIssue::Missing { path });
            }
            Err(e) => {
                tracing::warn!("Failed to read store {}: {}", path.display(), e);
                return Loaded::empty(StoreIssue::Unreadable {
                    path,
                    reason: e.to_string(),
                });
            }
        };

        match parse_collection(&text, key) {
            Ok(records) => {
                tracing::debug!("Loaded {} records from {}", records.len(), path.display());
                Loaded {
                    records,
                    issue: None,
                }
            }
            Err(reason) => {
                tracing::warn!("Store {} is malformed: {}", path.display(), reason);
                Loaded::empty(StoreIssue::Malformed { path, reason })
            }
        }
    }

    /// Replace the collection stored under `key` with `records`
    pub fn save<T: Serialize>(&self, key: &str, records: &[T]) -> AppResult<()> {
        let path = self.path_for(key);

        let mut doc = Map::new();
        doc.insert(key.to_string(), sorted_keys(serde_json::to_value(records)?));

        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        Value::Object(doc).serialize(&mut ser)?;
        buf.push(b'\n');

        fs::create_dir_all(&self.dir)?;
        let tmp_path = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&buf)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;

        tracing::debug!("Saved {} records to {}", records.len(), path.display());
        Ok(())
    }
}

/// Rebuild every object with its keys in lexicographic order.
/// `Map` only sorts on its own while serde_json's `preserve_order` feature is
/// off, and any crate in the build can turn it on.
fn sorted_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sorted_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted_keys).collect()),
        other => other,
    }
}

fn parse_collection<T: DeserializeOwned>(text: &str, key: &str) -> Result<Vec<T>, String> {
    let mut doc: Map<String, Value> = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let list = doc
        .remove(key)
        .ok_or_else(|| format!("missing \"{}\" field", key))?;
    serde_json::from_value(list).map_err(|e| e.to_string())
}
