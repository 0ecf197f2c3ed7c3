//! 確定済み照合ペアの保存
//!
//! ターゲットAPIごとに1ファイル（`<matched_pairs_dir>/<API名>`）を持ち、
//! ターゲットプロパティ名 → 確定したソースプロパティ名の配列を保存する。
//! 保存した内容は照合には使わない。

use crate::error::{PropMatchError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 1APIぶんの確定ペア
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredPairs {
    pairs: Map<String, Value>,
}

impl StoredPairs {
    /// ソース名を追加する。同じ値が既にあれば追加しない
    ///
    /// # Returns
    /// 追加した場合は `true`
    pub fn add(&mut self, target: &str, source: Value) -> Result<bool> {
        let entry = self
            .pairs
            .entry(target.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));

        let values = entry.as_array_mut().ok_or_else(|| {
            PropMatchError::Store(format!("\"{}\" の値が配列ではありません", target))
        })?;

        if values.contains(&source) {
            return Ok(false);
        }
        values.push(source);
        Ok(true)
    }

    /// ターゲットプロパティの確定ソース
    pub fn sources(&self, target: &str) -> &[Value] {
        self.pairs
            .get(target)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.pairs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// 確定ペアの保存先
pub trait MatchedPairStore {
    fn get(&self, api: &str) -> Result<StoredPairs>;
    fn put(&self, api: &str, pairs: &StoredPairs) -> Result<()>;
}

/// ディレクトリ内のJSONファイルに保存する
#[derive(Debug, Clone)]
pub struct FileMatchedPairStore {
    dir: PathBuf,
}

impl FileMatchedPairStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// API名に対応するファイルパス
    pub fn path_for(&self, api: &str) -> Result<PathBuf> {
        validate_api_name(api)?;
        Ok(self.dir.join(api))
    }
}

impl MatchedPairStore for FileMatchedPairStore {
    /// ファイルがなければ `{}` で作成して空を返す
    fn get(&self, api: &str) -> Result<StoredPairs> {
        let path = self.path_for(api)?;

        if !path.is_file() {
            std::fs::create_dir_all(&self.dir)?;
            std::fs::write(&path, "{}")?;
            debug!(path = %path.display(), "Created matched pairs file");
            return Ok(StoredPairs::default());
        }

        let reader = BufReader::new(File::open(&path)?);
        serde_json::from_reader(reader)
            .map_err(|e| PropMatchError::Store(format!("{}: {}", path.display(), e)))
    }

    fn put(&self, api: &str, pairs: &StoredPairs) -> Result<()> {
        let path = self.path_for(api)?;
        std::fs::create_dir_all(&self.dir)?;

        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(writer, pairs)?;
        Ok(())
    }
}

fn validate_api_name(api: &str) -> Result<()> {
    let invalid = api.is_empty()
        || api.contains(['/', '\\', '\0'])
        || api.contains("..");
    if invalid {
        return Err(PropMatchError::InvalidRequest(format!("不正なAPI名: {:?}", api)));
    }
    Ok(())
}

/// 確定したペア（ターゲット名 ← ソース名）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedPair {
    #[serde(rename = "outPropertyName", alias = "targetPropertyName")]
    pub target_property_name: String,
    #[serde(rename = "inPropertyName", alias = "sourcePropertyName")]
    pub source_property_name: Value,
}

/// リクエスト `{ "<API名>": [ {outPropertyName, inPropertyName}, ... ] }` を読む
pub fn parse_confirm_request(request: &Value) -> Result<Vec<(String, Vec<ConfirmedPair>)>> {
    let object = request
        .as_object()
        .ok_or_else(|| PropMatchError::InvalidRequest("オブジェクトではありません".into()))?;
    if object.is_empty() {
        return Err(PropMatchError::InvalidRequest("API名がありません".into()));
    }

    object
        .iter()
        .map(|(api, pairs)| {
            let pairs: Vec<ConfirmedPair> = serde_json::from_value(pairs.clone())
                .map_err(|e| PropMatchError::InvalidRequest(format!("{}: {}", api, e)))?;
            Ok((api.clone(), pairs))
        })
        .collect()
}

/// 確定ペアを保存する
///
/// # Returns
/// 新たに追加した値の数
pub fn add_confirmed_pairs(store: &dyn MatchedPairStore, request: &Value) -> Result<usize> {
    let mut added = 0;

    for (api, pairs) in parse_confirm_request(request)? {
        let mut stored = store.get(&api)?;
        let mut added_for_api = 0;
        for pair in pairs {
            if stored.add(&pair.target_property_name, pair.source_property_name)? {
                added_for_api += 1;
            }
        }
        store.put(&api, &stored)?;

        info!(api = %api, added = added_for_api, "Confirmed pairs saved");
        added += added_for_api;
    }

    Ok(added)
}
