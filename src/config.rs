//! 設定
//!
//! `~/.config/prop-match/config.json`（または `--config` で指定したファイル）から読み込む。
//! 拡張子が `.properties` のファイルは `key=value` 形式として読む。
//! 環境変数 `PROP_MATCH_SUGGESTION_SIZE` / `PROP_MATCH_MIN_SIMILARITY` が優先される。

use crate::error::{PropMatchError, Result};
use prop_match_common::{MatchSettings, OntologySources};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_SUGGESTION_SIZE: &str = "PROP_MATCH_SUGGESTION_SIZE";
pub const ENV_MIN_SIMILARITY: &str = "PROP_MATCH_MIN_SIMILARITY";

lazy_static::lazy_static! {
    static ref PROPERTY_LINE_RE: Regex = Regex::new(r"^\s*([^=:\s]+)\s*[=:\s]\s*(.*?)\s*$").unwrap();
}

/// 設定値
///
/// ファイルから読む場合、`suggestionSize` と `minSimilarityValue` は必須。
/// パス項目は省略時にデフォルトを使う。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_synonyms_ontology")]
    pub synonyms_ontology: PathBuf,
    #[serde(default = "default_unit_ontology")]
    pub unit_ontology: PathBuf,
    pub suggestion_size: usize,
    pub min_similarity_value: f64,
    #[serde(default = "default_matched_pairs_dir")]
    pub matched_pairs_dir: PathBuf,
}

fn default_synonyms_ontology() -> PathBuf {
    PathBuf::from("./ontologies/synonyms.owl")
}

fn default_unit_ontology() -> PathBuf {
    PathBuf::from("./ontologies/om-2.0.rdf")
}

fn default_matched_pairs_dir() -> PathBuf {
    PathBuf::from("./matchedWordsAPIs")
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// 標準の設定ファイルを読み込む（なければデフォルト）
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            Self::default_config()
        };
        config.with_env_overrides()
    }

    /// 指定ファイルから読み込む
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PropMatchError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config = if path.extension().is_some_and(|ext| ext == "properties") {
            Self::from_properties(&content)?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| PropMatchError::Config(format!("{}: {}", path.display(), e)))?
        };
        debug!(path = %path.display(), "Config loaded");

        config.validate()?;
        Ok(config)
    }

    /// `key=value` 形式の設定を読む。数値項目は必須
    pub fn from_properties(content: &str) -> Result<Self> {
        let mut values: HashMap<String, String> = HashMap::new();
        for line in content.lines() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }
            if let Some(caps) = PROPERTY_LINE_RE.captures(line) {
                values.insert(caps[1].to_string(), caps[2].to_string());
            }
        }

        let suggestion_size = values
            .get("suggestionSize")
            .ok_or_else(|| PropMatchError::Config("suggestionSize がありません".into()))
            .and_then(|v| parse_suggestion_size(v))?;
        let min_similarity_value = values
            .get("minSimilarityValue")
            .ok_or_else(|| PropMatchError::Config("minSimilarityValue がありません".into()))
            .and_then(|v| parse_min_similarity(v))?;

        Ok(Self {
            synonyms_ontology: values
                .get("synonymsOntology")
                .map(PathBuf::from)
                .unwrap_or_else(default_synonyms_ontology),
            unit_ontology: values
                .get("unitOntology")
                .map(PathBuf::from)
                .unwrap_or_else(default_unit_ontology),
            suggestion_size,
            min_similarity_value,
            matched_pairs_dir: values
                .get("matchedPairsDir")
                .map(PathBuf::from)
                .unwrap_or_else(default_matched_pairs_dir),
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PropMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("prop-match").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            synonyms_ontology: default_synonyms_ontology(),
            unit_ontology: default_unit_ontology(),
            suggestion_size: 3,
            min_similarity_value: 0.6,
            matched_pairs_dir: default_matched_pairs_dir(),
        }
    }

    /// 環境変数で数値項目を上書きする
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(
            std::env::var(ENV_SUGGESTION_SIZE).ok().as_deref(),
            std::env::var(ENV_MIN_SIMILARITY).ok().as_deref(),
        )
    }

    fn with_overrides(mut self, suggestion_size: Option<&str>, min_similarity: Option<&str>) -> Result<Self> {
        if let Some(value) = suggestion_size {
            self.suggestion_size = parse_suggestion_size(value)?;
        }
        if let Some(value) = min_similarity {
            self.min_similarity_value = parse_min_similarity(value)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.match_settings().map(|_| ())
    }

    /// 照合コアに渡す設定値
    pub fn match_settings(&self) -> Result<MatchSettings> {
        MatchSettings::new(self.suggestion_size, self.min_similarity_value)
            .map_err(|e| PropMatchError::Config(e.to_string()))
    }

    pub fn ontology_sources(&self) -> OntologySources {
        OntologySources::new(&self.synonyms_ontology, &self.unit_ontology)
    }

    pub fn set_suggestion_size(&mut self, size: usize) -> Result<()> {
        self.suggestion_size = size;
        self.validate()
    }

    pub fn set_min_similarity(&mut self, value: f64) -> Result<()> {
        self.min_similarity_value = value;
        self.validate()
    }
}

fn parse_suggestion_size(value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| PropMatchError::Config(format!("suggestionSize が整数ではありません: {}", value)))
}

fn parse_min_similarity(value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| PropMatchError::Config(format!("minSimilarityValue が数値ではありません: {}", value)))
}
