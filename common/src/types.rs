//! 照合で使う型定義
//!
//! - Property: コンバータが生成する name/value/unit の三つ組
//! - Strategy: スコアリング戦略（出力順はこの宣言順）
//! - ScoredCandidate / SuggestionEntry: 1ターゲットプロパティ分のサジェスト

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 候補なしを表すセンチネル名
pub const NO_SIMILARITY: &str = "noSimilarity";

/// 照合対象のプロパティ
///
/// `unit` が空文字列の場合は単位なし。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub unit: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            unit: unit.into(),
        }
    }

    /// ドット区切りの親パスを除いた末尾のプロパティ名
    pub fn local_name(&self) -> &str {
        match self.name.rfind('.') {
            Some(pos) => &self.name[pos + 1..],
            None => &self.name,
        }
    }
}

/// スコアリング戦略
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    JaroWinkler,
    Jaccard,
    NormalizedLevenshtein,
    Min,
    Max,
    Average,
    /// 未実装の戦略。スコアは常に0.0
    Weighted,
}

impl Strategy {
    pub const COUNT: usize = 7;

    /// 宣言順の全戦略
    pub const ALL: [Strategy; Strategy::COUNT] = [
        Strategy::JaroWinkler,
        Strategy::Jaccard,
        Strategy::NormalizedLevenshtein,
        Strategy::Min,
        Strategy::Max,
        Strategy::Average,
        Strategy::Weighted,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::JaroWinkler => "jaroWinkler",
            Strategy::Jaccard => "jaccard",
            Strategy::NormalizedLevenshtein => "normalizedLevenshtein",
            Strategy::Min => "min",
            Strategy::Max => "max",
            Strategy::Average => "average",
            Strategy::Weighted => "weighted",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// スコア付きの候補（ソースプロパティ名と類似度）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub source_property_name: String,
    pub score: f64,
}

impl ScoredCandidate {
    pub fn new(source_property_name: impl Into<String>, score: f64) -> Self {
        Self {
            source_property_name: source_property_name.into(),
            score,
        }
    }

    /// 出力トークン `"<name>|<score>"`
    pub fn token(&self) -> String {
        format!("{}|{}", self.source_property_name, format_score(self.score))
    }
}

/// 1ターゲットプロパティ・1戦略分のサジェスト
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionEntry {
    /// 閾値を超える候補がなかった
    NoSimilarity,
    /// スコア降順の候補（1件以上）
    Candidates(Vec<ScoredCandidate>),
}

impl SuggestionEntry {
    /// 出力トークンの列
    pub fn tokens(&self) -> Vec<String> {
        match self {
            SuggestionEntry::NoSimilarity => vec![NO_SIMILARITY.to_string()],
            SuggestionEntry::Candidates(candidates) => {
                candidates.iter().map(ScoredCandidate::token).collect()
            }
        }
    }
}

/// 照合コアが参照する設定値
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSettings {
    /// 1ターゲットプロパティ・1戦略あたりの最大候補数
    pub suggestion_size: usize,
    /// 候補として残す最低スコア（この値を含む）
    pub min_similarity_value: f64,
}

impl MatchSettings {
    pub fn new(suggestion_size: usize, min_similarity_value: f64) -> Result<Self> {
        let settings = Self {
            suggestion_size,
            min_similarity_value,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.suggestion_size == 0 {
            return Err(Error::Config("suggestionSize must be a positive integer".into()));
        }
        if !self.min_similarity_value.is_finite()
            || !(0.0..=1.0).contains(&self.min_similarity_value)
        {
            return Err(Error::Config(format!(
                "minSimilarityValue must be within [0, 1]: {}",
                self.min_similarity_value
            )));
        }
        Ok(())
    }
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            suggestion_size: 3,
            min_similarity_value: 0.6,
        }
    }
}

/// スコアの文字列表現
///
/// `1.0`, `0.875` のように常に小数点を含む。絶対値が 1e-3 未満または
/// 1e7 以上なら `1.0E-4` の形の指数表記にする。
pub fn format_score(score: f64) -> String {
    let magnitude = score.abs();
    if score == 0.0 || !score.is_finite() || (1e-3..1e7).contains(&magnitude) {
        return format!("{:?}", score);
    }

    let scientific = format!("{:e}", score);
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => format!("{mantissa}E{exponent}"),
        Some((mantissa, exponent)) => format!("{mantissa}.0E{exponent}"),
        None => scientific,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name_strips_parents() {
        let property = Property::new("size.dimensions.width", "10", "mm");
        assert_eq!(property.local_name(), "width");

        let property = Property::new("width", "10", "mm");
        assert_eq!(property.local_name(), "width");
    }

    #[test]
    fn test_strategy_order_and_names() {
        let names: Vec<&str> = Strategy::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["jaroWinkler", "jaccard", "normalizedLevenshtein", "min", "max", "average", "weighted"]
        );
        for (i, strategy) in Strategy::ALL.iter().enumerate() {
            assert_eq!(strategy.index(), i);
        }
    }

    #[test]
    fn test_strategy_serde_name() {
        let json = serde_json::to_string(&Strategy::NormalizedLevenshtein).unwrap();
        assert_eq!(json, "\"normalizedLevenshtein\"");
    }

    #[test]
    fn test_candidate_token() {
        assert_eq!(ScoredCandidate::new("Width", 1.0).token(), "Width|1.0");
        assert_eq!(ScoredCandidate::new("Height", 0.875).token(), "Height|0.875");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(1.0), "1.0");
        assert_eq!(format_score(0.001), "0.001");
        assert_eq!(format_score(0.0001), "1.0E-4");
        assert_eq!(format_score(0.00015), "1.5E-4");
        assert_eq!(format_score(12345678.0), "1.2345678E7");
    }

    #[test]
    fn test_sentinel_tokens() {
        let entry = SuggestionEntry::NoSimilarity;
        assert_eq!(entry.tokens(), vec!["noSimilarity".to_string()]);
    }

    #[test]
    fn test_settings_validation() {
        assert!(MatchSettings::new(1, 0.5).is_ok());
        assert!(MatchSettings::new(0, 0.5).is_err());
        assert!(MatchSettings::new(3, 1.5).is_err());
        assert!(MatchSettings::new(3, f64::NAN).is_err());
        assert!(MatchSettings::new(3, 0.0).is_ok());
        assert!(MatchSettings::new(3, 1.0).is_ok());
    }
}
