//! 文字列類似度
//!
//! 基本指標（いずれも0.0〜1.0、1.0 = 同一）:
//! - Jaro-Winkler
//! - Jaccard（文字3-gramの集合）
//! - 正規化Levenshtein
//!
//! `score` は単語分割・語順合わせの後、基本指標と合成戦略
//! （min / max / average / weighted）のスコアを返す。

use crate::alignment::align_words;
use crate::tokenizer::tokenize;
use crate::types::Strategy;
use std::collections::HashSet;

/// Jaccardのシングル長
const SHINGLE_SIZE: usize = 3;

/// Jaro-Winkler類似度
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    strsim::jaro_winkler(a, b)
}

/// 正規化Levenshtein類似度
pub fn normalized_levenshtein(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// 文字3-gram集合のJaccard類似度
///
/// 同一文字列は1.0。どちらも3文字未満で和集合が空なら0.0。
pub fn jaccard(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let shingles_a = shingles(a);
    let shingles_b = shingles(b);

    let union = shingles_a.union(&shingles_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = shingles_a.intersection(&shingles_b).count();

    intersection as f64 / union as f64
}

fn shingles(text: &str) -> HashSet<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < SHINGLE_SIZE {
        return HashSet::new();
    }
    chars
        .windows(SHINGLE_SIZE)
        .map(|window| window.iter().collect())
        .collect()
}

/// 3指標の平均（語順合わせで使用）
pub fn average3(a: &str, b: &str) -> f64 {
    (jaro_winkler(a, b) + jaccard(a, b) + normalized_levenshtein(a, b)) / 3.0
}

/// 戦略ごとのスコア
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyScores {
    values: [f64; Strategy::COUNT],
}

impl StrategyScores {
    pub fn zero() -> Self {
        Self {
            values: [0.0; Strategy::COUNT],
        }
    }

    /// 3指標のスコアから合成戦略を計算する
    pub fn from_base(jaro_winkler: f64, jaccard: f64, normalized_levenshtein: f64) -> Self {
        let base = [jaro_winkler, jaccard, normalized_levenshtein];
        let min = base.iter().copied().fold(f64::INFINITY, f64::min);
        let max = base.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let average = base.iter().sum::<f64>() / base.len() as f64;

        let mut scores = Self::zero();
        scores.set(Strategy::JaroWinkler, jaro_winkler);
        scores.set(Strategy::Jaccard, jaccard);
        scores.set(Strategy::NormalizedLevenshtein, normalized_levenshtein);
        scores.set(Strategy::Min, min);
        scores.set(Strategy::Max, max);
        scores.set(Strategy::Average, average);
        // weighted は未実装のため0.0のまま
        scores
    }

    pub fn get(&self, strategy: Strategy) -> f64 {
        self.values[strategy.index()]
    }

    pub fn set(&mut self, strategy: Strategy, value: f64) {
        self.values[strategy.index()] = value;
    }

    /// 戦略ごとに大きい方を残す
    pub fn merge_max(&mut self, other: &StrategyScores) {
        for strategy in Strategy::ALL {
            if other.get(strategy) > self.get(strategy) {
                self.set(strategy, other.get(strategy));
            }
        }
    }

    /// 宣言順に (戦略, スコア) を返す
    pub fn iter(&self) -> impl Iterator<Item = (Strategy, f64)> + '_ {
        Strategy::ALL.iter().map(move |&s| (s, self.get(s)))
    }
}

impl Default for StrategyScores {
    fn default() -> Self {
        Self::zero()
    }
}

/// 2つの名前の戦略別類似度
///
/// # Examples
/// ```
/// use prop_match_common::{score, Strategy};
///
/// let scores = score("MaxHeight", "height_max");
/// assert_eq!(scores.get(Strategy::JaroWinkler), 1.0);
/// assert_eq!(scores.get(Strategy::Weighted), 0.0);
/// ```
pub fn score(name_a: &str, name_b: &str) -> StrategyScores {
    let words_a = tokenize(name_a);
    let words_b = tokenize(name_b);

    let (ordered_a, ordered_b) = align_words(&words_a, &words_b);

    StrategyScores::from_base(
        jaro_winkler(&ordered_a, &ordered_b),
        jaccard(&ordered_a, &ordered_b),
        normalized_levenshtein(&ordered_a, &ordered_b),
    )
}
