//! 照合の組み立て
//!
//! ターゲットプロパティごとに全ソースプロパティを採点し、単位が互換な
//! 候補だけを戦略別の上位K件トラッカーに渡す。ソース名がオントロジーの
//! クラス名に一致する場合は、クラス名と全ラベルで採点して戦略ごとの最大を使う。

use crate::ontology::OntologyIndex;
use crate::similarity::{score, StrategyScores};
use crate::suggestion::SuggestionTracker;
use crate::types::{MatchSettings, Property, Strategy, SuggestionEntry};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// 1ターゲットプロパティ分の結果
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSuggestion {
    pub target: String,
    pub entry: SuggestionEntry,
}

/// 戦略 → ターゲットプロパティ順のサジェスト
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchTable {
    rows: BTreeMap<Strategy, Vec<TargetSuggestion>>,
}

impl MatchTable {
    /// 戦略の結果（ターゲットリスト順）
    pub fn suggestions(&self, strategy: Strategy) -> &[TargetSuggestion] {
        self.rows.get(&strategy).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 戦略・ターゲット名の結果。同名が複数あれば最後のもの
    pub fn entry(&self, strategy: Strategy, target: &str) -> Option<&SuggestionEntry> {
        self.suggestions(strategy)
            .iter()
            .rev()
            .find(|s| s.target == target)
            .map(|s| &s.entry)
    }

    /// 宣言順に (戦略, 結果) を返す
    pub fn iter(&self) -> impl Iterator<Item = (Strategy, &[TargetSuggestion])> {
        self.rows.iter().map(|(s, rows)| (*s, rows.as_slice()))
    }

    fn push(&mut self, strategy: Strategy, suggestion: TargetSuggestion) {
        self.rows.entry(strategy).or_default().push(suggestion);
    }
}

/// 照合器
///
/// オントロジーは構築済みのものを借用し、リクエストごとの状態は持たない。
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    ontology: &'a OntologyIndex,
    settings: MatchSettings,
}

impl<'a> Matcher<'a> {
    pub fn new(ontology: &'a OntologyIndex, settings: MatchSettings) -> Self {
        Self { ontology, settings }
    }

    /// ソース候補リストとターゲットリストを照合する
    ///
    /// # Arguments
    /// * `source` - 候補となるプロパティ
    /// * `target` - サジェストを求めるプロパティ
    ///
    /// # Returns
    /// 全戦略分のテーブル。ターゲットが空なら各戦略の行も空
    pub fn match_all(&self, source: &[Property], target: &[Property]) -> MatchTable {
        let mut table = MatchTable::default();
        for strategy in Strategy::ALL {
            table.rows.insert(strategy, Vec::with_capacity(target.len()));
        }

        for target_property in target {
            let entries = self.match_target(source, target_property);
            for (strategy, entry) in Strategy::ALL.into_iter().zip(entries) {
                table.push(
                    strategy,
                    TargetSuggestion {
                        target: target_property.name.clone(),
                        entry,
                    },
                );
            }
        }

        debug!(
            sources = source.len(),
            targets = target.len(),
            "Matching finished"
        );
        table
    }

    /// 1ターゲットプロパティ分の戦略別エントリ（宣言順）
    fn match_target(&self, source: &[Property], target: &Property) -> Vec<SuggestionEntry> {
        let mut trackers: Vec<SuggestionTracker> = Strategy::ALL
            .iter()
            .map(|_| SuggestionTracker::new(&self.settings))
            .collect();

        for source_property in source {
            if !self.ontology.units_compatible(&source_property.unit, &target.unit) {
                trace!(
                    source = %source_property.name,
                    source_unit = %source_property.unit,
                    target = %target.name,
                    target_unit = %target.unit,
                    "Skipping unit-incompatible candidate"
                );
                continue;
            }

            let scores = self.score_source(source_property, &target.name);
            for (tracker, (_, value)) in trackers.iter_mut().zip(scores.iter()) {
                tracker.offer(&source_property.name, value);
            }
        }

        trackers.into_iter().map(SuggestionTracker::finalize).collect()
    }

    /// ソースプロパティとターゲット名の戦略別スコア（同義語展開込み）
    pub fn score_source(&self, source: &Property, target_name: &str) -> StrategyScores {
        match self.ontology.find_class(source.local_name()) {
            Some(class) => {
                let mut best = StrategyScores::zero();
                for name in class.names() {
                    best.merge_max(&score(name, target_name));
                }
                best
            }
            None => score(&source.name, target_name),
        }
    }
}
