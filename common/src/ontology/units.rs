//! 単位の互換判定
//!
//! 同じ文字列なら互換。それ以外は単位文字列をラベル（大文字小文字無視）
//! または記号（完全一致）で単位一覧から引き、次元が等しければ互換とみなす。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 単位オントロジーの単位
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OntologyUnit {
    pub labels: Vec<String>,
    pub symbol: Option<String>,
    pub dimension: Option<String>,
}

impl OntologyUnit {
    fn dimension_or_empty(&self) -> &str {
        self.dimension.as_deref().unwrap_or("")
    }

    /// `unit_lower` は小文字化済みの単位文字列
    fn matches(&self, unit: &str, unit_lower: &str) -> bool {
        self.labels.iter().any(|l| l.to_lowercase() == unit_lower)
            || self.symbol.as_deref() == Some(unit)
    }
}

/// 2つの単位文字列が同じ次元かを単位一覧を走査して判定する
///
/// 各側の次元は一致した最後の単位のもの（次元なしの単位でも上書きする）。
/// どちらも見つからない場合は非互換。
pub fn are_units_compatible(unit_a: &str, unit_b: &str, units: &[OntologyUnit]) -> bool {
    if unit_a == unit_b {
        return true;
    }

    let (lower_a, lower_b) = (unit_a.to_lowercase(), unit_b.to_lowercase());
    let mut dimension_a = "";
    let mut dimension_b = "";

    for unit in units {
        if unit.matches(unit_a, &lower_a) {
            dimension_a = unit.dimension_or_empty();
        }
        if unit.matches(unit_b, &lower_b) {
            dimension_b = unit.dimension_or_empty();
        }
    }

    dimension_a == dimension_b && !(dimension_a.is_empty() && dimension_b.is_empty())
}

/// 単位文字列→次元の索引
///
/// `are_units_compatible` と同じ結果を走査なしで返す。
/// ラベルは小文字化したキー、記号はそのままのキーで持ち、
/// 一覧上の位置が最も後ろのものを残す。
#[derive(Debug, Clone, Default)]
pub struct UnitLookup {
    by_label: HashMap<String, (usize, String)>,
    by_symbol: HashMap<String, (usize, String)>,
}

impl UnitLookup {
    pub fn new(units: &[OntologyUnit]) -> Self {
        let mut lookup = Self::default();
        for (position, unit) in units.iter().enumerate() {
            let dimension = unit.dimension_or_empty().to_string();
            for label in &unit.labels {
                lookup
                    .by_label
                    .insert(label.to_lowercase(), (position, dimension.clone()));
            }
            if let Some(symbol) = &unit.symbol {
                lookup
                    .by_symbol
                    .insert(symbol.clone(), (position, dimension.clone()));
            }
        }
        lookup
    }

    /// 単位文字列の次元。見つからなければ空文字列
    pub fn dimension(&self, unit: &str) -> &str {
        let by_label = self.by_label.get(&unit.to_lowercase());
        let by_symbol = self.by_symbol.get(unit);

        let found = match (by_label, by_symbol) {
            (Some(l), Some(s)) => Some(if l.0 >= s.0 { l } else { s }),
            (l, s) => l.or(s),
        };
        found.map(|(_, d)| d.as_str()).unwrap_or("")
    }

    pub fn are_compatible(&self, unit_a: &str, unit_b: &str) -> bool {
        if unit_a == unit_b {
            return true;
        }
        let dimension_a = self.dimension(unit_a);
        let dimension_b = self.dimension(unit_b);
        dimension_a == dimension_b && !dimension_a.is_empty()
    }
}
