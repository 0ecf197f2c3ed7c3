//! 照合結果のJSON出力
//!
//! ```json
//! {
//!   "jaroWinkler": { "width": "Width|1.0", "height": ["Height|0.9", "Depth|0.7"] },
//!   "jaccard": { "width": "noSimilarity", ... },
//!   ...
//! }
//! ```
//!
//! 候補が1件なら文字列、2件以上なら配列で出力する。

use crate::matching::MatchTable;
use crate::types::SuggestionEntry;
use serde_json::{Map, Value};

/// 1エントリ分の値
pub fn render_entry(entry: &SuggestionEntry) -> Value {
    let mut tokens = entry.tokens();
    if tokens.len() == 1 {
        Value::String(tokens.remove(0))
    } else {
        Value::Array(tokens.into_iter().map(Value::String).collect())
    }
}

/// テーブル全体を戦略名 → (ターゲット名 → 値) のオブジェクトにする
///
/// 同名のターゲットが複数ある場合は最初の位置に最後の値が入る。
pub fn render_table(table: &MatchTable) -> Value {
    let mut root = Map::new();
    for (strategy, rows) in table.iter() {
        let mut suggestions = Map::new();
        for row in rows {
            suggestions.insert(row.target.clone(), render_entry(&row.entry));
        }
        root.insert(strategy.name().to_string(), Value::Object(suggestions));
    }
    Value::Object(root)
}
