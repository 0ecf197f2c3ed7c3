//! Property Matching Common Library
//!
//! 2つのエンジニアリングデータオブジェクトのプロパティ名を照合するコア:
//! - 語順を考慮した複合文字列類似度
//! - オントロジーに基づく単位次元の互換性判定
//! - 戦略ごとの上位K件サジェスト

pub mod types;
pub mod error;
pub mod tokenizer;
pub mod similarity;
pub mod alignment;
pub mod suggestion;
pub mod ontology;
pub mod matching;
pub mod render;

pub use types::{MatchSettings, Property, ScoredCandidate, Strategy, SuggestionEntry, NO_SIMILARITY};
pub use error::{Error, Result};
pub use similarity::{score, StrategyScores};
pub use suggestion::SuggestionTracker;
pub use ontology::{OntologyClass, OntologyIndex, OntologySources, OntologyUnit, SharedOntology};
pub use matching::{MatchTable, Matcher, TargetSuggestion};
pub use render::render_table;
