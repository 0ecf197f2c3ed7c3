//! 入力コンバータ
//!
//! 外部フォーマットのJSONを照合用の `Property` リストに変換する。
//! 1つのリクエストJSONにソース側・ターゲット側の両方が含まれ、
//! それぞれのコンバータが自分の担当キーだけを読む。

pub mod part_database;
pub mod virtual_satellite;

pub use part_database::PartDatabaseConverter;
pub use virtual_satellite::VirtualSatelliteConverter;

use crate::error::{PropMatchError, Result};
use prop_match_common::{Error as CommonError, Property};
use serde_json::Value;

/// JSONペイロード → プロパティリスト
pub trait PropertyConverter: Send + Sync {
    fn to_property_list(&self, payload: &Value) -> Result<Vec<Property>>;
}

/// 入力不正エラー
pub(crate) fn malformed(message: impl Into<String>) -> PropMatchError {
    PropMatchError::Common(CommonError::MalformedInput(message.into()))
}

/// JSON値の文字列表現（文字列はそのまま、それ以外はJSONテキストから `"` を除いたもの）
pub fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string().replace('"', ""),
    }
}

/// オブジェクトの必須フィールドを文字列として取り出す
pub(crate) fn required_text(object: &Value, field: &str, context: &str) -> Result<String> {
    object
        .get(field)
        .map(json_text)
        .ok_or_else(|| malformed(format!("{}: \"{}\" がありません", context, field)))
}

/// 照合リクエストの入力（ソース・ターゲットのプロパティリスト）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchInput {
    pub source: Vec<Property>,
    pub target: Vec<Property>,
}

/// 2つのコンバータで1つのリクエストJSONを変換する
pub fn convert_request(
    payload: &Value,
    source_converter: &dyn PropertyConverter,
    target_converter: &dyn PropertyConverter,
) -> Result<MatchInput> {
    Ok(MatchInput {
        source: source_converter.to_property_list(payload)?,
        target: target_converter.to_property_list(payload)?,
    })
}
