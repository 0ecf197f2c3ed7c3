//! 部品データベース形式（ソース側）
//!
//! ```json
//! { "inputObjectData": {
//!     "mass": [ { "name": "mass", "value": 12.5, "unit": "kg" } ],
//!     "vendor": "ACME",
//!     "comment": null } }
//! ```
//!
//! - `null` → 値・単位なし
//! - 配列 → 要素ごとに1プロパティ
//! - それ以外 → 単位 `String` のプロパティ

use super::{json_text, malformed, required_text, PropertyConverter};
use crate::error::Result;
use prop_match_common::Property;
use serde_json::Value;

pub const INPUT_OBJECT_KEY: &str = "inputObjectData";

/// スカラー値のプロパティに付ける単位
pub const STRING_UNIT: &str = "String";

#[derive(Debug, Clone, Copy, Default)]
pub struct PartDatabaseConverter;

impl PropertyConverter for PartDatabaseConverter {
    fn to_property_list(&self, payload: &Value) -> Result<Vec<Property>> {
        let object = payload
            .get(INPUT_OBJECT_KEY)
            .and_then(Value::as_object)
            .ok_or_else(|| malformed(format!("\"{}\" オブジェクトがありません", INPUT_OBJECT_KEY)))?;

        let mut properties = Vec::new();
        for (key, value) in object {
            match value {
                Value::Null => properties.push(Property::new(key.as_str(), "", "")),
                Value::Array(items) => {
                    for (i, item) in items.iter().enumerate() {
                        properties.push(array_item(key, i, item)?);
                    }
                }
                other => properties.push(Property::new(key.as_str(), json_text(other), STRING_UNIT)),
            }
        }
        Ok(properties)
    }
}

fn array_item(key: &str, index: usize, item: &Value) -> Result<Property> {
    let context = format!("{}.{}[{}]", INPUT_OBJECT_KEY, key, index);
    if !item.is_object() {
        return Err(malformed(format!("{}: オブジェクトではありません", context)));
    }

    let name = required_text(item, "name", &context)?;
    let value = required_text(item, "value", &context)?;
    let unit = required_text(item, "unit", &context)?;

    // null は空の値として扱う
    let value = if value == "null" { String::new() } else { value };
    Ok(Property::new(name, value, unit))
}
