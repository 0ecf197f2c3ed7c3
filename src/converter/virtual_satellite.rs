//! Virtual Satellite形式（ターゲット側）
//!
//! ```json
//! { "outputObjectData": [ { "name": "width", "value": "", "unit": "mm" } ] }
//! ```
//!
//! `unit` は省略可（省略時は単位なし）。

use super::{json_text, malformed, required_text, PropertyConverter};
use crate::error::Result;
use prop_match_common::Property;
use serde_json::Value;

pub const OUTPUT_OBJECT_KEY: &str = "outputObjectData";

#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualSatelliteConverter;

impl PropertyConverter for VirtualSatelliteConverter {
    fn to_property_list(&self, payload: &Value) -> Result<Vec<Property>> {
        let items = payload
            .get(OUTPUT_OBJECT_KEY)
            .and_then(Value::as_array)
            .ok_or_else(|| malformed(format!("\"{}\" 配列がありません", OUTPUT_OBJECT_KEY)))?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let context = format!("{}[{}]", OUTPUT_OBJECT_KEY, i);
                if !item.is_object() {
                    return Err(malformed(format!("{}: オブジェクトではありません", context)));
                }
                let name = required_text(item, "name", &context)?;
                let value = required_text(item, "value", &context)?;
                let unit = item.get("unit").map(json_text).unwrap_or_default();
                Ok(Property::new(name, value, unit))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_properties_in_order() {
        let payload = json!({
            "outputObjectData": [
                { "name": "width", "value": "", "unit": "mm" },
                { "name": "mass", "value": 3.5 },
                { "name": "active", "value": true, "unit": "" }
            ]
        });

        let properties = VirtualSatelliteConverter.to_property_list(&payload).unwrap();
        assert_eq!(
            properties,
            vec![
                Property::new("width", "", "mm"),
                Property::new("mass", "3.5", ""),
                Property::new("active", "true", ""),
            ]
        );
    }

    #[test]
    fn test_empty_list() {
        let properties = VirtualSatelliteConverter
            .to_property_list(&json!({ "outputObjectData": [] }))
            .unwrap();
        assert!(properties.is_empty());
    }

    #[test]
    fn test_missing_name_is_malformed() {
        let payload = json!({ "outputObjectData": [ { "value": 1 } ] });
        let err = VirtualSatelliteConverter.to_property_list(&payload).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_wrong_shape() {
        let payload = json!({ "outputObjectData": { "name": "width" } });
        assert!(VirtualSatelliteConverter.to_property_list(&payload).is_err());
    }
}
