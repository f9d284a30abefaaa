use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::digikey::PriceBreak;

/// Flat part record. Absent vendor fields stay absent; only the category pair
/// and the parameter map are always emitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PartRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digi_key_part_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_part_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_datasheet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_pricing: Option<Vec<PriceBreak>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_available: Option<i64>,
    pub category: String,
    pub subcategory: String,
    pub parameters: BTreeMap<String, String>,
}

/// Best-effort lookup result: serializes to `{}` when empty, otherwise to the record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartInfo(Option<PartRecord>);

impl PartInfo {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn found(record: PartRecord) -> Self {
        Self(Some(record))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl Serialize for PartInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(record) => record.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_part_info_serializes_to_empty_object() {
        let info = PartInfo::empty();
        assert!(info.is_empty());
        assert_eq!(serde_json::to_value(&info).unwrap(), json!({}));
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let record = PartRecord {
            manufacturer: Some("Acme".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(PartInfo::found(record)).unwrap();
        assert_eq!(
            value,
            json!({"manufacturer": "Acme", "category": "", "subcategory": "", "parameters": {}})
        );
    }

    #[test]
    fn test_record_reads_back_from_its_json() {
        let mut record = PartRecord {
            digi_key_part_number: Some("311-10.0KHRCT-ND".to_string()),
            standard_pricing: Some(vec![PriceBreak {
                break_quantity: 1,
                unit_price: 0.1,
                total_price: 0.1,
            }]),
            category: "Resistors".to_string(),
            ..Default::default()
        };
        record.parameters.insert("Resistance".to_string(), "10k".to_string());

        let json = serde_json::to_string(&record).unwrap();
        let parsed: PartRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
