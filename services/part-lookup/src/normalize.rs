//! Product details to flat part record.

use semiconductor_models::{LimitedTaxonomy, PartRecord, PidVid, ProductDetails};
use std::collections::BTreeMap;

pub fn part_record(details: ProductDetails) -> PartRecord {
    let (category, subcategory) = categories(details.limited_taxonomy.as_ref());
    let parameters = parameter_map(details.parameters.as_deref().unwrap_or_default());

    PartRecord {
        product_description: details.product_description,
        detailed_description: details.detailed_description,
        digi_key_part_number: details.digi_key_part_number,
        manufacturer: details.manufacturer.and_then(|m| m.value),
        manufacturer_part_number: details.manufacturer_part_number,
        product_url: details.product_url,
        primary_datasheet: details.primary_datasheet,
        primary_photo: details.primary_photo,
        standard_pricing: details.standard_pricing,
        quantity_available: details.quantity_available,
        category,
        subcategory,
        parameters,
    }
}

/// Top-level taxonomy value and its first child. Both are empty unless both exist.
pub fn categories(taxonomy: Option<&LimitedTaxonomy>) -> (String, String) {
    let pair = taxonomy.and_then(|taxonomy| {
        let category = taxonomy.value.clone()?;
        let subcategory = taxonomy.children.as_ref()?.first()?.value.clone()?;
        Some((category, subcategory))
    });

    pair.unwrap_or_default()
}

/// Parameter name to value. Repeated names keep the last value.
pub fn parameter_map(parameters: &[PidVid]) -> BTreeMap<String, String> {
    parameters
        .iter()
        .filter_map(|p| Some((p.parameter.clone()?, p.value.clone()?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use semiconductor_models::PriceBreak;

    fn taxonomy(category: &str, subcategory: Option<&str>) -> LimitedTaxonomy {
        LimitedTaxonomy {
            value: Some(category.to_string()),
            children: subcategory.map(|s| {
                vec![LimitedTaxonomy {
                    value: Some(s.to_string()),
                    ..Default::default()
                }]
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_manufacturer_is_unwrapped() {
        let record = part_record(ProductDetails {
            manufacturer: Some(PidVid::value_only("Acme")),
            ..Default::default()
        });
        assert_eq!(record.manufacturer.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_parameters_become_a_map() {
        let record = part_record(ProductDetails {
            parameters: Some(vec![PidVid::named("Resistance", "10k")]),
            ..Default::default()
        });
        assert_eq!(
            record.parameters,
            BTreeMap::from([("Resistance".to_string(), "10k".to_string())])
        );
    }

    #[test]
    fn test_duplicate_parameter_last_write_wins() {
        let map = parameter_map(&[
            PidVid::named("Tolerance", "5%"),
            PidVid::named("Power", "0.063W"),
            PidVid::named("Tolerance", "1%"),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["Tolerance"], "1%");
    }

    #[test]
    fn test_parameters_without_name_or_value_are_skipped() {
        let map = parameter_map(&[
            PidVid::value_only("orphan"),
            PidVid {
                parameter: Some("Package".to_string()),
                ..Default::default()
            },
            PidVid::named("Size", "0402"),
        ]);
        assert_eq!(map, BTreeMap::from([("Size".to_string(), "0402".to_string())]));
    }

    #[test]
    fn test_missing_taxonomy_keeps_rest_of_record() {
        let record = part_record(ProductDetails {
            product_description: Some("RES 10K OHM 5% 1/16W 0402".to_string()),
            manufacturer_part_number: Some("RMCF0402JT10K0".to_string()),
            quantity_available: Some(42),
            ..Default::default()
        });

        assert_eq!(record.category, "");
        assert_eq!(record.subcategory, "");
        assert_eq!(record.manufacturer_part_number.as_deref(), Some("RMCF0402JT10K0"));
        assert_eq!(record.quantity_available, Some(42));
        assert!(record.parameters.is_empty());
    }

    #[test]
    fn test_taxonomy_without_children_defaults_both() {
        assert_eq!(
            categories(Some(&taxonomy("Resistors", None))),
            (String::new(), String::new())
        );
        assert_eq!(
            categories(Some(&taxonomy("Resistors", Some("Chip Resistor - Surface Mount")))),
            ("Resistors".to_string(), "Chip Resistor - Surface Mount".to_string())
        );
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let record = part_record(ProductDetails {
            standard_pricing: Some(vec![PriceBreak {
                break_quantity: 10,
                unit_price: 0.05,
                total_price: 0.5,
            }]),
            ..Default::default()
        });

        assert!(record.product_description.is_none());
        assert!(record.primary_photo.is_none());
        assert_eq!(record.standard_pricing.unwrap()[0].break_quantity, 10);
    }

    proptest! {
        /// Every named parameter ends up in the map with the last value given for it.
        #[test]
        fn prop_parameter_map_last_write_wins(
            entries in proptest::collection::vec(("[A-C]", "[a-z0-9]{1,4}"), 0..20)
        ) {
            let parameters: Vec<PidVid> = entries
                .iter()
                .map(|(name, value)| PidVid::named(name.as_str(), value.as_str()))
                .collect();
            let map = parameter_map(&parameters);

            for (name, _) in &entries {
                let last = entries.iter().rev().find(|(n, _)| n == name).map(|(_, v)| v);
                prop_assert_eq!(map.get(name), last);
            }
            prop_assert!(map.len() <= entries.len());
        }
    }
}
