//! Aggregate counts over extracted business records.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::record::BusinessRecord;

/// How many product names `most_common_products` keeps.
const TOP_PRODUCTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCount {
    pub product_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BusinessInsights {
    pub total_businesses: usize,
    pub businesses_with_contact: usize,
    pub businesses_with_address: usize,
    pub businesses_with_pricing: usize,
    pub businesses_with_delivery: usize,
    /// Most frequent product names, count descending then name ascending.
    pub most_common_products: Vec<ProductCount>,
    /// Distinct channels with at least one record, sorted.
    pub channels_with_businesses: Vec<String>,
}

impl BusinessInsights {
    pub fn from_records<'r>(records: impl IntoIterator<Item = &'r BusinessRecord>) -> Self {
        let mut insights = Self::default();
        let mut products: HashMap<&str, usize> = HashMap::new();
        let mut channels: BTreeSet<&str> = BTreeSet::new();

        for record in records {
            insights.total_businesses += 1;
            insights.businesses_with_contact += usize::from(record.contact_info.is_some());
            insights.businesses_with_address += usize::from(record.address.is_some());
            insights.businesses_with_pricing += usize::from(record.price.is_some());
            insights.businesses_with_delivery += usize::from(record.delivery_info.is_some());
            if let Some(product) = record.product_name.as_deref() {
                *products.entry(product).or_insert(0) += 1;
            }
            if let Some(channel) = record.channel() {
                channels.insert(channel);
            }
        }

        let mut ranked: Vec<(&str, usize)> = products.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        insights.most_common_products = ranked
            .into_iter()
            .take(TOP_PRODUCTS)
            .map(|(name, count)| ProductCount {
                product_name: name.to_string(),
                count,
            })
            .collect();
        insights.channels_with_businesses = channels.into_iter().map(String::from).collect();

        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        id: &str,
        product: Option<&str>,
        price: Option<&str>,
        contact: Option<&str>,
    ) -> BusinessRecord {
        BusinessRecord {
            source_id: id.to_string(),
            business_name: None,
            product_name: product.map(String::from),
            price: price.map(String::from),
            contact_info: contact.map(String::from),
            address: None,
            opening_hours: None,
            delivery_info: None,
        }
    }

    fn product(name: &str, count: usize) -> ProductCount {
        ProductCount {
            product_name: name.to_string(),
            count,
        }
    }

    #[test]
    fn test_counts() {
        let records = vec![
            record("a/1", Some("Paracetamol tablets"), Some("150 birr"), Some("0911223344")),
            record("a/2", Some("Vitamin C"), None, Some("0922334455")),
            record("a/3", Some("Paracetamol tablets"), Some("80 ETB"), None),
            record("a/4", None, None, None),
        ];
        let insights = BusinessInsights::from_records(&records);
        assert_eq!(insights.total_businesses, 4);
        assert_eq!(insights.businesses_with_contact, 2);
        assert_eq!(insights.businesses_with_pricing, 2);
        assert_eq!(insights.businesses_with_address, 0);
        assert_eq!(
            insights.most_common_products,
            vec![product("Paracetamol tablets", 2), product("Vitamin C", 1)]
        );
    }

    #[test]
    fn test_channels_sorted_and_distinct() {
        let records = vec![
            record("tikvahpharma/3", None, None, Some("0911223344")),
            record("addis_meds/7", None, None, Some("0911223344")),
            record("tikvahpharma/9", None, Some("80 ETB"), None),
            record("orphan", None, Some("80 ETB"), None),
        ];
        let insights = BusinessInsights::from_records(&records);
        assert_eq!(insights.channels_with_businesses, vec!["addis_meds", "tikvahpharma"]);
    }

    #[test]
    fn test_ties_break_by_name_and_cap() {
        let records: Vec<BusinessRecord> = (0..12)
            .map(|i| {
                let name = format!("Product {:02}", 11 - i);
                record(&format!("b/{}", i), Some(name.as_str()), None, None)
            })
            .collect();
        let insights = BusinessInsights::from_records(&records);
        assert_eq!(insights.most_common_products.len(), 10);
        assert_eq!(insights.most_common_products[0].product_name, "Product 00");
        assert_eq!(insights.most_common_products[9].product_name, "Product 09");
        assert_eq!(insights.channels_with_businesses, vec!["b"]);
    }

    #[test]
    fn test_empty() {
        let none: Vec<BusinessRecord> = Vec::new();
        assert_eq!(BusinessInsights::from_records(&none), BusinessInsights::default());
    }
}
