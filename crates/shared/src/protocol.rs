use serde::{Deserialize, Serialize};

/// Fully resolved parameters for one collection read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionQuery {
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascending: Option<bool>,
}

impl CollectionQuery {
    pub fn first_page() -> Self {
        Self::default()
    }
}

/// Caller-facing query; omitted fields are filled in from controller state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialQuery {
    pub page: Option<u32>,
    pub sort_field: Option<String>,
    pub ascending: Option<bool>,
}

impl PartialQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn with_sort(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.sort_field = Some(field.into());
        self.ascending = Some(ascending);
        self
    }
}

/// One page of a server-ordered collection.
///
/// On the wire this is `{ "content": [...], "totalPages": n }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPage<T> {
    #[serde(rename = "content")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> CollectionPage<T> {
    pub fn new(items: Vec<T>, total_pages: u32) -> Self {
        Self { items, total_pages }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AestheticId, AestheticSummary};

    #[test]
    fn decodes_content_envelope_preserving_order() {
        let raw = r#"{
            "content": [
                {"id": 3, "name": "Vaporwave", "startYear": 2010},
                {"id": 1, "name": "Seapunk"}
            ],
            "totalPages": 4
        }"#;
        let page: CollectionPage<AestheticSummary> = serde_json::from_str(raw).expect("decode");
        assert_eq!(page.total_pages, 4);
        let ids: Vec<_> = page.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![AestheticId(3), AestheticId(1)]);
        assert_eq!(page.items[0].start_year, Some(2010));
    }

    #[test]
    fn missing_total_pages_defaults_to_zero() {
        let page: CollectionPage<serde_json::Value> =
            serde_json::from_str(r#"{"content": []}"#).expect("decode");
        assert_eq!(page, CollectionPage::empty());
    }

    #[test]
    fn query_omits_unset_sort_fields() {
        let json = serde_json::to_value(CollectionQuery::first_page()).expect("encode");
        assert_eq!(json, serde_json::json!({ "page": 0 }));
    }
}
