use std::collections::BTreeMap;

use crate::{SortRule, SortRuleSet};

/// Select value meaning "do not filter on this field".
pub const ALL_SENTINEL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    Genre,
    EnrichmentStatus,
}

impl FilterField {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::Genre => "genre",
            FilterField::EnrichmentStatus => "enrichment_status",
        }
    }
}

/// Canonical list query derived from the current search, filter and sort inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams {
    pub free_text: Option<String>,
    pub filters: BTreeMap<FilterField, String>,
    pub sort: Vec<SortRule>,
}

impl QueryParams {
    /// Flattens the query into the `q`, `filter[field]` and `sort` pairs the games
    /// endpoint expects.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(2 + self.filters.len());
        if let Some(text) = &self.free_text {
            pairs.push(("q".to_string(), text.clone()));
        }
        for (field, value) in &self.filters {
            pairs.push((format!("filter[{}]", field.as_str()), value.clone()));
        }
        if !self.sort.is_empty() {
            let joined = self
                .sort
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("sort".to_string(), joined));
        }
        pairs
    }
}

/// Builds the query for the given inputs. Empty values and the `all` sentinel are
/// left out; the search text is passed through untouched.
pub fn build_query(
    free_text: &str,
    genre: &str,
    status: &str,
    sort_rules: &SortRuleSet,
) -> QueryParams {
    let mut filters = BTreeMap::new();
    if is_active_filter(genre) {
        filters.insert(FilterField::Genre, genre.to_string());
    }
    if is_active_filter(status) {
        filters.insert(FilterField::EnrichmentStatus, status.to_string());
    }

    QueryParams {
        free_text: (!free_text.is_empty()).then(|| free_text.to_string()),
        filters,
        sort: sort_rules.rules().to_vec(),
    }
}

fn is_active_filter(value: &str) -> bool {
    !value.is_empty() && value != ALL_SENTINEL
}
