//! Keyword search over the component index

use crate::model::{ComponentIndex, ComponentSummary};

/// Return the entries whose name or description contains `query`,
/// ignoring case.
///
/// Index order is preserved. An empty query matches every entry; otherwise
/// entries without a string name or description never match on that field.
pub fn search_components<'a>(index: &'a ComponentIndex, query: &str) -> Vec<&'a ComponentSummary> {
    let needle = query.to_lowercase();
    index
        .components
        .iter()
        .filter(|c| {
            needle.is_empty()
                || field_contains(c.name(), &needle)
                || field_contains(c.description(), &needle)
        })
        .collect()
}

fn field_contains(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|text| text.to_lowercase().contains(needle))
}
