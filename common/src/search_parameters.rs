//! Query parameters sent to the search backend.
//!
//! `SearchParameters` is an immutable-functional builder: every mutator takes
//! the builder by value and hands back the updated one, so a caller holding
//! a clone never observes a change.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

pub const DEFAULT_HIERARCHICAL_SEPARATOR: &str = " > ";


#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NumericOperator {
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
}

impl NumericOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumericOperator::Ge => ">=",
            NumericOperator::Le => "<=",
        }
    }
}

impl std::fmt::Display for NumericOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchicalFacet {
    pub name: String,
    pub attributes: Vec<String>,
    pub separator: String,
    pub root_path: Option<String>,
    pub show_parent_level: bool,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchParameters {
    pub index: Option<String>,
    pub disjunctive_facets: BTreeSet<String>,
    pub hierarchical_facets: Vec<HierarchicalFacet>,
    pub hierarchical_facets_refinements: BTreeMap<String, Vec<String>>,
    pub numeric_refinements: BTreeMap<String, BTreeMap<NumericOperator, Vec<i64>>>,
    pub max_values_per_facet: Option<u32>,
}

impl SearchParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn add_disjunctive_facet(mut self, name: impl Into<String>) -> Self {
        self.disjunctive_facets.insert(name.into());
        self
    }

    pub fn is_disjunctive_facet(&self, name: &str) -> bool {
        self.disjunctive_facets.contains(name)
    }

    /// Declares a hierarchical facet. A second declaration under the same name
    /// replaces the first one.
    pub fn add_hierarchical_facet(mut self, facet: HierarchicalFacet) -> Self {
        match self.hierarchical_facets.iter().position(|f| f.name == facet.name) {
            Some(i) => {
                tracing::debug!(facet = %facet.name, "replacing hierarchical facet declaration");
                self.hierarchical_facets[i] = facet;
            }
            None => self.hierarchical_facets.push(facet),
        }
        self
    }

    pub fn get_hierarchical_facet_by_name(&self, name: &str) -> Option<&HierarchicalFacet> {
        self.hierarchical_facets.iter().find(|f| f.name == name)
    }

    pub fn hierarchical_separator(&self, name: &str) -> &str {
        self.get_hierarchical_facet_by_name(name)
            .map(|f| f.separator.as_str())
            .unwrap_or(DEFAULT_HIERARCHICAL_SEPARATOR)
    }

    pub fn add_numeric_refinement(mut self, attribute: impl Into<String>, operator: NumericOperator, value: i64) -> Self {
        let values = self
            .numeric_refinements
            .entry(attribute.into())
            .or_default()
            .entry(operator)
            .or_default();
        if !values.contains(&value) {
            values.push(value);
        }
        self
    }

    pub fn get_numeric_refinement(&self, attribute: &str, operator: NumericOperator) -> &[i64] {
        self.numeric_refinements
            .get(attribute)
            .and_then(|ops| ops.get(&operator))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn set_max_values_per_facet(mut self, max_values_per_facet: u32) -> Self {
        self.max_values_per_facet = Some(max_values_per_facet);
        self
    }

    /// Toggles `value` on the single active path of hierarchical facet `facet`.
    ///
    /// - nothing refined: `value` becomes the refinement
    /// - `value` is the refinement or one of its ancestors: go up to the
    ///   parent of `value`, or back to the root when `value` is top level
    /// - anything else: `value` replaces the refinement
    pub fn toggle_hierarchical_facet_refinement(mut self, facet: &str, value: &str) -> Self {
        if self.get_hierarchical_facet_by_name(facet).is_none() {
            tracing::warn!(facet, "toggling a hierarchical facet that was never declared");
        }
        let separator = self.hierarchical_separator(facet).to_string();

        let up_one_or_multiple_levels = match self.hierarchical_refinement(facet) {
            Some(current) => current == value || current.starts_with(&format!("{value}{separator}")),
            None => false,
        };

        let next = if up_one_or_multiple_levels {
            match value.rfind(separator.as_str()) {
                Some(pos) if !separator.is_empty() => vec![value[..pos].to_string()],
                _ => vec![],
            }
        } else {
            vec![value.to_string()]
        };

        self.hierarchical_facets_refinements.insert(facet.to_string(), next);
        self
    }

    pub fn hierarchical_refinement(&self, facet: &str) -> Option<&str> {
        self.hierarchical_facets_refinements
            .get(facet)
            .and_then(|refinements| refinements.first())
            .map(String::as_str)
    }
}


/// The two builder capabilities the hierarchical toggle engine relies on.
pub trait HierarchicalToggle: Sized {
    fn toggle_hierarchical(self, id: &str, path: &str) -> Self;
    fn current_hierarchical(&self, id: &str) -> Option<String>;
}

impl HierarchicalToggle for SearchParameters {
    fn toggle_hierarchical(self, id: &str, path: &str) -> Self {
        self.toggle_hierarchical_facet_refinement(id, path)
    }

    fn current_hierarchical(&self, id: &str) -> Option<String> {
        self.hierarchical_refinement(id).map(str::to_string)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn categories() -> SearchParameters {
        SearchParameters::new().add_hierarchical_facet(HierarchicalFacet {
            name: "categories.lvl0".to_string(),
            attributes: vec!["categories.lvl0".to_string(), "categories.lvl1".to_string(), "categories.lvl2".to_string()],
            separator: " > ".to_string(),
            root_path: None,
            show_parent_level: true,
        })
    }

    #[test]
    fn toggle_on_empty_refines_the_path() {
        let p = categories().toggle_hierarchical_facet_refinement("categories.lvl0", "Shoes > Running");
        assert_eq!(p.hierarchical_refinement("categories.lvl0"), Some("Shoes > Running"));
    }

    #[test]
    fn toggle_same_top_level_path_goes_back_to_root() {
        let p = categories()
            .toggle_hierarchical_facet_refinement("categories.lvl0", "Shoes")
            .toggle_hierarchical_facet_refinement("categories.lvl0", "Shoes");
        assert_eq!(p.hierarchical_refinement("categories.lvl0"), None);
    }

    #[test]
    fn toggle_same_nested_path_goes_up_one_level() {
        let p = categories()
            .toggle_hierarchical_facet_refinement("categories.lvl0", "Shoes > Running")
            .toggle_hierarchical_facet_refinement("categories.lvl0", "Shoes > Running");
        assert_eq!(p.hierarchical_refinement("categories.lvl0"), Some("Shoes"));
    }

    #[test]
    fn toggle_ancestor_goes_above_it() {
        let p = categories()
            .toggle_hierarchical_facet_refinement("categories.lvl0", "Shoes > Running > Trail")
            .toggle_hierarchical_facet_refinement("categories.lvl0", "Shoes > Running");
        assert_eq!(p.hierarchical_refinement("categories.lvl0"), Some("Shoes"));
    }

    #[test]
    fn toggle_sibling_replaces() {
        let p = categories()
            .toggle_hierarchical_facet_refinement("categories.lvl0", "Shoes > Running")
            .toggle_hierarchical_facet_refinement("categories.lvl0", "Shoes > Hiking");
        assert_eq!(p.hierarchical_refinement("categories.lvl0"), Some("Shoes > Hiking"));
    }

    #[test]
    fn prefix_without_separator_is_not_an_ancestor() {
        let p = categories()
            .toggle_hierarchical_facet_refinement("categories.lvl0", "Shoestrings")
            .toggle_hierarchical_facet_refinement("categories.lvl0", "Shoes");
        assert_eq!(p.hierarchical_refinement("categories.lvl0"), Some("Shoes"));
    }

    #[test]
    fn custom_separator_is_honoured() {
        let p = SearchParameters::new()
            .add_hierarchical_facet(HierarchicalFacet {
                name: "cat".to_string(),
                attributes: vec!["cat0".to_string(), "cat1".to_string()],
                separator: "/".to_string(),
                root_path: None,
                show_parent_level: false,
            })
            .toggle_hierarchical_facet_refinement("cat", "a/b")
            .toggle_hierarchical_facet_refinement("cat", "a/b");
        assert_eq!(p.hierarchical_refinement("cat"), Some("a"));
    }

    #[test]
    fn numeric_refinements_are_deduplicated() {
        let p = SearchParameters::new()
            .add_numeric_refinement("price", NumericOperator::Ge, 10)
            .add_numeric_refinement("price", NumericOperator::Ge, 10)
            .add_numeric_refinement("price", NumericOperator::Le, 20);
        assert_eq!(p.get_numeric_refinement("price", NumericOperator::Ge), &[10]);
        assert_eq!(p.get_numeric_refinement("price", NumericOperator::Le), &[20]);
        assert!(p.get_numeric_refinement("rating", NumericOperator::Ge).is_empty());
    }

    #[test]
    fn redeclaring_a_hierarchical_facet_replaces_it() {
        let p = categories().add_hierarchical_facet(HierarchicalFacet {
            name: "categories.lvl0".to_string(),
            attributes: vec!["categories.lvl0".to_string()],
            separator: "/".to_string(),
            root_path: None,
            show_parent_level: true,
        });
        assert_eq!(p.hierarchical_facets.len(), 1);
        assert_eq!(p.hierarchical_separator("categories.lvl0"), "/");
    }

    #[test]
    fn mutators_do_not_touch_clones() {
        let original = categories();
        let changed = original.clone().set_index("products_price_asc");
        assert_eq!(original.index, None);
        assert_eq!(changed.index.as_deref(), Some("products_price_asc"));
    }
}
