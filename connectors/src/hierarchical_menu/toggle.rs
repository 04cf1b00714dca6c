//! Next active path of a hierarchical menu after a click.
//!
//! The toggle rules belong to the query builder. Rather than restating them,
//! a throwaway builder replays the current refinement followed by the
//! clicked path and reports what is left active.

use common::{
    search_parameters::{HierarchicalFacet, HierarchicalToggle, SearchParameters},
    search_results::FacetValueNode,
};

use super::HierarchicalMenuItem;


/// The refinement that clicking `path` produces when `current` is active.
/// `None` means the menu is back at its root.
pub fn next_refinement<B: HierarchicalToggle>(builder: B, id: &str, current: Option<&str>, path: &str) -> Option<String> {
    let Some(current) = current else {
        return Some(path.to_string());
    };
    let next = builder
        .toggle_hierarchical(id, current)
        .toggle_hierarchical(id, path)
        .current_hierarchical(id);
    tracing::trace!(id, current, path, ?next, "simulated hierarchical toggle");
    next
}

/// [`next_refinement`] against a fresh builder that only knows `facet`.
pub fn next_refinement_for(facet: &HierarchicalFacet, current: Option<&str>, path: &str) -> Option<String> {
    let builder = SearchParameters::new().add_hierarchical_facet(facet.clone());
    next_refinement(builder, &facet.name, current, path)
}

/// Turns facet value nodes into menu items whose `value` is what clicking them would refine.
pub fn transform_values(
    nodes: &[FacetValueNode],
    facet: &HierarchicalFacet,
    current: Option<&str>,
) -> Vec<HierarchicalMenuItem> {
    nodes
        .iter()
        .map(|node| HierarchicalMenuItem {
            label: node.name.clone(),
            value: next_refinement_for(facet, current, &node.path),
            count: node.count,
            is_refined: node.is_refined,
            items: node.children.as_ref().map(|children| transform_values(children, facet, current)),
        })
        .collect()
}

/// Keeps at most `limit` items on every level.
pub fn truncate(items: Vec<HierarchicalMenuItem>, limit: usize) -> Vec<HierarchicalMenuItem> {
    items
        .into_iter()
        .take(limit)
        .map(|mut item| {
            item.items = item.items.map(|children| truncate(children, limit));
            item
        })
        .collect()
}
