//! The contract every connector implements, plus the pieces it hands out.

use std::sync::Arc;

use common::{search_parameters::SearchParameters, search_results::SearchResults, search_state::SearchState};


/// Binds a widget's props to the shared search state and query builder.
///
/// Every operation is pure: inputs are never mutated and a new state or
/// builder is returned instead.
pub trait Connector {
    type Props;
    type ProvidedProps;
    type Refinement;

    /// Key of the widget inside its namespace.
    fn id(&self, props: &Self::Props) -> String;

    /// Props to render, derived from the state and, when available, the results.
    fn get_provided_props(
        &self,
        props: &Self::Props,
        search_state: &SearchState,
        search_results: Option<&SearchResults>,
    ) -> Self::ProvidedProps;

    fn refine(&self, props: &Self::Props, search_state: &SearchState, next_refinement: Self::Refinement) -> SearchState;

    fn get_search_parameters(
        &self,
        search_parameters: SearchParameters,
        props: &Self::Props,
        search_state: &SearchState,
    ) -> SearchParameters;

    /// Active refinements, e.g. for a "clear all filters" bar.
    fn get_metadata(&self, props: &Self::Props, search_state: &SearchState) -> Metadata;

    /// Removes the widget from the state when it unmounts.
    fn clean_up(&self, props: &Self::Props, search_state: &SearchState) -> SearchState;
}


#[derive(Debug, Clone)]
pub struct Metadata {
    pub id: String,
    pub index: Option<String>,
    pub items: Vec<MetadataItem>,
}

#[derive(Debug, Clone)]
pub struct MetadataItem {
    pub label: String,
    pub attribute: String,
    pub current_refinement: String,
    /// Clears this refinement from whatever state it is given.
    pub value: ClearRefinement,
}


#[derive(Clone)]
pub struct ClearRefinement(Arc<dyn Fn(&SearchState) -> SearchState + Send + Sync>);

impl ClearRefinement {
    pub fn new(clear: impl Fn(&SearchState) -> SearchState + Send + Sync + 'static) -> Self {
        ClearRefinement(Arc::new(clear))
    }

    pub fn apply(&self, search_state: &SearchState) -> SearchState {
        (self.0)(search_state)
    }
}

impl std::fmt::Debug for ClearRefinement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ClearRefinement(..)")
    }
}


/// User supplied hook run over the derived items before they are handed out.
pub struct ItemsTransform<T>(Arc<dyn Fn(Vec<T>) -> Vec<T> + Send + Sync>);

impl<T> ItemsTransform<T> {
    pub fn new(transform: impl Fn(Vec<T>) -> Vec<T> + Send + Sync + 'static) -> Self {
        ItemsTransform(Arc::new(transform))
    }

    pub fn apply(&self, items: Vec<T>) -> Vec<T> {
        (self.0)(items)
    }
}

impl<T> Clone for ItemsTransform<T> {
    fn clone(&self) -> Self {
        ItemsTransform(Arc::clone(&self.0))
    }
}

impl<T> std::fmt::Debug for ItemsTransform<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ItemsTransform(..)")
    }
}

pub fn apply_transform<T>(transform: Option<&ItemsTransform<T>>, items: Vec<T>) -> Vec<T> {
    match transform {
        Some(transform) => transform.apply(items),
        None => items,
    }
}
