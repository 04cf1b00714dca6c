//! Sort by: picks the index (and so the ranking) the query runs against.

use common::{search_parameters::SearchParameters, search_results::SearchResults, search_state::SearchState};
use serde::{Deserialize, Serialize};

use crate::{
    connector::{Connector, ItemsTransform, Metadata, apply_transform},
    context::IndexContext,
    refinement_value::{clean_up_value, get_current_refinement_text, refine_value},
};

/// Reserved state key; sort by has no namespace.
pub const SORT_BY_KEY: &str = "sortBy";


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortByItem {
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl SortByItem {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), label: None }
    }

    pub fn labelled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: Some(label.into()) }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SortByProps {
    pub items: Vec<SortByItem>,
    pub default_refinement: Option<String>,
    #[serde(skip)]
    pub transform_items: Option<ItemsTransform<SortByRenderItem>>,
}

impl SortByProps {
    pub fn new(items: Vec<SortByItem>) -> Self {
        Self { items, ..Default::default() }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.items.is_empty() {
            anyhow::bail!("sort by needs at least one index to choose from");
        }
        for (i, item) in self.items.iter().enumerate() {
            if item.value.is_empty() {
                anyhow::bail!("sort by item #{i} has an empty index name");
            }
            if self.items[..i].iter().any(|other| other.value == item.value) {
                anyhow::bail!("sort by lists index {} twice", item.value);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortByRenderItem {
    pub value: String,
    pub label: Option<String>,
    pub is_refined: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortByProvidedProps {
    pub items: Vec<SortByRenderItem>,
    pub current_refinement: Option<String>,
}


#[derive(Debug, Clone, PartialEq)]
pub struct SortByConnector {
    context: IndexContext,
}

impl SortByConnector {
    pub fn new(context: IndexContext) -> Self {
        Self { context }
    }

    pub fn current_refinement(&self, props: &SortByProps, search_state: &SearchState) -> Option<String> {
        get_current_refinement_text(search_state, &self.context, None, SORT_BY_KEY)
            .or_else(|| props.default_refinement.clone())
            .filter(|refinement| !refinement.is_empty())
    }
}

impl Connector for SortByConnector {
    type Props = SortByProps;
    type ProvidedProps = SortByProvidedProps;
    type Refinement = String;

    fn id(&self, _props: &SortByProps) -> String {
        SORT_BY_KEY.to_string()
    }

    fn get_provided_props(
        &self,
        props: &SortByProps,
        search_state: &SearchState,
        _search_results: Option<&SearchResults>,
    ) -> SortByProvidedProps {
        let current_refinement = self.current_refinement(props, search_state);
        let items = props
            .items
            .iter()
            .map(|item| SortByRenderItem {
                value: item.value.clone(),
                label: item.label.clone(),
                is_refined: current_refinement.as_deref() == Some(item.value.as_str()),
            })
            .collect();
        let items = apply_transform(props.transform_items.as_ref(), items);
        SortByProvidedProps { items, current_refinement }
    }

    fn refine(&self, _props: &SortByProps, search_state: &SearchState, next_refinement: String) -> SearchState {
        refine_value(search_state, &self.context, None, SORT_BY_KEY, next_refinement, false)
    }

    fn get_search_parameters(
        &self,
        search_parameters: SearchParameters,
        props: &SortByProps,
        search_state: &SearchState,
    ) -> SearchParameters {
        match self.current_refinement(props, search_state) {
            Some(index) => search_parameters.set_index(index),
            None => search_parameters,
        }
    }

    fn get_metadata(&self, _props: &SortByProps, _search_state: &SearchState) -> Metadata {
        Metadata { id: SORT_BY_KEY.to_string(), index: None, items: vec![] }
    }

    fn clean_up(&self, _props: &SortByProps, search_state: &SearchState) -> SearchState {
        clean_up_value(search_state, &self.context, None, SORT_BY_KEY)
    }
}
