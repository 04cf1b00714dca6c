//! Multi range: a list of numeric buckets on one attribute, one selectable at a time.

mod codec;
pub use codec::{Interval, decode, encode};

mod overlap;
pub use overlap::has_refinement;

use common::{
    search_parameters::{NumericOperator, SearchParameters},
    search_results::SearchResults,
    search_state::SearchState,
};
use serde::{Deserialize, Serialize};

use crate::{
    connector::{ClearRefinement, Connector, ItemsTransform, Metadata, MetadataItem, apply_transform},
    context::IndexContext,
    refinement_value::{clean_up_value, get_current_refinement_text, refine_value},
};

pub const NAMESPACE: &str = "multiRange";
pub const ALL_LABEL: &str = "All";


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiRangeItem {
    pub label: String,
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
}

impl MultiRangeItem {
    pub fn new(label: impl Into<String>, start: Option<i64>, end: Option<i64>) -> Self {
        Self { label: label.into(), start, end }
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }

    pub fn value(&self) -> String {
        encode(&self.interval())
    }
}


#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MultiRangeProps {
    pub attribute: String,
    pub items: Vec<MultiRangeItem>,
    pub default_refinement: Option<String>,
    #[serde(skip)]
    pub transform_items: Option<ItemsTransform<MultiRangeRenderItem>>,
}

impl MultiRangeProps {
    pub fn new(attribute: impl Into<String>, items: Vec<MultiRangeItem>) -> Self {
        Self { attribute: attribute.into(), items, ..Default::default() }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.attribute.is_empty() {
            anyhow::bail!("multi range needs an attribute");
        }
        for item in &self.items {
            if let (Some(start), Some(end)) = (item.start, item.end) {
                if start > end {
                    anyhow::bail!("multi range item {:?} on {} starts after it ends", item.label, self.attribute);
                }
            }
        }
        if let Some(default_refinement) = &self.default_refinement {
            if !default_refinement.is_empty() && !self.items.iter().any(|item| &item.value() == default_refinement) {
                anyhow::bail!("default refinement {default_refinement:?} of {} matches no item", self.attribute);
            }
        }
        Ok(())
    }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiRangeRenderItem {
    pub label: String,
    pub value: String,
    pub is_refined: bool,
    pub no_refinement: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiRangeProvidedProps {
    pub items: Vec<MultiRangeRenderItem>,
    pub current_refinement: String,
    pub can_refine: bool,
}


#[derive(Debug, Clone, PartialEq)]
pub struct MultiRangeConnector {
    context: IndexContext,
}

impl MultiRangeConnector {
    pub fn new(context: IndexContext) -> Self {
        Self { context }
    }

    /// Stored value, else the default refinement, else `""`.
    pub fn current_refinement(&self, props: &MultiRangeProps, search_state: &SearchState) -> String {
        get_current_refinement_text(search_state, &self.context, Some(NAMESPACE), &props.attribute)
            .or_else(|| props.default_refinement.clone())
            .unwrap_or_default()
    }
}

impl Connector for MultiRangeConnector {
    type Props = MultiRangeProps;
    type ProvidedProps = MultiRangeProvidedProps;
    type Refinement = String;

    fn id(&self, props: &MultiRangeProps) -> String {
        props.attribute.clone()
    }

    fn get_provided_props(
        &self,
        props: &MultiRangeProps,
        search_state: &SearchState,
        search_results: Option<&SearchResults>,
    ) -> MultiRangeProvidedProps {
        let current_refinement = self.current_refinement(props, search_state);
        let Some(index_results) = search_results.and_then(|results| results.for_index(self.context.index_id()))
        else {
            let items = apply_transform(props.transform_items.as_ref(), vec![]);
            return MultiRangeProvidedProps { items, current_refinement, can_refine: false };
        };
        let stats = index_results.get_facet_stats(&props.attribute);

        let mut has_all_item = false;
        let mut items = Vec::with_capacity(props.items.len() + 1);
        for item in &props.items {
            let value = item.value();
            if value.is_empty() {
                if has_all_item {
                    continue;
                }
                has_all_item = true;
            }
            items.push(MultiRangeRenderItem {
                label: item.label.clone(),
                is_refined: value == current_refinement,
                no_refinement: !has_refinement(stats, &item.interval()),
                value,
            });
        }
        if !has_all_item {
            let any_refined = items.iter().any(|item| item.is_refined);
            items.push(MultiRangeRenderItem {
                label: ALL_LABEL.to_string(),
                value: String::new(),
                is_refined: !any_refined,
                no_refinement: stats.is_none(),
            });
        }

        let items = apply_transform(props.transform_items.as_ref(), items);
        let can_refine = items.iter().any(|item| !item.no_refinement);
        MultiRangeProvidedProps { items, current_refinement, can_refine }
    }

    fn refine(&self, props: &MultiRangeProps, search_state: &SearchState, next_refinement: String) -> SearchState {
        refine_value(search_state, &self.context, Some(NAMESPACE), &props.attribute, next_refinement, true)
    }

    fn get_search_parameters(
        &self,
        search_parameters: SearchParameters,
        props: &MultiRangeProps,
        search_state: &SearchState,
    ) -> SearchParameters {
        let Interval { start, end } = decode(&self.current_refinement(props, search_state));
        let mut search_parameters = search_parameters.add_disjunctive_facet(&props.attribute);
        if let Some(start) = start {
            search_parameters = search_parameters.add_numeric_refinement(&props.attribute, NumericOperator::Ge, start);
        }
        if let Some(end) = end {
            search_parameters = search_parameters.add_numeric_refinement(&props.attribute, NumericOperator::Le, end);
        }
        search_parameters
    }

    fn get_metadata(&self, props: &MultiRangeProps, search_state: &SearchState) -> Metadata {
        let current_refinement = self.current_refinement(props, search_state);
        let mut items = Vec::new();
        if !current_refinement.is_empty() {
            let label = match props.items.iter().find(|item| item.value() == current_refinement) {
                Some(item) => item.label.clone(),
                None => {
                    tracing::warn!(attribute = %props.attribute, %current_refinement, "refinement matches no configured range");
                    current_refinement.clone()
                }
            };
            let connector = self.clone();
            let clear_props = props.clone();
            items.push(MetadataItem {
                label: format!("{}: {}", props.attribute, label),
                attribute: props.attribute.clone(),
                current_refinement: label,
                value: ClearRefinement::new(move |next_state| connector.refine(&clear_props, next_state, String::new())),
            });
        }
        Metadata { id: props.attribute.clone(), index: Some(self.context.index_id().to_string()), items }
    }

    fn clean_up(&self, props: &MultiRangeProps, search_state: &SearchState) -> SearchState {
        clean_up_value(search_state, &self.context, Some(NAMESPACE), &props.attribute)
    }
}
