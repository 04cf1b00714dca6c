//! Hierarchical menu: one active path in a tree-shaped facet such as
//! `Shoes > Running > Trail`.

mod toggle;
pub use toggle::{next_refinement, next_refinement_for, transform_values, truncate};

use common::{
    search_parameters::{DEFAULT_HIERARCHICAL_SEPARATOR, HierarchicalFacet, SearchParameters},
    search_results::{DEFAULT_FACET_SORT, SearchResults},
    search_state::SearchState,
};
use serde::{Deserialize, Serialize};

use crate::{
    connector::{ClearRefinement, Connector, ItemsTransform, Metadata, MetadataItem, apply_transform},
    context::IndexContext,
    refinement_value::{clean_up_value, get_current_refinement_text, refine_value},
};

pub const NAMESPACE: &str = "hierarchicalMenu";


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HierarchicalMenuProps {
    /// One attribute per level; the first one names the widget.
    pub attributes: Vec<String>,
    pub separator: String,
    pub root_path: Option<String>,
    pub show_parent_level: bool,
    pub default_refinement: Option<String>,
    pub show_more: bool,
    pub limit_min: usize,
    pub limit_max: usize,
    #[serde(skip)]
    pub transform_items: Option<ItemsTransform<HierarchicalMenuItem>>,
}

impl Default for HierarchicalMenuProps {
    fn default() -> Self {
        Self {
            attributes: vec![],
            separator: DEFAULT_HIERARCHICAL_SEPARATOR.to_string(),
            root_path: None,
            show_parent_level: true,
            default_refinement: None,
            show_more: false,
            limit_min: 10,
            limit_max: 20,
            transform_items: None,
        }
    }
}

impl HierarchicalMenuProps {
    pub fn new(attributes: Vec<impl Into<String>>) -> Self {
        Self { attributes: attributes.into_iter().map(|a| a.into()).collect(), ..Default::default() }
    }

    pub fn id(&self) -> &str {
        self.attributes.first().map(String::as_str).unwrap_or_default()
    }

    /// Items shown per level: `limit_max` once "show more" is engaged.
    pub fn items_limit(&self) -> usize {
        if self.show_more { self.limit_max } else { self.limit_min }
    }

    pub fn facet_declaration(&self) -> HierarchicalFacet {
        HierarchicalFacet {
            name: self.id().to_string(),
            attributes: self.attributes.clone(),
            separator: self.separator.clone(),
            root_path: self.root_path.clone(),
            show_parent_level: self.show_parent_level,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.attributes.is_empty() {
            anyhow::bail!("hierarchical menu needs at least one attribute");
        }
        if self.attributes.iter().any(String::is_empty) {
            anyhow::bail!("hierarchical menu {} has an empty attribute", self.id());
        }
        if self.separator.is_empty() {
            anyhow::bail!("hierarchical menu {} has an empty separator", self.id());
        }
        if self.limit_max < self.limit_min {
            anyhow::bail!(
                "hierarchical menu {}: limit_max ({}) is below limit_min ({})",
                self.id(),
                self.limit_max,
                self.limit_min
            );
        }
        Ok(())
    }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchicalMenuItem {
    pub label: String,
    /// Refinement that clicking this item produces; `None` goes back to the root.
    pub value: Option<String>,
    pub count: u64,
    pub is_refined: bool,
    pub items: Option<Vec<HierarchicalMenuItem>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchicalMenuProvidedProps {
    pub items: Vec<HierarchicalMenuItem>,
    pub current_refinement: Option<String>,
    pub can_refine: bool,
}


#[derive(Debug, Clone, PartialEq)]
pub struct HierarchicalMenuConnector {
    context: IndexContext,
}

impl HierarchicalMenuConnector {
    pub fn new(context: IndexContext) -> Self {
        Self { context }
    }

    /// Stored path, else the default refinement. A stored empty string means
    /// the menu was cleared and reads as no refinement.
    pub fn current_refinement(&self, props: &HierarchicalMenuProps, search_state: &SearchState) -> Option<String> {
        get_current_refinement_text(search_state, &self.context, Some(NAMESPACE), props.id())
            .or_else(|| props.default_refinement.clone())
            .filter(|refinement| !refinement.is_empty())
    }
}

impl Connector for HierarchicalMenuConnector {
    type Props = HierarchicalMenuProps;
    type ProvidedProps = HierarchicalMenuProvidedProps;
    type Refinement = Option<String>;

    fn id(&self, props: &HierarchicalMenuProps) -> String {
        props.id().to_string()
    }

    fn get_provided_props(
        &self,
        props: &HierarchicalMenuProps,
        search_state: &SearchState,
        search_results: Option<&SearchResults>,
    ) -> HierarchicalMenuProvidedProps {
        let current_refinement = self.current_refinement(props, search_state);
        let values = search_results
            .and_then(|results| results.for_index(self.context.index_id()))
            .and_then(|results| results.get_facet_values(props.id(), &DEFAULT_FACET_SORT));
        let Some(values) = values else {
            return HierarchicalMenuProvidedProps { items: vec![], current_refinement, can_refine: false };
        };

        let items = transform_values(&values, &props.facet_declaration(), current_refinement.as_deref());
        let items = apply_transform(props.transform_items.as_ref(), items);
        let can_refine = !items.is_empty();
        HierarchicalMenuProvidedProps { items: truncate(items, props.items_limit()), current_refinement, can_refine }
    }

    fn refine(
        &self,
        props: &HierarchicalMenuProps,
        search_state: &SearchState,
        next_refinement: Option<String>,
    ) -> SearchState {
        refine_value(search_state, &self.context, Some(NAMESPACE), props.id(), next_refinement.unwrap_or_default(), true)
    }

    fn get_search_parameters(
        &self,
        search_parameters: SearchParameters,
        props: &HierarchicalMenuProps,
        search_state: &SearchState,
    ) -> SearchParameters {
        let items_limit = u32::try_from(props.items_limit()).unwrap_or(u32::MAX);
        let max_values_per_facet = search_parameters.max_values_per_facet.unwrap_or(0).max(items_limit);
        let search_parameters = search_parameters
            .add_hierarchical_facet(props.facet_declaration())
            .set_max_values_per_facet(max_values_per_facet);
        match self.current_refinement(props, search_state) {
            Some(current) => search_parameters.toggle_hierarchical_facet_refinement(props.id(), &current),
            None => search_parameters,
        }
    }

    fn get_metadata(&self, props: &HierarchicalMenuProps, search_state: &SearchState) -> Metadata {
        let root_attribute = props.id().to_string();
        let items = match self.current_refinement(props, search_state) {
            None => vec![],
            Some(current) => {
                let connector = self.clone();
                let clear_props = props.clone();
                vec![MetadataItem {
                    label: format!("{root_attribute}: {current}"),
                    attribute: root_attribute.clone(),
                    current_refinement: current,
                    value: ClearRefinement::new(move |next_state| connector.refine(&clear_props, next_state, None)),
                }]
            }
        };
        Metadata { id: root_attribute, index: Some(self.context.index_id().to_string()), items }
    }

    fn clean_up(&self, props: &HierarchicalMenuProps, search_state: &SearchState) -> SearchState {
        clean_up_value(search_state, &self.context, Some(NAMESPACE), props.id())
    }
}
