//! Read-only search results, keyed by index name.

use std::{cmp::Ordering, collections::BTreeMap, str::FromStr};

use serde::{Deserialize, Serialize};


#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResults {
    indices: BTreeMap<String, IndexResults>,
}

impl SearchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, index: impl Into<String>, results: IndexResults) -> Self {
        self.indices.insert(index.into(), results);
        self
    }

    pub fn for_index(&self, index: &str) -> Option<&IndexResults> {
        self.indices.get(index)
    }
}


#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexResults {
    pub facets: BTreeMap<String, FacetResult>,
}

impl IndexResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facet(mut self, name: impl Into<String>, facet: FacetResult) -> Self {
        self.facets.insert(name.into(), facet);
        self
    }

    pub fn get_facet_by_name(&self, name: &str) -> Option<&FacetResult> {
        self.facets.get(name)
    }

    pub fn get_facet_stats(&self, name: &str) -> Option<FacetStats> {
        self.get_facet_by_name(name).and_then(|f| f.stats)
    }

    /// Facet values of `name`, sorted at every level of the tree by `sort`.
    pub fn get_facet_values(&self, name: &str, sort: &[FacetSort]) -> Option<Vec<FacetValueNode>> {
        let mut values = self.get_facet_by_name(name)?.values.clone();
        sort_nodes(&mut values, sort);
        Some(values)
    }
}


#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetResult {
    pub stats: Option<FacetStats>,
    pub values: Vec<FacetValueNode>,
}

impl FacetResult {
    pub fn with_stats(mut self, min: f64, max: f64) -> Self {
        self.stats = Some(FacetStats { min, max });
        self
    }

    pub fn with_values(mut self, values: Vec<FacetValueNode>) -> Self {
        self.values = values;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacetStats {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetValueNode {
    pub name: String,
    pub path: String,
    pub count: u64,
    #[serde(default)]
    pub is_refined: bool,
    #[serde(default)]
    pub children: Option<Vec<FacetValueNode>>,
}

impl FacetValueNode {
    pub fn new(name: impl Into<String>, path: impl Into<String>, count: u64) -> Self {
        Self { name: name.into(), path: path.into(), count, is_refined: false, children: None }
    }

    pub fn refined(mut self) -> Self {
        self.is_refined = true;
        self
    }

    pub fn with_children(mut self, children: Vec<FacetValueNode>) -> Self {
        self.children = Some(children);
        self
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetSortKey {
    Name,
    Count,
    IsRefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One facet ordering criterion, written `name:asc`, `count:desc`, `isRefined:desc`...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetSort {
    pub key: FacetSortKey,
    pub direction: SortDirection,
}

pub const DEFAULT_FACET_SORT: [FacetSort; 1] = [FacetSort::NAME_ASC];

impl FacetSort {
    pub const NAME_ASC: FacetSort = FacetSort { key: FacetSortKey::Name, direction: SortDirection::Asc };

    pub fn compare(&self, a: &FacetValueNode, b: &FacetValueNode) -> Ordering {
        let ordering = match self.key {
            FacetSortKey::Name => a.name.cmp(&b.name),
            FacetSortKey::Count => a.count.cmp(&b.count),
            FacetSortKey::IsRefined => a.is_refined.cmp(&b.is_refined),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFacetSort(pub String);

impl std::fmt::Display for InvalidFacetSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid facet sort criterion: {:?}", self.0)
    }
}

impl std::error::Error for InvalidFacetSort {}

impl FromStr for FacetSort {
    type Err = InvalidFacetSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, direction) = s.split_once(':').unwrap_or((s, "asc"));
        let key = match key {
            "name" => FacetSortKey::Name,
            "count" => FacetSortKey::Count,
            "isRefined" => FacetSortKey::IsRefined,
            _ => return Err(InvalidFacetSort(s.to_string())),
        };
        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(InvalidFacetSort(s.to_string())),
        };
        Ok(FacetSort { key, direction })
    }
}

impl std::fmt::Display for FacetSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self.key {
            FacetSortKey::Name => "name",
            FacetSortKey::Count => "count",
            FacetSortKey::IsRefined => "isRefined",
        };
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{key}:{direction}")
    }
}

// criteria apply in order, later ones only break ties
fn sort_nodes(nodes: &mut [FacetValueNode], sort: &[FacetSort]) {
    nodes.sort_by(|a, b| {
        sort.iter()
            .map(|criterion| criterion.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    for node in nodes.iter_mut() {
        if let Some(children) = node.children.as_mut() {
            sort_nodes(children, sort);
        }
    }
}
