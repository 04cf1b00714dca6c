//! Connectors binding search widgets to the shared search state and query builder.
//!
//! Each connector is pure logic: given widget props, the search state and
//! (when available) search results it derives what to render, turns user
//! input into a new state, shapes the query parameters, describes its
//! active refinements and removes itself from the state on unmount.

pub mod connector;
pub mod context;
pub mod refinement_value;

pub mod hierarchical_menu;
pub mod multi_range;
pub mod sort_by;

pub use connector::{ClearRefinement, Connector, ItemsTransform, Metadata, MetadataItem};
pub use context::{IndexContext, resolve_path};
pub use hierarchical_menu::{HierarchicalMenuConnector, HierarchicalMenuProps};
pub use multi_range::{MultiRangeConnector, MultiRangeProps};
pub use sort_by::{SortByConnector, SortByProps};
