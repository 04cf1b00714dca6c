//! Read, write and prune a widget's slot in the search state.

use common::search_state::{SearchState, StateValue};

use crate::context::{INDICES_KEY, IndexContext, resolve_path};

pub const PAGE_KEY: &str = "page";


/// The raw value stored for the widget, if any. Presence wins over any
/// default: a stored empty string is returned as is.
pub fn get_current_refinement_value<'a>(
    search_state: &'a SearchState,
    context: &IndexContext,
    namespace: Option<&str>,
    id: &str,
) -> Option<&'a StateValue> {
    search_state.get_in(&resolve_path(id, namespace, context))
}

/// Same as [`get_current_refinement_value`] but as text. Numbers are
/// rendered, nested trees are ignored.
pub fn get_current_refinement_text(
    search_state: &SearchState,
    context: &IndexContext,
    namespace: Option<&str>,
    id: &str,
) -> Option<String> {
    match get_current_refinement_value(search_state, context, namespace, id)? {
        StateValue::Text(s) => Some(s.clone()),
        StateValue::Number(n) => Some(n.to_string()),
        StateValue::Float(n) => Some(n.to_string()),
        other => {
            tracing::warn!(id, ?namespace, value = ?other, "ignoring a refinement that is not text");
            None
        }
    }
}

/// Stores `value` in the widget's slot. With `reset_page` the page of the
/// targeted index goes back to 1; on a single-index page every index already
/// present under `indices` is reset too, since their widgets share the query.
pub fn refine_value(
    search_state: &SearchState,
    context: &IndexContext,
    namespace: Option<&str>,
    id: &str,
    value: impl Into<StateValue>,
    reset_page: bool,
) -> SearchState {
    let mut next = search_state.clone();
    if reset_page {
        match context {
            IndexContext::SingleIndex(_) => {
                if let Some(indices) = search_state.get_tree(INDICES_KEY) {
                    for index in indices.keys() {
                        next = next.set_in(&[INDICES_KEY, index, PAGE_KEY], 1_i64);
                    }
                }
                next = next.with(PAGE_KEY, 1_i64);
            }
            IndexContext::MultiIndex(target_index) => {
                next = next.set_in(&[INDICES_KEY, target_index.as_str(), PAGE_KEY], 1_i64);
            }
        }
    }
    let path = resolve_path(id, namespace, context);
    tracing::debug!(path = %path.join("."), "refining search state");
    next.set_in(&path, value)
}

/// Removes the widget's slot, pruning the namespace (and index entry) when
/// it ends up empty.
pub fn clean_up_value(
    search_state: &SearchState,
    context: &IndexContext,
    namespace: Option<&str>,
    id: &str,
) -> SearchState {
    let path = resolve_path(id, namespace, context);
    tracing::debug!(path = %path.join("."), "cleaning up search state");
    search_state.remove_in(&path)
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn state(value: serde_json::Value) -> SearchState {
        serde_json::from_value(value).unwrap()
    }

    fn to_json(state: &SearchState) -> serde_json::Value {
        serde_json::to_value(state).unwrap()
    }

    #[test]
    fn refine_without_page_reset_only_sets_the_slot() {
        let ctx = IndexContext::single("products");
        let next = refine_value(&SearchState::new(), &ctx, None, "sortBy", "price_asc", false);
        assert_eq!(to_json(&next), json!({"sortBy": "price_asc"}));
    }

    #[test]
    fn refine_single_index_resets_every_page() {
        let ctx = IndexContext::single("products");
        let before = state(json!({
            "page": 4,
            "indices": {"articles": {"page": 3}},
        }));
        let next = refine_value(&before, &ctx, Some("multiRange"), "price", "10:20", true);
        assert_eq!(
            to_json(&next),
            json!({
                "page": 1,
                "indices": {"articles": {"page": 1}},
                "multiRange": {"price": "10:20"},
            })
        );
    }

    #[test]
    fn refine_multi_index_touches_only_the_target_index() {
        let ctx = IndexContext::multi("articles");
        let before = state(json!({
            "page": 4,
            "indices": {
                "articles": {"page": 3, "multiRange": {"rating": "4:"}},
                "products": {"page": 2},
            },
        }));
        let next = refine_value(&before, &ctx, Some("multiRange"), "price", "10:20", true);
        assert_eq!(
            to_json(&next),
            json!({
                "page": 4,
                "indices": {
                    "articles": {"page": 1, "multiRange": {"rating": "4:", "price": "10:20"}},
                    "products": {"page": 2},
                },
            })
        );
        let products_before = before.get_in(&["indices", "products"]).unwrap();
        let products_after = next.get_in(&["indices", "products"]).unwrap();
        assert!(products_before.as_tree().unwrap().ptr_eq(products_after.as_tree().unwrap()));
    }

    #[test]
    fn stored_empty_string_is_still_present() {
        let ctx = IndexContext::single("products");
        let s = state(json!({"multiRange": {"price": ""}}));
        assert_eq!(get_current_refinement_text(&s, &ctx, Some("multiRange"), "price"), Some(String::new()));
        assert_eq!(get_current_refinement_text(&s, &ctx, Some("multiRange"), "rating"), None);
    }

    #[test]
    fn refine_next_to_other_widgets_keeps_their_values() {
        let ctx = IndexContext::single("products");
        let before = state(json!({
            "page": 2.0,
            "refinementList": {"brand": ["Apple"]},
            "toggle": {"free_shipping": true},
        }));
        let next = refine_value(&before, &ctx, Some("multiRange"), "price", "10:20", true);
        assert_eq!(
            to_json(&next),
            json!({
                "page": 1,
                "refinementList": {"brand": ["Apple"]},
                "toggle": {"free_shipping": true},
                "multiRange": {"price": "10:20"},
            })
        );
        assert_eq!(get_current_refinement_text(&next, &ctx, Some("toggle"), "free_shipping"), None);
        assert_eq!(get_current_refinement_text(&next, &ctx, Some("refinementList"), "brand"), None);
    }

    #[test]
    fn multi_index_reads_ignore_top_level_slots() {
        let ctx = IndexContext::multi("articles");
        let s = state(json!({"sortBy": "price_asc", "indices": {"articles": {"sortBy": "date_desc"}}}));
        assert_eq!(get_current_refinement_text(&s, &ctx, None, "sortBy").as_deref(), Some("date_desc"));
        let other = IndexContext::multi("products");
        assert_eq!(get_current_refinement_text(&s, &other, None, "sortBy"), None);
    }

    #[test]
    fn clean_up_prunes_namespace_and_index() {
        let ctx = IndexContext::multi("articles");
        let s = state(json!({"indices": {"articles": {"multiRange": {"price": "10:20"}}, "products": {"page": 2}}}));
        let next = clean_up_value(&s, &ctx, Some("multiRange"), "price");
        assert_eq!(to_json(&next), json!({"indices": {"products": {"page": 2}}}));
    }

    #[test]
    fn clean_up_keeps_other_widgets_of_the_namespace() {
        let ctx = IndexContext::single("products");
        let s = state(json!({"multiRange": {"price": "10:20", "rating": "4:"}}));
        let next = clean_up_value(&s, &ctx, Some("multiRange"), "price");
        assert_eq!(to_json(&next), json!({"multiRange": {"rating": "4:"}}));
    }
}
