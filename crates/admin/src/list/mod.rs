//! Paged entity lists.
//!
//! A list screen owns one [`ListController`]: it fetches pages from a
//! [`Feed`], appends them in server order to an accumulator, and derives the
//! visible list by filtering the accumulator with the current search query.
//! Search never fetches. Mutations patch or remove entries in place so the
//! pages loaded so far stay put.
//!
//! [`ListState`] is the pure part: applying a page returns a new state, so a
//! failed fetch simply never replaces the old one.

mod controller;
pub mod feeds;

pub use controller::{ListController, LoadOutcome, LocalChange, MutationOutcome};
pub use feeds::Feed;

use std::collections::HashSet;

use tracing::{debug, warn};

use catalog_admin_core::{Entity, Searchable, matches_query};

/// List behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub page_size: u32,
    /// Drop entities whose id is already loaded instead of appending them again.
    pub dedupe_ids: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            dedupe_ids: false,
        }
    }
}

/// One fetch, in both paging styles; each feed reads the fields it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Number of entities received so far.
    pub offset: u32,
    pub limit: u32,
}

/// One fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: Option<u64>,
    pub has_more: Option<bool>,
}

impl<T> PageResponse<T> {
    /// A page that ends the feed.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: None,
            has_more: Some(false),
        }
    }

    /// A feed delivered in a single response.
    #[must_use]
    pub const fn complete(items: Vec<T>) -> Self {
        Self {
            items,
            total: None,
            has_more: Some(false),
        }
    }
}

/// Paging position of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Last page applied; 0 before the first load.
    pub page_number: u32,
    pub page_size: u32,
    pub total_known: Option<u64>,
    pub has_more: bool,
    /// Entities received from the feed so far, duplicates included.
    pub received: u32,
}

/// Accumulated entities plus the filtered view over them.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
    visible: Vec<T>,
    query: String,
    cursor: Cursor,
    options: ListOptions,
}

impl<T> ListState<T>
where
    T: Entity + Searchable,
{
    #[must_use]
    pub fn new(options: ListOptions) -> Self {
        Self {
            items: Vec::new(),
            visible: Vec::new(),
            query: String::new(),
            cursor: Cursor {
                page_size: options.page_size,
                ..Cursor::default()
            },
            options,
        }
    }

    /// Everything loaded, in server order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The accumulator filtered by the current query.
    #[must_use]
    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[must_use]
    pub const fn options(&self) -> &ListOptions {
        &self.options
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.cursor.has_more
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.entity_id() == id)
    }

    /// Request for the next fetch; `reset` starts over at page 1.
    #[must_use]
    pub const fn next_request(&self, reset: bool) -> PageRequest {
        if reset {
            PageRequest {
                page: 1,
                offset: 0,
                limit: self.cursor.page_size,
            }
        } else {
            PageRequest {
                page: self.cursor.page_number + 1,
                offset: self.cursor.received,
                limit: self.cursor.page_size,
            }
        }
    }

    /// State after applying `response` to the request it answered.
    #[must_use]
    pub fn apply_page(&self, reset: bool, request: PageRequest, response: PageResponse<T>) -> Self {
        let mut next = if reset {
            Self {
                query: self.query.clone(),
                ..Self::new(self.options)
            }
        } else {
            self.clone()
        };

        let received = response.items.len();
        let mut incoming = response.items;
        if self.options.dedupe_ids {
            let mut seen: HashSet<String> = next
                .items
                .iter()
                .map(|item| item.entity_id().to_string())
                .collect();
            incoming.retain(|item| seen.insert(item.entity_id().to_string()));
            let dropped = received - incoming.len();
            if dropped > 0 {
                debug!(dropped, "Dropped already-loaded entities");
            }
        }
        next.items.extend(incoming);

        let cursor = &mut next.cursor;
        cursor.page_number = request.page;
        cursor.received = cursor
            .received
            .saturating_add(u32::try_from(received).unwrap_or(u32::MAX));
        if let Some(total) = response.total {
            cursor.total_known = Some(total);
        }

        let distinct: HashSet<&str> = next.items.iter().map(Entity::entity_id).collect();
        let loaded = u64::try_from(distinct.len()).unwrap_or(u64::MAX);
        match cursor.total_known {
            Some(total) if loaded > total => {
                warn!(loaded, total, "Backend total is below the loaded count");
                cursor.total_known = Some(loaded);
            }
            _ => {}
        }

        cursor.has_more = if received == 0 {
            false
        } else {
            let derived = cursor.total_known.is_some_and(|total| loaded < total);
            response.has_more.unwrap_or(derived)
        };
        if cursor.total_known.is_some_and(|total| loaded >= total) {
            cursor.has_more = false;
        }

        debug!(
            loaded,
            page = cursor.page_number,
            has_more = cursor.has_more,
            "Page applied"
        );
        next.refilter();
        next
    }

    fn refilter(&mut self) {
        self.visible = self
            .items
            .iter()
            .filter(|item| matches_query(*item, &self.query))
            .cloned()
            .collect();
    }

    /// Filter the loaded entities; a blank query shows all of them.
    pub fn search(&mut self, query: &str) -> &[T] {
        query.trim().clone_into(&mut self.query);
        self.refilter();
        &self.visible
    }

    /// Remove an entity from the accumulator and the view.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.entity_id() == id)?;
        let removed = self.items.remove(index);
        self.visible.retain(|item| item.entity_id() != id);
        Some(removed)
    }

    /// Change an entity in place; the view is recomputed since the change
    /// may affect search fields.
    pub fn patch<F>(&mut self, id: &str, change: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let Some(item) = self.items.iter_mut().find(|item| item.entity_id() == id) else {
            return false;
        };
        change(item);
        self.refilter();
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalog_admin_core::{Product, ProductId, ProductStatus};

    use super::*;

    fn product(id: &str, name: &str) -> Product {
        Product {
            productid: ProductId::new(id),
            productname: name.to_string(),
            ..Product::default()
        }
    }

    fn page(ids: &[&str], total: Option<u64>, has_more: Option<bool>) -> PageResponse<Product> {
        PageResponse {
            items: ids.iter().map(|id| product(id, &format!("Item {id}"))).collect(),
            total,
            has_more,
        }
    }

    fn options(dedupe_ids: bool) -> ListOptions {
        ListOptions {
            page_size: 2,
            dedupe_ids,
        }
    }

    fn ids(items: &[Product]) -> Vec<&str> {
        items.iter().map(|p| p.productid.as_str()).collect()
    }

    #[test]
    fn test_pages_append_in_server_order() {
        let state = ListState::new(options(false));
        let first = state.next_request(true);
        assert_eq!(first, PageRequest { page: 1, offset: 0, limit: 2 });

        let state = state.apply_page(true, first, page(&["b", "a"], Some(4), None));
        assert!(state.has_more());
        let second = state.next_request(false);
        assert_eq!(second, PageRequest { page: 2, offset: 2, limit: 2 });

        let state = state.apply_page(false, second, page(&["d", "c"], Some(4), None));
        assert_eq!(ids(state.items()), vec!["b", "a", "d", "c"]);
        assert!(!state.has_more());
        assert_eq!(state.cursor().page_number, 2);
    }

    #[test]
    fn test_zero_result_first_page_ends_feed() {
        let state = ListState::<Product>::new(options(false));
        let state = state.apply_page(true, state.next_request(true), page(&[], Some(10), Some(true)));
        assert!(!state.has_more());
        assert!(state.is_empty());
        assert_eq!(state.cursor().total_known, Some(10));
    }

    #[test]
    fn test_server_has_more_wins_over_derivation() {
        let state = ListState::new(options(false));
        let state = state.apply_page(true, state.next_request(true), page(&["a", "b"], None, Some(true)));
        assert!(state.has_more());

        let state = ListState::new(options(false));
        let state = state.apply_page(true, state.next_request(true), page(&["a", "b"], None, None));
        assert!(!state.has_more(), "unknown total and no flag means no more");
    }

    #[test]
    fn test_has_more_false_once_total_reached() {
        let state = ListState::new(options(false));
        let state = state.apply_page(true, state.next_request(true), page(&["a", "b"], Some(2), Some(true)));
        assert!(!state.has_more());
    }

    #[test]
    fn test_total_below_loaded_is_raised() {
        let state = ListState::new(options(false));
        let state = state.apply_page(true, state.next_request(true), page(&["a", "b"], Some(1), None));
        assert_eq!(state.cursor().total_known, Some(2));
        assert!(state.len() as u64 <= state.cursor().total_known.unwrap());
    }

    #[test]
    fn test_duplicates_kept_without_dedupe() {
        let state = ListState::new(options(false));
        let state = state.apply_page(true, state.next_request(true), page(&["a", "b"], Some(4), None));
        let state = state.apply_page(false, state.next_request(false), page(&["b", "c"], Some(4), None));
        assert_eq!(ids(state.items()), vec!["a", "b", "b", "c"]);
        assert!(state.has_more(), "a repeated id must not count toward the total");
        assert_eq!(state.next_request(false).offset, 4);
    }

    #[test]
    fn test_dedupe_uses_deduplicated_count() {
        let state = ListState::new(options(true));
        let state = state.apply_page(true, state.next_request(true), page(&["a", "b"], Some(4), None));
        let state = state.apply_page(false, state.next_request(false), page(&["b", "c"], Some(4), None));
        assert_eq!(ids(state.items()), vec!["a", "b", "c"]);
        assert!(state.has_more());
        assert_eq!(state.next_request(false).offset, 4);
    }

    #[test]
    fn test_reset_replaces_accumulator_but_keeps_query() {
        let state = ListState::new(options(false));
        let mut state = state.apply_page(true, state.next_request(true), page(&["a", "b"], Some(4), None));
        state.search("item a");
        let state = state.apply_page(true, state.next_request(true), page(&["a", "c"], Some(2), None));
        assert_eq!(ids(state.items()), vec!["a", "c"]);
        assert_eq!(ids(state.visible()), vec!["a"]);
        assert_eq!(state.cursor().page_number, 1);
    }

    #[test]
    fn test_search_is_local_and_case_insensitive() {
        let mut state = ListState::new(options(false));
        state = state.apply_page(
            true,
            state.next_request(true),
            PageResponse::complete(vec![product("1", "Vision Kit"), product("2", "Speech")]),
        );
        assert_eq!(ids(state.search("  VISION ")), vec!["1"]);
        state.search("");
        assert_eq!(ids(state.visible()), ids(state.items()));
        assert_eq!(ids(state.visible()), vec!["1", "2"]);
        assert!(state.search("nothing").is_empty());
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_remove_and_patch_in_place() {
        let state = ListState::new(options(false));
        let mut state = state.apply_page(true, state.next_request(true), page(&["a", "b", "c"], Some(3), None));
        state.search("item");

        assert!(state.remove("b").is_some());
        assert!(state.remove("b").is_none());
        assert_eq!(ids(state.visible()), vec!["a", "c"]);

        assert!(state.patch("c", |p| p.status = ProductStatus::Inactive));
        assert_eq!(state.get("c").unwrap().status, ProductStatus::Inactive);
        assert!(!state.patch("zz", |_| {}));
        assert_eq!(state.cursor().page_number, 1);
    }
}
