//! Stateful list screen model: raw records, criteria, page pointer and a
//! refresh generation counter.
//!
//! Every change to the criteria resets the page pointer to 1. Refreshes are
//! ticketed; only the response for the most recently issued ticket is applied,
//! so a slow older fetch cannot overwrite a newer one.

use crate::{
    errors::ApiError,
    services::query::{CategoryFilter, FilterCriteria, PageInfo, QueryResult, Queryable, run_query},
};
use tracing::{debug, warn};

/// Proof that a refresh was started; hand it back with the response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a refresh ticket must be handed back to apply_refresh"]
pub struct RefreshTicket(u64);

/// What happened to a refresh response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { count: usize },
    /// The fetch failed; the list was emptied rather than left stale
    Cleared,
    /// A newer refresh was started after this one; response dropped
    Stale,
}

#[derive(Debug, Clone)]
pub struct ListView<T: Queryable> {
    items: Vec<T>,
    criteria: FilterCriteria<T::Dimension>,
    page_size: usize,
    current_page: usize,
    generation: u64,
}

impl<T: Queryable> ListView<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            criteria: FilterCriteria::default(),
            page_size: page_size.max(1),
            current_page: 1,
            generation: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    pub fn criteria(&self) -> &FilterCriteria<T::Dimension> {
        &self.criteria
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replace the raw list directly, keeping the page pointer in range
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.clamp_page();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.criteria.search_term = term.into();
        self.current_page = 1;
    }

    pub fn set_filter(&mut self, dimension: T::Dimension, filter: impl Into<CategoryFilter>) {
        self.criteria.set_filter(dimension, filter.into());
        self.current_page = 1;
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria<T::Dimension>) {
        self.criteria = criteria;
        self.current_page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.set_criteria(FilterCriteria::default());
    }

    pub fn query(&self) -> QueryResult<'_, T> {
        run_query(&self.items, &self.criteria, self.page_size, self.current_page)
    }

    pub fn page(&self) -> Vec<&T> {
        self.query().page
    }

    pub fn page_info(&self) -> PageInfo {
        self.query().info
    }

    pub fn total_count(&self) -> usize {
        self.page_info().total_count
    }

    pub fn total_pages(&self) -> usize {
        self.page_info().total_pages
    }

    pub fn next_page(&mut self) -> bool {
        let next = self.current_page + 1;
        self.go_to_page(next)
    }

    pub fn previous_page(&mut self) -> bool {
        match self.current_page.checked_sub(1) {
            Some(previous) => self.go_to_page(previous),
            None => false,
        }
    }

    /// Move to page `n`; a no-op returning false outside `1..=total_pages`
    pub fn go_to_page(&mut self, n: usize) -> bool {
        if n < 1 || n > self.total_pages() {
            return false;
        }
        self.current_page = n;
        true
    }

    /// Start a refresh, invalidating any refresh already in flight
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        RefreshTicket(self.generation)
    }

    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Apply a fetch result if `ticket` is still the latest refresh
    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<T>, ApiError>,
    ) -> RefreshOutcome {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, latest = self.generation, "dropping stale list response");
            return RefreshOutcome::Stale;
        }

        match result {
            Ok(items) => {
                let count = items.len();
                self.set_items(items);
                RefreshOutcome::Applied { count }
            }
            Err(e) => {
                warn!(error = %e, "list fetch failed; clearing list");
                self.set_items(Vec::new());
                RefreshOutcome::Cleared
            }
        }
    }

    // A reload can shrink the list under the pointer.
    fn clamp_page(&mut self) {
        let total_pages = self.total_pages();
        if self.current_page > total_pages {
            self.current_page = total_pages.max(1);
        }
    }
}
