//! Client-side search, filter and pagination over fetched lists.
//!
//! [`run_query`] is a pure function of (list, criteria, page). It never
//! reorders its input: filtering is stable and the page is a contiguous slice
//! of the filtered sequence.

use crate::models::{Deal, User};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Sentinel that disables a categorical filter
pub const ALL: &str = "ALL";

/// A record the query engine can search and filter
pub trait Queryable {
    /// Categorical dimensions this record can be filtered on
    type Dimension: Copy + Ord + fmt::Debug;

    /// Fields matched by the free-text search term. `None` never matches.
    fn search_fields(&self) -> Vec<Option<&str>>;

    /// Exact code of this record along `dimension`
    fn category(&self, dimension: Self::Dimension) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DealDimension {
    Sector,
    Stage,
    DealType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UserDimension {
    Role,
    Status,
}

impl Queryable for Deal {
    type Dimension = DealDimension;

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.client_name.as_str()),
            Some(self.sector.as_str()),
            Some(self.deal_type.as_str()),
            self.summary.as_deref(),
        ]
    }

    fn category(&self, dimension: DealDimension) -> Option<&str> {
        match dimension {
            DealDimension::Sector => Some(self.sector.as_str()),
            DealDimension::Stage => Some(self.current_stage.as_str()),
            DealDimension::DealType => Some(self.deal_type.as_str()),
        }
    }
}

impl Queryable for User {
    type Dimension = UserDimension;

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.username.as_str()),
            Some(self.email.as_str()),
            Some(self.role.as_str()),
        ]
    }

    fn category(&self, dimension: UserDimension) -> Option<&str> {
        match dimension {
            UserDimension::Role => Some(self.role.as_str()),
            UserDimension::Status => Some(self.status().as_str()),
        }
    }
}

/// One categorical filter value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Exactly(String),
}

impl CategoryFilter {
    /// Case-sensitive; codes are enum-like
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exactly(expected) => value == Some(expected.as_str()),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL || s.is_empty() {
            CategoryFilter::All
        } else {
            CategoryFilter::Exactly(s.to_string())
        })
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(filter) => filter,
            Err(never) => match never {},
        }
    }
}

/// Free-text term plus one categorical filter per dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria<D: Ord> {
    pub search_term: String,
    filters: BTreeMap<D, CategoryFilter>,
}

impl<D: Ord> Default for FilterCriteria<D> {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            filters: BTreeMap::new(),
        }
    }
}

impl<D: Copy + Ord> FilterCriteria<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_filter(mut self, dimension: D, filter: impl Into<CategoryFilter>) -> Self {
        self.set_filter(dimension, filter.into());
        self
    }

    /// Set `dimension`'s filter; `All` removes the predicate
    pub fn set_filter(&mut self, dimension: D, filter: CategoryFilter) {
        match filter {
            CategoryFilter::All => {
                self.filters.remove(&dimension);
            }
            exact => {
                self.filters.insert(dimension, exact);
            }
        }
    }

    pub fn filter(&self, dimension: D) -> CategoryFilter {
        self.filters.get(&dimension).cloned().unwrap_or_default()
    }

    /// True when no predicate is active
    pub fn is_empty(&self) -> bool {
        self.search_term.trim().is_empty() && self.filters.is_empty()
    }

    pub fn matches<T>(&self, record: &T) -> bool
    where
        T: Queryable<Dimension = D>,
    {
        self.matches_search(record)
            && self
                .filters
                .iter()
                .all(|(dimension, filter)| filter.matches(record.category(*dimension)))
    }

    fn matches_search<T: Queryable>(&self, record: &T) -> bool {
        // Blank means no search; otherwise the term is matched as typed
        if self.search_term.trim().is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        record
            .search_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Number of pages for `total` records; zero records means zero pages
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 { 0 } else { total.div_ceil(page_size) }
}

/// Page position for display. Indices are 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page_size: usize,
    pub current_page: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
}

impl PageInfo {
    pub fn new(total_count: usize, page_size: usize, current_page: usize) -> Self {
        let start = current_page.saturating_sub(1).saturating_mul(page_size);
        let (start_index, end_index) = if start >= total_count {
            (0, 0)
        } else {
            (start + 1, start.saturating_add(page_size).min(total_count))
        };
        Self {
            page_size,
            current_page,
            total_count,
            total_pages: total_pages(total_count, page_size),
            start_index,
            end_index,
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// Filtered view of a list
#[derive(Debug, Clone)]
pub struct QueryResult<'a, T> {
    pub filtered: Vec<&'a T>,
    pub page: Vec<&'a T>,
    pub info: PageInfo,
}

impl<T> QueryResult<'_, T> {
    pub fn total_count(&self) -> usize {
        self.info.total_count
    }
}

/// Apply `criteria` to `items` and cut out `current_page` (1-based)
pub fn run_query<'a, T>(
    items: &'a [T],
    criteria: &FilterCriteria<T::Dimension>,
    page_size: usize,
    current_page: usize,
) -> QueryResult<'a, T>
where
    T: Queryable,
{
    let filtered: Vec<&T> = items.iter().filter(|item| criteria.matches(*item)).collect();
    let info = PageInfo::new(filtered.len(), page_size, current_page);

    let start = current_page.saturating_sub(1).saturating_mul(page_size);
    let page = filtered.iter().skip(start).take(page_size).copied().collect();

    QueryResult { filtered, page, info }
}
