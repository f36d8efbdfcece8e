//! Client-side filter state as an explicit value updated through a single
//! reducer, so every transition can be tested without a UI.

use crate::query::{FilterRequest, DEFAULT_PAGE, DEFAULT_PER_PAGE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: String,
    /// `None` means "all types".
    pub type_filter: Option<String>,
    pub generation: Option<u32>,
    pub page: u32,
    pub per_page: u32,
    /// Page count from the most recent result, if one has arrived.
    pub known_pages: Option<u32>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            type_filter: None,
            generation: None,
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            known_pages: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    SetSearch(String),
    SetType(Option<String>),
    SetGeneration(Option<u32>),
    SetPerPage(u32),
    SetPage(u32),
    NextPage,
    PrevPage,
    /// A result arrived; records how many pages exist.
    ResultsLoaded { pages: u32 },
    ClearFilters,
}

/// Applies `action` to `state`. Changing any filter sends the user back to
/// the first page, since the old page number no longer refers to the same
/// records.
pub fn reduce(state: &FilterState, action: FilterAction) -> FilterState {
    let mut next = state.clone();
    match action {
        FilterAction::SetSearch(search) => {
            if next.search != search {
                next.search = search;
                reset_paging(&mut next);
            }
        }
        FilterAction::SetType(type_filter) => {
            let type_filter = type_filter.filter(|t| !t.trim().is_empty() && !t.eq_ignore_ascii_case("all"));
            if next.type_filter != type_filter {
                next.type_filter = type_filter;
                reset_paging(&mut next);
            }
        }
        FilterAction::SetGeneration(generation) => {
            if next.generation != generation {
                next.generation = generation;
                reset_paging(&mut next);
            }
        }
        FilterAction::SetPerPage(per_page) => {
            let per_page = per_page.max(1);
            if next.per_page != per_page {
                next.per_page = per_page;
                reset_paging(&mut next);
            }
        }
        FilterAction::SetPage(page) => {
            next.page = clamp_page(page, next.known_pages);
        }
        FilterAction::NextPage => {
            next.page = clamp_page(next.page.saturating_add(1), next.known_pages);
        }
        FilterAction::PrevPage => {
            next.page = next.page.saturating_sub(1).max(1);
        }
        FilterAction::ResultsLoaded { pages } => {
            next.known_pages = Some(pages);
        }
        FilterAction::ClearFilters => {
            next = FilterState {
                per_page: next.per_page,
                ..FilterState::default()
            };
        }
    }
    next
}

fn reset_paging(state: &mut FilterState) {
    state.page = DEFAULT_PAGE;
    state.known_pages = None;
}

fn clamp_page(page: u32, known_pages: Option<u32>) -> u32 {
    let page = page.max(1);
    match known_pages {
        Some(pages) if pages > 0 => page.min(pages),
        Some(_) => 1,
        None => page,
    }
}

impl FilterState {
    pub fn has_active_filters(&self) -> bool {
        !self.search.trim().is_empty() || self.type_filter.is_some() || self.generation.is_some()
    }

    pub fn to_request(&self) -> FilterRequest {
        FilterRequest {
            search: Some(self.search.clone()).filter(|s| !s.trim().is_empty()),
            type_filter: self.type_filter.clone(),
            generation: self.generation,
            page: i64::from(self.page),
            per_page: i64::from(self.per_page),
        }
    }
}
