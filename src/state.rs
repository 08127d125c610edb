use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::artwork::Artwork;
use crate::filter::{self, CARDS_PER_PAGE};

/// One catalog entry from the list endpoint. `name` is the identity; the
/// trailing segment of `url` carries the entry's stable id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub name: String,
    pub url: String,
}

/// Full attribute set for one entry, fetched lazily per name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub height: u16,
    pub weight: u16,
    pub sprite_front_default: Option<String>,
    pub sprite_dream_world: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),

    /// Full fetched window; paging is client-side only.
    pub roster: DataResource<Vec<Pokemon>>,
    pub type_list: DataResource<Vec<String>>,

    pub search: SearchState,
    pub type_filter: Option<String>,
    /// Membership of the active type filter.
    pub type_members: HashSet<String>,
    pub type_members_loading: bool,
    pub type_cache: HashMap<String, HashSet<String>>,

    /// 1-based page into the filtered matches.
    pub page: usize,
    /// Card index within the visible page.
    pub cursor: usize,

    pub detail_name: Option<String>,
    pub details: HashMap<String, PokemonDetail>,
    pub detail_loading: bool,

    pub artwork: HashMap<String, Artwork>,
    /// Names whose artwork request failed once; they render fallback art and
    /// are never retried.
    pub artwork_failed: HashSet<String>,
    pub artwork_pending: HashSet<String>,

    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            terminal_size: (80, 24),
            roster: DataResource::Empty,
            type_list: DataResource::Empty,
            search: SearchState::default(),
            type_filter: None,
            type_members: HashSet::new(),
            type_members_loading: false,
            type_cache: HashMap::new(),
            page: 1,
            cursor: 0,
            detail_name: None,
            details: HashMap::new(),
            detail_loading: false,
            artwork: HashMap::new(),
            artwork_failed: HashSet::new(),
            artwork_pending: HashSet::new(),
            message: None,
            tick: 0,
        }
    }
}

impl AppState {
    pub fn roster_entries(&self) -> &[Pokemon] {
        self.roster.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Membership set for the filter predicate; `None` when no type filter
    /// is active.
    pub fn active_members(&self) -> Option<&HashSet<String>> {
        self.type_filter.as_ref().map(|_| &self.type_members)
    }

    /// The filtered match set, derived fresh on every call so it can never
    /// go stale relative to its inputs.
    pub fn matches(&self) -> Vec<&Pokemon> {
        filter::filter_entries(
            self.roster_entries(),
            &self.search.query,
            self.active_members(),
        )
    }

    pub fn total_pages(&self) -> usize {
        filter::total_pages(self.matches().len(), CARDS_PER_PAGE)
    }

    /// Entries on the current page, cloned out of the roster for rendering
    /// and follow-up effects.
    pub fn visible_cards(&self) -> Vec<Pokemon> {
        let matches = self.matches();
        filter::page_slice(&matches, self.page, CARDS_PER_PAGE)
            .iter()
            .map(|entry| (*entry).clone())
            .collect()
    }

    pub fn selected_card(&self) -> Option<Pokemon> {
        self.visible_cards().into_iter().nth(self.cursor)
    }

    /// True while the grid cannot be shown yet: the roster, or the active
    /// filter's membership, is still in flight.
    pub fn grid_loading(&self) -> bool {
        self.roster.is_loading() || (self.type_filter.is_some() && self.type_members_loading)
    }

    pub fn current_detail(&self) -> Option<&PokemonDetail> {
        let name = self.detail_name.as_ref()?;
        self.details.get(name)
    }

    /// Resets paging after a query or type-filter change.
    pub fn reset_page(&mut self) {
        self.page = 1;
        self.cursor = 0;
    }

    pub fn apply_type_members(&mut self, type_name: &str, members: HashSet<String>) {
        self.type_cache
            .insert(type_name.to_string(), members.clone());
        if self.type_filter.as_deref() == Some(type_name) {
            self.type_members = members;
            self.type_members_loading = false;
        }
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Catalog")
                .entry("roster", ron_string(&self.roster_entries().len()))
                .entry("matches", ron_string(&self.matches().len()))
                .entry("page", ron_string(&self.page))
                .entry("total_pages", ron_string(&self.total_pages()))
                .entry("cursor", ron_string(&self.cursor))
                .entry("detail", ron_string(&self.detail_name)),
            DebugSection::new("Filters")
                .entry("search", ron_string(&self.search.query))
                .entry("search_active", ron_string(&self.search.active))
                .entry("type", ron_string(&self.type_filter)),
            DebugSection::new("Status")
                .entry("roster_loading", ron_string(&self.roster.is_loading()))
                .entry("members_loading", ron_string(&self.type_members_loading))
                .entry("detail_loading", ron_string(&self.detail_loading))
                .entry("artwork_pending", ron_string(&self.artwork_pending.len()))
                .entry("artwork_failed", ron_string(&self.artwork_failed.len()))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
