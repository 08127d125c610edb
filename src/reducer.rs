use tui_dispatch::{DataResource, DispatchResult};

use std::collections::HashSet;

use crate::action::Action;
use crate::api;
use crate::effect::Effect;
use crate::state::AppState;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.roster = DataResource::Loading;
            state.type_list = DataResource::Loading;
            state.message = None;
            DispatchResult::changed_with_many(vec![Effect::LoadRoster, Effect::LoadTypeList])
        }

        Action::RosterDidLoad(entries) => {
            state.roster = DataResource::Loaded(entries);
            let effects = refresh_view(state);
            if effects.is_empty() {
                DispatchResult::changed()
            } else {
                DispatchResult::changed_with_many(effects)
            }
        }

        Action::RosterDidError(error) => {
            state.roster = DataResource::Failed(error.clone());
            state.message = Some(format!("Roster error: {error}"));
            DispatchResult::changed()
        }

        Action::TypesDidLoad(types) => {
            state.type_list = DataResource::Loaded(types);
            DispatchResult::changed()
        }

        Action::TypesDidError(error) => {
            state.type_list = DataResource::Failed(error.clone());
            state.message = Some(format!("Type list error: {error}"));
            DispatchResult::changed()
        }

        Action::TypeFilterNext => cycle_filter(state, 1),
        Action::TypeFilterPrev => cycle_filter(state, -1),

        Action::TypeFilterClear => {
            if state.type_filter.is_none() {
                return DispatchResult::unchanged();
            }
            state.type_filter = None;
            state.type_members.clear();
            state.type_members_loading = false;
            state.reset_page();
            DispatchResult::changed_with_many(refresh_view(state))
        }

        Action::TypeMembersDidLoad { name, members } => {
            let set: HashSet<String> = members.into_iter().collect();
            state.apply_type_members(&name, set);
            if state.type_filter.as_deref() == Some(&name) {
                return DispatchResult::changed_with_many(refresh_view(state));
            }
            DispatchResult::changed()
        }

        Action::TypeMembersDidError { name, error } => {
            // Unknown type: the active membership collapses to the empty set
            // and the grid renders empty.
            if state.type_filter.as_deref() == Some(&name) {
                state.type_members_loading = false;
                state.type_members.clear();
            }
            state.message = Some(format!("Type {name} error: {error}"));
            DispatchResult::changed_with_many(refresh_view(state))
        }

        Action::SearchStart => {
            state.search.active = true;
            state.search.query.clear();
            state.reset_page();
            DispatchResult::changed_with_many(refresh_view(state))
        }

        Action::SearchCancel => {
            if !state.search.active && state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            state.reset_page();
            DispatchResult::changed_with_many(refresh_view(state))
        }

        Action::SearchSubmit => {
            state.search.active = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            state.reset_page();
            DispatchResult::changed_with_many(refresh_view(state))
        }

        Action::SearchBackspace => {
            state.search.query.pop();
            state.reset_page();
            DispatchResult::changed_with_many(refresh_view(state))
        }

        Action::CursorMove(delta) => {
            let visible = state.visible_cards().len();
            if visible == 0 {
                return DispatchResult::unchanged();
            }
            let mut next = state.cursor as i16 + delta;
            if next < 0 {
                next = 0;
            } else if next >= visible as i16 {
                next = visible as i16 - 1;
            }
            if next as usize == state.cursor {
                return DispatchResult::unchanged();
            }
            state.cursor = next as usize;
            DispatchResult::changed_with_many(select_current(state))
        }

        Action::PageNext => {
            if state.page >= state.total_pages() {
                return DispatchResult::unchanged();
            }
            state.page += 1;
            state.cursor = 0;
            DispatchResult::changed_with_many(refresh_view(state))
        }

        Action::PagePrev => {
            if state.page <= 1 {
                return DispatchResult::unchanged();
            }
            state.page -= 1;
            state.cursor = 0;
            DispatchResult::changed_with_many(refresh_view(state))
        }

        Action::DetailDidLoad(detail) => {
            state.detail_loading = false;
            state.message = None;
            state.details.insert(detail.name.clone(), detail);
            DispatchResult::changed()
        }

        Action::DetailDidError { name, error } => {
            state.detail_loading = false;
            state.message = Some(format!("{name} load error: {error}"));
            DispatchResult::changed()
        }

        Action::ArtworkDidLoad { name, art } => {
            state.artwork_pending.remove(&name);
            state.artwork.insert(name, art);
            DispatchResult::changed()
        }

        Action::ArtworkDidError { name, error } => {
            // One failed attempt flips the card to fallback art for good.
            state.artwork_pending.remove(&name);
            state.artwork_failed.insert(name.clone());
            state.message = Some(format!("Artwork error for {name}: {error}"));
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            let busy = state.grid_loading()
                || state.detail_loading
                || state.type_list.is_loading()
                || !state.artwork_pending.is_empty();
            if busy {
                state.tick = state.tick.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Steps the type filter through none + every fetched type, wrapping.
fn cycle_filter(state: &mut AppState, step: i16) -> DispatchResult<Effect> {
    let selected = {
        let Some(types) = state.type_list.data() else {
            return DispatchResult::unchanged();
        };
        if types.is_empty() {
            return DispatchResult::unchanged();
        }
        let len = types.len() as i16;
        let current = state
            .type_filter
            .as_ref()
            .and_then(|name| types.iter().position(|t| t == name))
            .map(|idx| idx as i16 + 1)
            .unwrap_or(0);
        let mut next = current + step;
        if next < 0 {
            next = len;
        } else if next > len {
            next = 0;
        }
        if next == 0 {
            None
        } else {
            Some(types[(next - 1) as usize].clone())
        }
    };

    if selected == state.type_filter {
        return DispatchResult::unchanged();
    }
    state.type_filter = selected.clone();
    state.reset_page();

    let Some(name) = selected else {
        state.type_members.clear();
        state.type_members_loading = false;
        return DispatchResult::changed_with_many(refresh_view(state));
    };

    if let Some(cached) = state.type_cache.get(&name).cloned() {
        state.type_members = cached;
        state.type_members_loading = false;
        return DispatchResult::changed_with_many(refresh_view(state));
    }

    state.type_members.clear();
    state.type_members_loading = true;
    let mut effects = vec![Effect::LoadTypeMembers { name }];
    effects.extend(refresh_view(state));
    DispatchResult::changed_with_many(effects)
}

/// Requests anything the current page needs that is not already cached or in
/// flight, then re-syncs the detail selection.
fn refresh_view(state: &mut AppState) -> Vec<Effect> {
    let mut effects = page_artwork_effects(state);
    effects.extend(select_current(state));
    effects
}

fn select_current(state: &mut AppState) -> Vec<Effect> {
    let Some(card) = state.selected_card() else {
        state.detail_name = None;
        return Vec::new();
    };
    if state.detail_name.as_deref() == Some(card.name.as_str()) {
        return Vec::new();
    }
    state.detail_name = Some(card.name.clone());
    detail_follow_up(state, &card.name)
}

fn detail_follow_up(state: &mut AppState, name: &str) -> Vec<Effect> {
    if state.details.contains_key(name) {
        return Vec::new();
    }
    state.detail_loading = true;
    vec![Effect::LoadDetail {
        name: name.to_string(),
    }]
}

fn page_artwork_effects(state: &mut AppState) -> Vec<Effect> {
    let cards = state.visible_cards();
    let mut effects = Vec::new();
    for card in cards {
        if state.artwork.contains_key(&card.name)
            || state.artwork_failed.contains(&card.name)
            || state.artwork_pending.contains(&card.name)
        {
            continue;
        }
        match api::id_from_url(&card.url) {
            Some(id) => {
                state.artwork_pending.insert(card.name.clone());
                effects.push(Effect::LoadArtwork {
                    name: card.name,
                    url: api::artwork_url(id),
                });
            }
            // No id in the resource URL means no artwork address; the card
            // goes straight to fallback.
            None => {
                state.artwork_failed.insert(card.name);
            }
        }
    }
    effects
}
