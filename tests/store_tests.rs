//! Store-level tests: dispatch actions through the reducer and assert on
//! state and emitted effects.

use tui_dispatch::testing::*;
use tui_dispatch::EffectStore;

use dexgrid::{
    action::Action,
    effect::Effect,
    reducer::reducer,
    state::{AppState, Pokemon, PokemonDetail},
};

fn entry(name: &str, id: u32) -> Pokemon {
    Pokemon {
        name: name.to_string(),
        url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
    }
}

fn sample_detail(id: u32, name: &str, types: &[&str]) -> PokemonDetail {
    PokemonDetail {
        id,
        name: name.to_string(),
        types: types.iter().map(|t| t.to_string()).collect(),
        abilities: vec!["blaze".into()],
        height: 6,
        weight: 85,
        sprite_front_default: Some(format!("https://example.test/{id}.png")),
        sprite_dream_world: None,
    }
}

#[test]
fn init_kicks_off_roster_and_type_fetches() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    assert!(store.state().roster.is_empty());

    let result = store.dispatch(Action::Init);
    assert!(result.changed, "State should change");
    assert!(store.state().roster.is_loading());
    assert!(store.state().type_list.is_loading());
    assert_eq!(result.effects.len(), 2);
    assert!(result.effects.contains(&Effect::LoadRoster));
    assert!(result.effects.contains(&Effect::LoadTypeList));
}

#[test]
fn two_entry_roster_renders_one_page() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(Action::RosterDidLoad(vec![
        entry("bulbasaur", 1),
        entry("charmander", 4),
    ]));

    let state = store.state();
    assert!(state.roster.is_loaded());
    assert_eq!(state.total_pages(), 1);
    let names: Vec<_> = state.visible_cards().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["bulbasaur".to_string(), "charmander".to_string()]);
}

#[test]
fn fire_membership_filters_to_charmander() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(Action::RosterDidLoad(vec![
        entry("bulbasaur", 1),
        entry("charmander", 4),
    ]));
    store.dispatch(Action::TypesDidLoad(vec!["fire".into()]));

    let result = store.dispatch(Action::TypeFilterNext);
    assert!(result
        .effects
        .contains(&Effect::LoadTypeMembers { name: "fire".into() }));
    assert!(store.state().grid_loading());

    store.dispatch(Action::TypeMembersDidLoad {
        name: "fire".into(),
        members: vec!["charmander".into()],
    });
    let state = store.state();
    assert!(!state.grid_loading());
    let names: Vec<_> = state.visible_cards().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["charmander".to_string()]);
}

#[test]
fn unknown_type_collapses_to_an_empty_result() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::RosterDidLoad(vec![
        entry("bulbasaur", 1),
        entry("charmander", 4),
    ]));
    store.dispatch(Action::TypesDidLoad(vec!["ghost".into()]));
    store.dispatch(Action::TypeFilterNext);
    store.dispatch(Action::TypeMembersDidError {
        name: "ghost".into(),
        error: "HTTP 404 for https://pokeapi.co/api/v2/type/ghost".into(),
    });

    let state = store.state();
    assert!(state.visible_cards().is_empty());
    assert_eq!(state.total_pages(), 0);
    assert!(state.message.is_some());
}

#[test]
fn filter_changes_always_reset_the_page() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let roster: Vec<Pokemon> = (1..=40).map(|i| entry(&format!("poke-{i:02}"), i)).collect();
    store.dispatch(Action::RosterDidLoad(roster));
    store.dispatch(Action::TypesDidLoad(vec!["fire".into()]));

    store.dispatch(Action::PageNext);
    store.dispatch(Action::PageNext);
    assert_eq!(store.state().page, 3);

    store.dispatch(Action::SearchStart);
    store.dispatch(Action::PageNext);
    store.dispatch(Action::SearchInput('p'));
    assert_eq!(store.state().page, 1);

    store.dispatch(Action::PageNext);
    store.dispatch(Action::TypeFilterNext);
    assert_eq!(store.state().page, 1);

    store.dispatch(Action::TypeMembersDidLoad {
        name: "fire".into(),
        members: (1..=40).map(|i| format!("poke-{i:02}")).collect(),
    });
    store.dispatch(Action::PageNext);
    store.dispatch(Action::TypeFilterClear);
    assert_eq!(store.state().page, 1);
}

#[test]
fn selection_loads_each_detail_once() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let result = store.dispatch(Action::RosterDidLoad(vec![
        entry("bulbasaur", 1),
        entry("charmander", 4),
    ]));
    assert!(result
        .effects
        .contains(&Effect::LoadDetail { name: "bulbasaur".into() }));
    store.dispatch(Action::DetailDidLoad(sample_detail(1, "bulbasaur", &["grass"])));

    let result = store.dispatch(Action::CursorMove(1));
    assert!(result
        .effects
        .contains(&Effect::LoadDetail { name: "charmander".into() }));
    store.dispatch(Action::DetailDidLoad(sample_detail(4, "charmander", &["fire"])));

    let result = store.dispatch(Action::CursorMove(-1));
    assert!(!result
        .effects
        .iter()
        .any(|effect| matches!(effect, Effect::LoadDetail { .. })));
    assert_eq!(
        store.state().current_detail().map(|d| d.id),
        Some(1)
    );
}

#[test]
fn artwork_is_requested_by_entry_id_and_falls_back_once() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let result = store.dispatch(Action::RosterDidLoad(vec![entry("charmander", 4)]));

    let artwork_urls: Vec<_> = result
        .effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::LoadArtwork { name, url } if name == "charmander" => Some(url.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(artwork_urls.len(), 1);
    assert!(artwork_urls[0].ends_with("/official-artwork/4.png"));

    store.dispatch(Action::ArtworkDidError {
        name: "charmander".into(),
        error: "HTTP 404".into(),
    });
    assert!(store.state().artwork_failed.contains("charmander"));

    // Leaving and re-entering the page must not retry the artwork.
    store.dispatch(Action::SearchStart);
    let result = store.dispatch(Action::SearchInput('c'));
    assert!(!result
        .effects
        .iter()
        .any(|effect| matches!(effect, Effect::LoadArtwork { .. })));
}

#[test]
fn action_categories_follow_the_naming_convention() {
    let did_load = Action::RosterDidLoad(Vec::new());
    let resize = Action::UiTerminalResize(80, 24);
    let tick = Action::Tick;

    assert_eq!(did_load.category(), Some("roster_did"));
    assert_eq!(resize.category(), Some("ui"));
    assert_eq!(tick.category(), None);

    assert!(did_load.is_roster_did());
    assert!(resize.is_ui());
}
