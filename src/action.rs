use serde::{Deserialize, Serialize};

use crate::artwork::Artwork;
use crate::state::{Pokemon, PokemonDetail};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,

    RosterDidLoad(Vec<Pokemon>),
    RosterDidError(String),

    TypesDidLoad(Vec<String>),
    TypesDidError(String),
    TypeFilterNext,
    TypeFilterPrev,
    TypeFilterClear,
    TypeMembersDidLoad { name: String, members: Vec<String> },
    TypeMembersDidError { name: String, error: String },

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    CursorMove(i16),
    PageNext,
    PagePrev,

    DetailDidLoad(PokemonDetail),
    DetailDidError { name: String, error: String },

    ArtworkDidLoad { name: String, art: Artwork },
    ArtworkDidError { name: String, error: String },

    #[action(category = "ui")]
    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
