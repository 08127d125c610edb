#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadRoster,
    LoadTypeList,
    LoadTypeMembers { name: String },
    LoadDetail { name: String },
    LoadArtwork { name: String, url: String },
}
