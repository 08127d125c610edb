use std::sync::OnceLock;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::HttpCache;
use crate::state::{Pokemon, PokemonDetail};

const API_BASE: &str = "https://pokeapi.co/api/v2";
const ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// The roster is a fixed window; paging happens client-side only.
pub const ROSTER_LIMIT: u16 = 151;

/// Default staleness window for responses without an explicit override.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
/// Type list and per-type membership change rarely.
pub const TYPE_TTL: Duration = Duration::from_secs(60 * 60);
/// Per-entry details.
pub const DETAIL_TTL: Duration = Duration::from_secs(10 * 60);
/// Artwork is immutable in practice.
const ARTWORK_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Clone, Debug)]
pub enum ApiError {
    /// Request never completed.
    Network(String),
    /// Response arrived with a non-success status.
    Http { status: u16, url: String },
    /// Body arrived but did not decode.
    Parse(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(err) => write!(f, "request failed: {err}"),
            ApiError::Http { status, url } => write!(f, "HTTP {status} for {url}"),
            ApiError::Parse(err) => write!(f, "bad response body: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeListResponse {
    results: Vec<TypeEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeEntry {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeDetailResponse {
    pokemon: Vec<TypeMemberSlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeMemberSlot {
    pokemon: TypeEntry,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u16,
    weight: u16,
    types: Vec<PokemonTypeSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: TypeEntry,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: TypeEntry,
}

/// GET /pokemon?limit=151 - the full catalog window, in source order.
pub async fn fetch_roster() -> Result<Vec<Pokemon>, ApiError> {
    let url = format!("{API_BASE}/pokemon?limit={ROSTER_LIMIT}");
    let response: ListResponse = fetch_json_cached(&url, DEFAULT_TTL).await?;
    Ok(response
        .results
        .into_iter()
        .map(|entry| Pokemon {
            name: entry.name,
            url: entry.url,
        })
        .collect())
}

/// GET /type - every type name, in source order.
pub async fn fetch_type_list() -> Result<Vec<String>, ApiError> {
    let url = format!("{API_BASE}/type");
    let response: TypeListResponse = fetch_json_cached(&url, TYPE_TTL).await?;
    Ok(response.results.into_iter().map(|entry| entry.name).collect())
}

/// GET /type/{name} - member names for one type.
pub async fn fetch_type_members(name: &str) -> Result<Vec<String>, ApiError> {
    let url = format!("{API_BASE}/type/{name}");
    let response: TypeDetailResponse = fetch_json_cached(&url, TYPE_TTL).await?;
    Ok(response
        .pokemon
        .into_iter()
        .map(|slot| slot.pokemon.name)
        .collect())
}

/// GET /pokemon/{id_or_name} - one entry's detail card data.
pub async fn fetch_detail(id_or_name: &str) -> Result<PokemonDetail, ApiError> {
    let url = format!("{API_BASE}/pokemon/{id_or_name}");
    let response: PokemonResponse = fetch_json_cached(&url, DETAIL_TTL).await?;

    let types = response
        .types
        .into_iter()
        .map(|slot| slot.type_info.name)
        .collect();
    let abilities = response
        .abilities
        .into_iter()
        .map(|slot| slot.ability.name)
        .collect();

    Ok(PokemonDetail {
        id: response.id,
        name: response.name,
        types,
        abilities,
        height: response.height,
        weight: response.weight,
        sprite_front_default: pointer_string(&response.sprites, "/front_default"),
        sprite_dream_world: pointer_string(&response.sprites, "/other/dream_world/front_default"),
    })
}

pub async fn fetch_artwork_bytes(url: &str) -> Result<Vec<u8>, ApiError> {
    fetch_bytes_cached(url, ARTWORK_TTL).await
}

/// Official artwork for an entry, addressed by its stable id.
pub fn artwork_url(id: u32) -> String {
    format!("{ARTWORK_BASE}/{id}.png")
}

/// Trailing numeric path segment of a resource URL, e.g.
/// `https://pokeapi.co/api/v2/pokemon/25/` -> 25.
pub fn id_from_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

async fn fetch_json_cached<T: serde::de::DeserializeOwned>(
    url: &str,
    ttl: Duration,
) -> Result<T, ApiError> {
    let bytes = fetch_bytes_cached(url, ttl).await?;
    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(value),
        Err(err) => {
            cache().purge(url).await;
            Err(ApiError::Parse(err.to_string()))
        }
    }
}

async fn fetch_bytes_cached(url: &str, ttl: Duration) -> Result<Vec<u8>, ApiError> {
    if let Some(bytes) = cache().get(url, ttl).await {
        return Ok(bytes);
    }

    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?
        .to_vec();
    cache().put(url, &bytes).await;
    Ok(bytes)
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

fn cache() -> &'static HttpCache {
    static CACHE: OnceLock<HttpCache> = OnceLock::new();
    CACHE.get_or_init(|| HttpCache::new(HttpCache::default_root()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_from_url_parses_trailing_segment() {
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/25/"), Some(25));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/151"), Some(151));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/pikachu/"), None);
        assert_eq!(id_from_url(""), None);
    }

    #[test]
    fn artwork_url_uses_the_entry_id() {
        assert_eq!(
            artwork_url(4),
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/4.png"
        );
    }

    #[test]
    fn detail_wire_shape_decodes() {
        let body = serde_json::json!({
            "id": 4,
            "name": "charmander",
            "height": 6,
            "weight": 85,
            "types": [{"slot": 1, "type": {"name": "fire", "url": "https://pokeapi.co/api/v2/type/10/"}}],
            "abilities": [{"ability": {"name": "blaze", "url": "https://pokeapi.co/api/v2/ability/66/"}}],
            "sprites": {
                "front_default": "https://example.test/4.png",
                "other": {"dream_world": {"front_default": "https://example.test/4.svg"}}
            }
        });
        let response: PokemonResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.id, 4);
        assert_eq!(response.types[0].type_info.name, "fire");
        assert_eq!(response.abilities[0].ability.name, "blaze");
        assert_eq!(
            pointer_string(&response.sprites, "/other/dream_world/front_default").as_deref(),
            Some("https://example.test/4.svg")
        );
    }

    #[test]
    fn membership_wire_shape_decodes() {
        let body = serde_json::json!({
            "pokemon": [
                {"pokemon": {"name": "charmander", "url": "https://pokeapi.co/api/v2/pokemon/4/"}, "slot": 1}
            ]
        });
        let response: TypeDetailResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.pokemon[0].pokemon.name, "charmander");
    }
}
