//! Pure filter and pagination over the fetched roster.
//!
//! The visible card set is always derived from the full roster plus the
//! current query and membership set; nothing here is cached.

use std::collections::HashSet;

use crate::state::Pokemon;

/// Cards per page, matching the 3x4 grid.
pub const CARDS_PER_PAGE: usize = 12;
pub const GRID_COLS: usize = 3;
pub const GRID_ROWS: usize = 4;

/// Case-insensitive substring match; an empty query matches everything.
pub fn matches_name(name: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&query.to_lowercase())
}

/// Intersects the name predicate with category membership. `members` is
/// `None` when no type filter is active; membership is an exact,
/// case-sensitive name match.
pub fn filter_entries<'a>(
    entries: &'a [Pokemon],
    query: &str,
    members: Option<&HashSet<String>>,
) -> Vec<&'a Pokemon> {
    entries
        .iter()
        .filter(|entry| {
            matches_name(&entry.name, query)
                && members.map_or(true, |set| set.contains(&entry.name))
        })
        .collect()
}

/// Number of pages needed for `count` matches; zero when nothing matches.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size)
}

/// The slice shown on a 1-based page. Pages past the end are empty rather
/// than clamped.
pub fn page_slice<'a, 'b>(
    matches: &'b [&'a Pokemon],
    page: usize,
    page_size: usize,
) -> &'b [&'a Pokemon] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= matches.len() {
        return &[];
    }
    let end = (start + page_size).min(matches.len());
    &matches[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Vec<Pokemon> {
        names
            .iter()
            .map(|name| Pokemon {
                name: name.to_string(),
                url: format!("https://pokeapi.co/api/v2/pokemon/{}/", name.len()),
            })
            .collect()
    }

    #[test]
    fn empty_query_matches_everything() {
        let entries = roster(&["bulbasaur", "charmander", "squirtle"]);
        let matches = filter_entries(&entries, "", None);
        assert_eq!(matches.len(), entries.len());
    }

    #[test]
    fn name_match_is_case_insensitive_substring() {
        let entries = roster(&["bulbasaur", "charmander", "charizard"]);
        let names: Vec<_> = filter_entries(&entries, "CHAR", None)
            .into_iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["charmander", "charizard"]);
        assert!(filter_entries(&entries, "saur", None).len() == 1);
        assert!(filter_entries(&entries, "mewtwo", None).is_empty());
    }

    #[test]
    fn membership_intersects_with_name_match() {
        let entries = roster(&["bulbasaur", "charmander"]);
        let members: HashSet<String> = ["charmander".to_string()].into();
        let names: Vec<_> = filter_entries(&entries, "", Some(&members))
            .into_iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["charmander"]);

        // AND of both predicates.
        assert!(filter_entries(&entries, "bulba", Some(&members)).is_empty());
    }

    #[test]
    fn membership_is_case_sensitive() {
        let entries = roster(&["charmander"]);
        let members: HashSet<String> = ["Charmander".to_string()].into();
        assert!(filter_entries(&entries, "", Some(&members)).is_empty());
    }

    #[test]
    fn empty_membership_set_matches_nothing() {
        let entries = roster(&["bulbasaur", "charmander"]);
        let members = HashSet::new();
        assert!(filter_entries(&entries, "", Some(&members)).is_empty());
    }

    #[test]
    fn total_pages_rounds_up_and_bottoms_out_at_zero() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(1, 12), 1);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(151, 12), 13);
    }

    #[test]
    fn pages_concatenate_to_the_full_match_set() {
        let entries = roster(&[
            "a1", "b2", "c3", "d4", "e5", "f6", "g7", "h8", "i9", "j10", "k11",
        ]);
        let matches = filter_entries(&entries, "", None);
        for page_size in 1..=matches.len() + 1 {
            let pages = total_pages(matches.len(), page_size);
            let mut seen = Vec::new();
            for page in 1..=pages {
                seen.extend(
                    page_slice(&matches, page, page_size)
                        .iter()
                        .map(|entry| entry.name.clone()),
                );
            }
            let expected: Vec<_> = matches.iter().map(|entry| entry.name.clone()).collect();
            assert_eq!(seen, expected, "page_size {page_size}");
        }
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let entries = roster(&["bulbasaur", "charmander"]);
        let matches = filter_entries(&entries, "", None);
        assert!(page_slice(&matches, 2, 12).is_empty());
        assert!(page_slice(&matches, 100, 12).is_empty());
    }

    #[test]
    fn two_entry_roster_fits_one_page() {
        let entries = roster(&["bulbasaur", "charmander"]);
        let matches = filter_entries(&entries, "", None);
        assert_eq!(total_pages(matches.len(), CARDS_PER_PAGE), 1);
        assert_eq!(page_slice(&matches, 1, CARDS_PER_PAGE).len(), 2);
    }
}
