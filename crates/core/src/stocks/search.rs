//! Weighted free-text search over a fixed symbol universe.

use crate::constants::MAX_SEARCH_RESULTS;

use super::stocks_model::{SearchHit, SearchResults};

const EXACT_SYMBOL: u32 = 100;
const PARTIAL_SYMBOL: u32 = 50;
const EXACT_NAME: u32 = 90;
const PARTIAL_NAME: u32 = 30;
const WORD_CONTAINS: u32 = 20;
const WORD_PREFIX: u32 = 15;

/// Score one candidate against a query. Rules accumulate; within the symbol,
/// name and per-word groups only the strongest rule applies.
pub fn score(query: &str, symbol: &str, name: &str) -> u32 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0;
    }
    let symbol = symbol.to_lowercase();
    let name = name.to_lowercase();

    let mut total = 0;

    if symbol == query {
        total += EXACT_SYMBOL;
    } else if symbol.contains(&query) {
        total += PARTIAL_SYMBOL;
    }

    if name == query {
        total += EXACT_NAME;
    } else if name.contains(&query) {
        total += PARTIAL_NAME;
    }

    for word in name.split_whitespace() {
        if word.contains(&query) {
            total += WORD_CONTAINS;
        } else if word.starts_with(&query) {
            total += WORD_PREFIX;
        }
    }

    total
}

/// Rank `universe` against `query`, dropping non-matches and keeping the top
/// results. Equal scores keep universe order.
pub fn search_universe(query: &str, universe: &[(&str, &str)]) -> SearchResults {
    let mut scored: Vec<(u32, SearchHit)> = universe
        .iter()
        .filter_map(|(symbol, name)| {
            let s = score(query, symbol, name);
            (s > 0).then(|| {
                (
                    s,
                    SearchHit {
                        symbol: symbol.to_string(),
                        name: name.to_string(),
                    },
                )
            })
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    // Counts every match, not just the ones returned
    let total_results = scored.len();
    let search_results: Vec<SearchHit> = scored
        .into_iter()
        .take(MAX_SEARCH_RESULTS)
        .map(|(_, hit)| hit)
        .collect();

    SearchResults {
        total_results,
        search_results,
        query: query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SEARCH_UNIVERSE;

    #[test]
    fn test_partial_query_beats_non_match() {
        let appl = score("appl", "AAPL", "Apple Inc.");
        let zz = score("zz", "AAPL", "Apple Inc.");
        assert!(appl > zz);
        assert_eq!(zz, 0);
        // name substring + word "apple" contains "appl"
        assert_eq!(appl, PARTIAL_NAME + WORD_CONTAINS);
    }

    #[test]
    fn test_exact_symbol_scores_at_least_100() {
        assert!(score("aapl", "AAPL", "Apple Inc.") >= 100);
        assert_eq!(score("AAPL", "AAPL", "Apple Inc."), EXACT_SYMBOL);
    }

    #[test]
    fn test_exact_symbol_ranks_first() {
        let results = search_universe("aapl", SEARCH_UNIVERSE);
        assert_eq!(results.search_results[0].symbol, "AAPL");
        assert_eq!(results.query, "aapl");
    }

    #[test]
    fn test_non_matches_are_filtered() {
        let results = search_universe("zz", SEARCH_UNIVERSE);
        assert!(results.search_results.is_empty());
        assert_eq!(results.total_results, 0);
    }

    #[test]
    fn test_common_word_matches_many() {
        let results = search_universe("inc", SEARCH_UNIVERSE);
        assert!(results.total_results > 5);
        assert!(results.search_results.len() <= MAX_SEARCH_RESULTS);
        assert!(results.total_results >= results.search_results.len());
        assert!(results
            .search_results
            .iter()
            .all(|hit| hit.name.to_lowercase().contains("inc")));
    }

    #[test]
    fn test_truncates_to_top_results() {
        let universe: Vec<(String, String)> = (0..30)
            .map(|i| (format!("X{i}"), format!("Example {i}")))
            .collect();
        let borrowed: Vec<(&str, &str)> = universe
            .iter()
            .map(|(s, n)| (s.as_str(), n.as_str()))
            .collect();

        let results = search_universe("example", &borrowed);
        assert_eq!(results.total_results, 30);
        assert_eq!(results.search_results.len(), MAX_SEARCH_RESULTS);
        assert_eq!(results.search_results[0].symbol, "X0");
    }

    #[test]
    fn test_total_counts_matches_beyond_the_cut() {
        let results = search_universe("a", SEARCH_UNIVERSE);
        assert!(results.total_results > MAX_SEARCH_RESULTS);
        assert_eq!(results.search_results.len(), MAX_SEARCH_RESULTS);
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        assert_eq!(score("  ", "AAPL", "Apple Inc."), 0);
    }
}
