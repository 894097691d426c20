//! In-article search: mode transitions, match computation and navigation.
//!
//! Matches are case-insensitive, non-overlapping occurrences of the literal
//! query in the article's plain text, where blocks are joined by `\n`.
//! Offsets count characters, not bytes.

use regex::RegexBuilder;

use crate::repository::ContentBlock;

use super::data::ArticleState;

/// The text the search runs on.
pub fn plain_text(content: &[ContentBlock]) -> String {
    content
        .iter()
        .map(ContentBlock::plain_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Character ranges `[start, end)` of every occurrence of `query`.
pub fn find_matches(content: &[ContentBlock], query: &str) -> Vec<(usize, usize)> {
    if query.is_empty() {
        return Vec::new();
    }
    let Ok(pattern) = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    else {
        return Vec::new();
    };

    let text = plain_text(content);
    let mut results = Vec::new();
    let mut offset = 0;
    let mut last_byte = 0;
    for found in pattern.find_iter(&text) {
        offset += text[last_byte..found.start()].chars().count();
        let len = found.as_str().chars().count();
        results.push((offset, offset + len));
        offset += len;
        last_byte = found.end();
    }
    results
}

/// Entering starts an empty query; leaving clears the whole search sub-state.
/// Entering while already searching changes nothing.
pub fn set_search_mode(state: &ArticleState, is_search: bool) -> Option<ArticleState> {
    if is_search && state.is_search {
        return None;
    }
    Some(ArticleState {
        is_search,
        search_query: is_search.then(String::new),
        search_results: Vec::new(),
        search_position: 0,
        ..state.clone()
    })
}

/// Stores the query and recomputes the matches. Ignored outside search mode.
/// An absent query is the empty query: search mode always carries one.
pub fn update_query(state: &ArticleState, query: Option<String>) -> Option<ArticleState> {
    if !state.is_search {
        return None;
    }
    let query = query.unwrap_or_default();
    let search_results = find_matches(&state.content, &query);
    Some(ArticleState {
        search_query: Some(query),
        search_results,
        search_position: 0,
        ..state.clone()
    })
}

/// Moves the highlighted match one step, staying within the results.
pub fn move_position(state: &ArticleState, forward: bool) -> Option<ArticleState> {
    if !state.is_search || state.search_results.is_empty() {
        return None;
    }
    let last = state.search_results.len() - 1;
    let search_position = if forward {
        (state.search_position + 1).min(last)
    } else {
        state.search_position.saturating_sub(1)
    };
    (search_position != state.search_position).then(|| ArticleState {
        search_position,
        ..state.clone()
    })
}

/// Recomputes the matches of an active query after the content changed.
pub fn refresh(state: ArticleState) -> ArticleState {
    match (state.is_search, state.search_query.as_deref()) {
        (true, Some(query)) if !query.is_empty() => {
            let search_results = find_matches(&state.content, query);
            ArticleState {
                search_results,
                search_position: 0,
                ..state
            }
        }
        _ => state,
    }
}
