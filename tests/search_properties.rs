use add_editor::search::{find_all, find_all_with, SearchState};
use proptest::prelude::*;

/// 素朴な参照実装（小文字化した文字列同士で左から走査）
fn naive(text: &str, term: &str) -> Vec<(usize, usize)> {
    let text: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();
    let term: Vec<char> = term.chars().flat_map(char::to_lowercase).collect();
    let mut spans = Vec::new();
    if term.is_empty() {
        return spans;
    }
    let mut i = 0;
    while i + term.len() <= text.len() {
        if text[i..i + term.len()] == term[..] {
            spans.push((i, i + term.len()));
            i += term.len();
        } else {
            i += 1;
        }
    }
    spans
}

#[test]
fn test_documented_example() {
    let spans: Vec<(usize, usize)> = find_all("abcabcabc", "abc").iter().map(|m| m.range()).collect();
    assert_eq!(spans, vec![(0, 3), (3, 6), (6, 9)]);
}

#[test]
fn test_overlapping_occurrences_are_not_double_counted() {
    let spans: Vec<(usize, usize)> = find_all("aaaa", "aa").iter().map(|m| m.range()).collect();
    assert_eq!(spans, vec![(0, 2), (2, 4)]);
}

#[test]
fn test_case_sensitivity_flag() {
    assert_eq!(find_all_with("Foo foo", "foo", true).len(), 2);
    assert_eq!(find_all_with("Foo foo", "foo", false).len(), 1);
}

#[test]
fn test_line_and_column_of_matches() {
    let matches = find_all("first\nsecond match\nmatch", "match");
    assert_eq!(matches.len(), 2);
    assert_eq!((matches[0].line, matches[0].column), (1, 7));
    assert_eq!((matches[1].line, matches[1].column), (2, 0));
}

proptest! {
    #[test]
    fn prop_empty_term_finds_nothing(text in ".{0,64}") {
        prop_assert!(find_all(&text, "").is_empty());
    }

    #[test]
    fn prop_spans_are_ordered_and_disjoint(text in "[abAB ]{0,64}", term in "[abAB]{1,3}") {
        let matches = find_all(&text, &term);
        for m in &matches {
            prop_assert!(m.start < m.end);
        }
        for pair in matches.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn prop_matches_naive_model(text in "[abcABC\n]{0,64}", term in "[abcABC]{1,4}") {
        let actual: Vec<(usize, usize)> = find_all(&text, &term).iter().map(|m| m.range()).collect();
        prop_assert_eq!(actual, naive(&text, &term));
    }

    #[test]
    fn prop_matched_text_equals_term_ignoring_case(text in "[a-zA-Z ]{0,64}", term in "[a-zA-Z]{1,3}") {
        let chars: Vec<char> = text.chars().collect();
        for m in find_all(&text, &term) {
            let found: String = chars[m.start..m.end].iter().collect();
            prop_assert_eq!(found.to_lowercase(), term.to_lowercase());
        }
    }

    #[test]
    fn prop_repeated_search_cycles_through_all_matches(count in 1usize..8) {
        let text = "x ".repeat(count);
        let mut state = SearchState::new();
        state.search(&text, "x", 0);
        let mut seen = vec![state.current().unwrap().start];
        for _ in 1..count {
            state.search(&text, "x", 0);
            seen.push(state.current().unwrap().start);
        }
        let expected: Vec<usize> = (0..count).map(|i| i * 2).collect();
        prop_assert_eq!(seen, expected);

        state.search(&text, "x", 0);
        prop_assert_eq!(state.current().unwrap().start, 0);
    }
}
