//! 検索用マッチャー

use super::types::MatchSpan;

/// 文字列マッチング戦略
pub trait StringMatcher {
    /// 文字列内のすべてのマッチを返す
    fn find_matches(&self, text: &str, pattern: &str, case_sensitive: bool) -> Vec<MatchSpan>;
}

/// 単純なリテラルマッチャー
///
/// 左から右へ走査し、マッチ末尾の直後から再開するため結果は重ならない。
#[derive(Debug, Default, Clone)]
pub struct LiteralMatcher;

impl LiteralMatcher {
    /// インスタンスを作成
    pub fn new() -> Self {
        Self
    }
}

impl StringMatcher for LiteralMatcher {
    fn find_matches(&self, text: &str, pattern: &str, case_sensitive: bool) -> Vec<MatchSpan> {
        if pattern.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let pattern_chars: Vec<char> = pattern.chars().collect();

        if pattern_chars.len() > chars.len() {
            return Vec::new();
        }

        let mut matches = Vec::new();
        let mut line = 0usize;
        let mut column = 0usize;
        let mut start = 0usize;
        let last_start = chars.len() - pattern_chars.len();

        while start <= last_start {
            let is_match = pattern_chars
                .iter()
                .enumerate()
                .all(|(offset, pat_ch)| chars_equal(chars[start + offset], *pat_ch, case_sensitive));

            let step = if is_match {
                let end = start + pattern_chars.len();
                matches.push(MatchSpan { start, end, line, column });
                pattern_chars.len()
            } else {
                1
            };

            // 行・列を進めた分だけ更新
            for ch in &chars[start..start + step] {
                if *ch == '\n' {
                    line += 1;
                    column = 0;
                } else {
                    column += 1;
                }
            }
            start += step;
        }

        matches
    }
}

fn chars_equal(a: char, b: char, case_sensitive: bool) -> bool {
    if case_sensitive || a == b {
        return a == b;
    }

    // Unicodeケースフォールディング（簡易）
    a.to_lowercase().eq(b.to_lowercase())
}

/// 大文字小文字を区別せずにすべてのマッチを返す
pub fn find_all(text: &str, term: &str) -> Vec<MatchSpan> {
    find_all_with(text, term, true)
}

/// 大文字小文字の扱いを指定してすべてのマッチを返す
pub fn find_all_with(text: &str, term: &str, case_insensitive: bool) -> Vec<MatchSpan> {
    LiteralMatcher::new().find_matches(text, term, !case_insensitive)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(spans: &[MatchSpan]) -> Vec<(usize, usize)> {
        spans.iter().map(MatchSpan::range).collect()
    }

    #[test]
    fn finds_basic_matches() {
        let matcher = LiteralMatcher::new();
        let result = matcher.find_matches("hello world hello", "hello", true);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].start, 0);
        assert_eq!(result[1].start, 12);
    }

    #[test]
    fn consecutive_matches_do_not_overlap() {
        assert_eq!(ranges(&find_all("abcabcabc", "abc")), vec![(0, 3), (3, 6), (6, 9)]);
        assert_eq!(ranges(&find_all("aaaa", "aa")), vec![(0, 2), (2, 4)]);
        assert_eq!(ranges(&find_all("aaa", "aa")), vec![(0, 2)]);
    }

    #[test]
    fn handles_newlines() {
        let result = find_all("hello\nworld\nWORLD", "world");
        assert_eq!(result.len(), 2);
        assert_eq!((result[0].line, result[0].column), (1, 0));
        assert_eq!((result[1].line, result[1].column), (2, 0));
        assert_eq!(result[1].start, 12);
    }

    #[test]
    fn returns_empty_for_empty_or_missing_term() {
        assert!(find_all("abc", "").is_empty());
        assert!(find_all("abc", "z").is_empty());
        assert!(find_all("ab", "abc").is_empty());
        assert!(find_all("", "a").is_empty());
    }

    #[test]
    fn case_insensitive_by_default() {
        let result = find_all("Hello World", "hello");
        assert_eq!(ranges(&result), vec![(0, 5)]);

        let strict = find_all_with("Hello World", "hello", false);
        assert!(strict.is_empty());
    }

    #[test]
    fn offsets_are_character_based() {
        let result = find_all("日本語のテキスト、テキスト", "テキスト");
        assert_eq!(ranges(&result), vec![(4, 8), (9, 13)]);
    }
}
