//! 키워드 매칭. 부분 문자열 포함 여부만 본다 — 단어 경계도, 형태소 분석도
//! 적용하지 않는다 (낮은 정밀도 / 높은 재현율 정책).

use std::borrow::Cow;

/// `text`에 부분 문자열로 등장하는 키워드를 선언 순서 그대로 모아 반환한다.
/// 빈 텍스트는 빈 결과. 부수 효과 없음, 실패하지 않음.
pub fn match_keywords(text: &str, keywords: &[String], case_sensitive: bool) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let haystack: Cow<'_, str> = if case_sensitive {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.to_lowercase())
    };

    keywords
        .iter()
        .filter(|keyword| {
            let needle: Cow<'_, str> = if case_sensitive {
                Cow::Borrowed(keyword.as_str())
            } else {
                Cow::Owned(keyword.to_lowercase())
            };
            haystack.contains(needle.as_ref())
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keywords: &[&str]) -> Vec<String> {
        keywords.iter().map(|kw| kw.to_string()).collect()
    }

    #[test]
    fn case_insensitive_by_default() {
        assert_eq!(
            match_keywords("ABC", &set(&["abc"]), false),
            vec!["abc".to_string()]
        );
        assert_eq!(
            match_keywords("공시: 유상증자 결정", &set(&["공시", "유상증자"]), false),
            set(&["공시", "유상증자"])
        );
    }

    #[test]
    fn case_sensitive_requires_exact_bytes() {
        assert!(match_keywords("ABC", &set(&["abc"]), true).is_empty());
        assert_eq!(
            match_keywords("abc", &set(&["abc"]), true),
            vec!["abc".to_string()]
        );
    }

    #[test]
    fn empty_text_matches_nothing() {
        assert!(match_keywords("", &set(&["공시", "abc"]), false).is_empty());
        assert!(match_keywords("", &set(&["공시"]), true).is_empty());
    }

    #[test]
    fn matches_inside_larger_words() {
        // 단어 경계를 강제하지 않는다.
        assert_eq!(
            match_keywords("quarterly alerting update", &set(&["alert"]), false),
            vec!["alert".to_string()]
        );
    }

    #[test]
    fn result_follows_declared_order_not_text_order() {
        let keywords = set(&["증자", "공시"]);
        assert_eq!(
            match_keywords("공시 - 유상증자", &keywords, false),
            set(&["증자", "공시"])
        );
    }

    #[test]
    fn collects_all_matches_not_first_only() {
        let keywords = set(&["a", "b", "c"]);
        assert_eq!(match_keywords("abc", &keywords, false), set(&["a", "b", "c"]));
    }
}
