//! プロパティ名の単語分割
//!
//! 分割規則（優先順）:
//! 1. 記号を含む → 各記号の直前で分割し、記号を除去
//! 2. 大文字を含む → 各大文字の直前で分割（camelCase）
//! 3. それ以外 → 空白で分割
//!
//! 分割後は小文字化・空白除去し、重複語は最初の出現のみ残す。

/// 分割の区切りとなる記号
pub const SPECIAL_CHARACTERS: &str = "`~!@#$%^&*()-_=+\\|[{]};:'\",<.>/?";

fn is_special(c: char) -> bool {
    SPECIAL_CHARACTERS.contains(c)
}

/// 名前を重複なしの小文字単語列に分割する
///
/// # Examples
/// ```
/// use prop_match_common::tokenizer::tokenize;
///
/// assert_eq!(tokenize("MaxHeight"), vec!["max", "height"]);
/// assert_eq!(tokenize("max_height"), vec!["max", "height"]);
/// assert_eq!(tokenize("Max Height"), vec!["max", "height"]);
/// ```
pub fn tokenize(name: &str) -> Vec<String> {
    let words: Vec<String> = if name.chars().any(is_special) {
        split_before(name, is_special)
            .into_iter()
            .map(|word| word.chars().filter(|&c| !is_special(c)).collect())
            .collect()
    } else if name.chars().any(|c| c.is_ascii_uppercase()) {
        split_before(name, |c| c.is_ascii_uppercase())
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        split_on_space(name)
    };

    let normalized = words
        .into_iter()
        .map(|word| word.to_lowercase().replace(' ', ""));

    dedup_keep_first(normalized)
}

/// 条件に合う文字の直前で分割する（先頭位置では分割しない）
fn split_before(text: &str, boundary: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if i > 0 && boundary(c) {
            parts.push(&text[start..i]);
            start = i;
        }
    }
    parts.push(&text[start..]);
    parts
}

/// 空白で分割する。末尾の空要素は捨てるが、先頭・途中の空要素は残す
fn split_on_space(text: &str) -> Vec<String> {
    if !text.contains(' ') {
        return vec![text.to_string()];
    }

    let mut parts: Vec<String> = text.split(' ').map(str::to_string).collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

/// 既出の語を後から取り除く（最初の出現が残る）
fn dedup_keep_first(words: impl Iterator<Item = String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for word in words {
        if !result.contains(&word) {
            result.push(word);
        }
    }
    result
}
