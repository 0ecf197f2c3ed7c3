//! 語順合わせ
//!
//! 単語数の少ない側（small）の各語に、多い側（big）の語を1つずつ
//! 類似度の高い順に貪欲に割り当て、並べ替えた文字列を作る。
//! 割り当てられなかった big の語は元の順で末尾に付ける。

use crate::similarity::average3;
use std::cmp::Ordering;

/// small/big の語の組と、その3指標平均
#[derive(Debug, Clone)]
struct WordPair<'a> {
    small_index: usize,
    big_index: usize,
    small: &'a str,
    big: &'a str,
    similarity: f64,
}

/// 割り当て順: 類似度の降順。同点は (small語, big語) の辞書順、さらに元の位置順
fn assignment_order(a: &WordPair<'_>, b: &WordPair<'_>) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.small.cmp(b.small))
        .then_with(|| a.big.cmp(b.big))
        .then_with(|| a.small_index.cmp(&b.small_index))
        .then_with(|| a.big_index.cmp(&b.big_index))
}

/// 2つの単語列を類似度が最大になるよう並べ替えて連結する
///
/// 戻り値は (small側の連結, big側の連結)。単語数が同じ場合は
/// `words_b` を big 側とする。どちらかが空でもエラーにはならない。
pub fn align_words(words_a: &[String], words_b: &[String]) -> (String, String) {
    let (small, big) = if words_a.len() > words_b.len() {
        (words_b, words_a)
    } else {
        (words_a, words_b)
    };

    let mut pairs: Vec<WordPair<'_>> = Vec::with_capacity(small.len() * big.len());
    for (small_index, small_word) in small.iter().enumerate() {
        for (big_index, big_word) in big.iter().enumerate() {
            pairs.push(WordPair {
                small_index,
                big_index,
                small: small_word,
                big: big_word,
                similarity: average3(small_word, big_word),
            });
        }
    }
    pairs.sort_by(assignment_order);

    let mut small_used = vec![false; small.len()];
    let mut big_used = vec![false; big.len()];
    let mut assigned = 0;
    let mut ordered_small = String::new();
    let mut ordered_big = String::new();

    for pair in &pairs {
        if assigned == small.len() {
            break;
        }
        if small_used[pair.small_index] || big_used[pair.big_index] {
            continue;
        }
        small_used[pair.small_index] = true;
        big_used[pair.big_index] = true;
        assigned += 1;
        ordered_small.push_str(pair.small);
        ordered_big.push_str(pair.big);
    }

    for (word, used) in big.iter().zip(&big_used) {
        if !used {
            ordered_big.push_str(word);
        }
    }

    (ordered_small, ordered_big)
}
