//! 上位K件サジェスト
//!
//! ターゲットプロパティ×戦略ごとに容量 `suggestion_size` の最小ヒープを持ち、
//! 容量を超えたら最小スコアを捨てる。最後に閾値未満を除いて降順に並べる。

use crate::types::{MatchSettings, ScoredCandidate, SuggestionEntry};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// ヒープ要素。スコア昇順、同点は後から追加された方を小さいとみなす
#[derive(Debug, Clone)]
struct HeapItem {
    candidate: ScoredCandidate,
    sequence: u64,
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.candidate
            .score
            .total_cmp(&other.candidate.score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem {}

/// 1ターゲットプロパティ・1戦略分の上位K件トラッカー
#[derive(Debug, Clone)]
pub struct SuggestionTracker {
    capacity: usize,
    min_similarity: f64,
    heap: BinaryHeap<Reverse<HeapItem>>,
    next_sequence: u64,
}

impl SuggestionTracker {
    pub fn new(settings: &MatchSettings) -> Self {
        Self {
            capacity: settings.suggestion_size,
            min_similarity: settings.min_similarity_value,
            heap: BinaryHeap::with_capacity(settings.suggestion_size + 1),
            next_sequence: 0,
        }
    }

    /// 候補を追加する。容量を超えた場合は現在の最小を捨てる
    pub fn offer(&mut self, candidate_name: &str, score: f64) {
        self.heap.push(Reverse(HeapItem {
            candidate: ScoredCandidate::new(candidate_name, score),
            sequence: self.next_sequence,
        }));
        self.next_sequence += 1;

        if self.heap.len() > self.capacity {
            self.heap.pop();
        }
    }

    /// ヒープを昇順に取り出し、最高スコアが先頭になるよう並べる
    ///
    /// 閾値未満の候補は捨てる。1件も残らなければ `NoSimilarity`。
    pub fn finalize(mut self) -> SuggestionEntry {
        let mut slots: Vec<Option<ScoredCandidate>> = vec![None; self.capacity];
        let mut slot = self.capacity;

        while let Some(Reverse(item)) = self.heap.pop() {
            slot -= 1;
            if item.candidate.score >= self.min_similarity {
                slots[slot] = Some(item.candidate);
            }
        }

        let candidates: Vec<ScoredCandidate> = slots.into_iter().flatten().collect();
        if candidates.is_empty() {
            SuggestionEntry::NoSimilarity
        } else {
            SuggestionEntry::Candidates(candidates)
        }
    }
}
