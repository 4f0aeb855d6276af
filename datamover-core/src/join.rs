//! Generic join algebra over ordered slices
//!
//! Every reconciliation step in the resolver (schema merging, divergence
//! detection, field deduplication) is expressed through these primitives
//! instead of ad-hoc loops. All functions are stable: output order follows
//! input order, and none of them mutate their inputs.

use std::collections::HashSet;
use std::hash::Hash;

/// Inner join: one output row per matching (left, right) pair.
/// Left elements without a match produce nothing. Left-major order.
pub fn inner_join<L, R, T>(
    left: &[L],
    right: &[R],
    matches: impl Fn(&L, &R) -> bool,
    select: impl Fn(&L, &R) -> T,
) -> Vec<T> {
    let mut rows = Vec::new();
    for l in left {
        for r in right {
            if matches(l, r) {
                rows.push(select(l, r));
            }
        }
    }
    rows
}

/// Left join: like `inner_join`, plus exactly one `(l, None)` row for each
/// left element with no match.
pub fn left_join<L, R, T>(
    left: &[L],
    right: &[R],
    matches: impl Fn(&L, &R) -> bool,
    select: impl Fn(&L, Option<&R>) -> T,
) -> Vec<T> {
    let mut rows = Vec::new();
    for l in left {
        let mut matched = false;
        for r in right {
            if matches(l, r) {
                rows.push(select(l, Some(r)));
                matched = true;
            }
        }
        if !matched {
            rows.push(select(l, None));
        }
    }
    rows
}

/// Right join: mirror of `left_join`, right-major order.
pub fn right_join<L, R, T>(
    left: &[L],
    right: &[R],
    matches: impl Fn(&L, &R) -> bool,
    select: impl Fn(Option<&L>, &R) -> T,
) -> Vec<T> {
    let mut rows = Vec::new();
    for r in right {
        let mut matched = false;
        for l in left {
            if matches(l, r) {
                rows.push(select(Some(l), r));
                matched = true;
            }
        }
        if !matched {
            rows.push(select(None, r));
        }
    }
    rows
}

/// Full join: every element of both sides appears in the output at least
/// once. Matched pairs and unmatched left elements come out in left order;
/// unmatched right elements are appended afterwards in right order. An
/// element that participated in any match never also emits an unmatched row.
pub fn full_join<L, R, T>(
    left: &[L],
    right: &[R],
    matches: impl Fn(&L, &R) -> bool,
    select: impl Fn(Option<&L>, Option<&R>) -> T,
) -> Vec<T> {
    let mut rows = Vec::new();
    let mut right_matched = vec![false; right.len()];

    for l in left {
        let mut matched = false;
        for (i, r) in right.iter().enumerate() {
            if matches(l, r) {
                rows.push(select(Some(l), Some(r)));
                matched = true;
                right_matched[i] = true;
            }
        }
        if !matched {
            rows.push(select(Some(l), None));
        }
    }

    for (i, r) in right.iter().enumerate() {
        if !right_matched[i] {
            rows.push(select(None, Some(r)));
        }
    }

    rows
}

/// Cross join: full Cartesian product in left-major order.
pub fn cross_join<L, R, T>(left: &[L], right: &[R], select: impl Fn(&L, &R) -> T) -> Vec<T> {
    let mut rows = Vec::with_capacity(left.len() * right.len());
    for l in left {
        for r in right {
            rows.push(select(l, r));
        }
    }
    rows
}

/// Anti-join: left elements with no matching right element, in left order.
pub fn exclude<L: Clone, R>(
    left: &[L],
    right: &[R],
    matches: impl Fn(&L, &R) -> bool,
) -> Vec<L> {
    let mut rows = Vec::new();
    for l in left {
        if !right.iter().any(|r| matches(l, r)) {
            rows.push(l.clone());
        }
    }
    rows
}

/// Anti-join by key equality.
pub fn exclude_by<L: Clone, R, K: PartialEq>(
    left: &[L],
    right: &[R],
    left_key: impl Fn(&L) -> K,
    right_key: impl Fn(&R) -> K,
) -> Vec<L> {
    let mut rows = Vec::new();
    for l in left {
        let key = left_key(l);
        if !right.iter().any(|r| right_key(r) == key) {
            rows.push(l.clone());
        }
    }
    rows
}

/// De-duplicate while preserving order; the first occurrence wins.
pub fn distinct<T: Clone + Eq + Hash>(items: &[T]) -> Vec<T> {
    distinct_by(items, |item| item.clone())
}

/// De-duplicate by an extracted key while preserving order; the first
/// occurrence of each key wins.
pub fn distinct_by<T: Clone, K: Eq + Hash>(items: &[T], key: impl Fn(&T) -> K) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    for item in items {
        if seen.insert(key(item)) {
            rows.push(item.clone());
        }
    }
    rows
}
