//! Transition scoring between consecutive slides.
//!
//! The interest of a transition is the smallest of three counts: tags the
//! two slides share, tags only the first has, and tags only the second has.
//! Slides that are identical, disjoint, or nested all score zero.

use std::collections::BTreeSet;

/// Score the transition from a slide with tags `prev` to one with tags `next`.
pub fn transition_score<T: Ord>(prev: &BTreeSet<T>, next: &BTreeSet<T>) -> u64 {
    let common = prev.intersection(next).count();
    let only_prev = prev.len() - common;
    let only_next = next.len() - common;
    common.min(only_prev).min(only_next) as u64
}
