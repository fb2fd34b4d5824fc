//! Word Finder — enumerates every dictionary word spellable from a letter
//! multiset.
//!
//! The search walks the trie and the available letters in lock-step: letters
//! are sorted so duplicates sit side by side, and a per-position `used` array
//! tracks which physical letters the current branch has consumed.  Skipping
//! position `i` when it repeats position `i-1` and `i-1` is still unused
//! prunes the interchangeable-duplicate branches, so each distinct word is
//! discovered exactly once.

use std::collections::HashSet;

use super::trie::{letter_index, Node, Trie};

/// Find every word in `trie` spellable from `letters`, using each letter at
/// most once.  Letters outside `A..=Z` are ignored.
///
/// Results are deduplicated and returned in discovery order, which is
/// deterministic for a given trie and letter multiset.  An empty result is a
/// normal outcome, not an error.
pub fn find_words(trie: &Trie, letters: &str) -> Vec<String> {
    // Pair each usable letter with its child-slot index so the recursion
    // never re-validates characters.
    let mut pool: Vec<(char, usize)> = letters
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter_map(|c| letter_index(c).map(|i| (c, i)))
        .collect();
    pool.sort_unstable();

    let mut used = vec![false; pool.len()];
    let mut prefix = String::with_capacity(pool.len());
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    search(
        trie.root(),
        &pool,
        &mut used,
        &mut prefix,
        &mut seen,
        &mut out,
    );
    out
}

fn search(
    node: &Node,
    pool: &[(char, usize)],
    used: &mut [bool],
    prefix: &mut String,
    seen: &mut HashSet<String>,
    out: &mut Vec<String>,
) {
    // A word ending here is a result even when longer extensions also exist.
    if node.is_terminal() && seen.insert(prefix.clone()) {
        out.push(prefix.clone());
    }

    for i in 0..pool.len() {
        if used[i] {
            continue;
        }
        // Equal adjacent letters are interchangeable: only the first unused
        // occurrence may start a branch at this depth.
        if i > 0 && pool[i].0 == pool[i - 1].0 && !used[i - 1] {
            continue;
        }

        let (c, slot) = pool[i];
        if let Some(child) = node.child(slot) {
            used[i] = true;
            prefix.push(c);
            search(child, pool, used, prefix, seen, out);
            prefix.pop();
            used[i] = false;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
