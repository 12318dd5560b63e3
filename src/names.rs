//! Per-run type-name allocation.
//!
//! One allocator is created at the start of each inference call and threaded
//! through the traversal by mutable reference. Never a process-wide counter:
//! two concurrent runs must not see each other's names.

use std::collections::{HashMap, HashSet};

#[derive(Debug)]
pub struct NameAllocator {
    root_name: String,
    /// base name → times handed out (first use is unsuffixed).
    counts: HashMap<String, usize>,
    /// every name ever returned this run.
    produced: HashSet<String>,
}

impl NameAllocator {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self { root_name: root_name.into(), counts: HashMap::new(), produced: HashSet::new() }
    }

    /// Build an identifier from structural path segments. Each segment is
    /// word-capitalized independently and the results are concatenated with no
    /// separator; an empty slice yields the root name. On collision with a
    /// previously produced base the occurrence count is appended (`Item`,
    /// `Item2`, `Item3`, ...).
    pub fn allocate(&mut self, segments: &[&str]) -> String {
        let base: String = if segments.is_empty() {
            self.root_name.clone()
        } else {
            segments.iter().map(|s| capitalize_words(s)).collect()
        };
        let count = self.counts.entry(base.clone()).or_insert(0);
        *count += 1;
        let mut candidate = if *count == 1 { base.clone() } else { format!("{base}{count}") };
        // a suffixed name can still collide with a literal base seen earlier
        // (e.g. keys "item2" then "item" twice); keep counting until free
        while !self.produced.insert(candidate.clone()) {
            let count = self.counts.get_mut(&base).expect("base was just inserted");
            *count += 1;
            candidate = format!("{base}{count}");
        }
        candidate
    }

    /// Clear tracked names. Only between independent runs, never mid-run.
    pub fn reset(&mut self) {
        self.counts.clear();
        self.produced.clear();
    }
}

/// `user_name` / `user-name` / `user name` / `userName` → `UserName`.
/// Word boundaries: underscores, hyphens, whitespace, and camelCase humps.
fn capitalize_words(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut at_word_start = true;
    let mut prev_lower = false;
    for ch in segment.chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            at_word_start = true;
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            at_word_start = true;
        }
        if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.push(ch);
        }
        prev_lower = ch.is_lowercase();
    }
    out
}
