//! Per-pass memo table for exportability verdicts.
//!
//! Entries are keyed by stable names rather than object identity: classes by
//! qualified name, types by their rendered form with nullability erased.
//! An entry is marked in flight before its dependencies are visited; a
//! lookup that hits an in-flight entry reads it as exportable, which is what
//! lets the evaluator terminate on cyclic type graphs.
//!
//! A `true` that leaned on an ancestor still in flight is only provisional:
//! the ancestor may yet turn out `false`. Such answers are dropped instead of
//! stored and get evaluated again on the next lookup. A `false` is final
//! either way, since every rule is a conjunction.

use std::collections::HashMap;

use serde::Serialize;

/// Memo key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemoKey {
    Class(String),
    Type(String),
}

/// State of a memo entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoState {
    /// Evaluation has started and not finished; provisionally exportable.
    /// `depth` is the entry's position on the evaluation stack.
    InFlight { depth: usize },
    Resolved(bool),
}

/// Statistics about memo usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemoStats {
    pub hits: usize,
    pub misses: usize,
    /// Hits on in-flight entries (cycles).
    pub provisional: usize,
    /// Provisional answers dropped rather than stored.
    pub deferred: usize,
    pub entries: usize,
}

/// The memo table.
#[derive(Debug, Clone, Default)]
pub struct ExportMemo {
    entries: HashMap<MemoKey, MemoState>,
    /// One slot per open evaluation: the shallowest in-flight depth it read.
    frames: Vec<usize>,
    hits: usize,
    misses: usize,
    provisional: usize,
    deferred: usize,
}

impl ExportMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The memoized answer, if any. In-flight entries answer `true` and tie
    /// the current evaluation to them.
    pub fn lookup(&mut self, key: &MemoKey) -> Option<bool> {
        match self.entries.get(key) {
            Some(MemoState::Resolved(value)) => {
                self.hits += 1;
                Some(*value)
            }
            Some(MemoState::InFlight { depth }) => {
                let depth = *depth;
                self.hits += 1;
                self.provisional += 1;
                if let Some(low) = self.frames.last_mut() {
                    *low = (*low).min(depth);
                }
                Some(true)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Inspect an entry without touching the statistics.
    pub fn state(&self, key: &MemoKey) -> Option<MemoState> {
        self.entries.get(key).copied()
    }

    /// Seed `key` as in flight and open an evaluation for it.
    pub fn begin(&mut self, key: MemoKey) {
        let depth = self.frames.len();
        self.entries.insert(key, MemoState::InFlight { depth });
        self.frames.push(depth);
    }

    /// Close the evaluation opened by the matching [`begin`](Self::begin).
    ///
    /// Returns whether the answer was stored. A `true` that depended on an
    /// ancestor still in flight is dropped and the entry removed.
    pub fn resolve(&mut self, key: MemoKey, exportable: bool) -> bool {
        let depth = self.frames.len().saturating_sub(1);
        let low = self.frames.pop().unwrap_or(depth);
        if low < depth {
            if let Some(parent) = self.frames.last_mut() {
                *parent = (*parent).min(low);
            }
            if exportable {
                self.entries.remove(&key);
                self.deferred += 1;
                return false;
            }
        }
        self.entries.insert(key, MemoState::Resolved(exportable));
        true
    }

    /// Number of evaluations currently open.
    pub fn open(&self) -> usize {
        self.frames.len()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn statistics(&self) -> MemoStats {
        MemoStats {
            hits: self.hits,
            misses: self.misses,
            provisional: self.provisional,
            deferred: self.deferred,
            entries: self.entries.len(),
        }
    }
}
