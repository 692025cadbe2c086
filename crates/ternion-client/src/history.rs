//! Bounded result history

use std::collections::VecDeque;
use ternion_core::{TaskResult, TaskStats};

/// Maximum number of results a client keeps.
pub const HISTORY_LIMIT: usize = 1000;

/// Append-only ring of task results. Once full, the oldest entry is evicted
/// for every new one.
#[derive(Clone, Debug)]
pub struct History {
    entries: VecDeque<TaskResult>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit.min(HISTORY_LIMIT)),
            limit,
        }
    }

    pub fn push(&mut self, result: TaskResult) {
        while self.entries.len() >= self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskResult> {
        self.entries.iter()
    }

    /// Owned copy, oldest first.
    pub fn snapshot(&self) -> Vec<TaskResult> {
        self.entries.iter().cloned().collect()
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::tally(self.entries.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ternion_core::ResultData;

    fn result(id: u64) -> TaskResult {
        TaskResult::success(ResultData::None, 0, id)
    }

    #[test]
    fn evicts_oldest_first() {
        let mut history = History::with_limit(3);
        for id in 1..=5 {
            history.push(result(id));
        }
        let ids: Vec<u64> = history.iter().map(|r| r.task_id()).collect();
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[test]
    fn default_limit_is_one_thousand() {
        let mut history = History::new();
        for id in 1..=1001 {
            history.push(result(id));
        }
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.iter().next().map(|r| r.task_id()), Some(2));
    }

    #[test]
    fn zero_limit_is_clamped() {
        let mut history = History::with_limit(0);
        history.push(result(1));
        history.push(result(2));
        assert_eq!(history.snapshot(), vec![result(2)]);
    }
}
