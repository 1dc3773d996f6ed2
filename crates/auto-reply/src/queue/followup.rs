use std::collections::VecDeque;

use dashmap::DashMap;

/// Per-session FIFO queues of pending follow-up work.
///
/// Queues are created lazily on first enqueue and never persisted. Entries
/// for different sessions never contend beyond the map shard; clearing one
/// session leaves every other session's queue untouched.
pub struct FollowupQueues<T> {
    queues: DashMap<String, VecDeque<T>>,
}

impl<T> Default for FollowupQueues<T> {
    fn default() -> Self {
        Self {
            queues: DashMap::new(),
        }
    }
}

impl<T> FollowupQueues<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to the session's queue, creating the queue if needed.
    pub fn enqueue(&self, session_key: &str, item: T) {
        self.queues
            .entry(session_key.to_string())
            .or_default()
            .push_back(item);
    }

    /// Pop the oldest pending item for the session.
    pub fn take_next(&self, session_key: &str) -> Option<T> {
        self.queues.get_mut(session_key)?.pop_front()
    }

    /// Number of pending items for the session.
    #[must_use]
    pub fn pending(&self, session_key: &str) -> usize {
        self.queues.get(session_key).map_or(0, |queue| queue.len())
    }

    /// Drop the session's queue. Returns the number of items discarded.
    pub fn clear(&self, session_key: &str) -> usize {
        self.queues
            .remove(session_key)
            .map_or(0, |(_, queue)| queue.len())
    }
}
