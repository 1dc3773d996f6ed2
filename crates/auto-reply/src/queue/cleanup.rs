use std::collections::HashSet;

use tracing::debug;

use crate::queue::{CommandLane, CommandQueue, FollowupQueues};

/// Counts and keys from clearing one or more sessions' queued work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearSessionQueuesResult {
    pub followup_cleared: usize,
    pub lane_cleared: usize,
    /// Keys actually processed: trimmed, deduplicated, first-occurrence
    /// order, empties skipped.
    pub keys: Vec<String>,
}

/// Clear each session's follow-up queue and its slice of the command lanes.
///
/// `lane_for_session` maps a session key to its lane identity (see
/// [`crate::queue::session_lane`] for the default policy). Keys that are
/// empty, whitespace-only, or duplicates of an already-processed key are
/// skipped and excluded from the result.
///
/// Safe to call concurrently with enqueues for other session keys. For the
/// same key, callers must not race a clear against a concurrent enqueue —
/// no per-key locking is provided here.
pub fn clear_session_queues<T, K, L>(
    commands: &CommandQueue,
    followups: &FollowupQueues<T>,
    lane_for_session: L,
    keys: impl IntoIterator<Item = K>,
) -> ClearSessionQueuesResult
where
    K: AsRef<str>,
    L: Fn(&str) -> CommandLane,
{
    let mut seen = HashSet::new();
    let mut result = ClearSessionQueuesResult {
        followup_cleared: 0,
        lane_cleared: 0,
        keys: Vec::new(),
    };

    for key in keys {
        let cleaned = key.as_ref().trim();
        if cleaned.is_empty() || !seen.insert(cleaned.to_string()) {
            continue;
        }
        result.keys.push(cleaned.to_string());
        result.followup_cleared += followups.clear(cleaned);
        result.lane_cleared += commands.clear_lane(&lane_for_session(cleaned));
    }

    debug!(
        sessions = result.keys.len(),
        followup_cleared = result.followup_cleared,
        lane_cleared = result.lane_cleared,
        "session queues cleared"
    );
    result
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::queue::session_lane,
        std::time::Duration,
        tokio::time::sleep,
    };

    #[tokio::test]
    async fn clears_only_the_named_session() {
        let commands = CommandQueue::new();
        let followups = FollowupQueues::new();

        followups.enqueue("a", "follow-up for a");
        followups.enqueue("b", "follow-up for b");

        let result =
            clear_session_queues(&commands, &followups, session_lane, ["a"]);

        assert_eq!(result.keys, vec!["a".to_string()]);
        assert_eq!(result.followup_cleared, 1);
        assert_eq!(followups.pending("b"), 1);
    }

    #[tokio::test]
    async fn dedups_and_trims_keys() {
        let commands = CommandQueue::new();
        let followups = FollowupQueues::new();
        followups.enqueue("x", 1);

        let result = clear_session_queues(
            &commands,
            &followups,
            session_lane,
            ["x", " x ", "x", "", "  "],
        );

        assert_eq!(result.keys, vec!["x".to_string()]);
        assert_eq!(result.followup_cleared, 1);
    }

    #[tokio::test]
    async fn counts_cleared_lane_entries() {
        let commands = CommandQueue::new();
        let followups: FollowupQueues<()> = FollowupQueues::new();
        let lane = session_lane("a");

        // First task occupies the lane; the next two sit queued.
        commands.enqueue(lane.clone(), async move {
            sleep(Duration::from_millis(50)).await;
        });
        commands.enqueue(lane.clone(), async move {});
        commands.enqueue(lane.clone(), async move {});
        sleep(Duration::from_millis(10)).await;

        let result = clear_session_queues(&commands, &followups, session_lane, ["a"]);

        assert_eq!(result.lane_cleared, 2);
        assert_eq!(commands.queued_len(&lane), 0);
        // The in-flight task is untouched.
        assert_eq!(commands.running_len(&lane), 1);
    }

    #[tokio::test]
    async fn custom_lane_resolver_is_honored() {
        let commands = CommandQueue::new();
        let followups: FollowupQueues<()> = FollowupQueues::new();

        // Deployment policy: every session shares the main lane.
        commands.set_lane_concurrency(CommandLane::Main, 1);
        commands.enqueue(CommandLane::Main, async move {
            sleep(Duration::from_millis(50)).await;
        });
        commands.enqueue(CommandLane::Main, async move {});
        sleep(Duration::from_millis(10)).await;

        let result =
            clear_session_queues(&commands, &followups, |_key| CommandLane::Main, ["any"]);

        assert_eq!(result.lane_cleared, 1);
    }
}
