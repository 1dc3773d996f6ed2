use std::{
    collections::{HashMap, VecDeque},
    fmt,
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard},
};

use {tokio::sync::oneshot, tracing::debug};

use shoal_config::schema::LanesConfig;

/// Named concurrency domain for queued commands.
///
/// The well-known lanes are shared process-wide; session lanes serialize one
/// session's own agent runs and are created lazily.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandLane {
    Main,
    Cron,
    Subagent,
    Session(String),
}

impl fmt::Display for CommandLane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => write!(f, "main"),
            Self::Cron => write!(f, "cron"),
            Self::Subagent => write!(f, "subagent"),
            Self::Session(key) => write!(f, "session:{key}"),
        }
    }
}

/// Lane identity for a session's own agent runs.
///
/// This is the default session→lane mapping; deployments with a different
/// assignment policy inject their own resolver into
/// [`crate::queue::cleanup::clear_session_queues`].
#[must_use]
pub fn session_lane(session_key: &str) -> CommandLane {
    CommandLane::Session(session_key.trim().to_string())
}

/// Completion signal for an enqueued command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed,
    /// The entry was cleared from its lane before it started.
    Cancelled,
}

/// Await-side of one enqueued command.
pub struct CommandHandle {
    rx: oneshot::Receiver<CommandOutcome>,
}

impl CommandHandle {
    /// Wait for the command to finish. A cleared entry (or a dropped queue)
    /// reports `Cancelled`.
    pub async fn wait(self) -> CommandOutcome {
        self.rx.await.unwrap_or(CommandOutcome::Cancelled)
    }
}

type BoxedTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

struct QueuedCommand {
    task: BoxedTask,
    done: oneshot::Sender<CommandOutcome>,
}

struct LaneState {
    max_concurrent: usize,
    running: usize,
    queue: VecDeque<QueuedCommand>,
}

impl Default for LaneState {
    fn default() -> Self {
        Self {
            max_concurrent: 1,
            running: 0,
            queue: VecDeque::new(),
        }
    }
}

/// Commands admitted per lane in FIFO order, with a hard cap on concurrently
/// running tasks per lane.
///
/// Clearing a lane drops queued entries only; in-flight tasks always run to
/// completion. Caps are adjustable at runtime without dropping queued or
/// running work. Must be used from within a tokio runtime.
#[derive(Clone, Default)]
pub struct CommandQueue {
    lanes: Arc<Mutex<HashMap<CommandLane, LaneState>>>,
}

impl CommandQueue {
    /// Queue with the well-known lanes registered at concurrency 1.
    #[must_use]
    pub fn new() -> Self {
        let queue = Self::default();
        {
            let mut lanes = queue.lock();
            for lane in [CommandLane::Main, CommandLane::Cron, CommandLane::Subagent] {
                lanes.entry(lane).or_default();
            }
        }
        queue
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CommandLane, LaneState>> {
        // Lane state stays consistent even if a holder panicked mid-update:
        // counters are adjusted before and after awaits, never across them.
        self.lanes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reconfigure a lane's concurrency cap. In-flight tasks are not
    /// interrupted; queued tasks are admitted under the new bound. A cap of
    /// zero is clamped to one.
    pub fn set_lane_concurrency(&self, lane: CommandLane, max_concurrent: usize) {
        {
            let mut lanes = self.lock();
            lanes.entry(lane.clone()).or_default().max_concurrent = max_concurrent.max(1);
        }
        debug!(lane = %lane, max_concurrent, "lane concurrency set");
        self.pump(&lane);
    }

    /// Append a command to a lane. The lane is created lazily at
    /// concurrency 1. Returns a handle resolving when the task completes or
    /// is cleared.
    pub fn enqueue<F>(&self, lane: CommandLane, task: F) -> CommandHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        {
            let mut lanes = self.lock();
            lanes.entry(lane.clone()).or_default().queue.push_back(QueuedCommand {
                task: Box::pin(task),
                done: done_tx,
            });
        }
        self.pump(&lane);
        CommandHandle { rx: done_rx }
    }

    /// Drop a lane's queued (not running) entries. Returns the count dropped.
    pub fn clear_lane(&self, lane: &CommandLane) -> usize {
        let drained: Vec<QueuedCommand> = {
            let mut lanes = self.lock();
            match lanes.get_mut(lane) {
                Some(state) => state.queue.drain(..).collect(),
                None => Vec::new(),
            }
        };
        let cleared = drained.len();
        for command in drained {
            let _ = command.done.send(CommandOutcome::Cancelled);
        }
        if cleared > 0 {
            debug!(lane = %lane, cleared, "cleared queued lane entries");
        }
        cleared
    }

    /// Number of entries waiting (not running) in a lane.
    #[must_use]
    pub fn queued_len(&self, lane: &CommandLane) -> usize {
        self.lock().get(lane).map_or(0, |state| state.queue.len())
    }

    /// Number of tasks currently running in a lane.
    #[must_use]
    pub fn running_len(&self, lane: &CommandLane) -> usize {
        self.lock().get(lane).map_or(0, |state| state.running)
    }

    /// Start queued tasks while the lane has free slots.
    fn pump(&self, lane: &CommandLane) {
        loop {
            let command = {
                let mut lanes = self.lock();
                let Some(state) = lanes.get_mut(lane) else {
                    return;
                };
                if state.running >= state.max_concurrent {
                    return;
                }
                let Some(command) = state.queue.pop_front() else {
                    return;
                };
                state.running += 1;
                command
            };

            let queue = self.clone();
            let lane = lane.clone();
            tokio::spawn(async move {
                command.task.await;
                let _ = command.done.send(CommandOutcome::Completed);
                {
                    let mut lanes = queue.lock();
                    if let Some(state) = lanes.get_mut(&lane) {
                        state.running = state.running.saturating_sub(1);
                    }
                }
                queue.pump(&lane);
            });
        }
    }
}

/// Apply configured lane caps to the shared queue. Called once at startup
/// and again whenever configuration reloads.
pub fn apply_lane_concurrency(queue: &CommandQueue, config: &LanesConfig) {
    queue.set_lane_concurrency(CommandLane::Main, config.main_max_concurrent);
    queue.set_lane_concurrency(CommandLane::Cron, config.cron_max_concurrent);
    queue.set_lane_concurrency(CommandLane::Subagent, config.subagent_max_concurrent);
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use tokio::time::sleep;

    use super::*;

    #[tokio::test]
    async fn lane_runs_fifo_at_concurrency_one() {
        let queue = CommandQueue::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<CommandHandle> = (0..3)
            .map(|i| {
                let order = Arc::clone(&order);
                queue.enqueue(CommandLane::Main, async move {
                    sleep(Duration::from_millis(5)).await;
                    order.lock().unwrap().push(i);
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.wait().await, CommandOutcome::Completed);
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn cap_bounds_concurrent_tasks() {
        let queue = CommandQueue::new();
        queue.set_lane_concurrency(CommandLane::Main, 2);

        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<CommandHandle> = (0..6)
            .map(|_| {
                let current = Arc::clone(&current);
                let peak = Arc::clone(&peak);
                queue.enqueue(CommandLane::Main, async move {
                    let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    sleep(Duration::from_millis(20)).await;
                    current.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            handle.wait().await;
        }
        assert!(peak.load(Ordering::SeqCst) <= 2, "cap exceeded");
    }

    #[tokio::test]
    async fn raising_the_cap_admits_queued_work() {
        let queue = CommandQueue::new();

        let handles: Vec<CommandHandle> = (0..3)
            .map(|_| {
                queue.enqueue(CommandLane::Subagent, async move {
                    sleep(Duration::from_millis(100)).await;
                })
            })
            .collect();

        sleep(Duration::from_millis(10)).await;
        assert_eq!(queue.running_len(&CommandLane::Subagent), 1);
        assert_eq!(queue.queued_len(&CommandLane::Subagent), 2);

        queue.set_lane_concurrency(CommandLane::Subagent, 3);
        sleep(Duration::from_millis(10)).await;
        assert_eq!(queue.running_len(&CommandLane::Subagent), 3);

        for handle in handles {
            assert_eq!(handle.wait().await, CommandOutcome::Completed);
        }
    }

    #[tokio::test]
    async fn clearing_drops_queued_but_not_running() {
        let queue = CommandQueue::new();
        let lane = session_lane("a");

        let first = queue.enqueue(lane.clone(), async move {
            sleep(Duration::from_millis(50)).await;
        });
        let second = queue.enqueue(lane.clone(), async move {});
        let third = queue.enqueue(lane.clone(), async move {});

        sleep(Duration::from_millis(10)).await;
        assert_eq!(queue.clear_lane(&lane), 2);

        assert_eq!(second.wait().await, CommandOutcome::Cancelled);
        assert_eq!(third.wait().await, CommandOutcome::Cancelled);
        assert_eq!(first.wait().await, CommandOutcome::Completed);
    }

    #[tokio::test]
    async fn lanes_are_independent() {
        let queue = CommandQueue::new();

        let slow = queue.enqueue(CommandLane::Main, async move {
            sleep(Duration::from_millis(80)).await;
        });
        let fast = queue.enqueue(CommandLane::Cron, async move {});

        assert_eq!(fast.wait().await, CommandOutcome::Completed);
        assert_eq!(queue.running_len(&CommandLane::Main), 1);
        slow.wait().await;
    }

    #[tokio::test]
    async fn config_caps_are_applied() {
        let queue = CommandQueue::new();
        let config = LanesConfig {
            main_max_concurrent: 4,
            cron_max_concurrent: 2,
            subagent_max_concurrent: 8,
        };
        apply_lane_concurrency(&queue, &config);

        let handles: Vec<CommandHandle> = (0..4)
            .map(|_| {
                queue.enqueue(CommandLane::Main, async move {
                    sleep(Duration::from_millis(30)).await;
                })
            })
            .collect();
        sleep(Duration::from_millis(10)).await;
        assert_eq!(queue.running_len(&CommandLane::Main), 4);
        for handle in handles {
            handle.wait().await;
        }
    }
}
