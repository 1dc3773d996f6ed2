//! Dispatch queues: named command lanes with bounded concurrency, plus
//! per-session follow-up queues and session teardown cleanup.
//!
//! A lane bounds *how many* tasks of its category run at once; a follow-up
//! queue bounds *what order* one session's own items run in. Sessions are
//! concurrency-independent except through shared lane capacity.

pub mod cleanup;
pub mod followup;
pub mod lanes;

pub use {
    cleanup::{ClearSessionQueuesResult, clear_session_queues},
    followup::FollowupQueues,
    lanes::{
        CommandHandle, CommandLane, CommandOutcome, CommandQueue, apply_lane_concurrency,
        session_lane,
    },
};
