use std::collections::VecDeque;
use std::time::Duration;

use heightscape_common::MeshHandle;
use heightscape_stream::{BuildError, BuildOutcome, BuildRequest, BuildTicket, CellBuilder};

/// Result of a finished simulated build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Built(BuildTicket, MeshHandle),
    Failed(BuildTicket, BuildError),
}

/// Stand-in for the host's heightmap pipeline: every build finishes after a
/// fixed latency, optionally failing every `fail_every`-th request.
pub struct LatencyBuilder {
    latency: Duration,
    fail_every: Option<u32>,
    clock: Duration,
    requests: u32,
    next_mesh: u64,
    in_progress: VecDeque<(Duration, BuildTicket)>,
}

impl LatencyBuilder {
    pub fn new(latency: Duration, fail_every: Option<u32>) -> Self {
        Self {
            latency,
            fail_every: fail_every.filter(|n| *n > 0),
            clock: Duration::ZERO,
            requests: 0,
            next_mesh: 0,
            in_progress: VecDeque::new(),
        }
    }

    /// Move the builder's clock forward and collect builds that finished.
    pub fn tick(&mut self, dt: Duration) -> Vec<Completion> {
        self.clock += dt;
        let mut done = Vec::new();
        while let Some(&(ready_at, ticket)) = self.in_progress.front() {
            if ready_at > self.clock {
                break;
            }
            self.in_progress.pop_front();
            self.requests += 1;
            if self.fail_every.is_some_and(|n| self.requests % n == 0) {
                done.push(Completion::Failed(
                    ticket,
                    BuildError::SourceUnavailable(format!("cell {}", ticket.coord)),
                ));
            } else {
                self.next_mesh += 1;
                done.push(Completion::Built(ticket, MeshHandle(self.next_mesh)));
            }
        }
        done
    }

    pub fn in_progress(&self) -> usize {
        self.in_progress.len()
    }
}

impl CellBuilder for LatencyBuilder {
    fn build(&mut self, request: &BuildRequest) -> BuildOutcome {
        tracing::debug!(origin = %request.origin(), size = request.size, "building cell");
        self.in_progress
            .push_back((self.clock + self.latency, request.ticket));
        BuildOutcome::Pending
    }
}
