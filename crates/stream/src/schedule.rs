//! Deferred build dispatch on a logical clock.
//!
//! Builds are not started inline with the window pass. Each one is given a
//! due time of `now + slot * queue_delay` and fires once the world clock
//! reaches it, in `(due, sequence)` order.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

use heightscape_common::{CellCoord, MeshHandle};

use crate::error::BuildError;

/// Identifies one build request. Returned to the world on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuildTicket {
    pub coord: CellCoord,
    pub(crate) generation: u64,
    pub(crate) request: u64,
}

/// What a cell builder is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildRequest {
    pub ticket: BuildTicket,
    /// Side length of the cell in world units.
    pub size: i32,
}

impl BuildRequest {
    /// World-space origin of the requested cell.
    pub fn origin(&self) -> CellCoord {
        self.ticket.coord
    }
}

/// Result of handing a request to a [`CellBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Geometry was built synchronously.
    Ready(MeshHandle),
    /// The builder will report back through `World::complete_build` or
    /// `World::fail_build`.
    Pending,
    Failed(BuildError),
}

/// Host collaborator that turns a cell into geometry.
pub trait CellBuilder {
    fn build(&mut self, request: &BuildRequest) -> BuildOutcome;
}

impl<F> CellBuilder for F
where
    F: FnMut(&BuildRequest) -> BuildOutcome,
{
    fn build(&mut self, request: &BuildRequest) -> BuildOutcome {
        self(request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    due: Duration,
    seq: u64,
    ticket: BuildTicket,
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due.cmp(&other.due).then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Min-ordered queue of builds waiting for their due time.
#[derive(Debug, Default)]
pub struct BuildSchedule {
    heap: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
}

impl BuildSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ticket: BuildTicket, due: Duration) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Scheduled { due, seq, ticket }));
    }

    /// Pop the earliest build whose due time is at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<BuildTicket> {
        match self.heap.peek() {
            Some(Reverse(next)) if next.due <= now => {
                self.heap.pop().map(|Reverse(s)| s.ticket)
            }
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(x: i32) -> BuildTicket {
        BuildTicket {
            coord: CellCoord::new(x, 0),
            generation: 0,
            request: x as u64,
        }
    }

    #[test]
    fn pops_only_due_builds() {
        let mut s = BuildSchedule::new();
        s.push(ticket(0), Duration::ZERO);
        s.push(ticket(1), Duration::from_millis(10));

        assert_eq!(s.pop_due(Duration::ZERO), Some(ticket(0)));
        assert_eq!(s.pop_due(Duration::from_millis(9)), None);
        assert_eq!(s.len(), 1);
        assert_eq!(s.pop_due(Duration::from_millis(10)), Some(ticket(1)));
        assert!(s.is_empty());
    }

    #[test]
    fn equal_due_times_fire_in_push_order() {
        let mut s = BuildSchedule::new();
        for x in [5, 3, 9] {
            s.push(ticket(x), Duration::from_millis(20));
        }
        s.push(ticket(1), Duration::from_millis(10));

        let now = Duration::from_millis(100);
        let order: Vec<i32> = std::iter::from_fn(|| s.pop_due(now))
            .map(|t| t.coord.x)
            .collect();
        assert_eq!(order, vec![1, 5, 3, 9]);
    }

    #[test]
    fn closures_are_builders() {
        let mut calls = 0;
        let mut builder = |req: &BuildRequest| {
            calls += 1;
            BuildOutcome::Ready(MeshHandle(req.origin().x as u64))
        };
        let req = BuildRequest {
            ticket: ticket(42),
            size: 128,
        };
        assert_eq!(builder.build(&req), BuildOutcome::Ready(MeshHandle(42)));
        assert_eq!(calls, 1);
    }
}
