//! Work scheduled onto the UI thread.
//!
//! Tasks queued with [`Ui::invoke`] run on the next [`Ui::run_pending`];
//! tasks queued with [`Ui::invoke_after`] run on the first call after their
//! deadline. Other threads queue work through a [`UiHandle`]. A platform loop
//! awaits [`Ui::wait_for_tasks`] between input events.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use super::Ui;
use crate::error::Result;

/// A unit of work run on the UI thread.
pub type Task = Box<dyn FnOnce(&mut Ui) -> Result<()>>;

type RemoteTask = Box<dyn FnOnce(&mut Ui) -> Result<()> + Send>;

/// A `Send` handle for queuing work onto a [`Ui`] from any thread.
#[derive(Clone)]
pub struct UiHandle {
    sender: mpsc::UnboundedSender<RemoteTask>,
}

impl UiHandle {
    /// Queue `task` to run on the UI thread. Returns `false` if the `Ui` is
    /// gone.
    pub fn invoke<F>(&self, task: F) -> bool
    where
        F: FnOnce(&mut Ui) -> Result<()> + Send + 'static,
    {
        self.sender.send(Box::new(task)).is_ok()
    }
}

impl std::fmt::Debug for UiHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiHandle").field("closed", &self.sender.is_closed()).finish()
    }
}

struct Delayed {
    due: Instant,
    seq: u64,
    task: Task,
}

impl PartialEq for Delayed {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Delayed {}

impl PartialOrd for Delayed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Delayed {
    // Reversed: the heap pops the earliest deadline, then the earliest queued.
    fn cmp(&self, other: &Self) -> Ordering {
        other.due.cmp(&self.due).then_with(|| other.seq.cmp(&self.seq))
    }
}

pub(crate) struct TaskQueue {
    ready: VecDeque<Task>,
    delayed: BinaryHeap<Delayed>,
    seq: u64,
    sender: mpsc::UnboundedSender<RemoteTask>,
    receiver: mpsc::UnboundedReceiver<RemoteTask>,
}

impl TaskQueue {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            ready: VecDeque::new(),
            delayed: BinaryHeap::new(),
            seq: 0,
            sender,
            receiver,
        }
    }

    fn pull_remote(&mut self) {
        while let Ok(task) = self.receiver.try_recv() {
            self.ready.push_back(task);
        }
    }

    fn promote_due(&mut self, now: Instant) {
        while self.delayed.peek().is_some_and(|d| d.due <= now) {
            if let Some(delayed) = self.delayed.pop() {
                self.ready.push_back(delayed.task);
            }
        }
    }
}

impl Ui {
    /// Queue `task` to run on the next [`run_pending`](Self::run_pending).
    pub fn invoke(&mut self, task: impl FnOnce(&mut Ui) -> Result<()> + 'static) {
        self.tasks.ready.push_back(Box::new(task));
    }

    /// Queue `task` to run once `delay` has elapsed.
    pub fn invoke_after(&mut self, delay: Duration, task: impl FnOnce(&mut Ui) -> Result<()> + 'static) {
        let seq = self.tasks.seq;
        self.tasks.seq += 1;
        self.tasks.delayed.push(Delayed {
            due: Instant::now() + delay,
            seq,
            task: Box::new(task),
        });
    }

    /// A handle other threads can use to queue work.
    pub fn handle(&self) -> UiHandle {
        UiHandle { sender: self.tasks.sender.clone() }
    }

    /// Whether any task is ready to run now.
    pub fn has_pending(&mut self) -> bool {
        self.tasks.pull_remote();
        self.tasks.promote_due(Instant::now());
        !self.tasks.ready.is_empty()
    }

    /// Deadline of the earliest delayed task.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.delayed.peek().map(|d| d.due)
    }

    /// Run every task that is ready, in queue order, including delayed tasks
    /// whose deadline has passed. Tasks queued while running wait for the next
    /// call.
    ///
    /// Returns the number of tasks run. A failing task stops the run; the
    /// rest stay queued.
    pub fn run_pending(&mut self) -> Result<usize> {
        self.tasks.pull_remote();
        self.tasks.promote_due(Instant::now());
        let batch = self.tasks.ready.len();
        let mut ran = 0;
        while ran < batch {
            let Some(task) = self.tasks.ready.pop_front() else {
                break;
            };
            ran += 1;
            task(self)?;
        }
        if ran > 0 {
            debug!(ran, "ran tasks");
        }
        Ok(ran)
    }

    /// Wait until a task is ready: one arrives from a [`UiHandle`] or the
    /// earliest deadline passes. Returns immediately if one already is.
    pub async fn wait_for_tasks(&mut self) {
        if self.has_pending() {
            return;
        }
        let deadline = self.next_deadline();
        let TaskQueue { ready, receiver, .. } = &mut self.tasks;
        match deadline {
            Some(due) => {
                tokio::select! {
                    Some(task) = receiver.recv() => ready.push_back(task),
                    _ = tokio::time::sleep_until(due) => {}
                }
            }
            None => {
                if let Some(task) = receiver.recv().await {
                    ready.push_back(task);
                }
            }
        }
    }
}
