//! Broadcast channel carrying lifecycle notifications.

use tokio::sync::broadcast;
use tracing::trace;

use crate::task::domain::TaskEvent;

/// Cloneable handle publishing [`TaskEvent`]s to any number of observers.
///
/// Publishing never blocks; slow observers miss events once the channel
/// capacity is exceeded.
#[derive(Debug, Clone)]
pub struct TaskEventBus {
    sender: broadcast::Sender<TaskEvent>,
}

impl TaskEventBus {
    /// Creates a bus buffering up to `capacity` undelivered events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.sender.subscribe()
    }

    pub(crate) fn publish(&self, event: TaskEvent) {
        if self.sender.send(event).is_err() {
            trace!("no task event subscribers");
        }
    }
}

impl Default for TaskEventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
