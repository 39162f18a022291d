//! Behavior-tagged queues
//!
//! Environment workers push trajectories and trainers push policies through
//! [`AgentManagerQueue`]s. Any thread may `put`; the consuming trainer polls
//! with [`AgentManagerQueue::try_get`], which never blocks.

use crossbeam_channel::{Receiver, Sender};

/// Unbounded FIFO queue tagged with the behavior identity it carries
///
/// Cloning yields another handle to the same queue.
#[derive(Debug)]
pub struct AgentManagerQueue<T> {
    behavior_id: String,
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> AgentManagerQueue<T> {
    /// Create a new empty queue for `behavior_id`
    pub fn new(behavior_id: impl Into<String>) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self { behavior_id: behavior_id.into(), sender, receiver }
    }

    /// Behavior identity of the items in this queue
    pub fn behavior_id(&self) -> &str {
        &self.behavior_id
    }

    /// Enqueue an item
    pub fn put(&self, item: T) {
        // Every handle owns a receiver, so the channel cannot be disconnected here
        let _ = self.sender.send(item);
    }

    /// Dequeue the oldest item, or `None` when the queue is empty
    pub fn try_get(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Number of queued items
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<T> Clone for AgentManagerQueue<T> {
    fn clone(&self) -> Self {
        Self {
            behavior_id: self.behavior_id.clone(),
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_fifo_order() {
        let queue = AgentManagerQueue::new("Striker");
        queue.put(1);
        queue.put(2);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.try_get(), Some(1));
        assert_eq!(queue.try_get(), Some(2));
        assert_eq!(queue.try_get(), None);
    }

    #[test]
    fn test_empty_queue_returns_none() {
        let queue: AgentManagerQueue<u32> = AgentManagerQueue::new("Goalie");
        assert!(queue.is_empty());
        assert_eq!(queue.try_get(), None);
    }

    #[test]
    fn test_clones_share_items() {
        let producer = AgentManagerQueue::new("Striker");
        let consumer = producer.clone();

        producer.put("trajectory");

        assert_eq!(consumer.behavior_id(), "Striker");
        assert_eq!(consumer.try_get(), Some("trajectory"));
        assert!(producer.is_empty());
    }

    #[test]
    fn test_put_from_other_thread() {
        let queue = AgentManagerQueue::new("Striker");
        let producer = queue.clone();

        let handle = thread::spawn(move || {
            for i in 0..100 {
                producer.put(i);
            }
        });
        handle.join().unwrap();

        let drained: Vec<i32> = std::iter::from_fn(|| queue.try_get()).collect();
        assert_eq!(drained, (0..100).collect::<Vec<_>>());
    }
}
