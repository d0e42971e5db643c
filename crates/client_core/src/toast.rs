//! Transient notifications shown by the owning view.

use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::source::ErrorSink;

pub const DEFAULT_TOAST_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastIntent {
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub intent: ToastIntent,
    pub message: String,
}

/// Bounded FIFO of pending toasts; the oldest toast is dropped when full.
pub struct ToastQueue {
    capacity: usize,
    toasts: Mutex<VecDeque<Toast>>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TOAST_CAPACITY)
    }
}

impl ToastQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            toasts: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn push(&self, intent: ToastIntent, message: impl Into<String>) {
        let mut toasts = self.lock();
        if toasts.len() == self.capacity {
            toasts.pop_front();
        }
        toasts.push_back(Toast {
            intent,
            message: message.into(),
        });
    }

    pub fn drain(&self) -> Vec<Toast> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ErrorSink for ToastQueue {
    fn on_error(&self, message: &str) {
        self.push(ToastIntent::Danger, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_when_full() {
        let queue = ToastQueue::with_capacity(2);
        queue.push(ToastIntent::Success, "saved");
        queue.push(ToastIntent::Warning, "slow network");
        queue.push(ToastIntent::Danger, "failed");

        let messages: Vec<_> = queue.drain().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["slow network", "failed"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn error_sink_pushes_danger_toasts() {
        let queue = ToastQueue::default();
        queue.on_error("Unable to load team");
        assert_eq!(
            queue.drain(),
            vec![Toast {
                intent: ToastIntent::Danger,
                message: "Unable to load team".into(),
            }]
        );
    }

    #[test]
    fn zero_capacity_still_keeps_latest() {
        let queue = ToastQueue::with_capacity(0);
        queue.push(ToastIntent::Success, "one");
        queue.push(ToastIntent::Success, "two");
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain()[0].message, "two");
    }
}
