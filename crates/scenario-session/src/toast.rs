//! Bounded toast buffer for server feedback

use scenario_client::ServerReply;
use std::collections::VecDeque;

/// Default number of toasts kept before the oldest is dropped
pub const DEFAULT_TOAST_CAPACITY: usize = 32;

pub type ToastId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub variant: ToastVariant,
    pub title: String,
    pub message: String,
}

/// In-memory toast queue with monotonically increasing ids
#[derive(Debug)]
pub struct ToastQueue {
    queue: VecDeque<Toast>,
    max: usize,
    next_id: ToastId,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_CAPACITY)
    }
}

impl ToastQueue {
    /// Create a queue holding at most `max` toasts (at least one)
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max: max.max(1),
            next_id: 1,
        }
    }

    pub fn push(
        &mut self,
        variant: ToastVariant,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> ToastId {
        let id = self.next_id;
        self.next_id += 1;
        if self.queue.len() == self.max {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            id,
            variant,
            title: title.into(),
            message: message.into(),
        });
        id
    }

    /// Toast reporting a server reply
    pub fn feedback(&mut self, reply: &ServerReply) -> ToastId {
        let variant = if reply.success {
            ToastVariant::Success
        } else {
            ToastVariant::Danger
        };
        self.push(variant, reply.title.clone(), reply.message.clone())
    }

    /// Remove a toast; returns whether it was present
    pub fn remove(&mut self, id: ToastId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|t| t.id != id);
        self.queue.len() != before
    }

    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.queue.iter().cloned().collect()
    }

    /// Remove and return every toast
    pub fn drain(&mut self) -> Vec<Toast> {
        self.queue.drain(..).collect()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
