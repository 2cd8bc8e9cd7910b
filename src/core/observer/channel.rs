//! Single-threaded FIFO change channels
//!
//! Producers push notifications, the observer drains them in delivery order on
//! its next turn. Closing a channel drops whatever is still queued and makes
//! every later push a no-op.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::features::document::ElementId;

/// A change notification; carries the mutated element only for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Cells or rows were added or removed, or a span attribute changed
    Structure { target: ElementId },
    /// The rendered box of an observed element may have changed
    Resize { target: ElementId },
    /// The band source published a new band list
    Bands(Vec<crate::core::grid::Band>),
}

#[derive(Debug)]
struct ChannelState<T> {
    queue: VecDeque<T>,
    closed: bool,
}

/// Shared FIFO queue; clones refer to the same queue
#[derive(Debug)]
pub struct Channel<T> {
    inner: Rc<RefCell<ChannelState<T>>>,
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Channel {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Channel<T> {
    pub fn new() -> Self {
        Channel {
            inner: Rc::new(RefCell::new(ChannelState {
                queue: VecDeque::new(),
                closed: false,
            })),
        }
    }

    /// Queue a value; returns `false` if the channel is closed
    pub fn push(&self, value: T) -> bool {
        let mut state = self.inner.borrow_mut();
        if state.closed {
            return false;
        }
        state.queue.push_back(value);
        true
    }

    pub fn pop(&self) -> Option<T> {
        self.inner.borrow_mut().queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().queue.is_empty()
    }

    /// Close the channel and discard pending values
    pub fn close(&self) {
        let mut state = self.inner.borrow_mut();
        state.closed = true;
        state.queue.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.borrow().closed
    }

    /// Whether both handles refer to the same queue
    pub fn same_channel(&self, other: &Channel<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
