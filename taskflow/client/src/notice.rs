//! Non-blocking, user-visible notifications.
//!
//! Failures are surfaced by pushing a [`Notice`] through a [`Notifier`]; the
//! presentation layer drains them whenever it renders.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Something that can show a notice to the user without blocking.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Queue of pending notices. Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    pending: Rc<RefCell<VecDeque<Notice>>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every pending notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        self.pending.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, notice: Notice) {
        self.pending.borrow_mut().push_back(notice);
    }
}
