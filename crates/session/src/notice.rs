//! Transient user-facing messages.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// One message for the renderer's message box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

/// What a session call did, in the order it happened.
///
/// A renderer with a single message box shows [`Feedback::last`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feedback {
    /// The ledger was mutated (the renderer should refresh).
    pub changed: bool,
    pub notices: Vec<Notice>,
}

impl Feedback {
    pub(crate) fn rejected(notice: Notice) -> Self {
        Self {
            changed: false,
            notices: vec![notice],
        }
    }

    pub(crate) fn applied(notice: Notice) -> Self {
        Self {
            changed: true,
            notices: vec![notice],
        }
    }

    pub(crate) fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn has_errors(&self) -> bool {
        self.notices.iter().any(|n| n.kind == NoticeKind::Error)
    }

    pub fn messages(&self) -> Vec<&str> {
        self.notices.iter().map(|n| n.message.as_str()).collect()
    }
}
