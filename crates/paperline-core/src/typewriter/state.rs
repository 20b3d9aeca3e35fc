//! Session lifecycle state for a typewriter instance.
//!
//! Mutated only while holding the typewriter's lock.

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

#[derive(Debug, Default)]
pub(crate) struct SessionSeq {
    next: u64,
}

impl SessionSeq {
    pub(crate) fn next_id(&mut self) -> SessionId {
        let id = SessionId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Which way a session moves through the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Revealing,
    Removing,
}

/// One in-progress reveal or removal.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) id: SessionId,
    pub(crate) cancel: CancellationToken,
}

impl Session {
    pub(crate) fn new(id: SessionId) -> Self {
        Self {
            id,
            cancel: CancellationToken::new(),
        }
    }
}

/// Typing and erasing are mutually exclusive by construction.
#[derive(Debug, Default)]
pub(crate) enum Phase {
    #[default]
    Idle,
    Typing(Session),
    Erasing(Session),
}

impl Phase {
    pub(crate) fn start(direction: Direction, session: Session) -> Self {
        match direction {
            Direction::Revealing => Phase::Typing(session),
            Direction::Removing => Phase::Erasing(session),
        }
    }

    pub(crate) fn session(&self) -> Option<&Session> {
        match self {
            Phase::Idle => None,
            Phase::Typing(session) | Phase::Erasing(session) => Some(session),
        }
    }

    /// True when `id` is the current, uncancelled session.
    pub(crate) fn is_active(&self, id: SessionId) -> bool {
        self.session()
            .is_some_and(|s| s.id == id && !s.cancel.is_cancelled())
    }

    /// Returns to idle if `id` is still the active session.
    pub(crate) fn finish_if_active(&mut self, id: SessionId) -> bool {
        let ok = self.is_active(id);
        if ok {
            *self = Phase::Idle;
        }
        ok
    }

    /// Cancels the active session, if any, and returns to idle.
    ///
    /// Returns whether a session was cancelled.
    pub(crate) fn interrupt(&mut self) -> bool {
        match std::mem::take(self) {
            Phase::Idle => false,
            Phase::Typing(session) | Phase::Erasing(session) => {
                session.cancel.cancel();
                true
            }
        }
    }
}

/// Snapshot of a typewriter's state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypewriterStatus {
    pub is_typing: bool,
    pub is_erasing: bool,
    pub is_interrupted: bool,
    /// Last text passed to `type_text`.
    pub current_text: String,
}
