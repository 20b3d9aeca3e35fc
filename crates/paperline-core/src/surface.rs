//! Output surfaces a typewriter writes to.

use std::sync::{Arc, Mutex, MutexGuard};

/// A text display owned by one typewriter while a session is active.
///
/// Implementations use interior mutability; the typewriter only ever holds
/// a shared reference.
///
/// `set_text` is called with the typewriter's lock held, so a stale session
/// can never write after it was cancelled. It must not call back into the
/// typewriter (that deadlocks) and should return quickly, since
/// `interrupt` and `status` wait on the same lock.
pub trait Surface: Send + Sync {
    /// Returns the text currently displayed.
    fn text(&self) -> String;

    /// Replaces the displayed text.
    fn set_text(&self, text: &str);
}

#[derive(Debug, Default)]
struct MemoryInner {
    text: String,
    frames: Vec<String>,
    record: bool,
}

/// In-memory surface.
///
/// Optionally records every frame written, which lets callers replay or
/// inspect the exact sequence of displays an animation produced.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a surface that keeps a history of every `set_text` call.
    pub fn recording() -> Self {
        let surface = Self::default();
        surface.lock().record = true;
        surface
    }

    /// Creates a surface pre-filled with `text` (not recorded as a frame).
    pub fn with_text(text: &str) -> Self {
        let surface = Self::recording();
        surface.lock().text = text.to_string();
        surface
    }

    /// Returns all recorded frames in write order.
    pub fn frames(&self) -> Vec<String> {
        self.lock().frames.clone()
    }

    /// Drops recorded frames, keeping the current text.
    pub fn clear_frames(&self) {
        self.lock().frames.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        // A poisoned buffer is still a valid string.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Surface for MemorySurface {
    fn text(&self) -> String {
        self.lock().text.clone()
    }

    fn set_text(&self, text: &str) {
        let mut inner = self.lock();
        inner.text.clear();
        inner.text.push_str(text);
        if inner.record {
            inner.frames.push(text.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_surface_set_and_read() {
        let surface = MemorySurface::new();
        surface.set_text("abc");
        assert_eq!(surface.text(), "abc");
        assert!(surface.frames().is_empty());
    }

    #[test]
    fn test_recording_surface_keeps_frames() {
        let surface = MemorySurface::recording();
        surface.set_text("a");
        surface.set_text("ab");
        assert_eq!(surface.frames(), vec!["a", "ab"]);

        surface.clear_frames();
        assert!(surface.frames().is_empty());
        assert_eq!(surface.text(), "ab");
    }

    #[test]
    fn test_with_text_prefills_without_frame() {
        let surface = MemorySurface::with_text("Hello");
        assert_eq!(surface.text(), "Hello");
        assert!(surface.frames().is_empty());
    }

    #[test]
    fn test_clones_share_buffer() {
        let a = MemorySurface::new();
        let b = a.clone();
        a.set_text("shared");
        assert_eq!(b.text(), "shared");
    }
}
