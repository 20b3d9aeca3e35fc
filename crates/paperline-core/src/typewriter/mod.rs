//! Typewriter engine: reveals or removes text one grapheme cluster at a time.
//!
//! A [`Typewriter`] is a cloneable handle. One task can await
//! [`Typewriter::type_text`] while another calls [`Typewriter::interrupt`] or
//! starts a new session on the same instance; the new session interrupts the
//! old one and waits [`SETTLE_PAUSE`] before its first write.
//!
//! Every display write happens under the instance lock after checking that
//! the writing session is still the active one, so a superseded session can
//! never write again once it has been cancelled.

mod state;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub use state::{Direction, SessionId, TypewriterStatus};
use state::{Phase, Session, SessionSeq};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::segment::segment;
use crate::sound::{SilentCue, SoundAction, SoundCue};
use crate::surface::Surface;

/// Pause between interrupting an active session and starting the next one.
pub const SETTLE_PAUSE: Duration = Duration::from_millis(10);

pub const DEFAULT_TYPE_SPEED: Duration = Duration::from_millis(120);
pub const DEFAULT_ERASE_SPEED: Duration = Duration::from_millis(60);

/// Completion callback, invoked only when a session runs to the end.
type OnComplete = Box<dyn FnOnce() + Send>;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every cluster was revealed (or removed).
    Completed,
    /// The session was interrupted or superseded; the surface keeps whatever
    /// prefix was showing.
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterError {
    /// `type_text`/`erase` was called before `bind`.
    NotBound,
}

impl fmt::Display for TypewriterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypewriterError::NotBound => write!(f, "typewriter has no bound surface"),
        }
    }
}

impl std::error::Error for TypewriterError {}

/// Construction-time settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterOptions {
    /// Delay after each revealed cluster.
    pub type_speed: Duration,
    /// Delay after each removed cluster.
    pub erase_speed: Duration,
    pub sound_enabled: bool,
}

impl Default for TypewriterOptions {
    fn default() -> Self {
        Self {
            type_speed: DEFAULT_TYPE_SPEED,
            erase_speed: DEFAULT_ERASE_SPEED,
            sound_enabled: true,
        }
    }
}

struct Inner {
    phase: Phase,
    seq: SessionSeq,
    interrupted: bool,
    current_text: String,
    surface: Option<Arc<dyn Surface>>,
    sound_enabled: bool,
    type_speed: Duration,
    erase_speed: Duration,
}

/// A started session plus what it needs to run without re-locking.
struct Started {
    session: Session,
    surface: Arc<dyn Surface>,
    speed: Duration,
    settle: bool,
}

#[derive(Clone)]
pub struct Typewriter {
    inner: Arc<Mutex<Inner>>,
    sound: Arc<dyn SoundCue>,
}

impl fmt::Debug for Typewriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typewriter")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(TypewriterOptions::default())
    }
}

impl Typewriter {
    /// Creates an unbound typewriter with a silent sound cue.
    pub fn new(options: TypewriterOptions) -> Self {
        Self::with_sound(options, Arc::new(SilentCue))
    }

    /// Creates an unbound typewriter that emits cues through `sound`.
    pub fn with_sound(options: TypewriterOptions, sound: Arc<dyn SoundCue>) -> Self {
        let inner = Inner {
            phase: Phase::Idle,
            seq: SessionSeq::default(),
            interrupted: false,
            current_text: String::new(),
            surface: None,
            sound_enabled: options.sound_enabled,
            type_speed: options.type_speed,
            erase_speed: options.erase_speed,
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
            sound,
        }
    }

    /// Binds the output surface, replacing any previous binding.
    ///
    /// A session already running keeps writing to the surface it started on.
    pub fn bind(&self, surface: Arc<dyn Surface>) {
        self.lock().surface = Some(surface);
    }

    pub fn is_bound(&self) -> bool {
        self.lock().surface.is_some()
    }

    /// Reveals `text` cluster by cluster, starting from an empty surface.
    pub async fn type_text(&self, text: &str) -> Result<Outcome, TypewriterError> {
        self.run(Direction::Revealing, Some(text), None).await
    }

    /// Like [`type_text`](Self::type_text), calling `on_complete` only if the
    /// whole text was revealed.
    pub async fn type_text_with<F>(
        &self,
        text: &str,
        on_complete: F,
    ) -> Result<Outcome, TypewriterError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.run(Direction::Revealing, Some(text), Some(Box::new(on_complete)))
            .await
    }

    /// Removes the surface's current content cluster by cluster from the end.
    pub async fn erase(&self) -> Result<Outcome, TypewriterError> {
        self.run(Direction::Removing, None, None).await
    }

    /// Like [`erase`](Self::erase), calling `on_complete` only if the surface
    /// was emptied.
    pub async fn erase_with<F>(&self, on_complete: F) -> Result<Outcome, TypewriterError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.run(Direction::Removing, None, Some(Box::new(on_complete)))
            .await
    }

    /// Stops the active session after its current step. Leaves the surface as
    /// is. Does nothing when idle.
    pub fn interrupt(&self) {
        let mut inner = self.lock();
        if inner.phase.interrupt() {
            inner.interrupted = true;
            debug!("typewriter interrupted");
        }
    }

    /// Enables or disables sound cues, effective from the next step.
    pub fn set_sound_enabled(&self, enabled: bool) {
        self.lock().sound_enabled = enabled;
    }

    /// Updates step delays. `None` keeps the current value.
    ///
    /// Speeds are read when a session starts, so a running session keeps its
    /// cadence.
    pub fn set_speed(&self, type_speed: Option<Duration>, erase_speed: Option<Duration>) {
        let mut inner = self.lock();
        if let Some(speed) = type_speed {
            inner.type_speed = speed;
        }
        if let Some(speed) = erase_speed {
            inner.erase_speed = speed;
        }
    }

    pub fn status(&self) -> TypewriterStatus {
        let inner = self.lock();
        TypewriterStatus {
            is_typing: matches!(inner.phase, Phase::Typing(_)),
            is_erasing: matches!(inner.phase, Phase::Erasing(_)),
            is_interrupted: inner.interrupted,
            current_text: inner.current_text.clone(),
        }
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.lock().phase, Phase::Typing(_))
    }

    pub fn is_erasing(&self) -> bool {
        matches!(self.lock().phase, Phase::Erasing(_))
    }

    pub fn current_text(&self) -> String {
        self.lock().current_text.clone()
    }

    async fn run(
        &self,
        direction: Direction,
        text: Option<&str>,
        on_complete: Option<OnComplete>,
    ) -> Result<Outcome, TypewriterError> {
        let started = self.start(direction, text)?;
        let Started {
            session,
            surface,
            speed,
            settle,
        } = started;
        let id = session.id;

        if settle && !pause(&session.cancel, SETTLE_PAUSE).await {
            debug!(session = id.0, "superseded while settling");
            return Ok(Outcome::Interrupted);
        }

        // Reveal starts from an empty surface; erase works on the live content.
        let (source, action) = match direction {
            Direction::Revealing => {
                let source = text.unwrap_or_default().to_string();
                if !self.write_if_active(id, surface.as_ref(), "") {
                    return Ok(Outcome::Interrupted);
                }
                (source, SoundAction::Type)
            }
            Direction::Removing => (surface.text(), SoundAction::Erase),
        };

        let ends = step_ends(&source, direction);
        debug!(
            session = id.0,
            ?direction,
            steps = ends.len(),
            speed_ms = speed.as_millis() as u64,
            "session started"
        );

        for end in ends {
            if !self.write_if_active(id, surface.as_ref(), &source[..end]) {
                debug!(session = id.0, "session interrupted");
                return Ok(Outcome::Interrupted);
            }
            self.cue(action, speed);
            if !pause(&session.cancel, speed).await {
                debug!(session = id.0, "session interrupted");
                return Ok(Outcome::Interrupted);
            }
        }

        if !self.lock().phase.finish_if_active(id) {
            return Ok(Outcome::Interrupted);
        }
        debug!(session = id.0, "session completed");
        if let Some(on_complete) = on_complete {
            on_complete();
        }
        Ok(Outcome::Completed)
    }

    /// Interrupts any active session and installs a new one.
    fn start(&self, direction: Direction, text: Option<&str>) -> Result<Started, TypewriterError> {
        let mut inner = self.lock();
        let Some(surface) = inner.surface.as_ref().map(Arc::clone) else {
            error!(?direction, "typewriter has no bound surface; ignoring call");
            return Err(TypewriterError::NotBound);
        };

        let settle = inner.phase.interrupt();
        let session = Session::new(inner.seq.next_id());
        inner.phase = Phase::start(direction, session.clone());
        inner.interrupted = false;
        let speed = match direction {
            Direction::Revealing => {
                if let Some(text) = text {
                    text.clone_into(&mut inner.current_text);
                }
                inner.type_speed
            }
            Direction::Removing => inner.erase_speed,
        };

        Ok(Started {
            session,
            surface,
            speed,
            settle,
        })
    }

    fn write_if_active(&self, id: SessionId, surface: &dyn Surface, text: &str) -> bool {
        let inner = self.lock();
        if !inner.phase.is_active(id) {
            return false;
        }
        surface.set_text(text);
        true
    }

    fn cue(&self, action: SoundAction, hint: Duration) {
        if !self.lock().sound_enabled {
            return;
        }
        if let Err(err) = self.sound.emit(action, hint) {
            debug!(%action, error = %err, "sound cue failed");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Sleeps for `delay` unless cancelled first. Returns false on cancellation.
async fn pause(cancel: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        biased;
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(delay) => true,
    }
}

/// Byte offsets of each frame, as prefixes of `source`.
///
/// Revealing yields the end of every cluster in order; removing yields the
/// start of every cluster from the last one back to zero.
fn step_ends(source: &str, direction: Direction) -> Vec<usize> {
    let clusters = segment(source);
    match direction {
        Direction::Revealing => clusters
            .iter()
            .scan(0, |end, cluster| {
                *end += cluster.len();
                Some(*end)
            })
            .collect(),
        Direction::Removing => clusters
            .iter()
            .rev()
            .scan(source.len(), |end, cluster| {
                *end -= cluster.len();
                Some(*end)
            })
            .collect(),
    }
}
