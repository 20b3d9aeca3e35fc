//! Terminal bell as the typing sound.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use paperline_core::sound::{SoundAction, SoundCue, SoundSettings};

/// Rings the bell for typed clusters. Erase and click cues stay silent.
#[derive(Debug, Clone, Copy)]
pub struct BellCue {
    audible: bool,
}

impl BellCue {
    /// A bell can't be made quieter, so any non-zero volume rings. Never
    /// rings into a pipe.
    pub fn new(settings: SoundSettings) -> Self {
        Self {
            audible: settings.volume > 0.0 && io::stdout().is_terminal(),
        }
    }
}

impl SoundCue for BellCue {
    fn emit(&self, action: SoundAction, _duration_hint: Duration) -> Result<()> {
        if !self.audible || action != SoundAction::Type {
            return Ok(());
        }
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(b"\x07")
            .and_then(|()| stdout.flush())
            .context("Failed to ring terminal bell")
    }
}
