//! Terminal page with a title line and a content area.
//!
//! Each region is exposed as a [`Surface`] so a typewriter can drive it.
//! On a terminal every write redraws the page in place. When stdout is not a
//! terminal nothing is drawn until [`Screen::finish`], which prints the final
//! page once.

use std::io::{self, IsTerminal, Write};
use std::panic;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{QueueableCommand, execute};
use paperline_core::segment::segment;
use paperline_core::surface::Surface;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Title,
    Content,
}

#[derive(Debug, Default)]
struct Page {
    title: String,
    content: String,
}

#[derive(Debug)]
pub struct Screen {
    page: Mutex<Page>,
    live: bool,
}

impl Screen {
    /// Draws live only when stdout is a terminal.
    pub fn detect() -> Arc<Self> {
        Self::new(io::stdout().is_terminal())
    }

    pub fn new(live: bool) -> Arc<Self> {
        Arc::new(Self {
            page: Mutex::new(Page::default()),
            live,
        })
    }

    pub fn surface(self: &Arc<Self>, region: Region) -> Arc<dyn Surface> {
        Arc::new(RegionSurface {
            screen: Arc::clone(self),
            region,
        })
    }

    /// Clears the terminal and hides the cursor.
    pub fn begin(&self) -> Result<()> {
        if !self.live {
            return Ok(());
        }
        install_panic_hook();
        execute!(io::stdout(), Hide, Clear(ClearType::All), MoveTo(0, 0))
            .context("Failed to prepare terminal")
    }

    /// Leaves the final page on screen and restores the cursor.
    pub fn finish(&self) -> Result<()> {
        let page = self.lock();
        let mut stdout = io::stdout().lock();
        if self.live {
            let rows = layout(&page.title, &page.content, size()).len();
            stdout
                .queue(MoveTo(0, to_u16(rows)))?
                .queue(Show)?
                .flush()
                .context("Failed to restore terminal")
        } else {
            writeln!(stdout, "{}\n\n{}", page.title, page.content.trim_end())
                .context("Failed to write page")
        }
    }

    fn text(&self, region: Region) -> String {
        let page = self.lock();
        match region {
            Region::Title => page.title.clone(),
            Region::Content => page.content.clone(),
        }
    }

    fn set_text(&self, region: Region, text: &str) {
        let mut page = self.lock();
        let slot = match region {
            Region::Title => &mut page.title,
            Region::Content => &mut page.content,
        };
        slot.clear();
        slot.push_str(text);

        if self.live
            && let Err(e) = draw(&mut io::stdout().lock(), &page)
        {
            debug!("Failed to redraw page: {e}");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Page> {
        self.page
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

struct RegionSurface {
    screen: Arc<Screen>,
    region: Region,
}

impl Surface for RegionSurface {
    fn text(&self) -> String {
        self.screen.text(self.region)
    }

    fn set_text(&self, text: &str) {
        self.screen.set_text(self.region, text);
    }
}

/// Shows the cursor again. Safe to call more than once.
pub fn restore_terminal() {
    let _ = execute!(io::stdout(), Show);
}

fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));
}

fn size() -> (u16, u16) {
    crossterm::terminal::size().unwrap_or((80, 24))
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn draw(out: &mut impl Write, page: &Page) -> io::Result<()> {
    out.queue(MoveTo(0, 0))?
        .queue(Clear(ClearType::FromCursorDown))?;
    for (row, line) in layout(&page.title, &page.content, size())
        .iter()
        .enumerate()
    {
        out.queue(MoveTo(0, to_u16(row)))?;
        out.write_all(line.as_bytes())?;
    }
    out.flush()
}

/// Rows to draw for a `cols` x `rows` terminal.
///
/// Long lines wrap by grapheme cluster. The title stays pinned at the top;
/// when the content is too tall only its tail is shown, so the line being
/// typed stays visible.
fn layout(title: &str, content: &str, (cols, rows): (u16, u16)) -> Vec<String> {
    let cols = usize::from(cols.max(1));
    let rows = usize::from(rows.max(1));

    let mut out = wrap(title, cols);
    out.truncate(rows);
    if out.len() + 1 >= rows {
        return out;
    }
    out.push(String::new());

    let body = wrap(content.trim_end_matches('\n'), cols);
    let room = rows - out.len();
    let skip = body.len().saturating_sub(room);
    out.extend(body.into_iter().skip(skip));
    out
}

fn wrap(text: &str, cols: usize) -> Vec<String> {
    let mut rows = Vec::new();
    for line in text.split('\n') {
        let clusters = segment(line.trim_end_matches('\r'));
        if clusters.is_empty() {
            rows.push(String::new());
            continue;
        }
        for chunk in clusters.chunks(cols) {
            rows.push(chunk.concat());
        }
    }
    rows
}
