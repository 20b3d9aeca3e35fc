//! Animated page commands.

use anyhow::{Context, Result};
use paperline_core::config::Config;
use paperline_core::render::Section;
use paperline_core::typewriter::Outcome;

use crate::cli::DataArgs;
use crate::interrupt::{self, InterruptedError};
use crate::page::Page;
use crate::screen::{self, Screen};

pub async fn run(config: &Config, data: &DataArgs, section: Section, instant: bool) -> Result<()> {
    let doc = data
        .fetcher(config)
        .load(data.refresh)
        .await
        .context("load résumé data")?;

    let page = Page::new(config, Screen::detect());
    animate(&page, page.show(&doc, section, instant)).await
}

pub async fn tour(config: &Config, data: &DataArgs) -> Result<()> {
    let doc = data
        .fetcher(config)
        .load(data.refresh)
        .await
        .context("load résumé data")?;

    let page = Page::new(config, Screen::detect());
    animate(&page, page.tour(&doc)).await
}

/// Runs `work` on a prepared screen. The first Ctrl+C stops the typewriters
/// and the command exits as interrupted.
async fn animate(page: &Page, work: impl Future<Output = Result<Outcome>>) -> Result<()> {
    page.screen().begin()?;
    interrupt::set_restore_hook(screen::restore_terminal);

    let watcher = {
        let page = page.clone();
        tokio::spawn(async move {
            interrupt::wait_for_interrupt().await;
            page.interrupt();
        })
    };

    let outcome = work.await;
    watcher.abort();
    page.screen().finish()?;

    if outcome? == Outcome::Interrupted {
        return Err(InterruptedError.into());
    }
    Ok(())
}
