//! Plain output commands.

use anyhow::{Context, Result};
use paperline_core::config::Config;
use paperline_core::render::{self, Section};

use crate::cli::DataArgs;

pub fn sections() {
    for section in Section::ALL {
        println!("{:<12}{}", section.name(), section.heading());
    }
}

pub async fn run(config: &Config, data: &DataArgs, section: Section) -> Result<()> {
    let doc = data
        .fetcher(config)
        .load(data.refresh)
        .await
        .context("load résumé data")?;

    print!("{}", render::render(section, &doc));
    Ok(())
}
