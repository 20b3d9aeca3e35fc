//! Cache command handlers.

use anyhow::Result;
use paperline_core::config::{Config, paths};
use paperline_core::source::DataFetcher;

pub fn clear(config: &Config) -> Result<()> {
    let fetcher = DataFetcher::new(config.data.clone(), paths::cache_dir());
    let path = fetcher.cache_path();
    if fetcher.clear_cache()? {
        println!("Cleared cache at {}", path.display());
    } else {
        println!("No cache at {}", path.display());
    }
    Ok(())
}
