//! Sound command handlers.

use anyhow::{Context, Result};
use paperline_core::config::Config;

fn label(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

/// Sets sounds on or off, or flips them when `enabled` is `None`.
pub fn set(mut config: Config, enabled: Option<bool>) -> Result<()> {
    match enabled {
        Some(enabled) => config.sound.enabled = enabled,
        None => {
            config.sound.toggle();
        }
    }

    Config::save_sound(config.sound).context("save sound setting")?;
    println!("Sound: {}", label(config.sound.enabled));
    Ok(())
}

pub fn volume(mut config: Config, level: f32) -> Result<()> {
    config.sound.set_volume(level);
    Config::save_sound(config.sound).context("save sound setting")?;
    println!("Volume: {:.1}", config.sound.volume);
    Ok(())
}

pub fn status(config: &Config) {
    println!(
        "Sound: {} (volume {:.1})",
        label(config.sound.enabled),
        config.sound.volume
    );
}
