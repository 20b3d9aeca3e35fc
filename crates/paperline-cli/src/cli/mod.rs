//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use paperline_core::config::{self, Config};
use paperline_core::export::ExportFormat;
use paperline_core::logging;
use paperline_core::render::Section;
use paperline_core::source::DataFetcher;

use crate::interrupt;

mod commands;

#[derive(Parser)]
#[command(name = "paperline")]
#[command(version)]
#[command(about = "Résumé page revealed by a typewriter")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where to load the résumé from.
#[derive(clap::Args, Debug, Clone, Default)]
struct DataArgs {
    /// Résumé JSON file or http(s) URL (overrides config)
    #[arg(long, value_name = "PATH|URL")]
    data: Option<String>,

    /// Ignore cached data and load from the source
    #[arg(long)]
    refresh: bool,
}

impl DataArgs {
    fn fetcher(&self, config: &Config) -> DataFetcher {
        let mut data = config.data.clone();
        if let Some(source) = &self.data {
            data.source.clone_from(source);
        }
        DataFetcher::new(data, config::paths::cache_dir())
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Type out one section of the résumé (default: about)
    Show {
        /// Section to show
        #[arg(value_name = "SECTION", default_value = "about")]
        section: Section,

        /// Show the title at once instead of typing it
        #[arg(long)]
        instant: bool,

        /// Disable typing sounds for this run
        #[arg(long = "no-sound")]
        no_sound: bool,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Type out every section in order
    Tour {
        /// Disable typing sounds for this run
        #[arg(long = "no-sound")]
        no_sound: bool,

        #[command(flatten)]
        data: DataArgs,
    },

    /// List section names
    Sections,

    /// Print a section without animation
    Render {
        /// Section to render
        #[arg(value_name = "SECTION")]
        section: Section,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Write the whole résumé to a text or HTML file
    Export {
        /// Output format (text or html)
        #[arg(long, value_name = "FORMAT", default_value = "text")]
        format: ExportFormat,

        /// Output file (default: <name>_full_<YYYY_MM_DD>.<ext>)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Manage typing sounds
    Sound {
        #[command(subcommand)]
        command: SoundCommands,
    },

    /// Manage cached résumé data
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum SoundCommands {
    /// Enable typing sounds
    On,
    /// Disable typing sounds
    Off,
    /// Flip the current setting
    Toggle,
    /// Show the current setting
    Status,
    /// Set the volume (0.0 to 1.0)
    Volume {
        #[arg(value_name = "LEVEL")]
        level: f32,
    },
}

#[derive(clap::Subcommand)]
enum CacheCommands {
    /// Delete the cached résumé data
    Clear,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init(&config::paths::logs_dir());
    interrupt::init()?;

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("load config")?;

    let Some(command) = cli.command else {
        return commands::show::run(&config, &DataArgs::default(), Section::About, false).await;
    };

    match command {
        Commands::Show {
            section,
            instant,
            no_sound,
            data,
        } => {
            if no_sound {
                config.sound.enabled = false;
            }
            commands::show::run(&config, &data, section, instant).await
        }
        Commands::Tour { no_sound, data } => {
            if no_sound {
                config.sound.enabled = false;
            }
            commands::show::tour(&config, &data).await
        }
        Commands::Sections => {
            commands::render::sections();
            Ok(())
        }
        Commands::Render { section, data } => {
            commands::render::run(&config, &data, section).await
        }
        Commands::Export {
            format,
            output,
            data,
        } => commands::export::run(&config, &data, format, output).await,
        Commands::Sound { command } => match command {
            SoundCommands::On => commands::sound::set(config, Some(true)),
            SoundCommands::Off => commands::sound::set(config, Some(false)),
            SoundCommands::Toggle => commands::sound::set(config, None),
            SoundCommands::Status => {
                commands::sound::status(&config);
                Ok(())
            }
            SoundCommands::Volume { level } => commands::sound::volume(config, level),
        },
        Commands::Cache { command } => match command {
            CacheCommands::Clear => commands::cache::clear(&config),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
