use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use skyscene_core::{
    Config, Controller, LookupOutcome, Trigger, controller::ENTER_KEY, page,
    provider::source_from_config,
};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyscene", version, about = "Weather lookup with an animated sky")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default city.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, sent as typed.
        city: String,

        /// Also write the widget as an HTML page to this path.
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Look up the default city, then keep prompting for more.
    Interactive {
        /// Rewrite this HTML page after every applied update.
        #[arg(long)]
        html: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, html } => show(city, html).await,
            Command::Interactive { html } => interactive(html).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let default_city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()
        .context("Failed to read default city")?;

    config.set_api_key(api_key);
    config.default_city = default_city;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn controller_from_config(config: &Config) -> anyhow::Result<Arc<Controller>> {
    let source = source_from_config(config)?;
    Ok(Arc::new(Controller::with_defaults(Arc::from(source))))
}

async fn show(city: String, html: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let ctrl = controller_from_config(&config)?;

    if ctrl.handle(Trigger::Click, &city).await == LookupOutcome::Ignored {
        bail!("City name must not be empty");
    }

    let widget = ctrl.snapshot();
    print!("{}", output::summary(&widget));

    if let Some(path) = html {
        write_page(&path, &widget)?;
        println!("Page written to {}", path.display());
    }

    Ok(())
}

async fn interactive(html: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let ctrl = controller_from_config(&config)?;
    let mut lookups = JoinSet::new();

    let default_city = config.default_city.clone();
    dispatch(&mut lookups, ctrl.clone(), Trigger::Click, default_city, html.clone());

    let result = loop {
        let line = tokio::task::spawn_blocking(|| {
            Text::new("City:").with_help_message("Enter to search, Esc to quit").prompt_skippable()
        })
        .await
        .context("Prompt task failed");

        match line {
            Ok(Ok(Some(city))) => {
                dispatch(&mut lookups, ctrl.clone(), Trigger::Key(ENTER_KEY), city, html.clone())
            }
            Ok(Ok(None)) | Ok(Err(InquireError::OperationInterrupted)) => break Ok(()),
            Ok(Err(e)) => break Err(e).context("Failed to read city"),
            Err(e) => break Err(e),
        }
    };

    drain(&mut lookups).await;
    result
}

/// Starts a lookup without waiting for earlier ones to finish.
fn dispatch(
    lookups: &mut JoinSet<LookupOutcome>,
    ctrl: Arc<Controller>,
    trigger: Trigger<'static>,
    city: String,
    html: Option<PathBuf>,
) {
    lookups.spawn(async move {
        let outcome = ctrl.handle(trigger, &city).await;
        match &outcome {
            LookupOutcome::Applied { ticket, .. } => {
                info!(ticket, %city, "update applied");
                let widget = ctrl.snapshot();
                print!("\n{}", output::summary(&widget));
                if let Some(path) = html {
                    if let Err(e) = write_page(&path, &widget) {
                        warn!("Failed to write page: {e:#}");
                    }
                }
            }
            LookupOutcome::Stale { ticket, latest } => {
                info!(ticket, latest, %city, "superseded by a newer lookup");
            }
            LookupOutcome::Ignored => {}
        }
        outcome
    });
}

/// Waits for every lookup still in flight. Returns how many were applied.
async fn drain(lookups: &mut JoinSet<LookupOutcome>) -> usize {
    let mut applied = 0;
    while let Some(joined) = lookups.join_next().await {
        match joined {
            Ok(outcome) if outcome.is_applied() => applied += 1,
            Ok(_) => {}
            Err(e) => warn!("Lookup task failed: {e}"),
        }
    }
    applied
}

fn write_page(path: &Path, widget: &skyscene_core::Widget) -> anyhow::Result<()> {
    let html = page::render_page(widget)?;
    std::fs::write(path, html)
        .with_context(|| format!("Failed to write page: {}", path.display()))
}
