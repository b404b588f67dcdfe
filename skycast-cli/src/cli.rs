use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use skycast_core::Config;

use crate::screen;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather in your terminal")]
pub struct Cli {
    /// With no subcommand, the interactive weather screen opens.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key used for requests.
    Configure,

    /// Fetch weather for a city once and print the card.
    Show {
        /// City name, e.g. "Paris" or "New York".
        city: String,

        /// Also fetch and print the extended details panel.
        #[arg(long)]
        details: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city, details }) => screen::show_once(&city, details).await,
            None => screen::run().await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("API key saved to {}", Config::config_file_path()?.display());
    Ok(())
}
