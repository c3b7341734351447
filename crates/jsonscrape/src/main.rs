use std::path::{Path, PathBuf};

use crate::prelude::{println, *};
use clap::Parser;
use colored::Colorize;

use jsonscrape_core::settings::Settings;

mod error;
mod fetch;
mod output;
mod paginate;
mod prelude;
mod scrape;
mod transport;

/// Example settings embedded at build time, used when no path is given.
const EXAMPLE_SETTINGS: &str = include_str!("../settings.example.json");

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Fetch paginated JSON from an HTTP API, transform it with declarative mapping and filter rules, and export CSV, JSON, XML, or HTML"
)]
pub struct App {
    /// Path to the settings JSON file
    #[arg(value_name = "SETTINGS")]
    settings: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "JSONSCRAPE_VERBOSE", default_value = "false")]
    verbose: bool,

    /// Output the run summary as JSON
    #[arg(long)]
    json: bool,
}

/// An absolute path is used as-is; a relative one resolves against
/// the current directory.
fn resolve_settings_path(arg: PathBuf) -> PathBuf {
    if arg.is_absolute() {
        arg
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&arg))
            .unwrap_or(arg)
    }
}

fn load_settings(path: &Path) -> Result<Settings, Error> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read settings {}: {e}", path.display())))?;
    Ok(Settings::from_json_str(&raw)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    let settings = match app.settings {
        Some(arg) => {
            let settings_path = resolve_settings_path(arg);
            println!("Using settings from: {}", settings_path.display());
            match load_settings(&settings_path) {
                Ok(settings) => settings,
                Err(err) => {
                    log::error!("[loadSettings] {}: {err}", settings_path.display());
                    return Err(eyre!(err));
                }
            }
        }
        None => {
            println!("Using settings from: bundled settings.example.json");
            match Settings::from_json_str(EXAMPLE_SETTINGS) {
                Ok(settings) => settings,
                Err(err) => {
                    log::error!("[loadSettings] settings.example.json: {err}");
                    return Err(eyre!(Error::from(err)));
                }
            }
        }
    };

    if app.verbose {
        println!("Fetching {}...", settings.request.url);
    }

    let transport = transport::ReqwestTransport::new();
    let summary = scrape::run_scrape(&transport, &settings)
        .await
        .map_err(|err| eyre!(err))?;

    if app.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("\n{}", "Scrape completed.".green().bold());

        let mut table = new_table();
        table.add_row(prettytable::row!["Records", summary.record_count]);
        table.add_row(prettytable::row!["Output", summary.output_path.display()]);
        table.add_row(prettytable::row!["Format", summary.format]);
        table.printstd();
    }

    Ok(())
}
