//! Interactive demo: the classic prompt/read session on the screenio
//! console instead of the process's own stdin/stdout.

use std::io::{BufRead, BufReader, Write};

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    init_logging();
    info!("demo starting");

    let config = screenio::ConsoleConfig::load();
    let console = screenio::install(config)?;
    console.show();

    let mut out = screenio::stdout();
    let mut cin = BufReader::new(screenio::stdin());

    writeln!(out, "Starting screenio console...")?;
    writeln!(out, "Enter your name:")?;
    let mut name = String::new();
    cin.read_line(&mut name)?;
    let name = name.trim().to_string();

    writeln!(out, "Enter your age:")?;
    let mut age_line = String::new();
    cin.read_line(&mut age_line)?;
    match age_line.trim().parse::<u32>() {
        Ok(age) => writeln!(out, "{} is {} years old.", name, age)?,
        Err(_) => writeln!(out, "{} keeps their age a secret.", name)?,
    }

    writeln!(out, "Press Enter to exit...")?;
    let mut rest = String::new();
    cin.read_line(&mut rest)?;

    console.hide();
    console.shutdown();
    info!("demo finished");
    Ok(())
}

/// Log to a file under `~/.screenio`; the console owns the terminal, so
/// nothing may be printed to stderr while it is visible.
fn init_logging() {
    let home = std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(std::path::PathBuf::from);

    let log_path = home
        .map(|h| h.join(".screenio").join("screenio.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("screenio.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}
