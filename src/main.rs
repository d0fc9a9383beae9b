//! phrasemark - highlight configured words and phrases in text documents

use std::io;
use std::path::Path;
use std::process;

use clap::Parser;

use phrasemark::cli::{CliArgs, Command, OutputFormat};
use phrasemark::config::Config;
use phrasemark::display::{render_ansi, render_json, render_plain, Decorations};
use phrasemark::error::{HighlightError, Result};
use phrasemark::highlight::resolve;
use phrasemark::loader::{load_snapshot, read_text};
use phrasemark::logging::{self, LogTarget};
use phrasemark::session;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();

    let log_target = match args.command {
        Command::Watch { .. } => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    logging::init(log_target);

    let config_path = args.config_path().ok_or_else(|| {
        HighlightError::Message("Cannot locate home directory; pass --config".into())
    })?;

    match &args.command {
        Command::Show { file, format } => show(&config_path, file, *format),
        Command::Watch { file } => {
            if !file.exists() {
                return Err(HighlightError::FileNotFound(file.clone()));
            }
            session::watch(&config_path, file)
        }
        Command::Add {
            list,
            color,
            disabled,
        } => add(&config_path, list, color.clone(), !*disabled),
        Command::Lists => lists(&config_path),
    }
}

fn show(config_path: &Path, file: &Path, format: OutputFormat) -> Result<()> {
    let config = Config::load(config_path)?;
    let snapshot = load_snapshot(&config, &Config::base_dir(config_path));
    let text = read_text(file).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => HighlightError::FileNotFound(file.to_path_buf()),
        _ => e.into(),
    })?;

    let buckets = resolve(&text, snapshot.lists());
    let mut out = io::stdout().lock();

    match format {
        OutputFormat::Ansi => render_ansi(&mut out, &text, &Decorations::new(&snapshot, &buckets)),
        OutputFormat::Plain => {
            render_plain(&mut out, &text, &Decorations::new(&snapshot, &buckets))
        }
        OutputFormat::Json => render_json(&mut out, &text, &snapshot, &buckets),
    }
}

fn add(config_path: &Path, list: &Path, color: Option<String>, enabled: bool) -> Result<()> {
    let mut config = Config::load(config_path)?;
    let list = list
        .canonicalize()
        .map_err(|_| HighlightError::FileNotFound(list.to_path_buf()))?;

    config.add_list(list.clone(), color, enabled)?;
    config.save(config_path)?;

    println!("Added word list: {}", list.display());
    Ok(())
}

fn lists(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let snapshot = load_snapshot(&config, &Config::base_dir(config_path));

    if snapshot.is_empty() {
        println!("No word lists configured in {}", config_path.display());
        return Ok(());
    }

    for (index, loaded) in snapshot.loaded().iter().enumerate() {
        let state = if loaded.list.enabled { "on " } else { "off" };
        println!(
            "{:>3} {} {:<24} {:>6} {}",
            index,
            state,
            loaded.color.to_string(),
            loaded.list.len(),
            loaded.source.display()
        );
    }

    Ok(())
}
