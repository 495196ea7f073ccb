//! kpaint - paint with the mouse in a Kitty graphics terminal

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};

use kpaint::config::{self, Config};
use kpaint::constants::READ_BUF_SIZE;
use kpaint::terminal::TerminalSession;
use kpaint::utils::expand_path;
use kpaint::{LoopState, Painter};

/// Print help message
fn print_help() {
    println!(
        r#"kpaint {} - mouse painting for Kitty graphics terminals

USAGE:
    kpaint [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --config PATH           Use config file at PATH
    --init-config           Generate default config file
    -f, --force             Overwrite config file without confirmation

KEYS:
    mouse left              Paint
    c / C                   Next / previous color
    [ / ]                   Radius -1 / +1
    {{ / }}                   Radius -5 / +5
    x                       Clear canvas
    u / U                   Undo / redo (also Ctrl+Z / Ctrl+Y)
    Ctrl+S                  Save PNG
    Ctrl+E                  Export text
    q / Ctrl+C              Quit

ENVIRONMENT:
    KPAINT_CONFIG           Config file path (highest priority)
    KPAINT_LOG_FILE         Write logs to this file instead of stderr
    RUST_LOG                Log filter (default: warn)

CONFIG FILE:
    ~/.config/kpaint/config.toml
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// Log to stderr, or to KPAINT_LOG_FILE so output does not land on the canvas
fn init_logger() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Ok(path) = std::env::var("KPAINT_LOG_FILE") {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Cannot open log file {}: {}", path, e),
        }
    }
    builder.init();
}

/// `--config PATH` or `--config=PATH`
fn config_arg(args: &[String]) -> Option<PathBuf> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(value) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(expand_path(value)));
        }
        if arg == "--config" {
            return iter.next().map(|v| PathBuf::from(expand_path(v)));
        }
    }
    None
}

/// Generate the default config, asking before overwriting
fn init_config(force: bool) -> Result<()> {
    if let Some(path) = config::user_config_path() {
        if path.exists() && !force {
            println!("Config file already exists: {}", path.display());
            print!("Overwrite? [y/N]: ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            let input = input.trim().to_lowercase();

            if input != "y" && input != "yes" {
                println!("Aborted.");
                return Ok(());
            }
        }
    }

    let path = Config::write_default_config()?;
    println!("Config file generated: {}", path.display());
    Ok(())
}

/// Blocking read loop. Returns when the user quits or stdin closes.
fn run<W: Write>(session: &TerminalSession, painter: &mut Painter<W>) -> Result<()> {
    painter.start().context("Failed to draw first frame")?;

    let mut buf = [0u8; READ_BUF_SIZE];
    loop {
        let n = session.read(&mut buf).context("Failed to read stdin")?;
        if n == 0 {
            info!("stdin closed");
            break;
        }
        if painter.feed(&buf[..n])? == LoopState::Terminating {
            break;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logger();

    let args: Vec<String> = std::env::args().collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("kpaint {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.iter().any(|a| a == "--init-config") {
        let force = args.iter().any(|a| a == "--force" || a == "-f");
        return init_config(force);
    }

    info!("kpaint starting...");

    let explicit = config_arg(&args);
    let cfg = Config::load(explicit.as_deref());

    // Terminal is restored when `session` drops, including on `?` below
    let session = TerminalSession::acquire()?;
    let size = session.size();
    info!("Terminal grid: {}x{}", size.cols, size.rows);

    let mut painter = Painter::new(&cfg, size, BufWriter::new(io::stdout()))
        .context("Failed to initialize canvas")?;

    let result = run(&session, &mut painter);
    if let Err(e) = painter.shutdown() {
        warn!("Failed to delete images: {}", e);
    }
    drop(painter);
    drop(session);

    result?;
    info!("kpaint terminated");
    Ok(())
}
