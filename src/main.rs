//! Graybox CLI
//!
//! Usage:
//!   graybox [OPTIONS] [BATCH]
//!
//! Reads a command batch (or a JSON array of batches) from BATCH or stdin,
//! executes it and prints the batch responses as JSON.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use graybox::{BatchInput, BatchResponse, Engine, EngineConfig, Scene, Stylesheet};

#[derive(Parser)]
#[command(name = "graybox")]
#[command(about = "Grid-snapped scene engine driven by JSON command batches")]
struct Cli {
    /// Batch file (reads from stdin if not provided)
    batch: Option<PathBuf>,

    /// Engine configuration (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stylesheet file for the render palette (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Scene snapshot to start from (JSON, as written by export_state)
    #[arg(long)]
    state: Option<PathBuf>,

    /// Write the last rendered SVG to this file
    #[arg(long)]
    svg_out: Option<PathBuf>,

    /// Write the final scene snapshot to this file
    #[arg(long)]
    state_out: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.batch.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let config = match &cli.config {
        Some(path) => match EngineConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => fail(&format!("Error loading config '{}': {}", path.display(), e)),
        },
        None => EngineConfig::default(),
    };

    let stylesheet = match &cli.stylesheet {
        Some(path) => match Stylesheet::from_file(path) {
            Ok(s) => s,
            Err(e) => fail(&format!("Error loading stylesheet '{}': {}", path.display(), e)),
        },
        None => Stylesheet::default(),
    };

    let engine = match &cli.state {
        Some(path) => {
            let json = read_file(path);
            let scene = match Scene::from_json(&json) {
                Ok(scene) => scene,
                Err(e) => fail(&format!("Error loading state '{}': {}", path.display(), e)),
            };
            match Engine::with_scene(config, scene) {
                Ok(engine) => engine,
                Err(e) => fail(&format!("Error loading state '{}': {}", path.display(), e)),
            }
        }
        None => Engine::new(config),
    };
    let mut engine = engine.with_stylesheet(stylesheet);

    let source = match &cli.batch {
        Some(path) => read_file(path),
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => fail(&format!("Error reading from stdin: {}", e)),
            }
        }
    };

    let input = match BatchInput::from_json(&source) {
        Ok(input) => input,
        Err(e) => fail(&format!("Error parsing batch: {}", e)),
    };
    let single = matches!(input, BatchInput::One(_));

    let mut responses = Vec::new();
    let mut last_svg = None;
    let mut failed = false;
    for batch in input.into_batches() {
        let result = engine.execute(&batch);
        if let Ok(output) = &result {
            if output.svg.is_some() {
                last_svg = output.svg.clone();
            }
        }
        failed |= result.is_err();
        responses.push(BatchResponse::from(result));
    }

    let printed = if single {
        serde_json::to_string_pretty(&responses[0])
    } else {
        serde_json::to_string_pretty(&responses)
    };
    match printed {
        Ok(json) => println!("{}", json),
        Err(e) => fail(&format!("Error encoding responses: {}", e)),
    }

    if let (Some(path), Some(svg)) = (&cli.svg_out, &last_svg) {
        write_file(path, svg);
    }
    if let Some(path) = &cli.state_out {
        match engine.scene().to_json() {
            Ok(json) => write_file(path, &json),
            Err(e) => fail(&format!("Error encoding state: {}", e)),
        }
    }

    if failed {
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_file(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => fail(&format!("Error reading file '{}': {}", path.display(), e)),
    }
}

fn write_file(path: &Path, content: &str) {
    if let Err(e) = fs::write(path, content) {
        fail(&format!("Error writing file '{}': {}", path.display(), e));
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn print_intro() {
    println!(
        r#"Graybox - grid-snapped scene engine

USAGE:
    graybox [OPTIONS] [BATCH]
    echo '<batch json>' | graybox

OPTIONS:
    -c, --config <FILE>       Engine configuration (TOML)
    -s, --stylesheet <FILE>   Render palette (TOML)
    --state <FILE>            Start from an exported snapshot
    --svg-out <FILE>          Write the last rendered SVG
    --state-out <FILE>        Write the final snapshot
    -v, --verbose             More logging (repeatable)
    -h, --help                Print help

QUICK START:
    echo '{{"commands": [
      {{"tool": "create_scene", "arguments": {{"labels": ["A", "B"], "placement": "grid"}}}},
      {{"tool": "render_svg", "arguments": {{"view": "topdown"}}}}
    ]}}' | graybox --svg-out scene.svg"#
    );
}
