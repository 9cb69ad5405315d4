//! LVRT CLI - render XML UI documents from the command line

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lvrt_runtime::RuntimeConfig;

mod logger;
mod render;

#[derive(Parser)]
#[command(name = "lvrt")]
#[command(version = lvrt_runtime::VERSION)]
#[command(about = "Render XML UI documents into a widget tree", long_about = None)]
struct Cli {
    /// Runtime configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct DocumentArgs {
    /// XML document to render
    file: PathBuf,

    /// Register a component before rendering, as NAME=PATH
    #[arg(short, long = "component")]
    components: Vec<String>,

    /// Style override for the screen, as KEY=VALUE
    #[arg(short, long = "style")]
    styles: Vec<String>,

    /// Canvas selector to size the display from
    #[arg(long, default_value = "#canvas")]
    canvas: String,

    /// Canvas size as WIDTHxHEIGHT, overriding the selector table
    #[arg(long)]
    size: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a document and report the outcome
    Render {
        #[command(flatten)]
        document: DocumentArgs,

        /// Print the geometry of the object at this path (repeatable)
        #[arg(short, long = "query")]
        queries: Vec<String>,

        /// Run this many frames after rendering
        #[arg(long, default_value_t = 0)]
        frames: u32,

        /// Print the rendered tree as JSON
        #[arg(long)]
        dump: bool,

        /// Print every runtime log event
        #[arg(long)]
        logs: bool,
    },

    /// Render a document and fail if rendering fails
    Check {
        #[command(flatten)]
        document: DocumentArgs,
    },

    /// Print the effective configuration
    Config,
}

fn load_config(path: Option<&Path>) -> Result<RuntimeConfig> {
    match path {
        Some(path) => RuntimeConfig::from_path(path)
            .with_context(|| format!("Failed to load config `{}`", path.display())),
        None => Ok(RuntimeConfig::default()),
    }
}

fn options_from(document: DocumentArgs) -> render::RenderOptions {
    render::RenderOptions {
        file: document.file,
        components: document.components,
        styles: document.styles,
        canvas: document.canvas,
        size: document.size,
        ..render::RenderOptions::default()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    logger::init(logger::effective_level(config.log_level, cli.verbose)).context("Failed to install logger")?;

    match cli.command {
        Commands::Render {
            document,
            queries,
            frames,
            dump,
            logs,
        } => {
            let options = render::RenderOptions {
                queries,
                frames,
                dump,
                show_logs: logs,
                ..options_from(document)
            };
            if !render::run(&options, config)? {
                std::process::exit(1);
            }
        }

        Commands::Check { document } => {
            let options = options_from(document);
            let file = options.file.display().to_string();
            if !render::run(&options, config)? {
                bail!("`{file}` failed to render");
            }
            println!("{file}: ok");
        }

        Commands::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}
