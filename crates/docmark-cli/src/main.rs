use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use docmark_config::Config;
use docmark_engine::{
    BatchSummary, DocumentModel, compile, compile_replacement, plan_batches, render, tokenize,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io, process};

#[derive(Parser)]
#[command(name = "docmark")]
#[command(about = "Convert Markdown to document edit operations, and documents back to Markdown")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile Markdown into edit operations, printed as JSON
    Compile {
        /// Markdown file, or `-` for stdin
        input: PathBuf,

        /// Config file to use instead of ~/.config/docmark/config.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Offset of the first insertion (at least 1)
        #[arg(long)]
        start_index: Option<usize>,

        /// Tab every operation targets
        #[arg(long)]
        tab_id: Option<String>,

        /// Style the first level-1 heading as the document title
        #[arg(long)]
        title: bool,

        /// Replace an existing body ending at this index
        #[arg(long, value_name = "BODY_END_INDEX")]
        replace_end: Option<usize>,

        /// Print phase-ordered batches instead of a flat operation list
        #[arg(long)]
        batches: bool,
    },
    /// Render a document model JSON file as Markdown
    Render {
        /// Document model JSON file, or `-` for stdin
        input: PathBuf,
    },
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Compile {
            input,
            config,
            start_index,
            tab_id,
            title,
            replace_end,
            batches,
        } => {
            let config = load_config(config.as_deref())?;

            // Flags override config values
            let mut options = config.compile_options();
            if let Some(start_index) = start_index {
                options.start_index = start_index;
            }
            if tab_id.is_some() {
                options.tab_id = tab_id;
            }
            if title {
                options.title_for_first_h1 = true;
            }

            let markdown = read_input(&input)?;
            let tokens = tokenize(&markdown);
            let ops = match replace_end {
                Some(body_end_index) => compile_replacement(&tokens, body_end_index, &options)?,
                None => compile(&tokens, &options)?,
            };

            let output = if batches {
                let planned = plan_batches(&ops, config.max_batch_size);
                log::info!("{}", BatchSummary::of(&planned));
                serde_json::to_string_pretty(&planned)?
            } else {
                log::info!("Compiled {} operations", ops.len());
                serde_json::to_string_pretty(&ops)?
            };
            println!("{output}");
        }
        Command::Render { input } => {
            let json = read_input(&input)?;
            let document: DocumentModel = serde_json::from_str(&json)
                .with_context(|| format!("Invalid document model in {}", input.display()))?;
            print!("{}", render(&document));
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let loaded = match path {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            Config::load_from_path(path)?
        }
        None => Config::load()?,
    };
    if loaded.is_some() {
        log::info!("Loaded config");
    }
    Ok(loaded.unwrap_or_default())
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(content);
    }
    fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}
