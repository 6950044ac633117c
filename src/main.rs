use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use postbake::build::{build_site, publish, render_single};
use postbake::config::{Config, PROJECT_FILE};
use postbake::generate::{CommandGenerator, ReaderGenerator};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Turns plain-text blog posts into HTML pages and an index.
#[derive(Parser)]
#[command(name = "postbake", version, about)]
struct Cli {
    /// Path to the project file. By default `postbake.yaml` is searched for
    /// in the working directory and its parents.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the post sources (overrides the project file).
    #[arg(long, global = true)]
    posts: Option<PathBuf>,

    /// Directory to write HTML pages into (overrides the project file).
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Log debug output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every post and the index page.
    Build,

    /// Render a single post, e.g. `hello-world.md`.
    Render { name: String },

    /// Save a generated post read from a file (or stdin), then render it and
    /// the index page.
    Import {
        /// The generated post text; stdin if omitted.
        file: Option<PathBuf>,
    },

    /// Run the configured generator command to produce a new post, then
    /// render it and the index page.
    Generate,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_project_file(path)?,
        None => {
            let cwd = std::env::current_dir()?;
            match Config::from_directory(&cwd)? {
                Some(config) => config,
                None => Config::with_defaults(&cwd),
            }
        }
    };
    if let Some(posts) = &cli.posts {
        config.posts_directory = posts.clone();
    }
    if let Some(output) = &cli.output {
        config.output_directory = output.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Command::Build => {
            let posts = build_site(&config)?;
            println!(
                "Rendered {} posts into {}",
                posts.len(),
                config.output_directory.display()
            );
        }
        Command::Render { name } => {
            let post = render_single(&config, &name)?;
            println!("Rendered {}.html", post.id);
        }
        Command::Import { file } => {
            let post = match file {
                Some(path) => publish(&config, &ReaderGenerator::new(BufReader::new(File::open(path)?)))?,
                None => publish(&config, &ReaderGenerator::new(std::io::stdin()))?,
            };
            println!("Published {} ({})", post.title, post.id);
        }
        Command::Generate => {
            let command = match &config.generator {
                Some(generator) => &generator.command,
                None => return Err(anyhow!("No `generator` configured in {}", PROJECT_FILE)),
            };
            let post = publish(&config, &CommandGenerator::from_command(command)?)?;
            println!("Published {} ({})", post.title, post.id);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // --verbose forces debug output, otherwise RUST_LOG or warnings only
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
