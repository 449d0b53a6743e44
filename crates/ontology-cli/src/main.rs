mod cmd;
mod config;
mod output;

use clap::{Parser, Subcommand};
use cmd::Selection;
use ontology_core::config::CollisionPolicy;
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ontology",
    about = "Compile ontology actions into OpenAPI documents, AI tool specs, and client code",
    version,
    propagate_version = true
)]
struct Cli {
    /// Compiler config (default: nearest .ontology/compiler.yaml)
    #[arg(long, global = true, env = "ONTOLOGY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the identifier collision policy: overwrite, suffix, or reject
    #[arg(long, global = true)]
    collisions: Option<CollisionPolicy>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default compiler config
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Compile an OpenAPI 3.0 document
    Openapi {
        /// Ontology document (.json, .yaml, .yml)
        file: PathBuf,
        #[command(flatten)]
        selection: Selection,
        /// json or yaml (default: from --out extension, else json)
        #[arg(long)]
        format: Option<String>,
        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Compile AI agent tool descriptors
    Tools {
        file: PathBuf,
        /// openai, langchain, claude, mcp, or universal
        #[arg(long, short = 'd', default_value = "openai")]
        dialect: String,
        #[command(flatten)]
        selection: Selection,
        /// json or yaml (default: from --out extension, else json)
        #[arg(long)]
        format: Option<String>,
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Generate client source for the tool descriptors
    Codegen {
        file: PathBuf,
        /// python (LangChain) or typescript (OpenAI)
        #[arg(long, short = 't')]
        target: String,
        #[command(flatten)]
        selection: Selection,
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Report naming collisions, empty names, and governance loss
    Check { file: PathBuf },

    /// List supported tool dialects
    Dialects,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    let load_config = || config::load(cli.config.as_deref(), cli.collisions);

    let result = match cli.command {
        Commands::Init { force } => cmd::init::run(cli.config.as_deref(), force),
        Commands::Openapi {
            file,
            selection,
            format,
            out,
        } => load_config().and_then(|config| {
            cmd::openapi::run(
                &config,
                &file,
                &selection,
                format.as_deref(),
                out.as_deref(),
                cli.json,
            )
        }),
        Commands::Tools {
            file,
            dialect,
            selection,
            format,
            out,
        } => load_config().and_then(|config| {
            cmd::tools::run(
                &config,
                &file,
                &dialect,
                &selection,
                format.as_deref(),
                out.as_deref(),
                cli.json,
            )
        }),
        Commands::Codegen {
            file,
            target,
            selection,
            out,
        } => load_config().and_then(|config| {
            cmd::codegen::run(&config, &file, &target, &selection, out.as_deref())
        }),
        Commands::Check { file } => {
            load_config().and_then(|config| cmd::check::run(&config, &file, cli.json))
        }
        Commands::Dialects => cmd::dialects::run(cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
