use clap::{Parser, Subcommand};
use entities_cli::{commands, logging, Result};
use entities_core::{EngineKind, ExtractorConfig};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "entities")]
#[command(about = "Fuzzy list-entity extraction")]
#[command(version)]
struct Args {
    /// Default log filter when RUST_LOG is unset (debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Similarity engine (overrides ENTITIES_ENGINE)
    #[arg(long, global = true)]
    engine: Option<EngineKind>,

    /// Portable module path (overrides ENTITIES_WASM_PATH)
    #[arg(long, global = true)]
    wasm: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract entities from text and print them as JSON
    Extract {
        /// Definition file: {"entities": [...], "patterns": [...]}
        #[arg(short, long)]
        definitions: PathBuf,

        /// Text to scan; read from stdin when omitted
        text: Option<String>,
    },
    /// Print edit distance and both similarity scores for two strings
    Similarity { a: String, b: String },
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_with_filter(&args.log_level);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = commands::resolve_config(ExtractorConfig::from_env()?, args.engine, args.wasm);

    let json = match args.command {
        Command::Extract { definitions, text } => {
            let set = commands::load_definitions(&definitions)?;
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            serde_json::to_string_pretty(&commands::extract(&set, config, &text)?)?
        }
        Command::Similarity { a, b } => {
            serde_json::to_string_pretty(&commands::similarity(&config, &a, &b)?)?
        }
    };

    println!("{}", json);
    Ok(())
}
