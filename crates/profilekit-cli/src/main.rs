//! Profilekit CLI - typed CRUD for Kasten K10 location profiles

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;
mod error;
mod exit_codes;
mod session;
mod util;

use commands::ClientOptions;
use display::OutputFormat;
use error::{CliError, Result};

#[derive(Parser)]
#[command(name = "profilekit")]
#[command(author = "Profilekit Contributors")]
#[command(version)]
#[command(about = "Typed CRUD for Kasten K10 location profiles", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Target namespace
    #[arg(
        short,
        long,
        global = true,
        env = "PROFILEKIT_NAMESPACE",
        default_value = "kasten-io"
    )]
    namespace: String,

    /// Path to the kubeconfig file (default: KUBECONFIG, ~/.kube/config, in-cluster)
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long, global = true)]
    context: Option<String>,

    /// Per-call timeout in seconds (0 disables it)
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one profile
    Get {
        /// Profile name
        name: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// List profiles in the namespace
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Create a profile from a YAML or JSON document
    Create {
        /// Document to create ('-' reads stdin)
        #[arg(short = 'f', long = "filename")]
        filename: PathBuf,

        /// Print the created profile instead of a status line
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Replace a profile with a YAML or JSON document
    Update {
        /// Document to apply ('-' reads stdin)
        #[arg(short = 'f', long = "filename")]
        filename: PathBuf,

        /// Retry this many times when another writer gets in first
        #[arg(long, default_value_t = 0)]
        conflict_retries: u32,

        /// Print the updated profile instead of a status line
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Apply a partial document to a profile
    Patch {
        /// Profile name
        name: String,

        /// Patch body as JSON
        #[arg(short, long, conflicts_with = "patch_file", required_unless_present = "patch_file")]
        patch: Option<String>,

        /// File holding the patch body ('-' reads stdin)
        #[arg(long)]
        patch_file: Option<PathBuf>,

        /// Patch strategy: merge or strategic
        #[arg(long = "type", default_value = "merge")]
        patch_type: String,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::internal(format!("failed to start async runtime: {}", e)))?;

    let mut options = ClientOptions {
        kubeconfig: cli.kubeconfig,
        context: cli.context,
        timeout_secs: cli.timeout,
        conflict_retries: 0,
    };
    let namespace = cli.namespace;

    runtime.block_on(async {
        match cli.command {
            Commands::Get { name, output } => {
                commands::get::run(&options, &namespace, &name, output).await
            }

            Commands::List { output } => commands::list::run(&options, &namespace, output).await,

            Commands::Create { filename, output } => {
                commands::create::run(&options, &namespace, &filename, output).await
            }

            Commands::Update {
                filename,
                conflict_retries,
                output,
            } => {
                options.conflict_retries = conflict_retries;
                commands::update::run(&options, &namespace, &filename, output).await
            }

            Commands::Patch {
                name,
                patch,
                patch_file,
                patch_type,
            } => {
                commands::patch::run(
                    &options,
                    &namespace,
                    &name,
                    patch.as_deref(),
                    patch_file.as_deref(),
                    &patch_type,
                )
                .await
            }

            Commands::Delete { name } => commands::delete::run(&options, &namespace, &name).await,
        }
    })
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let code = match run(cli) {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };

    std::process::exit(code);
}
