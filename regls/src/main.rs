use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod format;

/// regls - Container Registry Inventory
///
/// Lists the repositories of a Docker Distribution v2 registry together with
/// their newest tags, architectures and creation times.
#[derive(Parser, Debug)]
#[command(name = "regls")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control colored output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    color: String,

    /// Path to a YAML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Display version information
    Version,
    /// List repositories with their newest tags
    #[command(visible_alias = "ls")]
    List(commands::list::ListArgs),
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Exit status used when the run is interrupted with Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

fn main() {
    let cli = Cli::parse();
    let verbosity = context::VerbosityLevel::from_count(cli.verbose);
    let color = format::ColorChoice::from(cli.color.as_str());

    init_tracing(verbosity);

    match cli.command {
        Commands::Version => {
            commands::version::print_version();
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        }
        Commands::List(args) => {
            // Build context with precedence: defaults > config file > env vars > CLI flags
            let ctx = match context::AppContext::build(color, verbosity, cli.config.as_deref()) {
                Ok(ctx) => ctx,
                Err(e) => {
                    format::create_formatter(color).error(&e.to_string());
                    std::process::exit(1);
                }
            };

            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    ctx.formatter()
                        .error(&format!("Failed to start async runtime: {}", e));
                    std::process::exit(1);
                }
            };

            runtime.block_on(async {
                tokio::select! {
                    _ = commands::list::handlers::handle_list(&ctx, &args) => {}
                    Ok(()) = tokio::signal::ctrl_c() => {
                        ctx.formatter().error("Interrupted");
                        std::process::exit(EXIT_INTERRUPTED);
                    }
                }
            });
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` takes precedence over the `-v` count. Lines are written around
/// the spinner while one is shown.
fn init_tracing(verbosity: context::VerbosityLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(format::log::LogWriter)
        .with_target(false)
        .init();
}
