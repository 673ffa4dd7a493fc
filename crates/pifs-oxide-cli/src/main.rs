use clap::Parser;
use pifs_oxide_cli::{Args, Subcommands};

fn main() {
    let Args {
        subcommand,
        globals,
    } = Args::parse();

    let filter = if globals.verbose {
        tracing::level_filters::LevelFilter::DEBUG
    } else {
        tracing::level_filters::LevelFilter::INFO
    };
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(filter.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let result = match subcommand {
        Subcommands::Compress(args) => pifs_oxide_cli::compress::handle_compress(args),
        Subcommands::Decompress(args) => pifs_oxide_cli::decompress::handle_decompress(args),
        Subcommands::Info(args) => pifs_oxide_cli::info::handle_info(args),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(e.exit_code());
    }
}
