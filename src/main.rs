//! Treble CLI
//!
//! Offline front end for the treble shelf processor.

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use treble::cli::{commands, Cli, Commands};
use treble::Result;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Treble v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Treble v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{} [{}]", e, e.error_code());
        eprintln!("Error: {}", e);
        eprintln!("Hint: {}", e.recovery_hint());
        std::process::exit(1);
    }
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Render {
            input,
            output,
            params,
            block_size,
            bit_depth,
        } => commands::render_file(&input, &output, &params.resolve()?, block_size, bit_depth),
        Commands::Response {
            params,
            sample_rate,
            points,
            json,
        } => commands::print_response(&params.resolve()?, sample_rate, points, json),
        Commands::Analyze { input, json } => commands::analyze_file(&input, json),
    }
}
