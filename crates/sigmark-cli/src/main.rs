//! Sigmark CLI - significance bracket annotations from the command line.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::annotate::AnnotateOptions;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Annotate {
            file,
            fields,
            compare,
            all_pairs,
            config,
            paired,
            test,
            adjust,
            label_format,
            y_offset,
            parallel,
            format,
            output,
        } => commands::annotate::run(
            file,
            fields,
            compare,
            all_pairs,
            AnnotateOptions {
                config,
                paired,
                test,
                adjust,
                label_format,
                y_offset,
                parallel,
            },
            format,
            output,
            cli.verbose,
        ),

        Commands::Groups { file, fields, json } => {
            commands::groups::run(file, fields, json, cli.verbose)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
