mod cli;
mod commands;
mod config;
mod loader;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "synthus=debug,synthus_cli=debug"
    } else {
        "synthus=info,synthus_cli=info"
    };

    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;

    match cli.command {
        Commands::Configure {
            data_dir,
            export_module,
            show,
        } => {
            commands::configure::handle(data_dir, export_module, show)?;
        }

        Commands::Bindings {
            records,
            lists,
            module,
            all_modules,
            kinds,
            exclusions,
            sequential,
            output,
        } => {
            commands::bindings::generate(
                commands::bindings::GenerateArgs {
                    records,
                    lists,
                    module,
                    all_modules,
                    kinds,
                    exclusions,
                    sequential,
                    output,
                },
                &config,
            )?;
        }

        Commands::Classify {
            domain,
            catalogs,
            names,
        } => {
            commands::classify::classify(domain, catalogs, &names, &config)?;
        }

        Commands::Match {
            domain,
            catalogs,
            names,
        } => {
            commands::classify::match_names(domain, catalogs, &names, &config)?;
        }

        Commands::Items {
            records,
            catalogs,
            exclusions,
            names,
            kind,
            json,
        } => {
            commands::classify::items(
                commands::classify::ItemsArgs {
                    records,
                    catalogs,
                    exclusions,
                    names,
                    kind,
                    json,
                },
                &config,
            )?;
        }

        Commands::Exclusions {
            file,
            target,
            subject,
            qualifier,
        } => {
            commands::exclusions::check(file, target, &subject, qualifier.as_ref(), &config)?;
        }
    }

    Ok(())
}
