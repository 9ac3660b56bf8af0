use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use crmpull::handlers::{handle_fetch, handle_serve, handle_status};
use crmpull_core::{Settings, print_banner};
use tracing_subscriber::EnvFilter;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    init_tracing();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(2);
        }
    };

    if let Err(e) = dispatch(&chosen_command, settings).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

async fn dispatch(matches: &ArgMatches, settings: Settings) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("serve", args)) => handle_serve(args, settings).await,
        Some(("fetch", args)) => handle_fetch(args, settings).await,
        Some(("status", _)) => {
            handle_status(&settings);
            Ok(())
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
