use crate::CLAP_STYLING;
use clap::{arg, command};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("crmpull")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("crmpull")
        .about("Fetch company records from a Bitrix24 CRM and serve them over HTTP")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("serve")
                .about("Start the HTTP API (POST /api/fetch-companies, GET /api/status)")
                .arg(
                    arg!(--"host" <HOST>)
                        .required(false)
                        .help("Address to bind (default: HOST or 0.0.0.0)"),
                )
                .arg(
                    arg!(-p --"port" <PORT>)
                        .required(false)
                        .help("Port to listen on (default: PORT or 3000)")
                        .value_parser(clap::value_parser!(u16)),
                )
                .arg(
                    arg!(--"static-dir" <PATH>)
                        .required(false)
                        .help("Directory served at / (default: STATIC_DIR or ./public)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
        .subcommand(
            command!("fetch")
                .about("Fetch companies once and print or save them")
                .arg(
                    arg!(-w --"webhook" <URL>)
                        .required(false)
                        .help("Bitrix24 webhook URL (default: BITRIX24_WEBHOOK)"),
                )
                .arg(
                    arg!(-l --"limit" <COUNT>)
                        .required(false)
                        .help("Maximum number of companies to fetch (default: MAX_COMPANIES or 10000)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save export to file; the format's extension is added when missing (default: print to screen)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Export format: json, csv, text")
                        .value_parser(["json", "csv", "text"])
                        .default_value("json"),
                )
                .arg(
                    arg!(--"no-progress")
                        .required(false)
                        .help("Do not show the progress spinner")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(command!("status").about("Show the effective configuration"))
}
