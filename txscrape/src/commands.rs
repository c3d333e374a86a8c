use crate::CLAP_STYLING;
use clap::{arg, command};
use txscrape_core::config::DEFAULT_OUTPUT_PATH;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("txscrape")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("txscrape")
        .styles(CLAP_STYLING)
        .about("Scrape a blockchain explorer's transaction history into JSON")
        .arg(
            arg!(-q --"quiet" "Suppress banner and progress output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log every lookup and row")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("scrape")
                .about(
                    "Open the explorer page, read the metadata panel and transaction table, and \
                write the table to a JSON file. This is the default command.",
                )
                .arg(
                    arg!(--"from" <DATE>)
                        .required(false)
                        .help("Start of the date range, e.g. '05 Mar 23, 2:30 pm' (prompted if omitted)"),
                )
                .arg(
                    arg!(--"to" <DATE>)
                        .required(false)
                        .help("End of the date range (prompted if omitted)"),
                )
                .arg(
                    arg!(-s --"source" <SOURCE>)
                        .required(false)
                        .help("Where to load the page from (default: webdriver, or file with --html-file)")
                        .value_parser(["webdriver", "http", "file"]),
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("Explorer page to scrape (default: the 'url' environment variable)"),
                )
                .arg(
                    arg!(--"html-file" <PATH>)
                        .required(false)
                        .help("Scrape a page saved to disk instead of a live one")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"webdriver" <URL>)
                        .required(false)
                        .help("WebDriver server (default: WEBDRIVER_URL or http://localhost:9515)"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("File the table is written to, replacing any previous content")
                        .default_value(DEFAULT_OUTPUT_PATH),
                )
                .arg(
                    arg!(--"metadata-output" <PATH>)
                        .required(false)
                        .help("Also write the metadata panel to this file"),
                )
                .arg(
                    arg!(--"selectors" <PATH>)
                        .required(false)
                        .help("JSON file overriding the page selectors")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("HTTP request timeout in seconds (http source only)")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("30"),
                ),
        )
        .subcommand(
            command!("parse-date")
                .about("Parse an explorer timestamp and print it")
                .arg(arg!(<TEXT>).required(true).help("e.g. '31 Dec 23, 11:59 pm'")),
        )
}
