use commands::command_argument_builder;
use txscrape::handlers::{ScrapeArgs, handle_parse_date, handle_scrape, init_logging};
use txscrape_core::{config, print_banner};

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    init_logging(verbose);
    // .env must be loaded before any URL lookup
    config::load_dotenv();

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("scrape", primary_command)) => {
            handle_scrape(ScrapeArgs::from_matches(primary_command), quiet).await
        }
        Some(("parse-date", primary_command)) => handle_parse_date(primary_command),
        // Bare invocation behaves like `scrape` with every default
        None => handle_scrape(ScrapeArgs::default(), quiet).await,
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
