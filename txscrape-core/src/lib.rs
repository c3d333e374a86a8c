use colored::Colorize;

pub mod config;
pub mod dates;
pub mod error;
pub mod output;
pub mod scrape;

pub use error::ScrapeError;

pub fn print_banner() {
    let banner = r#"
  _
 | |___  _____  ___ _ __ __ _ _ __   ___
 | __\ \/ / __|/ __| '__/ _` | '_ \ / _ \
 | |_ >  <\__ \ (__| | | (_| | |_) |  __/
  \__/_/\_\___/\___|_|  \__,_| .__/ \___|
                             |_|         "#;
    println!("{}", banner.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "explorer transaction scraper".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}
