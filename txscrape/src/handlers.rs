use anyhow::{Context, anyhow};
use chrono::NaiveDateTime;
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use txscrape_core::config::{self, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_OUTPUT_PATH, PageSource};
use txscrape_core::dates::{DateRange, parse_datetime};
use txscrape_core::scrape::{ScrapeOptions, ScrapeProgressCallback, execute_scrape};
use txscrape_scanner::WaitBounds;

/// Arguments of the `scrape` command
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeArgs {
    pub from: Option<String>,
    pub to: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub html_file: Option<PathBuf>,
    pub webdriver: Option<String>,
    pub output: String,
    pub metadata_output: Option<String>,
    pub selectors: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for ScrapeArgs {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            source: None,
            url: None,
            html_file: None,
            webdriver: None,
            output: DEFAULT_OUTPUT_PATH.to_string(),
            metadata_output: None,
            selectors: None,
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl ScrapeArgs {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let defaults = Self::default();
        Self {
            from: matches.get_one::<String>("from").cloned(),
            to: matches.get_one::<String>("to").cloned(),
            source: matches.get_one::<String>("source").cloned(),
            url: matches.get_one::<String>("url").cloned(),
            html_file: matches.get_one::<PathBuf>("html-file").cloned(),
            webdriver: matches.get_one::<String>("webdriver").cloned(),
            output: matches
                .get_one::<String>("output")
                .cloned()
                .unwrap_or(defaults.output),
            metadata_output: matches.get_one::<String>("metadata-output").cloned(),
            selectors: matches.get_one::<PathBuf>("selectors").cloned(),
            timeout_secs: matches
                .get_one::<u64>("timeout")
                .copied()
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

/// Print `label` and read one line from `input`, without the line ending.
pub fn prompt_line<R: BufRead, W: Write>(
    label: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<String> {
    write!(output, "{} ", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("no input for '{}'", label),
        ));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Use the preset value if there is one, otherwise prompt for it.
pub fn read_date<R: BufRead, W: Write>(
    label: &str,
    preset: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<NaiveDateTime> {
    let text = match preset {
        Some(text) => text.to_string(),
        None => prompt_line(label, input, output)?,
    };
    parse_datetime(&text).with_context(|| format!("Invalid '{}' date", label.trim_end_matches(':')))
}

/// Read both ends of the range. Fails on the first unparseable date.
pub fn read_date_range<R: BufRead, W: Write>(
    args: &ScrapeArgs,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<DateRange> {
    let from = read_date("from:", args.from.as_deref(), input, output)?;
    let to = read_date("to:", args.to.as_deref(), input, output)?;
    Ok(DateRange::new(from, to))
}

/// Resolve where the page is loaded from.
pub fn build_page_source(args: &ScrapeArgs) -> anyhow::Result<PageSource> {
    let kind = match (args.source.as_deref(), &args.html_file) {
        (Some(kind), _) => kind,
        (None, Some(_)) => "file",
        (None, None) => "webdriver",
    };

    match kind {
        "file" => {
            let path = args
                .html_file
                .clone()
                .ok_or_else(|| anyhow!("--source file requires --html-file"))?;
            Ok(PageSource::File(path))
        }
        "http" => Ok(PageSource::Http {
            target: config::target_url(args.url.as_deref())?,
            timeout_secs: args.timeout_secs,
        }),
        "webdriver" => Ok(PageSource::WebDriver {
            server: config::webdriver_url(args.webdriver.as_deref())?,
            target: config::target_url(args.url.as_deref())?,
        }),
        other => Err(anyhow!("Unknown page source '{}'", other)),
    }
}

pub fn build_scrape_options(args: &ScrapeArgs, range: DateRange) -> anyhow::Result<ScrapeOptions> {
    let selectors = config::load_selectors(args.selectors.as_deref())?;
    Ok(ScrapeOptions {
        source: build_page_source(args)?,
        range,
        output_path: config::expand_path(&args.output),
        metadata_output: args.metadata_output.as_deref().map(config::expand_path),
        selectors,
        waits: WaitBounds::default(),
    })
}

pub fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn fail(e: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "✗".red().bold(), e);
    std::process::exit(1);
}

pub async fn handle_scrape(args: ScrapeArgs, quiet: bool) {
    // Dates first: a bad date must not cost a browser session
    let stdin = io::stdin();
    let range = match read_date_range(&args, &mut stdin.lock(), &mut io::stdout()) {
        Ok(range) => range,
        Err(e) => fail(e),
    };

    let options = match build_scrape_options(&args, range) {
        Ok(options) => options,
        Err(e) => fail(e),
    };
    let output_path = options.output_path.clone();

    let spinner = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting scrape...");
        Some(pb)
    };

    let progress_callback: Option<ScrapeProgressCallback> = spinner.clone().map(|pb| {
        Arc::new(move |msg: String| pb.set_message(msg)) as ScrapeProgressCallback
    });

    match execute_scrape(options, progress_callback).await {
        Ok(output) => {
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            if !quiet {
                println!(
                    "{} {} metadata entries, {} rows written to {}",
                    "✓".green().bold(),
                    output.metadata.len().to_string().cyan(),
                    output.table.len().to_string().cyan(),
                    output_path.display().to_string().bright_white()
                );
            }
        }
        Err(e) => {
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            fail(e.into());
        }
    }
}

pub fn handle_parse_date(args: &ArgMatches) {
    let text = args
        .get_one::<String>("TEXT")
        .map(String::as_str)
        .unwrap_or_default();
    match parse_datetime(text) {
        Ok(parsed) => println!("{}", parsed.format("%Y-%m-%d %H:%M")),
        Err(e) => fail(e.into()),
    }
}
