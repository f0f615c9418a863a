// ABOUTME: CLI binary for the Page Alchemy converter.
// ABOUTME: Reads a page from a URL, a file or stdin, converts it and saves or prints the result.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use page_alchemy::{
    decode_html_bytes, read_html_file, ConversionStatus, ConvertError, Converter, Fetcher,
    PageType, DOWNLOAD_FILE_NAME,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "alchemy")]
#[command(about = "Convert page-builder HTML into a clean standalone page")]
struct Args {
    /// URL of the page to convert
    #[arg()]
    url: Option<String>,

    /// HTML file to convert ("-" reads stdin)
    #[arg(long = "file")]
    file: Option<PathBuf>,

    /// Page type: auto (default), elementor, ghl, generic
    #[arg(short = 't', long = "type", default_value = "auto")]
    page_type: String,

    /// Output file path (default: converted-page.html)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print the converted page to stdout instead of writing a file
    #[arg(long = "stdout")]
    stdout: bool,

    /// Print the conversion status as JSON
    #[arg(long = "json")]
    json_output: bool,

    /// JSON file with profile overrides
    #[arg(long = "profiles")]
    profiles: Option<PathBuf>,

    /// Relay URL template tried after a direct fetch fails; {url} receives the target
    #[arg(long = "relay")]
    relays: Vec<String>,

    /// Per-endpoint fetch timeout in seconds
    #[arg(long = "timeout", default_value_t = 30)]
    timeout: u64,

    /// Allow fetching from private/local networks
    #[arg(long = "allow-private-networks")]
    allow_private_networks: bool,

    /// Log pipeline decisions to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// `None` means detect the type from the input.
fn parse_page_type(value: &str) -> Result<Option<PageType>, String> {
    if value.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    value.parse::<PageType>().map(Some)
}

fn build_converter(profiles: Option<&Path>) -> Result<Converter, String> {
    let builder = Converter::builder();
    let Some(path) = profiles else {
        return Ok(builder.build());
    };
    let json = fs::read_to_string(path)
        .map_err(|e| format!("error reading profiles {:?}: {}", path, e))?;
    builder
        .profiles_from_json(&json)
        .map(|b| b.build())
        .map_err(|e| format!("error loading profiles {:?}: {}", path, e))
}

fn read_stdin(max_bytes: usize) -> Result<String, ConvertError> {
    let mut bytes = Vec::new();
    io::stdin()
        .take(max_bytes as u64 + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| ConvertError::read("-", "Read", Some(anyhow::anyhow!("{}", e))))?;
    if bytes.len() > max_bytes {
        return Err(ConvertError::read(
            "-",
            "Read",
            Some(anyhow::anyhow!("input exceeds {} bytes", max_bytes)),
        ));
    }
    Ok(decode_html_bytes(&bytes, None))
}

async fn load_input(args: &Args, max_bytes: usize) -> Result<String, ConvertError> {
    if let Some(path) = &args.file {
        if path.as_os_str() == "-" {
            return read_stdin(max_bytes);
        }
        return read_html_file(path, max_bytes);
    }

    let url = args.url.as_deref().unwrap_or_default();
    let mut builder = Fetcher::builder()
        .timeout(Duration::from_secs(args.timeout))
        .allow_private_networks(args.allow_private_networks);
    for relay in &args.relays {
        builder = builder.relay(relay.as_str());
    }
    builder.build()?.fetch_html(url).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Validate args
    if args.url.is_some() == args.file.is_some() {
        eprintln!("error: provide exactly one of a URL or --file");
        return ExitCode::from(1);
    }
    if args.stdout && args.output.is_some() {
        eprintln!("error: cannot use both --stdout and --output");
        return ExitCode::from(1);
    }

    let forced_type = match parse_page_type(&args.page_type) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    let converter = match build_converter(args.profiles.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    let mut status = ConversionStatus::default();
    status.begin();
    let outcome = load_input(&args, converter.options().max_input_bytes)
        .await
        .and_then(|raw| match forced_type {
            Some(page_type) => converter.convert_as(&raw, page_type),
            None => converter.convert(&raw),
        });
    status.finish(outcome);

    if args.json_output {
        match serde_json::to_string_pretty(&status) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::from(1);
            }
        }
        return match status {
            ConversionStatus::Success { .. } => ExitCode::SUCCESS,
            _ => ExitCode::from(1),
        };
    }

    let document = match status {
        ConversionStatus::Success { document } => document,
        ConversionStatus::Error { message } => {
            eprintln!("error: {}", message);
            return ExitCode::from(1);
        }
        _ => return ExitCode::from(1),
    };

    if args.stdout {
        let mut out = io::stdout().lock();
        if let Err(e) = out.write_all(document.as_str().as_bytes()) {
            eprintln!("error writing to stdout: {}", e);
            return ExitCode::from(1);
        }
        return ExitCode::SUCCESS;
    }

    let target = args
        .output
        .unwrap_or_else(|| PathBuf::from(DOWNLOAD_FILE_NAME));
    match document.save(&target) {
        Ok(written) => {
            eprintln!("saved {} page to {}", document.page_type, written.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error writing to {:?}: {}", target, e);
            ExitCode::from(1)
        }
    }
}
