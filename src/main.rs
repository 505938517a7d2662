use anyhow::Result;
use clap::Parser;
use pagefetch::commands::{self, DEFAULT_PREVIEW_CHARS, DEFAULT_URL, RequestCommand};
use pagefetch::retry::{DEFAULT_BACKOFF_BASE, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS};

/// pagefetch - fetch web pages and run HTTP requests with retries
///
/// Without a subcommand, fetches https://bbc.com and prints the first 500
/// characters of the page.
///
/// Set RUST_LOG (e.g. RUST_LOG=debug) to see each attempt.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Fetch a page once (no retries) and print the start of it
    Fetch(FetchArgs),

    /// Send a request, retrying with exponential backoff on failure
    Request(RequestArgs),
}

#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    /// URL of the page to fetch
    #[arg(value_name = "URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Number of characters to print
    #[arg(long, default_value_t = DEFAULT_PREVIEW_CHARS)]
    pub chars: usize,
}

#[derive(clap::Args, Debug)]
pub struct RequestArgs {
    /// Target URL
    #[arg(value_name = "URL")]
    pub url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Request header, repeatable
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    pub headers: Vec<String>,

    /// JSON payload
    #[arg(long, value_name = "JSON")]
    pub json: Option<String>,

    /// Total number of attempts, including the first
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Per-attempt timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS as f64)]
    pub timeout: f64,

    /// Base of the exponential backoff between attempts
    #[arg(long, default_value_t = DEFAULT_BACKOFF_BASE)]
    pub backoff_base: f64,
}

impl From<RequestArgs> for RequestCommand {
    fn from(args: RequestArgs) -> Self {
        RequestCommand {
            method: args.method,
            url: args.url,
            headers: args.headers,
            json: args.json,
            max_attempts: args.max_attempts,
            timeout_secs: args.timeout,
            backoff_base: args.backoff_base,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        None => commands::fetch(DEFAULT_URL, DEFAULT_PREVIEW_CHARS)?,
        Some(Commands::Fetch(args)) => commands::fetch(&args.url, args.chars)?,
        Some(Commands::Request(args)) => commands::request(args.into())?,
    }
    Ok(())
}
