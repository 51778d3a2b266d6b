use clap::{Parser, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;
use pagex::{cli::extract_methods, config::Config};
use std::path::PathBuf;
use std::time::Duration;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// pagex: page through API list endpoints and append every record to <method>.jsonl
#[derive(Parser)]
#[command(name = "pagex", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source API_URL and API_KEY from
    #[arg(short, long, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long)]
    debug: bool,

    /// Folder to write <method>.jsonl files to [env: DATA_FOLDER] [default: data]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Records to request per page [env: PAGE_LIMIT] [default: 100]
    #[arg(short, long)]
    limit: Option<u32>,

    /// Give up on a request after this many rate-limit retries [default: unbounded]
    #[arg(long)]
    max_retries: Option<u32>,

    /// Never wait longer than this many seconds between rate-limit retries
    #[arg(long)]
    max_wait: Option<u64>,

    /// API methods to extract, in order
    methods: Vec<String>,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        if let Some(output) = &self.output {
            config.data_folder = output.clone();
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if let Some(max_retries) = self.max_retries {
            config.retry = config.retry.with_max_retries(max_retries);
        }
        if let Some(max_wait) = self.max_wait {
            config.retry = config.retry.with_max_wait(Duration::from_secs(max_wait));
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dotenv = dotenvy::from_filename(&cli.env);

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => log::debug!("No dotenv file at {}", cli.env),
        Err(e) => return Err(e.into()),
    }

    if cli.methods.is_empty() {
        log::error!("Usage: {} <METHOD>...", "pagex".green());
        return Ok(());
    }

    let config = cli.config()?;
    log::debug!("{:?}", config);

    extract_methods(&config, &cli.methods).await?;

    Ok(())
}
