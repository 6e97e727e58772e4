use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use refsolve_core::config_file;
use refsolve_core::{DEFAULT_TIMEOUT_SECS, Resolver, ResolverOptions};
use refsolve_render::OutputFormat;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

mod output;

use output::ColorMode;

/// Reference Metadata Fetcher - Resolve DOIs and arXiv IDs into citation formats
#[derive(Parser, Debug)]
#[command(name = "refsolve")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a reference and print it in the requested formats
    Parse {
        /// DOI, arXiv ID, or a URL containing one
        reference: String,

        /// Comma-separated list of output formats
        #[arg(short, long, value_delimiter = ',')]
        format: Vec<String>,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// HTTP timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Contact email appended to the User-Agent
        #[arg(long)]
        mailto: Option<String>,
    },

    /// List the available output formats
    Formats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Formats => {
            for format in OutputFormat::all() {
                println!("{}", format.name());
            }
            Ok(())
        }
        Command::Parse {
            reference,
            format,
            output,
            no_color,
            timeout,
            mailto,
        } => parse(reference, format, output, no_color, timeout, mailto).await,
    }
}

async fn parse(
    reference: String,
    formats: Vec<String>,
    output: Option<PathBuf>,
    no_color: bool,
    timeout: Option<u64>,
    mailto: Option<String>,
) -> anyhow::Result<()> {
    let config = config_file::load_config();

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let timeout_secs = timeout
        .or_else(|| {
            std::env::var("REFSOLVE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .or_else(|| config.http.as_ref().and_then(|h| h.timeout_secs))
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let mailto = mailto
        .or_else(|| std::env::var("REFSOLVE_MAILTO").ok())
        .or_else(|| config.http.as_ref().and_then(|h| h.mailto.clone()));

    let requested = if !formats.is_empty() {
        formats
    } else if let Some(configured) = config.output.as_ref().and_then(|o| o.formats.clone()) {
        configured
    } else {
        OutputFormat::all()
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    };

    // Validate formats before touching the network
    let mut selected = Vec::with_capacity(requested.len());
    for name in &requested {
        let Some(format) = OutputFormat::from_name(name) else {
            anyhow::bail!(
                "format {} is not defined (available: {})",
                name,
                OutputFormat::all()
                    .iter()
                    .map(|f| f.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        };
        selected.push(format);
    }

    // Determine color mode and output writer
    let use_color = !no_color && output.is_none();
    let color = ColorMode(use_color);

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    let resolver = Resolver::new(ResolverOptions {
        timeout_secs,
        mailto,
    })?;

    let resolved = tokio::select! {
        res = resolver.resolve(&reference) => res,
        _ = tokio::signal::ctrl_c() => anyhow::bail!("interrupted"),
    };
    let record = match resolved {
        Ok(record) => record,
        Err(e) => {
            output::print_failure(&mut std::io::stderr(), &reference, &e, ColorMode(!no_color))?;
            std::process::exit(1);
        }
    };

    output::print_header(&mut writer, color)?;
    for format in selected {
        let rendered = refsolve_render::render(&record, format)?;
        output::print_rendering(&mut writer, format.name(), &rendered, color)?;
    }

    Ok(())
}
