use clap::{Parser, Subcommand};
use rvariant::{
    logger::{self, LogLevel, LoggerConfig},
    CancellationToken, Direction, GenerateVariantsRequest, ImagePayload, OptionCatalog,
    SchedulingStrategy, VariantConfig, VariantError, VariantOrchestrator,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rvariant", version, about = "Generate image variants from one source image")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog options grouped by direction
    Options {
        #[arg(long)]
        direction: Option<String>,
    },
    /// Describe an image and suggest directions
    Analyze { image: PathBuf },
    /// Generate variants of an image
    Generate {
        image: PathBuf,
        /// Option id, repeatable
        #[arg(short = 'o', long = "option", required = true)]
        options: Vec<String>,
        #[arg(short = 'n', long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        aspect_ratio: Option<String>,
        #[arg(long, default_value = "variants")]
        out: PathBuf,
        #[arg(long)]
        strategy: Option<String>,
        #[arg(long)]
        concurrency: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = LogLevel::parse(&cli.log_level).unwrap_or(LogLevel::Info);
    let logger_config = if cli.json_logs {
        LoggerConfig::production().with_level(level)
    } else {
        LoggerConfig::development().with_level(level)
    };
    logger::init_with_config(logger_config)?;

    match dotenv::dotenv() {
        Ok(_) => log::debug!("✅ .env file loaded"),
        Err(_) => log::debug!("No .env file found, using system environment variables"),
    }

    match cli.command {
        Command::Options { direction } => print_options(direction.as_deref()),
        Command::Analyze { image } => {
            let config = VariantConfig::from_env();
            logger::log_config_info(&config);
            let orchestrator = VariantOrchestrator::from_config(config).await?;
            let analysis = orchestrator.analyze(&read_image(&image)?).await;
            println!("{}", serde_json::to_string_pretty(&analysis)?);
            Ok(())
        }
        Command::Generate {
            image,
            options,
            quantity,
            aspect_ratio,
            out,
            strategy,
            concurrency,
        } => {
            let mut config = VariantConfig::from_env();
            if let Some(raw) = strategy {
                let parsed = SchedulingStrategy::parse(&raw).ok_or_else(|| {
                    VariantError::ConfigError(format!("unknown strategy: {}", raw))
                })?;
                config = config.with_strategy(parsed);
            }
            if let Some(n) = concurrency {
                config = config.with_concurrency(n);
            }
            logger::log_config_info(&config);

            let orchestrator = VariantOrchestrator::from_config(config).await?;
            let mut request = GenerateVariantsRequest::new(read_image(&image)?)
                .with_options(options)
                .with_quantity(quantity);
            if let Some(ratio) = aspect_ratio {
                request = request.with_aspect_ratio(ratio);
            }

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::warn!("⚠️  Interrupted, cancelling remaining variants");
                    on_interrupt.cancel();
                }
            });

            let report = orchestrator.generate_variants_with(&request, &cancel).await?;

            std::fs::create_dir_all(&out)?;
            for result in &report.results {
                let path = out.join(format!("{}.{}", result.id, result.image.extension()));
                std::fs::write(&path, &result.image.data)?;
                println!("{}  {}  {}", result.option_id, result.option_label, path.display());
            }
            for failure in &report.failures {
                println!(
                    "{}#{}  failed ({:?}): {}",
                    failure.option_id, failure.repeat_index, failure.kind, failure.reason
                );
            }
            println!("{}/{} variant(s) written to {}", report.results.len(), report.requested, out.display());
            Ok(())
        }
    }
}

fn read_image(path: &Path) -> Result<ImagePayload, Box<dyn std::error::Error>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let mime = ImagePayload::mime_for_extension(ext).ok_or_else(|| {
        VariantError::RequestError(format!("unsupported image type: {}", path.display()))
    })?;
    Ok(ImagePayload::new(mime, std::fs::read(path)?))
}

fn print_options(direction: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = OptionCatalog::shared();
    let directions: Vec<Direction> = match direction {
        Some(raw) => vec![Direction::parse(raw).ok_or_else(|| {
            VariantError::RequestError(format!("unknown direction: {}", raw))
        })?],
        None => Direction::ALL.to_vec(),
    };

    for direction in directions {
        let options = catalog.options_for_direction(direction);
        if options.is_empty() {
            continue;
        }
        let meta = catalog.direction_metadata(direction.as_str());
        println!("{} {} ({}) - {}", meta.icon, meta.label, direction, meta.description);
        for option in options {
            println!("   {} {:<20} {}", option.icon, option.id, option.description);
        }
    }
    Ok(())
}
