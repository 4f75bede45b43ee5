use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_channel_extractor::cli::{Cli, Commands};
use yt_channel_extractor::config::Config;
use yt_channel_extractor::pipeline::{ExtractionPipeline, PipelineOptions};
use yt_channel_extractor::utils::format_duration;
use yt_channel_extractor::youtube::ChannelSelector;
use yt_channel_extractor::ExtractorError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = cli.log_filter();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let show_progress = !cli.quiet;

    match cli.command {
        Commands::Channel {
            target,
            api_key,
            output_format,
            transcript_format,
            output_dir,
            max_videos,
            with_transcripts,
        } => {
            let selector = ChannelSelector::from_options(target.channel_id, target.username)?;
            let api_key = api_key
                .or_else(|| config.api.api_key.clone())
                .ok_or(ExtractorError::MissingApiKey)?;

            let options = PipelineOptions {
                output_dir: output_dir.unwrap_or_else(|| config.output.output_dir.clone()),
                data_format: output_format.unwrap_or(config.output.data_format),
                transcript_format: transcript_format.unwrap_or(config.output.transcript_format),
                max_videos: max_videos.unwrap_or(config.output.max_videos),
                with_transcripts,
                show_progress,
            };

            let started = Instant::now();
            let pipeline = ExtractionPipeline::from_config(&config, Some(api_key), options)?;

            tracing::info!("Starting channel export for {:?}", selector);
            let report = pipeline.extract_channel(&selector).await?;

            println!("All data saved to {}", report.channel_dir.display());
            println!("Finished in {}", format_duration(started.elapsed().as_secs_f64()));
        }
        Commands::Video {
            url,
            api_key,
            transcript_format,
            output_dir,
        } => {
            let options = PipelineOptions {
                output_dir: output_dir.unwrap_or_else(|| config.output.output_dir.clone()),
                data_format: config.output.data_format,
                transcript_format: transcript_format.unwrap_or(config.output.transcript_format),
                max_videos: config.output.max_videos,
                with_transcripts: true,
                show_progress,
            };

            let api_key = api_key.or_else(|| config.api.api_key.clone());
            let pipeline = ExtractionPipeline::from_config(&config, api_key, options)?;

            tracing::info!("Starting transcript extraction for URL: {}", url);
            if let Some(path) = pipeline.extract_video(&url).await? {
                println!("Transcript saved to {}", path.display());
            }
        }
        Commands::Config { show, init } => {
            if init {
                let path = Config::default().save()?;
                println!("Default configuration written to {}", path.display());
            } else if show {
                config.display();
            } else {
                println!("Configuration file: {}", Config::config_path()?.display());
                println!("Use --show to print it or --init to write the defaults");
            }
        }
    }

    Ok(())
}
