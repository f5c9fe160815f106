use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use pipeline_tutorials::{
    config::{Config, PipelineKind},
    gst_utils,
    pipeline::{self, Pipeline, RunOutcome},
    tutorials::{DecodePipeline, EffectPipeline},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "PIPELINE_TUTORIALS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Check the elements the selected pipeline needs and exit
    #[arg(long)]
    check_plugins: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Test pattern through a video effect: videotestsrc ! vertigotv ! videoconvert ! autovideosink
    Effect {
        /// Test pattern of the source (e.g. smpte, ball, snow)
        #[arg(long)]
        pattern: Option<String>,

        /// Stop after this many frames
        #[arg(long)]
        num_buffers: Option<i32>,
    },
    /// Decode a URI and link its raw audio and video streams as they appear
    Decode {
        /// URI to play
        #[arg(long)]
        uri: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;

    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.app.log_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting {} v{}", config.app.name, env!("CARGO_PKG_VERSION"));

    gst_utils::initialize()?;

    match &args.command {
        Command::Effect { pattern, num_buffers } => {
            if let Some(pattern) = pattern {
                config.effect.pattern = Some(pattern.clone());
            }
            if num_buffers.is_some() {
                config.effect.num_buffers = *num_buffers;
            }
        }
        Command::Decode { uri } => {
            if let Some(uri) = uri {
                config.decode.uri = uri.clone();
            }
        }
    }
    let kind = match args.command {
        Command::Effect { .. } => PipelineKind::Effect,
        Command::Decode { .. } => PipelineKind::Decode,
    };
    config.validate(kind).map_err(anyhow::Error::msg)?;

    if args.check_plugins {
        let factories: Vec<&str> = match args.command {
            Command::Effect { .. } => config.effect.factories().iter().map(|(f, _)| *f).collect(),
            Command::Decode { .. } => config.decode.factories().iter().map(|(f, _)| *f).collect(),
        };
        let capabilities = gst_utils::discover_plugins(&factories);
        gst_utils::print_plugin_info("GStreamer Element Report", &capabilities);
        return Ok(if capabilities.missing().is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let built: pipeline_tutorials::Result<Pipeline> = match args.command {
        Command::Effect { .. } => EffectPipeline::build(&config.effect).map(EffectPipeline::into_pipeline),
        Command::Decode { .. } => DecodePipeline::build(&config.decode).map(DecodePipeline::into_pipeline),
    };

    let pipeline = match built {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    match pipeline::run(pipeline) {
        Ok(RunOutcome::Eos) => {
            println!("End-Of-Stream reached.");
            Ok(ExitCode::SUCCESS)
        }
        Ok(RunOutcome::Error { source, error, debug }) => {
            eprintln!("Error received from element {}: {}", source, error);
            eprintln!("Debugging information: {}", debug.as_deref().unwrap_or("none"));
            Ok(ExitCode::FAILURE)
        }
        Ok(RunOutcome::BusClosed) => {
            eprintln!("Pipeline bus closed unexpectedly.");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
