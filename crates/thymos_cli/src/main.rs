use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thymos_core::{HormoneKind, ThymosConfig, Vad};
use thymos_engine::SimulationEngine;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML config file (defaults apply if missing)
    #[arg(short, long, default_value = "thymos.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the simulation clock for a number of ticks and stream the
    /// history trail as JSON lines
    Run {
        /// How many decay ticks to run before stopping
        #[arg(short, long, default_value_t = 30)]
        ticks: u64,

        /// Override the tick interval from the config
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Hormones to inject right after the clock starts (repeatable)
        #[arg(long = "inject", value_name = "HORMONE")]
        inject: Vec<String>,
    },

    /// Classify a single VAD point ([0,100] per axis)
    Classify {
        arousal: f32,
        valence: f32,
        dominance: f32,
    },

    /// Print the active reference table as JSON lines
    Table,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let mut config = ThymosConfig::load_or_default(&cli.config);

    match cli.command {
        Commands::Run {
            ticks,
            interval_ms,
            inject,
        } => {
            if let Some(ms) = interval_ms {
                config.clock.interval_ms = ms;
            }
            run(&config, ticks, &inject).await
        }
        Commands::Classify {
            arousal,
            valence,
            dominance,
        } => {
            let classifier = config.classifier()?;
            let vad = Vad::new(arousal, valence, dominance);
            let result = classifier.classify_detailed(&vad);
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Commands::Table => {
            let table = config.reference_table()?;
            for point in table.points() {
                println!("{}", serde_json::to_string(point)?);
            }
            Ok(())
        }
    }
}

async fn run(config: &ThymosConfig, ticks: u64, inject: &[String]) -> Result<()> {
    let engine = SimulationEngine::from_config(config).context("Failed to build engine")?;
    info!(
        ticks,
        interval_ms = config.clock.interval_ms,
        "starting simulation"
    );

    let mut updates = engine.subscribe();
    engine.start().await?;

    for name in inject {
        let kind = HormoneKind::parse(name)
            .ok_or_else(|| anyhow!("unknown hormone {:?} (expected one of the seven)", name))?;
        engine.inject(kind).await?;
    }

    while updates.borrow().time < ticks {
        updates
            .changed()
            .await
            .context("simulation clock task exited early")?;
    }
    engine.stop().await?;

    for record in engine.history().await {
        println!("{}", serde_json::to_string(&record)?);
    }

    let snapshot = engine.snapshot();
    info!(
        emotion = %snapshot.emotion.label,
        confidence = snapshot.emotion.confidence,
        arousal = snapshot.vad.arousal,
        valence = snapshot.vad.valence,
        dominance = snapshot.vad.dominance,
        "final state"
    );
    Ok(())
}
