use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use voice_sculptor_core::{
    EmotionRanking, SculptureConfig, SculptureGenerator, WaveformSamples, DEVIATION_LIMIT,
};

const SOLID_NAME: &str = "sculpture";

fn main() -> voice_sculptor_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => run_generate(&args),
        Commands::Plan(args) => run_plan(&args),
    }
}

fn run_generate(args: &GenerateArgs) -> voice_sculptor_core::Result<()> {
    tracing::info!(emotions = ?args.emotions, waveform = ?args.waveform, "generating sculpture");

    let emotions = load_emotions(&args.emotions)?;
    let config = build_config(args.radius, args.height);
    let waveform = load_waveform(&args.waveform, &config)?;

    let mut generator = match args.seed {
        Some(seed) => SculptureGenerator::with_seed(config, seed)?,
        None => SculptureGenerator::new(config)?,
    };
    let sculpture = generator.generate(&emotions, &waveform)?;

    let file = File::create(&args.out)?;
    let mut writer = BufWriter::new(file);
    if args.ascii {
        voice_sculptor_core::write_ascii_stl(&sculpture.mesh, SOLID_NAME, &mut writer)?;
    } else {
        voice_sculptor_core::write_binary_stl(&sculpture.mesh, SOLID_NAME, &mut writer)?;
    }
    writer.flush()?;

    tracing::info!(
        out = %args.out.display(),
        layers = sculpture.plan.len(),
        triangles = sculpture.mesh.triangle_count(),
        "sculpture written"
    );
    Ok(())
}

fn run_plan(args: &PlanArgs) -> voice_sculptor_core::Result<()> {
    let emotions = load_emotions(&args.emotions)?;

    let mut generator = match args.seed {
        Some(seed) => SculptureGenerator::with_seed(SculptureConfig::default(), seed)?,
        None => SculptureGenerator::new(SculptureConfig::default())?,
    };
    let plan = generator.plan_preview(&emotions);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn load_emotions(path: &Path) -> voice_sculptor_core::Result<EmotionRanking> {
    let text = std::fs::read_to_string(path)?;
    EmotionRanking::from_json_str(&text)
}

/// Reads a JSON array of samples. Arrays that already match the base point
/// count and stay inside the deviation band are used verbatim; anything else
/// is treated as raw audio and reduced.
fn load_waveform(
    path: &Path,
    config: &SculptureConfig,
) -> voice_sculptor_core::Result<WaveformSamples> {
    let text = std::fs::read_to_string(path)?;
    let values: Vec<f64> = serde_json::from_str(&text)?;

    let prepared = values.len() == config.base_points
        && values.iter().all(|v| v.abs() <= DEVIATION_LIMIT);
    if prepared {
        WaveformSamples::from_deviations(values)
    } else {
        WaveformSamples::from_audio(&values, config.base_points)
    }
}

fn build_config(radius: Option<f64>, height: Option<f64>) -> SculptureConfig {
    let mut config = SculptureConfig::default();
    if let Some(radius) = radius {
        config.base_radius = radius;
    }
    if let Some(height) = height {
        config.height = height;
    }
    config
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Voice-driven sculpture generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a sculpture from a classification and waveform, then write STL.
    Generate(GenerateArgs),
    /// Print the layer plan for a classification without building geometry.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Path to the ranked emotion classification JSON.
    #[arg(long)]
    emotions: PathBuf,

    /// Path to a JSON array of waveform samples, raw or pre-reduced.
    #[arg(long)]
    waveform: PathBuf,

    /// Output path for the STL file.
    #[arg(short, long, default_value = "sculpture.stl")]
    out: PathBuf,

    /// Seed for reproducible output; random when omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write ASCII STL instead of the binary layout.
    #[arg(long)]
    ascii: bool,

    /// Base radius in model units.
    #[arg(long)]
    radius: Option<f64>,

    /// Overall height in model units.
    #[arg(long)]
    height: Option<f64>,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Path to the ranked emotion classification JSON.
    #[arg(long)]
    emotions: PathBuf,

    /// Seed for a reproducible plan; random when omitted.
    #[arg(short, long)]
    seed: Option<u64>,
}
