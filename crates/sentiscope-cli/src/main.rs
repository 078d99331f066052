//! Sentiscope CLI - render datasets to SVG or dump layout geometry.

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

mod svg;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sentiscope::{records_from_json, ColorBy, DisplayOptions, Engine, Scene, View};
use sentiscope_core::Record;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use svg::SvgCanvas;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "sentiscope")]
#[command(about = "Streamgraph and cluster-scatter renderer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a dataset to an SVG file
    Render {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the laid-out geometry as JSON
    Layout {
        #[command(flatten)]
        input: InputArgs,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Print the default options as TOML
    Options,
}

#[derive(clap::Args)]
struct InputArgs {
    /// JSON array of dataset rows
    data: PathBuf,

    /// TOML options file
    #[arg(short = 'c', long)]
    options: Option<PathBuf>,

    /// Override the view
    #[arg(long)]
    view: Option<ViewArg>,

    /// Override the color metric
    #[arg(long)]
    color_by: Option<ColorByArg>,

    /// Override the layout seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Streamgraph,
    Scatter,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorByArg {
    Sentiment,
    Subjectivity,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render { input, output } => render(&input, output.as_deref()),
        Commands::Layout { input, pretty } => layout(&input, pretty),
        Commands::Options => {
            print!("{}", DisplayOptions::default().to_toml_string());
            Ok(())
        }
    }
}

fn load(input: &InputArgs) -> Result<(Vec<Record>, DisplayOptions)> {
    let mut options = match &input.options {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read options {}", path.display()))?;
            DisplayOptions::from_toml_str(&text)
                .with_context(|| format!("invalid options {}", path.display()))?
        }
        None => DisplayOptions::default(),
    };
    if let Some(view) = input.view {
        options.view = match view {
            ViewArg::Streamgraph => View::Streamgraph,
            ViewArg::Scatter => View::Scatter,
        };
    }
    if let Some(color_by) = input.color_by {
        options.color_by = match color_by {
            ColorByArg::Sentiment => ColorBy::Sentiment,
            ColorByArg::Subjectivity => ColorBy::Subjectivity,
        };
    }
    if let Some(seed) = input.seed {
        options.seed = seed;
    }
    options.validate().context("invalid options")?;

    let text = fs::read_to_string(&input.data)
        .with_context(|| format!("failed to read dataset {}", input.data.display()))?;
    let records = records_from_json(&text, &options.group_key_set)
        .with_context(|| format!("invalid dataset {}", input.data.display()))?;
    if !sentiscope::dataset::has_unique_ids(&records) {
        warn!("dataset has duplicate record ids; selection is undefined for them");
    }
    info!(
        records = records.len(),
        view = ?options.view,
        "dataset loaded"
    );
    Ok((records, options))
}

fn render(input: &InputArgs, output: Option<&Path>) -> Result<()> {
    let (records, options) = load(input)?;
    let (width, height) = (options.width, options.height);

    let mut engine = Engine::new(options);
    engine.set_records(records);
    let mut canvas = SvgCanvas::new();
    engine.render(&mut canvas).context("render failed")?;
    let document = canvas.finish(width, height);

    match output {
        Some(path) => {
            fs::write(path, document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "svg written");
        }
        None => print!("{document}"),
    }
    Ok(())
}

fn layout(input: &InputArgs, pretty: bool) -> Result<()> {
    let (records, options) = load(input)?;
    let mut engine = Engine::new(options);
    engine.set_records(records);
    let mut canvas = sentiscope_core::RecordingCanvas::new();
    engine.render(&mut canvas).context("layout failed")?;

    let Some(scene) = engine.scene() else {
        bail!("no scene after render");
    };
    let value = scene_json(scene, engine.records());
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{text}");
    Ok(())
}

fn scene_json(scene: &Scene, records: &[Record]) -> Value {
    match scene {
        Scene::Empty => json!({ "view": "empty" }),
        Scene::Streamgraph(scene) => json!({
            "view": "streamgraph",
            "layers": scene.layers().iter().map(|shape| json!({
                "key": shape.layer.key,
                "color": shape.color.to_hex(),
                "bands": shape.layer.bands,
            })).collect::<Vec<_>>(),
        }),
        Scene::Scatter(scene) => json!({
            "view": "scatter",
            "nodes": scene.nodes().iter().map(|node| json!({
                "index": node.id,
                "month": records.get(node.record).map(|r| r.month.as_str()),
                "x": node.center.x,
                "y": node.center.y,
            })).collect::<Vec<_>>(),
        }),
    }
}
