use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pdf-outline",
    version,
    about = "Infers a title and H1/H2/H3 outline from parsed PDF text spans"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Batch(BatchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Span document JSON produced by the PDF parsing stage.
    pub spans_path: PathBuf,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[arg(long)]
    pub input_dir: PathBuf,

    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

#[derive(Args, Debug, Clone)]
pub struct TuningArgs {
    #[arg(long, default_value_t = 50)]
    pub max_pages: usize,

    #[arg(long, default_value_t = 6.0)]
    pub min_font_size: f64,

    #[arg(long, default_value_t = 0.5)]
    pub repeat_ratio: f64,

    #[arg(long, default_value_t = 0.30)]
    pub base_threshold: f64,

    #[arg(long, default_value_t = 0.35)]
    pub weight_font: f64,

    #[arg(long, default_value_t = 0.30)]
    pub weight_style: f64,

    #[arg(long, default_value_t = 0.25)]
    pub weight_position: f64,

    #[arg(long, default_value_t = 0.10)]
    pub weight_consistency: f64,
}
