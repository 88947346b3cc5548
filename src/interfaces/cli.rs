use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tour-rewards")]
#[command(about = "Grants attraction rewards from users' visit history.")]
#[command(version)]
pub struct Cli {
    /// Attraction catalog (JSON array)
    #[arg(short = 'c', long)]
    pub catalog: Option<PathBuf>,

    /// Users with visited locations (JSON array)
    #[arg(short = 'u', long)]
    pub users: Option<PathBuf>,

    /// Proximity buffer in miles for this run
    #[arg(short = 'b', long, conflicts_with = "max_buffer")]
    pub buffer: Option<f64>,

    /// Reward every attraction regardless of distance
    #[arg(long)]
    pub max_buffer: bool,

    /// Show the closest attractions to each user's latest visit
    #[arg(long)]
    pub nearby: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Choose color theme
    #[arg(short = 'T', long)]
    pub theme: Option<String>,

    /// Users processed at the same time
    #[arg(long, default_value_t = 16)]
    pub concurrency: usize,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Show status
    #[arg(long)]
    pub status: bool,
}
