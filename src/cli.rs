// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "scatter-scene")]
#[command(about = "Decorative wgpu scene with scattered toruses and spheres", long_about = None)]
pub struct Cli {
    /// JSON scene configuration; command-line flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for the populator RNG
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hard cap on populated objects
    #[arg(long = "max-population")]
    pub max_population: Option<usize>,

    /// PNG used as the matcap texture
    #[arg(long)]
    pub matcap: Option<PathBuf>,

    /// PNG used as the torus pattern texture
    #[arg(long)]
    pub pattern: Option<PathBuf>,

    /// Disable the tweak panel and stats overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}
