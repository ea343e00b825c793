//! The `shotscan` command.
//!
//! Scans a recorded scene snapshot against a template configuration and
//! prints the publishable items.
//!
//! ```text
//! shotscan --scene scene.yaml --templates templates.yml --root /proj --output json
//! ```

pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use shotscan::{scan_scene, Item, ScanConfig, SceneSnapshot, DEFAULT_RENDER_TEMPLATE, DEFAULT_WORK_TEMPLATE};
use shotscan_template::{RegistryConfig, TemplateRegistry};

pub use output::{render, OutputError, OutputFormat};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "shotscan", version, about = "List publishable items in a scene")]
pub struct Cli {
    /// Scene snapshot (YAML or JSON)
    #[arg(long, value_name = "FILE")]
    pub scene: PathBuf,

    /// Template configuration (YAML)
    #[arg(long, value_name = "FILE")]
    pub templates: PathBuf,

    /// Project root; overrides `root` in the template configuration
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Template used to parse the scene path
    #[arg(long, default_value = DEFAULT_WORK_TEMPLATE)]
    pub work_template: String,

    /// Template searched for rendered images
    #[arg(long, default_value = DEFAULT_RENDER_TEMPLATE)]
    pub render_template: String,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The scan configuration these arguments describe.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::default()
            .with_work_template(&self.work_template)
            .with_render_template(&self.render_template)
    }

    /// Log filter for the `-v` count. `RUST_LOG` still wins when set.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

/// Loads the inputs named by `cli` and runs the scan.
pub fn scan(cli: &Cli) -> Result<Vec<Item>> {
    let scene = SceneSnapshot::load(&cli.scene)
        .with_context(|| format!("loading scene {}", cli.scene.display()))?;

    let mut config = RegistryConfig::load(&cli.templates)
        .with_context(|| format!("loading templates {}", cli.templates.display()))?;
    if let Some(root) = &cli.root {
        config.root = Some(root.clone());
    }
    let registry = TemplateRegistry::from_config(&config).context("building template registry")?;

    Ok(scan_scene(&scene, &registry, &cli.scan_config())?)
}

/// Runs the command and returns what should be printed.
pub fn run(cli: &Cli) -> Result<String> {
    let items = scan(cli)?;
    Ok(render(&items, cli.output)?)
}
