//! Command-line front end for Euler diagram synthesis.
//!
//! Provides:
//! - Drawing a description to SVG or JSON
//! - Printing the decomposition and recomposition steps behind a drawing
//! - Listing the built-in example descriptions

mod render;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};

use euler_core::{
    config::DEFAULT_SIZE, examples::EXAMPLES, Decomposer, DecompositionStrategyType, Description, DiagramConfig, Recomposer,
    RecompositionStrategyType,
};

use render::{render_svg, RenderConfig};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("EULER_GIT_VERSION"), ")");

#[derive(Parser)]
#[command(name = "euler")]
#[command(version = VERSION)]
#[command(about = "Euler diagram synthesis with circles", long_about = None)]
struct Cli {
    /// GUI front end
    #[arg(long, value_enum, default_value_t = Gui::None, global = true)]
    gui: Gui,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum Gui {
    /// Desktop viewer (not available in this build)
    Fx,
    /// Headless
    None,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Svg,
    Json,
}

#[derive(Args)]
struct ConfigArgs {
    /// JSON file with a `DiagramConfig`; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Curve removal order
    #[arg(short, long)]
    decomposition: Option<DecompositionStrategyType>,

    /// Zone clustering when curves are added back
    #[arg(short, long)]
    recomposition: Option<RecompositionStrategyType>,

    /// Comma-separated recomposition strategies to retry with when drawing fails
    #[arg(long, value_delimiter = ',')]
    fallback: Option<Vec<RecompositionStrategyType>>,

    /// Search for zone centers sequentially
    #[arg(long)]
    no_parallel: bool,

    /// Always search for zone centers instead of trying centroids first
    #[arg(long)]
    no_centroid: bool,

    /// Redraw duplicated curves as single path contours
    #[arg(long)]
    merge_duplicates: bool,
}

impl ConfigArgs {
    fn config(&self) -> Result<DiagramConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&json).with_context(|| format!("parsing config {}", path.display()))?
            }
            None => DiagramConfig::default(),
        };
        if let Some(decomposition) = self.decomposition {
            config.decomposition = decomposition;
        }
        if let Some(recomposition) = self.recomposition {
            config.recomposition = recomposition;
        }
        if let Some(fallback) = &self.fallback {
            config.fallback_strategies = fallback.clone();
        }
        if self.no_parallel {
            config.parallel = false;
        }
        if self.no_centroid {
            config.use_centroid = false;
        }
        if self.merge_duplicates {
            config.merge_duplicates = true;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a description, e.g. "a b ab"
    Draw {
        /// Zones as whitespace-separated curve labels
        description: String,

        /// Side of the square the diagram is scaled to
        #[arg(short, long, default_value_t = DEFAULT_SIZE)]
        size: f64,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Svg)]
        format: Format,

        /// Label each zone at its center (SVG only)
        #[arg(long)]
        zone_labels: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the decomposition and recomposition steps for a description
    Steps {
        /// Zones as whitespace-separated curve labels
        description: String,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// List built-in example descriptions
    Examples,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.gui == Gui::Fx {
        warn!("The fx GUI is not available; running headless");
    }

    match cli.command {
        Commands::Draw { description, size, config, format, zone_labels, output } => {
            let config = config.config()?;
            let diagram = euler_core::draw(&description, size, &config)?;
            info!("Drew {} contours for {}", diagram.contours().len(), diagram.original);
            let text = match format {
                Format::Svg => {
                    let render_config = RenderConfig { show_zones: zone_labels, ..RenderConfig::default() };
                    render_svg(&diagram, &render_config)
                }
                Format::Json => serde_json::to_string_pretty(&diagram.view()).context("serializing diagram")?,
            };
            match output {
                Some(path) => fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?,
                None => print!("{}", text),
            }
        }
        Commands::Steps { description, config } => {
            let config = config.config()?;
            let description: Description = description.parse()?;
            let d_steps = Decomposer::new(config.decomposition).decompose(&description);
            println!("Decomposition ({}):", config.decomposition);
            for step in &d_steps {
                println!("  -{}: {} -> {}", step.removed, step.from.informal_description(), step.to.informal_description());
            }
            let r_steps = Recomposer::new(config.recomposition).recompose(&d_steps);
            println!("Recomposition ({}):", config.recomposition);
            for step in &r_steps {
                let kinds: Vec<String> = step.data.iter().map(|rd| format!("{} {}", rd.added_curve, rd.kind())).collect();
                println!("  +{}: {} -> {} [{}]", step.label(), step.from.informal_description(), step.to.informal_description(), kinds.join(", "));
            }
        }
        Commands::Examples => {
            for (name, description) in EXAMPLES {
                println!("{:<10} {}", name, description);
            }
        }
    }
    Ok(())
}
