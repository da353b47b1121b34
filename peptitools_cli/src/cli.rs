use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Estimate the antimicrobial potential of DNA gyrase inhibiting peptides"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate growth across inhibitor concentrations and estimate the IC50
    Simulate(SimulateArgs),
    /// Write the model with the gyrase inhibition sub-network added
    Augment(AugmentArgs),
    /// Score a peptide sequence
    Peptide(PeptideArgs),
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("affinity").required(true).args(["kd", "ki_um"])))]
pub struct SimulateArgs {
    /// Metabolic model in COBRA json format
    #[arg(short, long, value_name = "PATH")]
    pub model: PathBuf,

    /// Dissociation constant of the peptide-gyrase complex in molar
    #[arg(long, value_name = "MOLAR")]
    pub kd: Option<f64>,

    /// Inhibition constant of the peptide in µM
    #[arg(long, value_name = "MICROMOLAR")]
    pub ki_um: Option<f64>,

    /// Also simulate the reference inhibitor
    #[arg(long)]
    pub compare: bool,

    /// Simulation settings in TOML format
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the dose-response table as CSV
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Write the dose-response plot as SVG
    #[arg(long, value_name = "PATH")]
    pub plot: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AugmentArgs {
    /// Metabolic model in COBRA json format
    #[arg(short, long, value_name = "PATH")]
    pub model: PathBuf,

    /// Where to write the augmented model
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Simulation settings in TOML format, only the augment table is used
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PeptideArgs {
    /// Sequence in one letter amino acid codes
    pub sequence: String,

    /// Print the properties as JSON
    #[arg(long)]
    pub json: bool,
}
