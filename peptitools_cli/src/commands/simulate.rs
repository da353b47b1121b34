use crate::cli::SimulateArgs;
use crate::commands::load_config;
use crate::error::{CliError, Result};
use peptitools_core::metabolic_model::model::Model;
use peptitools_core::peptide::molar_to_micromolar;
use peptitools_core::perturbation::dose_response::DoseResponse;
use peptitools_core::pipeline::simulate_growth_inhibition;
use peptitools_core::report::{render_svg, write_csv_file};
use tracing::info;

/// Inhibition constant in µM from whichever affinity was given
fn subject_ki_um(args: &SimulateArgs) -> Result<f64> {
    match (args.kd, args.ki_um) {
        (Some(kd), None) => Ok(molar_to_micromolar(kd)),
        (None, Some(ki_um)) => Ok(ki_um),
        _ => Err(CliError::Argument(
            "give exactly one of --kd or --ki-um".to_string(),
        )),
    }
}

pub fn run(args: &SimulateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let ki_um = subject_ki_um(args)?;

    info!("Loading model from {:?}", &args.model);
    let model = Model::read_json(&args.model)?;
    let response = simulate_growth_inhibition(&model, &config, ki_um, args.compare)?;

    print!("{}", summary(&response));
    if let Some(path) = &args.csv {
        write_csv_file(&response.table, path)?;
        println!("Wrote table to {}", path.display());
    }
    if let Some(path) = &args.plot {
        render_svg(&response.curves, path)?;
        println!("Wrote plot to {}", path.display());
    }
    Ok(())
}

fn summary(response: &DoseResponse) -> String {
    response
        .curves
        .iter()
        .map(|curve| {
            let mut line = format!(
                "{:<16} Ki = {:>10.4} µM  baseline growth = {:.4} 1/h  IC50 = {}",
                curve.inhibitor.name,
                curve.inhibitor.ki_um,
                curve.baseline().unwrap_or(0.0),
                curve.ic50
            );
            if curve.failed_samples() > 0 {
                line.push_str(&format!(
                    "  ({} samples without optimum)",
                    curve.failed_samples()
                ));
            }
            line.push('\n');
            line
        })
        .collect()
}
