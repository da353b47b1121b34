use crate::cli::AugmentArgs;
use crate::commands::load_config;
use crate::error::Result;
use peptitools_core::metabolic_model::model::Model;
use peptitools_core::perturbation::augment::{Augmentation, NetworkAugmentor};
use tracing::{info, warn};

pub fn run(args: &AugmentArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    info!("Loading model from {:?}", &args.model);
    let mut model = Model::read_json(&args.model)?;

    match NetworkAugmentor::new(config.augment).augment(&mut model)? {
        Augmentation::Applied => println!("Added the gyrase inhibition sub-network."),
        Augmentation::AlreadyAugmented => {
            warn!("Model already carries the gyrase sub-network, writing it unchanged.");
            println!("Model was already augmented.");
        }
    }

    model.write_json(&args.output)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
