use crate::cli::PeptideArgs;
use crate::error::Result;
use peptitools_core::peptide::{analyze, PeptideProperties};
use std::fmt::Write;

pub fn run(args: &PeptideArgs) -> Result<()> {
    let properties = analyze(&args.sequence)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&properties)?);
    } else {
        print!("{}", summary(&properties));
    }
    Ok(())
}

fn summary(p: &PeptideProperties) -> String {
    let mut out = String::new();
    // Writing to a String can't fail
    let _ = writeln!(out, "Sequence:                    {}", p.sequence);
    let _ = writeln!(out, "Net charge (pH 7):           {:.2}", p.net_charge);
    let _ = writeln!(out, "Hydrophobicity (KD):         {:.2}", p.hydrophobicity);
    for (protease, sites) in &p.cleavage_sites {
        let sites: Vec<String> = sites.iter().map(usize::to_string).collect();
        let _ = writeln!(out, "Cleavage, {:<18} [{}]", format!("{}:", protease), sites.join(", "));
    }
    let _ = writeln!(out, "Extracellular stability:     {:.3}", p.stability);
    let _ = writeln!(out, "Outer membrane permeability: {}", p.outer_membrane_permeability);
    let _ = writeln!(out, "Cytoplasmic translocation:   {}", p.cytoplasmic_translocation);
    let _ = writeln!(out, "Combined score (0 to 1):     {:.3}", p.combined_score);
    out
}
