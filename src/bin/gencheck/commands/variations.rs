//! `gencheck variations` command

use anyhow::{Context, Result};

use crate::cli::VariationsArgs;
use gencheck::core::check_unique;
use gencheck::util::Shell;
use gencheck::GeneratorKind;

pub fn execute(args: VariationsArgs, shell: &Shell) -> Result<()> {
    let kinds: Vec<GeneratorKind> = match args.kind {
        Some(kind) => vec![kind],
        None => GeneratorKind::ALL.to_vec(),
    };

    let mut entries = Vec::new();
    for kind in kinds {
        let specs = kind.variations();
        check_unique(&specs)?;

        for spec in specs {
            if shell.is_json() {
                entries.push(serde_json::json!({
                    "kind": kind.as_str(),
                    "name": spec.name(),
                    "path": spec.path(),
                    "input": spec.to_generator_input(),
                }));
            } else if args.input {
                println!("{}", spec.to_generator_input());
            } else {
                let enabled: Vec<&str> = spec
                    .options()
                    .iter()
                    .filter(|(_, on)| *on)
                    .map(|(key, _)| key.as_str())
                    .collect();
                println!("{:<9} {:<40} {}", kind, spec.to_string(), enabled.join(","));
            }
        }
    }

    if shell.is_json() {
        let json = serde_json::to_string_pretty(&entries)
            .context("failed to serialize variations")?;
        println!("{}", json);
    }

    Ok(())
}
