//! `gencheck config` command

use anyhow::{bail, Result};

use crate::cli::ConfigArgs;
use gencheck::util::config::{global_config_path, Config};
use gencheck::util::fs::relative_path;
use gencheck::util::shell::Status;
use gencheck::util::{HarnessContext, Shell};
use gencheck::GeneratorKind;

pub fn execute(args: ConfigArgs, shell: &Shell) -> Result<()> {
    let ctx = HarnessContext::new()?;

    if args.init {
        let path = ctx.project_config_path();
        if path.exists() && !args.force {
            bail!(
                "`{}` already exists\n\
                 Use --force to overwrite it.",
                path.display()
            );
        }
        Config::with_defaults().save(&path)?;
        shell.status(Status::Generated, path.display());
        return Ok(());
    }

    let config = ctx.config();
    let source = |path: Option<&std::path::Path>| {
        path.filter(|p| p.exists())
            .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
    };
    let global = global_config_path();

    println!("# project config: {}", source(ctx.config_path()));
    println!("# global config:  {}", source(global.as_deref()));
    println!("root = {}", ctx.root().display());
    let relative = |path: std::path::PathBuf| relative_path(ctx.root(), &path).display().to_string();
    println!("paths.generators = {}", relative(ctx.generators_dir()));
    println!("paths.base = {}", relative(ctx.base_dir()));
    println!("paths.root-state = {}", relative(ctx.root_state_path()));
    println!("paths.backup-extension = {}", config.backup_extension());
    for kind in GeneratorKind::ALL {
        println!("generator.{} = {}", kind, config.generator_command(kind));
        println!("generator.{}-mode = {}", kind, config.batch_mode(kind));
    }
    println!("verify.lint = {}", config.lint_command());
    println!("verify.typecheck = {}", config.typecheck_command());
    println!(
        "run.fail-on-generation-error = {}",
        config.fail_on_generation_error()
    );

    Ok(())
}
