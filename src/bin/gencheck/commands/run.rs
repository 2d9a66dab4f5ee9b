//! `gencheck run` command

use anyhow::{Context, Result};

use crate::cli::RunArgs;
use gencheck::generator::CommandGenerator;
use gencheck::ops::{preflight, Orchestrator, RunOptions, ShellRunner};
use gencheck::util::shell::Status;
use gencheck::util::{HarnessContext, Shell};
use gencheck::GeneratorKind;

pub fn execute(args: RunArgs, shell: &Shell) -> Result<()> {
    let ctx = HarnessContext::new()?;
    let config = ctx.config();

    if !args.no_preflight {
        for diag in preflight(&ctx) {
            shell.warn(&diag.message);
            shell.block(diag.format_details());
        }
    }

    let generators_dir = ctx.generators_dir();
    if !generators_dir.is_dir() {
        anyhow::bail!(
            "generator directory `{}` does not exist\n\
             Set [paths] generators in gencheck.toml.",
            generators_dir.display()
        );
    }

    let generator = GeneratorKind::ALL
        .iter()
        .fold(CommandGenerator::new(&generators_dir), |generator, &kind| {
            generator.with_command(kind, config.generator_command(kind))
        });
    let runner = ShellRunner::new(ctx.root());

    let options = RunOptions {
        only: args.only,
        skip_verify: args.skip_verify,
        keep: args.keep,
    };

    shell.status(Status::Running, format!("generators in {}", ctx.root().display()));
    let report = Orchestrator::new(&ctx, &generator, &runner, shell)
        .options(options)
        .run();

    if shell.is_json() {
        let mut event =
            serde_json::to_value(&report).context("failed to serialize run report")?;
        event["reason"] = serde_json::Value::from("run-finished");
        shell.json_event(&event);
    } else if report.outcome.passed() {
        shell.status(
            Status::Passed,
            format!("{} variations generated and verified", report.generated),
        );
    } else {
        shell.error(format!(
            "run failed ({} generated, {} failed)",
            report.generated, report.failed
        ));
    }

    let code = report.outcome.exit_code();
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
