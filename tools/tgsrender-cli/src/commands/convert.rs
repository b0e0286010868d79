//! Convert a batch of stickers.

use std::process::ExitCode;

use tgsrender_common::config::AppConfig;
use tgsrender_common::logging::init_logging;
use tgsrender_converter::{
    expand_inputs, plan_jobs, run_batch, BatchReport, ConvertSettings, OutputTemplate,
};
use tgsrender_render_engine::{BrowserLauncher, RenderOptions};

use crate::Cli;

pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load_or_default()?,
    };
    config.apply_env_overrides()?;

    config.logging = config.logging.with_cli_flags(cli.verbose, cli.json_logs);
    init_logging(&config.logging);

    let inputs = expand_inputs(&cli.paths)?;
    let template = OutputTemplate::new(
        cli.out_path
            .clone()
            .unwrap_or_else(|| config.renderer.output_template.clone()),
    );
    if inputs.len() > 1 && !template.is_per_input() {
        tracing::warn!(
            template = template.as_str(),
            "Output template has no {{stem}}; each input will overwrite the previous output"
        );
    }

    let jobs = plan_jobs(
        &inputs,
        &template,
        RenderOptions::new(cli.width, cli.height),
    );
    let settings = ConvertSettings::from_config(&config.renderer);
    let launcher = BrowserLauncher::from_config(&config.renderer);

    let report = run_batch(&launcher, &jobs, &settings).await?;
    print_report(&report);

    if fails_run(&report, cli.strict) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Per-file failures only fail the run in strict mode.
fn fails_run(report: &BatchReport, strict: bool) -> bool {
    strict && !report.is_success()
}

fn print_report(report: &BatchReport) {
    println!("{report}");
    for outcome in report.failures() {
        if let Some(err) = outcome.error() {
            println!("  [FAIL] {}: {err}", outcome.input.display());
        }
    }
}
