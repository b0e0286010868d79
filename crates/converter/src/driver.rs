//! Sequential batch driver.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use tgsrender_common::config::RendererConfig;
use tgsrender_common::error::{TgsError, TgsResult};
use tgsrender_container::{decompress_in, probe, AnimationInfo, DecompressedAnimation};
use tgsrender_render_engine::{
    RenderOptions, RenderRequest, RenderSession, RenderStyle, SessionLauncher,
};

use crate::job::ConversionJob;
use crate::report::{BatchReport, ConvertError, ConvertStage, JobOutcome};

/// Settings shared by every job in a batch.
#[derive(Debug, Clone)]
pub struct ConvertSettings {
    pub style: RenderStyle,
    /// Configured sizes; job options are merged on top.
    pub defaults: RenderOptions,
    /// Where decompressed documents are staged.
    pub temp_dir: PathBuf,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            style: RenderStyle::default(),
            defaults: RenderOptions::default(),
            temp_dir: std::env::temp_dir(),
        }
    }
}

impl ConvertSettings {
    pub fn from_config(config: &RendererConfig) -> Self {
        Self {
            style: RenderStyle {
                background: config.background.clone(),
            },
            defaults: RenderOptions::new(config.width, config.height),
            ..Self::default()
        }
    }
}

/// Open one session, convert every job through it, then close it.
///
/// Launch failure is fatal. Per-job failures end up in the report, and the
/// session is closed whatever they were. An empty job list never launches.
pub async fn run_batch<L: SessionLauncher>(
    launcher: &L,
    jobs: &[ConversionJob],
    settings: &ConvertSettings,
) -> TgsResult<BatchReport> {
    if jobs.is_empty() {
        tracing::info!("No inputs to convert");
        return Ok(BatchReport::new(Utc::now()));
    }

    let mut session = launcher.launch().await?;
    let report = convert_batch(jobs, &mut session, settings).await;

    let name = session.name().to_string();
    if let Err(e) = session.close().await {
        tracing::warn!(session = %name, error = %e, "Failed to close rendering session");
    }

    Ok(report)
}

/// Convert `jobs` one at a time, in order, through `session`.
///
/// Never stops early: every job yields exactly one outcome.
pub async fn convert_batch<S: RenderSession>(
    jobs: &[ConversionJob],
    session: &mut S,
    settings: &ConvertSettings,
) -> BatchReport {
    let mut report = BatchReport::new(Utc::now());

    for (index, job) in jobs.iter().enumerate() {
        tracing::info!(
            job = index + 1,
            total = jobs.len(),
            "Converting {}...",
            job.input.display()
        );

        let start = Instant::now();
        let (animation, result) = convert_one(job, session, settings).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => tracing::info!(
                output = %job.output.display(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Converted {}",
                job.input.display()
            ),
            Err(e) => tracing::error!(
                stage = %e.stage,
                error = %e.source,
                "Failed to convert {}",
                job.input.display()
            ),
        }

        report.outcomes.push(JobOutcome {
            input: job.input.clone(),
            output: job.output.clone(),
            animation,
            result,
            elapsed,
        });
    }

    report.finished_at = Utc::now();
    report
}

/// Run one job. The animation header is returned whenever probing succeeded,
/// even if a later stage failed.
async fn convert_one<S: RenderSession>(
    job: &ConversionJob,
    session: &mut S,
    settings: &ConvertSettings,
) -> (Option<AnimationInfo>, Result<(), ConvertError>) {
    let input = job.input.clone();
    let temp_dir = settings.temp_dir.clone();
    let document = match blocking(move || decompress_in(&input, &temp_dir)).await {
        Ok(document) => document,
        Err(e) => return (None, Err(ConvertError::new(ConvertStage::Decompress, e))),
    };

    let document_path = document.path().to_path_buf();
    let info = match blocking(move || probe(&document_path)).await {
        Ok(info) => info,
        Err(e) => return (None, Err(ConvertError::new(ConvertStage::Probe, e))),
    };
    let violations = info.telegram_violations();
    if !violations.is_empty() {
        tracing::warn!(
            input = %job.input.display(),
            issues = %violations.join("; "),
            "Not a standard Telegram sticker"
        );
    }

    let rendered = render_document(job, &document, session, settings).await;

    if let Err(e) = document.close() {
        tracing::warn!(error = %e, "Failed to remove decompressed document");
    }

    (Some(info), rendered)
}

async fn render_document<S: RenderSession>(
    job: &ConversionJob,
    document: &DecompressedAnimation,
    session: &mut S,
    settings: &ConvertSettings,
) -> Result<(), ConvertError> {
    ensure_parent_dir(&job.output)
        .await
        .map_err(|e| ConvertError::new(ConvertStage::Prepare, e))?;

    let request = RenderRequest {
        animation: document.path().to_path_buf(),
        output: job.output.clone(),
        style: settings.style.clone(),
        options: job.options.merged_over(settings.defaults),
    };
    session
        .render(&request)
        .await
        .map_err(|e| ConvertError::new(ConvertStage::Render, e))
}

async fn ensure_parent_dir(path: &Path) -> TgsResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

async fn blocking<T, F>(f: F) -> TgsResult<T>
where
    F: FnOnce() -> TgsResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| TgsError::Other(anyhow::anyhow!("blocking task failed: {e}")))?
}
