//! The `thumber generate` command: derive thumbnails and write them to disk.

use clap::Args;
use futures_util::stream::{self, StreamExt};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thumber_core::{
    Config, OutputWriter, RequestReport, RustBackend, ThumbnailGenerator, ThumbnailRequest,
};

use super::types::ReportFormat;

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Thumbnail paths relative to the storage root (e.g. photos/cat-64x64.png)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Storage root (overrides storage.root from the config)
    #[arg(short, long, env = "THUMBER_ROOT")]
    pub root: Option<PathBuf>,

    /// Write the thumbnail here instead of its requested location (single path only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of thumbnails generated concurrently
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Resize but don't write anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the generate command.
pub async fn execute(args: GenerateArgs, config: &Config) -> anyhow::Result<()> {
    if args.output.is_some() && args.paths.len() != 1 {
        anyhow::bail!("--output can only be used with a single path");
    }

    let config = match args.root {
        Some(root) => config.clone().with_storage_root(root)?,
        None => config.clone(),
    };
    let generator = Arc::new(ThumbnailGenerator::from_config(&config)?);
    let parallel = args
        .parallel
        .unwrap_or(config.processing.parallel_workers)
        .max(1);
    let format = ReportFormat::resolve(args.format, &config.output.format);

    tracing::info!(
        "Generating {} thumbnail(s) under {} ({} workers)",
        args.paths.len(),
        generator.storage().path().display(),
        parallel
    );

    let total = args.paths.len();
    let output = args.output;
    let dry_run = args.dry_run;
    // The core is blocking; run each request on the blocking pool
    let mut reports = stream::iter(args.paths)
        .map(|path| {
            let generator = Arc::clone(&generator);
            let output = output.clone();
            async move {
                let fallback = path.clone();
                tokio::task::spawn_blocking(move || {
                    generate_one(&generator, &path, output.as_deref(), dry_run)
                })
                .await
                .unwrap_or_else(|e| RequestReport {
                    error: Some(format!("Task join error: {e}")),
                    ..RequestReport::failed(fallback, None)
                })
            }
        })
        .buffered(parallel);

    let stdout = std::io::stdout();
    let mut writer = OutputWriter::new(BufWriter::new(stdout.lock()), format, config.output.pretty);
    let mut failed = 0usize;
    while let Some(report) = reports.next().await {
        if report.is_error() {
            failed += 1;
        }
        writer.write(&report)?;
    }
    writer.finish()?;

    tracing::info!("Generated {} of {} thumbnail(s)", total - failed, total);
    if failed > 0 {
        anyhow::bail!("{failed} of {total} thumbnail(s) failed");
    }
    Ok(())
}

/// Generate one thumbnail and describe the outcome.
///
/// Never fails: every error ends up in the report.
fn generate_one(
    generator: &ThumbnailGenerator<RustBackend>,
    path: &Path,
    output: Option<&Path>,
    dry_run: bool,
) -> RequestReport {
    let request = match ThumbnailRequest::from_path(path) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("{}", e);
            return RequestReport::failed(e.request_path, Some(&e.source));
        }
    };

    let mut report = RequestReport::for_request(request.clone());
    report.allowed = Some(generator.is_allowed(&request));
    report.main_full_path = Some(generator.main_full_path(&request));

    let image = match generator.generate(&request) {
        Ok(image) => image,
        Err(failure) => {
            tracing::warn!("{}: {}", path.display(), failure);
            report.error = Some(failure.to_string());
            return report;
        }
    };
    report.width = Some(image.width());
    report.height = Some(image.height());

    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| generator.full_path(&request));
    if !dry_run {
        if let Err(e) = image.save(&target) {
            tracing::warn!("{}: {}", path.display(), e);
            report.error = Some(e.to_string());
            return report;
        }
        tracing::debug!("Wrote {}", target.display());
    }
    report.output = Some(target);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use thumber_core::config::LimitsConfig;
    use thumber_core::{AllowList, StorageRoot};

    fn generator(root: &Path) -> ThumbnailGenerator<RustBackend> {
        std::fs::create_dir_all(root.join("photos")).unwrap();
        DynamicImage::new_rgb8(120, 60)
            .save(root.join("photos/cat.png"))
            .unwrap();
        ThumbnailGenerator::new(
            StorageRoot::new(root),
            AllowList::new(["64x64"]).unwrap(),
            RustBackend::new(LimitsConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_execute_rejects_empty_root() {
        let args = GenerateArgs {
            paths: vec![PathBuf::from("photos/cat-64x64.png")],
            root: Some(PathBuf::new()),
            output: None,
            parallel: None,
            format: None,
            dry_run: true,
        };
        let err = execute(args, &Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("storage.root"));
    }

    #[test]
    fn test_generate_one_writes_next_to_main_image() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());

        let report = generate_one(&gen, Path::new("photos/cat-64x64.png"), None, false);
        assert!(!report.is_error(), "{:?}", report.error);
        assert_eq!(report.allowed, Some(true));
        assert_eq!((report.width, report.height), (Some(64), Some(32)));

        let written = dir.path().join("photos/cat-64x64.png");
        assert_eq!(report.output.as_deref(), Some(written.as_path()));
        assert!(written.exists());
    }

    #[test]
    fn test_generate_one_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());

        let report = generate_one(&gen, Path::new("photos/cat-64x64.png"), None, true);
        assert!(!report.is_error());
        assert!(!dir.path().join("photos/cat-64x64.png").exists());
    }

    #[test]
    fn test_generate_one_output_override() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());
        let target = dir.path().join("out/thumb.jpg");

        let report = generate_one(&gen, Path::new("photos/cat-64x64.png"), Some(target.as_path()), false);
        assert!(!report.is_error());
        assert!(target.exists());
    }

    #[test]
    fn test_generate_one_reports_policy_rejection() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());

        let report = generate_one(&gen, Path::new("photos/cat-9999x9999.png"), None, false);
        assert_eq!(report.allowed, Some(false));
        assert_eq!(
            report.error.as_deref(),
            Some("Geometry not allowed: 9999x9999")
        );
        assert!(report.output.is_none());
    }

    #[test]
    fn test_generate_one_reports_malformed_name() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());

        let report = generate_one(&gen, Path::new("photos/cat.png"), None, false);
        assert!(report.request.is_none());
        assert_eq!(report.error.as_deref(), Some("Bad filename photos/cat.png"));
    }
}
