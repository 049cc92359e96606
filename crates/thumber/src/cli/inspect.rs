//! The `thumber inspect` command: show how paths parse, without touching images.

use clap::Args;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thumber_core::{
    Config, GeometryPolicy, ImageBackend, OutputWriter, RequestReport, ThumbnailGenerator,
    ThumbnailRequest,
};

use super::types::ReportFormat;

/// Arguments for the `inspect` command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Thumbnail paths to parse
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Storage root used to resolve full paths
    #[arg(short, long, env = "THUMBER_ROOT")]
    pub root: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
}

/// Execute the inspect command.
pub async fn execute(args: InspectArgs, config: &Config) -> anyhow::Result<()> {
    let config = match args.root {
        Some(root) => config.clone().with_storage_root(root)?,
        None => config.clone(),
    };
    let generator = ThumbnailGenerator::from_config(&config)?;
    let format = ReportFormat::resolve(args.format, &config.output.format);

    let stdout = std::io::stdout();
    let mut writer = OutputWriter::new(BufWriter::new(stdout.lock()), format, config.output.pretty);
    for path in &args.paths {
        writer.write(&inspect_one(&generator, path))?;
    }
    writer.finish()?;
    Ok(())
}

fn inspect_one<B: ImageBackend, P: GeometryPolicy>(
    generator: &ThumbnailGenerator<B, P>,
    path: &Path,
) -> RequestReport {
    match ThumbnailRequest::from_path(path) {
        Ok(request) => {
            let mut report = RequestReport::for_request(request.clone());
            report.allowed = Some(generator.is_allowed(&request));
            report.main_full_path = Some(generator.main_full_path(&request));
            report.output = Some(generator.full_path(&request));
            report
        }
        Err(e) => RequestReport::failed(e.request_path, Some(&e.source)),
    }
}
