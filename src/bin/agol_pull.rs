use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use agol_geotable::app::{App, PullSummary};
use agol_geotable::config::{ConfigLoader, Overrides};
use agol_geotable::error::GeotableError;
use agol_geotable::output::{self, JsonOutput, ProgressWriter};
use agol_geotable::service::ArcGisHttpClient;

#[derive(Parser)]
#[command(name = "agol-pull")]
#[command(about = "Pull every feature from an ArcGIS feature service layer, past its record limit")]
#[command(version, author)]
struct Cli {
    /// Feature service layer url, e.g. https://.../FeatureServer/0
    layer_url: Option<String>,

    #[arg(long)]
    config: Option<String>,

    /// Access token; defaults to the AGOL_TOKEN environment variable.
    #[arg(long)]
    token: Option<String>,

    /// Object ids per request (default 225).
    #[arg(long)]
    batch_size: Option<usize>,

    /// Keep geometries in EPSG:4326 instead of reprojecting to EPSG:26910.
    #[arg(long)]
    no_reproject: bool,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Write the table as GeoJSON to this path.
    #[arg(long)]
    output: Option<Utf8PathBuf>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<GeotableError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &GeotableError) -> u8 {
    match error {
        GeotableError::Transport(_)
        | GeotableError::HttpStatus { .. }
        | GeotableError::MalformedResponse(_) => 3,
        GeotableError::MissingLayerUrl
        | GeotableError::InvalidLayerUrl(_)
        | GeotableError::InvalidBatchSize(_)
        | GeotableError::ConfigRead(_)
        | GeotableError::ConfigParse(_) => 2,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let overrides = Overrides {
        layer_url: cli.layer_url,
        batch_size: cli.batch_size,
        reproject: cli.no_reproject.then_some(false),
        timeout_secs: cli.timeout,
        token: cli.token,
    };
    let resolved = ConfigLoader::resolve(cli.config.as_deref(), overrides)?;

    let client = ArcGisHttpClient::with_timeout(
        resolved.layer_url.clone(),
        resolved.token.clone(),
        resolved.timeout,
    )?;
    let app = App::new(client);

    // progress goes to stderr so stdout stays a clean JSON summary
    let pulled = app.pull(resolved.options, &ProgressWriter::stderr())?;

    let mut summary = PullSummary::new(
        resolved.layer_url.as_str(),
        pulled.object_ids,
        resolved.options,
        &pulled.table,
    );
    if let Some(path) = &cli.output {
        output::write_geojson(&pulled.table, path)?;
        summary.output_path = Some(path.to_string());
    }

    JsonOutput::print_summary(&summary).into_diagnostic()?;
    Ok(())
}
