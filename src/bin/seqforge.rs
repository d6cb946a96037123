use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use seqforge::app::{App, RunOptions};
use seqforge::config::ConfigLoader;
use seqforge::domain::NamingConvention;
use seqforge::error::ForgeError;
use seqforge::fetch::HttpFetchClient;
use seqforge::naming::NamingMap;
use seqforge::output::{ConsoleSink, JsonOutput, OutputMode};
use seqforge::package::SystemPackagingTool;
use seqforge::store::Workspace;

#[derive(Parser)]
#[command(name = "seqforge")]
#[command(about = "Assemble an installable genome sequence data package")]
#[command(version, author)]
struct Cli {
    /// Run-configuration JSON path
    #[arg(long)]
    config: String,

    /// Naming-map JSON path (required with --naming ucsc)
    #[arg(long)]
    naming_map: Option<String>,

    /// Target naming convention for sequence identifiers
    #[arg(long, value_enum, ignore_case = true, default_value_t = NamingConvention::Ensembl)]
    naming: NamingConvention,

    /// Re-download sequences and rebuild the package even if artifacts exist
    #[arg(long)]
    force: bool,

    /// Report every decision without fetching, writing or building
    #[arg(long)]
    dry_run: bool,

    /// Print a machine-readable run report instead of progress lines
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(forge) = report.downcast_ref::<ForgeError>() {
            return ExitCode::from(map_exit_code(forge));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &ForgeError) -> u8 {
    match error {
        ForgeError::ConfigRead(_)
        | ForgeError::ConfigParse(_)
        | ForgeError::ConfigInvalid(_)
        | ForgeError::NamingMapRead(_)
        | ForgeError::NamingMapParse(_)
        | ForgeError::InvalidChromosomeId(_)
        | ForgeError::InvalidNamingConvention(_) => 2,
        ForgeError::Fetch { .. }
        | ForgeError::FetchStatus { .. }
        | ForgeError::MissingTool(_)
        | ForgeError::BuildTool(_) => 3,
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
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    let config = ConfigLoader::resolve(Path::new(&cli.config))?;
    let naming_map = match (&cli.naming_map, cli.naming) {
        (Some(path), _) => Some(NamingMap::load(Path::new(path))?),
        (None, NamingConvention::Ucsc) => {
            return Err(ForgeError::ConfigInvalid(
                "--naming-map is required with --naming ucsc".to_string(),
            )
            .into());
        }
        (None, NamingConvention::Ensembl) => None,
    };

    let workspace = Workspace::new(config.workdir.clone());
    let fetcher = HttpFetchClient::new()?;
    let tool = SystemPackagingTool::new();
    let app = App::new(config, workspace, fetcher, tool);

    let options = RunOptions {
        force: cli.force,
        dry_run: cli.dry_run,
        naming: cli.naming,
    };

    match output_mode {
        OutputMode::Json => {
            let result = app.run(naming_map.as_ref(), options, &JsonOutput)?;
            JsonOutput::print_run(&result).into_diagnostic()?;
        }
        OutputMode::Text => {
            let sink = ConsoleSink;
            let result = app.run(naming_map.as_ref(), options, &sink)?;
            if let Some(archive) = &result.archive_path {
                println!("{} archive at {archive}", seqforge::output::iso_timestamp());
            }
        }
    }
    Ok(())
}
