use serde::Serialize;

use crate::config::ForgeConfig;
use crate::domain::{ChromosomeId, NamingConvention, should_act};
use crate::error::ForgeError;
use crate::fetch::{FetchClient, FetchOutcome, ensure_fetched};
use crate::manifest::ManifestBuilder;
use crate::naming::{NamingMap, translate};
use crate::package::{BuildOutcome, PackagingTool, ensure_archive_built, ensure_source_built};
use crate::sequence;
use crate::store::Workspace;
use crate::transform::{TransformOutcome, ensure_alternate_naming};

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub force: bool,
    pub dry_run: bool,
    pub naming: NamingConvention,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub package: String,
    pub version: String,
    pub naming: String,
    pub chromosomes: Vec<ChromosomeReport>,
    pub seed_path: Option<String>,
    pub source_action: String,
    pub archive_action: String,
    pub archive_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChromosomeReport {
    pub id: String,
    pub final_id: String,
    pub fetch_action: String,
    pub transform_action: Option<String>,
    pub sequence_path: String,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

/// Single-pass orchestration of the whole pipeline: fetch gate, validation,
/// naming transform, manifest derivation and the two package-build gates.
pub struct App<F: FetchClient, P: PackagingTool> {
    config: ForgeConfig,
    workspace: Workspace,
    fetcher: F,
    tool: P,
}

impl<F: FetchClient, P: PackagingTool> App<F, P> {
    pub fn new(config: ForgeConfig, workspace: Workspace, fetcher: F, tool: P) -> Self {
        Self {
            config,
            workspace,
            fetcher,
            tool,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn run(
        &self,
        naming_map: Option<&NamingMap>,
        options: RunOptions,
        sink: &dyn ProgressSink,
    ) -> Result<RunResult, ForgeError> {
        let map = if options.naming.is_alternate() {
            let map = naming_map.ok_or_else(|| {
                ForgeError::ConfigInvalid("naming map required for ucsc naming".to_string())
            })?;
            // Surface an unmapped id before the first byte leaves the network.
            map.check_coverage(self.config.chromosomes.iter().chain(&self.config.circular))?;
            Some(map)
        } else {
            None
        };

        if !options.dry_run {
            self.workspace.ensure_seqs_dir()?;
        }

        let mut chromosomes = Vec::with_capacity(self.config.chromosomes.len());
        for id in &self.config.chromosomes {
            chromosomes.push(self.process_chromosome(id, map, options, sink)?);
        }

        let manifest =
            ManifestBuilder::build(&self.config, options.naming, map, &self.workspace.seqs_dir())?;
        let seed_path = self.workspace.seed_path(&self.config.package.name);
        if options.dry_run {
            sink.event(ProgressEvent {
                message: format!("phase=Manifest; would write seed {seed_path}"),
            });
        } else {
            Workspace::write_bytes_atomic(&seed_path, manifest.to_seed_document().as_bytes())?;
            sink.event(ProgressEvent {
                message: format!("phase=Manifest; wrote seed {seed_path}"),
            });
        }

        let source_dir = self.workspace.package_source_dir(&self.config.package.name);
        let archive_path = self
            .workspace
            .archive_path(&self.config.package.name, &self.config.package.version);

        let (source_action, archive_action) = if options.dry_run {
            let source = if should_act(options.force, source_dir.as_std_path().exists()) {
                "forge"
            } else {
                "skip"
            };
            let archive = if should_act(options.force, archive_path.as_std_path().exists()) {
                "build"
            } else {
                "skip"
            };
            sink.event(ProgressEvent {
                message: format!("phase=Package; would {source} source {source_dir}"),
            });
            sink.event(ProgressEvent {
                message: format!("phase=Package; would {archive} archive {archive_path}"),
            });
            (source.to_string(), archive.to_string())
        } else {
            let source = match ensure_source_built(
                &self.tool,
                &seed_path,
                &self.workspace.seqs_dir(),
                &source_dir,
                options.force,
            )? {
                BuildOutcome::Built => {
                    sink.event(ProgressEvent {
                        message: format!("phase=Package; forged source {source_dir}"),
                    });
                    "forge"
                }
                BuildOutcome::Skipped => {
                    sink.event(ProgressEvent {
                        message: format!(
                            "phase=Package; source {source_dir} exists; pass --force or delete it to rebuild"
                        ),
                    });
                    "skip"
                }
            };
            let archive = match ensure_archive_built(
                &self.tool,
                &source_dir,
                &archive_path,
                options.force,
            )? {
                BuildOutcome::Built => {
                    sink.event(ProgressEvent {
                        message: format!("phase=Package; built archive {archive_path}"),
                    });
                    "build"
                }
                BuildOutcome::Skipped => {
                    sink.event(ProgressEvent {
                        message: format!(
                            "phase=Package; archive {archive_path} exists; pass --force or delete it to rebuild"
                        ),
                    });
                    "skip"
                }
            };
            (source.to_string(), archive.to_string())
        };

        Ok(RunResult {
            package: self.config.package.name.clone(),
            version: self.config.package.version.clone(),
            naming: options.naming.to_string(),
            chromosomes,
            seed_path: (!options.dry_run).then(|| seed_path.to_string()),
            source_action,
            archive_action,
            archive_path: archive_path
                .as_std_path()
                .exists()
                .then(|| archive_path.to_string()),
        })
    }

    fn process_chromosome(
        &self,
        id: &ChromosomeId,
        map: Option<&NamingMap>,
        options: RunOptions,
        sink: &dyn ProgressSink,
    ) -> Result<ChromosomeReport, ForgeError> {
        let destination = self.workspace.sequence_path(id.as_str());
        let url = self.config.sequence_url(id);
        let final_id = translate(id, options.naming, map)?;
        let final_path = if options.naming.is_alternate() {
            self.workspace.sequence_path(final_id.as_str())
        } else {
            destination.clone()
        };

        if options.dry_run {
            let fetch_action = if should_act(options.force, destination.as_std_path().exists()) {
                "download"
            } else {
                "skip"
            };
            sink.event(ProgressEvent {
                message: format!("phase=Fetch; would {fetch_action} {url}"),
            });
            let transform_action = map.map(|_| {
                if final_path.as_std_path().exists() {
                    "skip".to_string()
                } else {
                    "write".to_string()
                }
            });
            return Ok(ChromosomeReport {
                id: id.to_string(),
                final_id: final_id.to_string(),
                fetch_action: fetch_action.to_string(),
                transform_action,
                sequence_path: final_path.to_string(),
            });
        }

        sink.event(ProgressEvent {
            message: format!("phase=Fetch; chromosome {id} from {url}"),
        });
        let outcome = ensure_fetched(&self.fetcher, &url, &destination, options.force)?;
        let mut records = match outcome {
            FetchOutcome::Fetched => {
                let records = sequence::validate(&destination)?;
                sink.event(ProgressEvent {
                    message: format!(
                        "phase=Verify; {} record(s) in {destination}",
                        records.len()
                    ),
                });
                Some(records)
            }
            FetchOutcome::Skipped => {
                sink.event(ProgressEvent {
                    message: format!("phase=Fetch; {destination} present, skipping download"),
                });
                None
            }
        };

        let transform_action = match map {
            Some(map) => {
                let transform = if final_path.as_std_path().exists() {
                    TransformOutcome::Skipped
                } else {
                    // A skipped fetch means the records were never parsed;
                    // read them now.
                    let parsed = match records.take() {
                        Some(records) => records,
                        None => sequence::validate(&destination)?,
                    };
                    ensure_alternate_naming(id, &parsed, map, &final_path)?
                };
                match transform {
                    TransformOutcome::Written => {
                        sink.event(ProgressEvent {
                            message: format!("phase=Rename; wrote {final_path}"),
                        });
                        Some("write".to_string())
                    }
                    TransformOutcome::Skipped => {
                        sink.event(ProgressEvent {
                            message: format!("phase=Rename; {final_path} present, skipping"),
                        });
                        Some("skip".to_string())
                    }
                }
            }
            None => None,
        };

        Ok(ChromosomeReport {
            id: id.to_string(),
            final_id: final_id.to_string(),
            fetch_action: match outcome {
                FetchOutcome::Fetched => "download".to_string(),
                FetchOutcome::Skipped => "skip".to_string(),
            },
            transform_action,
            sequence_path: final_path.to_string(),
        })
    }
}
