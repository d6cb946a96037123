use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use camino::Utf8Path;

use crate::domain::should_act;
use crate::error::ForgeError;

pub fn archive_name(package: &str, version: &str) -> String {
    format!("{package}_{version}.tar.gz")
}

/// External packaging boundary: forge package source files from the seed
/// document and sequence directory, then build a distributable archive from
/// the forged source. Both primitives are opaque to this crate.
pub trait PackagingTool: Send + Sync {
    fn forge_source(&self, seed: &Path, seqs_dir: &Path, dest_dir: &Path)
        -> Result<(), ForgeError>;
    fn build_archive(&self, source_dir: &Path, workdir: &Path) -> Result<(), ForgeError>;
}

/// Drives the R toolchain found on PATH: `Rscript` for forging the package
/// source via BSgenome, `R CMD build` for the archive.
#[derive(Clone)]
pub struct SystemPackagingTool {
    rscript: Option<PathBuf>,
    r: Option<PathBuf>,
}

impl SystemPackagingTool {
    pub fn new() -> Self {
        Self {
            rscript: find_in_path("Rscript"),
            r: find_in_path("R"),
        }
    }

    fn require_rscript(&self) -> Result<&PathBuf, ForgeError> {
        self.rscript
            .as_ref()
            .ok_or_else(|| ForgeError::MissingTool("Rscript".to_string()))
    }

    fn require_r(&self) -> Result<&PathBuf, ForgeError> {
        self.r
            .as_ref()
            .ok_or_else(|| ForgeError::MissingTool("R".to_string()))
    }

    fn run_cmd(&self, program: &Path, args: &[String], cwd: Option<&Path>) -> Result<(), ForgeError> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        let output = cmd
            .output()
            .map_err(|err| ForgeError::BuildTool(err.to_string()))?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            format!("command failed: {}", program.display())
        } else {
            stderr
        };
        Err(ForgeError::BuildTool(message))
    }
}

impl PackagingTool for SystemPackagingTool {
    fn forge_source(
        &self,
        seed: &Path,
        seqs_dir: &Path,
        dest_dir: &Path,
    ) -> Result<(), ForgeError> {
        let rscript = self.require_rscript()?;
        let expr = format!(
            "BSgenome::forgeBSgenomeDataPkg('{}', seqs_srcdir='{}', destdir='{}')",
            seed.display(),
            seqs_dir.display(),
            dest_dir.display()
        );
        self.run_cmd(rscript.as_path(), &["-e".to_string(), expr], None)
    }

    fn build_archive(&self, source_dir: &Path, workdir: &Path) -> Result<(), ForgeError> {
        let r = self.require_r()?;
        let args = vec![
            "CMD".to_string(),
            "build".to_string(),
            source_dir.to_string_lossy().to_string(),
        ];
        self.run_cmd(r.as_path(), &args, Some(workdir))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Built,
    Skipped,
}

/// Forge the package source tree unless it already exists. On force, the
/// stale tree is deleted before the tool runs; a partially forged tree left
/// behind by a failed run must be cleaned up manually.
pub fn ensure_source_built(
    tool: &dyn PackagingTool,
    seed: &Utf8Path,
    seqs_dir: &Utf8Path,
    source_dir: &Utf8Path,
    force: bool,
) -> Result<BuildOutcome, ForgeError> {
    let exists = source_dir.as_std_path().exists();
    if !should_act(force, exists) {
        return Ok(BuildOutcome::Skipped);
    }
    if exists {
        fs::remove_dir_all(source_dir.as_std_path())
            .map_err(|err| ForgeError::Filesystem(err.to_string()))?;
    }
    let dest_dir = source_dir
        .parent()
        .ok_or_else(|| ForgeError::Filesystem("invalid package source path".to_string()))?;
    tool.forge_source(
        seed.as_std_path(),
        seqs_dir.as_std_path(),
        dest_dir.as_std_path(),
    )?;
    Ok(BuildOutcome::Built)
}

/// Build the distributable archive unless it already exists, then confirm
/// the tool actually produced it.
pub fn ensure_archive_built(
    tool: &dyn PackagingTool,
    source_dir: &Utf8Path,
    archive_path: &Utf8Path,
    force: bool,
) -> Result<BuildOutcome, ForgeError> {
    if !should_act(force, archive_path.as_std_path().exists()) {
        return Ok(BuildOutcome::Skipped);
    }
    let workdir = archive_path
        .parent()
        .ok_or_else(|| ForgeError::Filesystem("invalid archive path".to_string()))?;
    tool.build_archive(source_dir.as_std_path(), workdir.as_std_path())?;
    if !archive_path.as_std_path().exists() {
        return Err(ForgeError::BuildTool(format!(
            "expected archive {archive_path} was not produced"
        )));
    }
    Ok(BuildOutcome::Built)
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for path in std::env::split_paths(&path_var) {
        let exe = path.join(format!("{name}.exe"));
        if exe.exists() {
            return Some(exe);
        }
        let plain = path.join(name);
        if plain.exists() {
            return Some(plain);
        }
    }
    None
}
