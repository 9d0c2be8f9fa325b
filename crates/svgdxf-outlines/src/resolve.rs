use crate::Result;
use crate::platform::PlatformIdentifier;
use std::path::{Path, PathBuf};
use svgdxf_core::SvgDxfError;
use svgdxf_core::config::consts;

/// Where the dxf_outlines executable is looked up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExecutableSource {
    /// Next to the running application
    #[default]
    InstallDir,
    /// `<dir>/<base>-<platform>`
    BaseDir(PathBuf),
    /// Exactly this file, no platform resolution
    Explicit(PathBuf),
}

impl ExecutableSource {
    /// Resolves to an existing executable path.
    pub fn resolve(&self, base_name: &str) -> Result<PathBuf> {
        match self {
            ExecutableSource::InstallDir => {
                let platform = PlatformIdentifier::current()?;
                resolve_in(&install_dir()?, base_name, &platform)
            }
            ExecutableSource::BaseDir(dir) => {
                let platform = PlatformIdentifier::current()?;
                resolve_in(dir, base_name, &platform)
            }
            ExecutableSource::Explicit(path) => check_exists(path, "explicit executable"),
        }
    }
}

/// Directory containing the running executable
pub fn install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        SvgDxfError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} has no parent directory", exe.display()),
        ))
    })
}

/// Resolves the default dxf_outlines executable for this platform under `base_dir`
pub fn resolve_executable_path(base_dir: &Path) -> Result<PathBuf> {
    let platform = PlatformIdentifier::current()?;
    resolve_in(base_dir, consts::tool::DEFAULT_BASE_NAME, &platform)
}

/// Resolves `<base_dir>/<base_name>-<platform>` and checks it exists
pub fn resolve_in(
    base_dir: &Path,
    base_name: &str,
    platform: &PlatformIdentifier,
) -> Result<PathBuf> {
    let path = base_dir.join(platform.executable_name(base_name));
    check_exists(&path, &platform.suffix())
}

fn check_exists(path: &Path, target: &str) -> Result<PathBuf> {
    if path.is_file() {
        tracing::debug!("resolved dxf_outlines at {}", path.display());
        Ok(path.to_path_buf())
    } else {
        Err(SvgDxfError::ExecutableNotFound {
            path: path.to_path_buf(),
            target: target.to_string(),
        })
    }
}
