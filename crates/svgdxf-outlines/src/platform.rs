use crate::Result;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use svgdxf_core::SvgDxfError;

/// Directories searched for the musl dynamic linker
pub const MUSL_LINKER_DIRS: [&str; 2] = ["/lib", "/lib64"];

const MUSL_LINKER_PREFIX: &str = "ld-musl-";

static CURRENT: OnceLock<PlatformIdentifier> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    MacOS,
    Windows,
}

impl Os {
    /// Maps a `std::env::consts::OS` value
    pub fn from_consts(os: &str) -> Option<Os> {
        match os {
            "linux" => Some(Os::Linux),
            "macos" => Some(Os::MacOS),
            "windows" => Some(Os::Windows),
            _ => None,
        }
    }

    /// Token used in executable names
    pub fn token(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::MacOS => "osx",
            Os::Windows => "win",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    /// Maps a `std::env::consts::ARCH` value
    pub fn from_consts(arch: &str) -> Option<Arch> {
        match arch {
            "x86_64" => Some(Arch::X64),
            "aarch64" => Some(Arch::Arm64),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Libc {
    Glibc,
    Musl,
    /// Not applicable (macOS, Windows)
    None,
}

/// OS, architecture and libc flavour selecting one dxf_outlines build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlatformIdentifier {
    pub os: Os,
    pub arch: Arch,
    pub libc: Libc,
}

impl PlatformIdentifier {
    /// Platform of the running process, detected once and cached.
    pub fn current() -> Result<PlatformIdentifier> {
        if let Some(platform) = CURRENT.get() {
            return Ok(*platform);
        }
        let detected = Self::from_consts(std::env::consts::OS, std::env::consts::ARCH)?;
        Ok(*CURRENT.get_or_init(|| detected))
    }

    /// Builds an identifier from `std::env::consts`-style values.
    ///
    /// On Linux the libc flavour is probed from the filesystem.
    pub fn from_consts(os: &str, arch: &str) -> Result<PlatformIdentifier> {
        let unsupported = || SvgDxfError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        };
        let os_kind = Os::from_consts(os).ok_or_else(unsupported)?;
        let arch_kind = Arch::from_consts(arch).ok_or_else(unsupported)?;

        let libc = match os_kind {
            Os::Linux => detect_libc(&MUSL_LINKER_DIRS.map(|dir| Path::new(dir))),
            Os::MacOS | Os::Windows => Libc::None,
        };

        Ok(Self::new(os_kind, arch_kind, libc))
    }

    /// Normalizes `libc` so that only Linux carries a libc flavour
    pub fn new(os: Os, arch: Arch, libc: Libc) -> PlatformIdentifier {
        let libc = match (os, libc) {
            (Os::Linux, Libc::None) => Libc::Glibc,
            (Os::Linux, libc) => libc,
            _ => Libc::None,
        };
        PlatformIdentifier { os, arch, libc }
    }

    /// e.g. `linux-musl-arm64`, `osx-x64`
    pub fn suffix(&self) -> String {
        match self.libc {
            Libc::Musl => format!("{}-musl-{}", self.os.token(), self.arch.token()),
            Libc::Glibc | Libc::None => format!("{}-{}", self.os.token(), self.arch.token()),
        }
    }

    /// `<base>-<suffix>`, with `.exe` on Windows
    pub fn executable_name(&self, base_name: &str) -> String {
        match self.os {
            Os::Windows => format!("{}-{}.exe", base_name, self.suffix()),
            Os::Linux | Os::MacOS => format!("{}-{}", base_name, self.suffix()),
        }
    }
}

impl fmt::Display for PlatformIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.suffix())
    }
}

/// Musl if any `ld-musl-*` entry exists in `dirs`, glibc otherwise.
///
/// Unreadable directories count as "not found".
pub fn detect_libc(dirs: &[&Path]) -> Libc {
    for dir in dirs {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::trace!("libc probe skipped {}: {}", dir.display(), e);
                continue;
            }
        };
        let found = entries
            .flatten()
            .any(|entry| entry.file_name().to_string_lossy().starts_with(MUSL_LINKER_PREFIX));
        if found {
            return Libc::Musl;
        }
    }
    Libc::Glibc
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_current_succeeds() {
        let platform = PlatformIdentifier::current();
        assert!(platform.is_ok(), "current platform should be supported");
    }

    #[test]
    fn test_current_is_cached() {
        let first = PlatformIdentifier::current().unwrap();
        let second = PlatformIdentifier::current().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    #[cfg(target_os = "macos")]
    fn test_current_macos() {
        let platform = PlatformIdentifier::current().unwrap();
        assert_eq!(platform.os, Os::MacOS);
        assert_eq!(platform.libc, Libc::None);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_current_linux_has_libc() {
        let platform = PlatformIdentifier::current().unwrap();
        assert_eq!(platform.os, Os::Linux);
        assert_ne!(platform.libc, Libc::None);
    }

    #[test]
    #[cfg(target_arch = "x86_64")]
    fn test_current_x64() {
        assert_eq!(PlatformIdentifier::current().unwrap().arch, Arch::X64);
    }

    #[test]
    #[cfg(target_arch = "aarch64")]
    fn test_current_arm64() {
        assert_eq!(PlatformIdentifier::current().unwrap().arch, Arch::Arm64);
    }

    #[test]
    fn test_executable_names() {
        let cases = [
            (Os::Linux, Arch::X64, Libc::Glibc, "dxf_outlines-linux-x64"),
            (Os::Linux, Arch::Arm64, Libc::Glibc, "dxf_outlines-linux-arm64"),
            (Os::Linux, Arch::X64, Libc::Musl, "dxf_outlines-linux-musl-x64"),
            (Os::Linux, Arch::Arm64, Libc::Musl, "dxf_outlines-linux-musl-arm64"),
            (Os::MacOS, Arch::X64, Libc::None, "dxf_outlines-osx-x64"),
            (Os::MacOS, Arch::Arm64, Libc::None, "dxf_outlines-osx-arm64"),
            (Os::Windows, Arch::X64, Libc::None, "dxf_outlines-win-x64.exe"),
            (Os::Windows, Arch::Arm64, Libc::None, "dxf_outlines-win-arm64.exe"),
        ];

        for (os, arch, libc, expected) in cases {
            let platform = PlatformIdentifier::new(os, arch, libc);
            assert_eq!(platform.executable_name("dxf_outlines"), expected);
        }
    }

    #[test]
    fn test_new_normalizes_libc() {
        assert_eq!(
            PlatformIdentifier::new(Os::Linux, Arch::X64, Libc::None).libc,
            Libc::Glibc
        );
        assert_eq!(
            PlatformIdentifier::new(Os::MacOS, Arch::X64, Libc::Musl).libc,
            Libc::None
        );
    }

    #[test]
    fn test_unsupported_os() {
        let err = PlatformIdentifier::from_consts("freebsd", "x86_64").unwrap_err();
        assert!(matches!(err, SvgDxfError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn test_unsupported_arch() {
        for arch in ["x86", "riscv64", "powerpc64", "arm"] {
            let err = PlatformIdentifier::from_consts("linux", arch).unwrap_err();
            assert!(
                matches!(err, SvgDxfError::UnsupportedPlatform { .. }),
                "{} should be unsupported",
                arch
            );
        }
    }

    #[test]
    fn test_detect_libc_musl() {
        let lib = TempDir::new().unwrap();
        std::fs::write(lib.path().join("ld-musl-x86_64.so.1"), b"").unwrap();
        assert_eq!(detect_libc(&[lib.path()]), Libc::Musl);
    }

    #[test]
    fn test_detect_libc_second_dir() {
        let lib = TempDir::new().unwrap();
        let lib64 = TempDir::new().unwrap();
        std::fs::write(lib.path().join("libc.so.6"), b"").unwrap();
        std::fs::write(lib64.path().join("ld-musl-aarch64.so.1"), b"").unwrap();
        assert_eq!(detect_libc(&[lib.path(), lib64.path()]), Libc::Musl);
    }

    #[test]
    fn test_detect_libc_defaults_to_glibc() {
        let lib = TempDir::new().unwrap();
        std::fs::write(lib.path().join("ld-linux-x86-64.so.2"), b"").unwrap();
        assert_eq!(detect_libc(&[lib.path()]), Libc::Glibc);
    }

    #[test]
    fn test_detect_libc_missing_dirs() {
        let missing = Path::new("/definitely/not/a/lib/dir");
        assert_eq!(detect_libc(&[missing]), Libc::Glibc);
    }
}
