//! Stand-in dxf_outlines executables written as POSIX shell scripts
//!
//! Every fake records what it was asked to do:
//! - `warmup_log`: `start <pid>` / `end <pid>` for each `--help` run
//! - `args_log`: the arguments of the last conversion, one per line
//! - `stdin_copy`: the stdin of the last conversion
//! - `runs_log`: one line per conversion

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Minimal DXF document written by [`FakeBehavior::Dxf`]
pub const FAKE_DXF: &str = "  0\nSECTION\n  2\nHEADER\n  0\nENDSEC\n  0\nSECTION\n  2\nENTITIES\n  0\nLWPOLYLINE\n  0\nENDSEC\n  0\nEOF\n";

#[derive(Debug, Clone)]
pub enum FakeBehavior {
    /// Consume stdin, print [`FAKE_DXF`], exit 0
    Dxf,
    /// Consume stdin, print each line to stderr, exit with `exit_code`
    Fail {
        exit_code: i32,
        stderr_lines: Vec<String>,
    },
    /// Consume stdin, sleep, then behave like `Dxf`
    Slow { seconds: u32 },
    /// Print `count` stderr lines of ~20 bytes, exit 1
    StderrFlood { count: usize },
    /// Print [`FAKE_DXF`] without reading stdin
    IgnoreStdin,
}

#[derive(Debug, Clone)]
pub struct FakeTool {
    pub path: PathBuf,
    pub warmup_log: PathBuf,
    pub args_log: PathBuf,
    pub stdin_copy: PathBuf,
    pub runs_log: PathBuf,
}

impl FakeTool {
    /// Writes an executable script `dir/file_name`; logs go to `dir/.fake/`
    pub fn install(dir: &Path, file_name: &str, behavior: FakeBehavior) -> FakeTool {
        Self::install_with_warmup_delay(dir, file_name, behavior, "0")
    }

    /// Like [`FakeTool::install`], with `--help` sleeping `delay` seconds (e.g. `"0.2"`)
    pub fn install_with_warmup_delay(
        dir: &Path,
        file_name: &str,
        behavior: FakeBehavior,
        delay: &str,
    ) -> FakeTool {
        let logs = dir.join(".fake");
        fs::create_dir_all(&logs).expect("Failed to create fake log directory");

        let tool = FakeTool {
            path: dir.join(file_name),
            warmup_log: logs.join("warmup.log"),
            args_log: logs.join("args.log"),
            stdin_copy: logs.join("stdin.svg"),
            runs_log: logs.join("runs.log"),
        };

        let script = format!(
            r#"#!/bin/sh
if [ "$1" = "--help" ]; then
  echo "start $$" >> '{warmup}'
  sleep {delay}
  echo "end $$" >> '{warmup}'
  echo "usage: dxf_outlines [--POLY b] [--FLATTENBEZ b] [--ROBO b] [--unit_from_document b] [--units u] [--encoding e]"
  exit 0
fi
echo run >> '{runs}'
printf '%s\n' "$@" > '{args}'
{body}
"#,
            warmup = tool.warmup_log.display(),
            runs = tool.runs_log.display(),
            args = tool.args_log.display(),
            delay = delay,
            body = behavior_body(&behavior, &tool.stdin_copy),
        );

        fs::write(&tool.path, script).expect("Failed to write fake tool");
        let mut perms = fs::metadata(&tool.path)
            .expect("Failed to get metadata")
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&tool.path, perms).expect("Failed to set permissions");

        tool
    }

    /// Number of completed `--help` runs
    pub fn warmup_count(&self) -> usize {
        read_lines(&self.warmup_log)
            .iter()
            .filter(|l| l.starts_with("end "))
            .count()
    }

    /// Raw `start`/`end` sequence of all warmup runs
    pub fn warmup_events(&self) -> Vec<String> {
        read_lines(&self.warmup_log)
    }

    pub fn run_count(&self) -> usize {
        read_lines(&self.runs_log).len()
    }

    /// Arguments of the last conversion
    pub fn last_args(&self) -> Vec<String> {
        read_lines(&self.args_log)
    }

    /// Stdin of the last conversion
    pub fn last_stdin(&self) -> Vec<u8> {
        fs::read(&self.stdin_copy).unwrap_or_default()
    }
}

fn behavior_body(behavior: &FakeBehavior, stdin_copy: &Path) -> String {
    let consume = format!("cat > '{}'", stdin_copy.display());
    let dxf = format!("printf '{}'", FAKE_DXF.replace('\n', "\\n"));
    match behavior {
        FakeBehavior::Dxf => format!("{}\n{}\nexit 0", consume, dxf),
        FakeBehavior::Fail {
            exit_code,
            stderr_lines,
        } => {
            let mut body = consume;
            for line in stderr_lines {
                body.push_str(&format!("\necho '{}' >&2", line.replace('\'', "")));
            }
            body.push_str(&format!("\nexit {}", exit_code));
            body
        }
        FakeBehavior::Slow { seconds } => {
            format!("{}\nsleep {}\n{}\nexit 0", consume, seconds, dxf)
        }
        FakeBehavior::StderrFlood { count } => format!(
            "{}\ni=0\nwhile [ $i -lt {} ]; do\n  echo \"diagnostic line $i\" >&2\n  i=$((i+1))\ndone\nexit 1",
            consume, count
        ),
        FakeBehavior::IgnoreStdin => format!("{}\nexit 0", dxf),
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
