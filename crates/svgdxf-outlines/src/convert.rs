use crate::Result;
use crate::args;
use crate::resolve::ExecutableSource;
use crate::sink::{StderrSink, TracingSink};
use crate::warmup::{self, WarmupCoordinator};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;
use svgdxf_core::config::consts;
use svgdxf_core::{Config, ConversionOptions, SvgDxfError};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStderr, Command};
use tokio_util::sync::CancellationToken;

/// Outcome of one dxf_outlines run, before it is turned into output or an error
#[derive(Debug, Clone)]
pub struct InvocationResult {
    /// `-1` when the process was terminated by a signal
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<String>,
    /// Lines seen by the sink after the retained prefix filled the byte cap
    pub dropped_stderr_lines: usize,
}

impl InvocationResult {
    /// Non-zero exits carry the retained stderr prefix, plus a
    /// `... (N more lines)` marker when lines were dropped
    pub fn into_output(self) -> Result<Vec<u8>> {
        if self.exit_code == 0 {
            return Ok(self.stdout);
        }
        let mut stderr = self.stderr.join("\n");
        if self.dropped_stderr_lines > 0 {
            if !stderr.is_empty() {
                stderr.push('\n');
            }
            stderr.push_str(&format!("... ({} more lines)", self.dropped_stderr_lines));
        }
        Err(SvgDxfError::ConversionFailed {
            exit_code: self.exit_code,
            stderr,
        })
    }
}

/// Runs SVG → DXF conversions through the dxf_outlines executable
#[derive(Clone)]
pub struct Converter {
    source: ExecutableSource,
    base_name: String,
    warmup: Arc<WarmupCoordinator>,
    sink: Arc<dyn StderrSink>,
    max_stderr_bytes: usize,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("source", &self.source)
            .field("base_name", &self.base_name)
            .field("lock_path", &self.warmup.lock_path())
            .field("max_stderr_bytes", &self.max_stderr_bytes)
            .finish_non_exhaustive()
    }
}

impl Converter {
    /// Executable next to the running application, process-wide warmup
    pub fn new() -> Self {
        Self {
            source: ExecutableSource::InstallDir,
            base_name: consts::tool::DEFAULT_BASE_NAME.to_string(),
            warmup: warmup::global(),
            sink: Arc::new(TracingSink),
            max_stderr_bytes: consts::diagnostics::MAX_STDERR_BYTES,
        }
    }

    /// Applies `[tool]`, `[warmup]` and `[diagnostics]` from `config`.
    ///
    /// A config whose lock path and `[warmup]` settings are the defaults
    /// shares the process-wide warmup.
    pub fn from_config(config: &Config) -> Self {
        let source = match (&config.tool.executable, &config.tool.base_dir) {
            (Some(exe), _) => ExecutableSource::Explicit(exe.clone()),
            (None, Some(dir)) => ExecutableSource::BaseDir(dir.clone()),
            (None, None) => ExecutableSource::InstallDir,
        };
        let global = warmup::global();
        let warmup = if global.matches_config(config) {
            global
        } else {
            Arc::new(WarmupCoordinator::from_config(config))
        };

        Self {
            source,
            base_name: config.tool.base_name.clone(),
            warmup,
            sink: Arc::new(TracingSink),
            max_stderr_bytes: config.diagnostics.max_stderr_bytes,
        }
    }

    pub fn with_source(mut self, source: ExecutableSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_base_dir(self, dir: impl Into<PathBuf>) -> Self {
        self.with_source(ExecutableSource::BaseDir(dir.into()))
    }

    pub fn with_executable(self, path: impl Into<PathBuf>) -> Self {
        self.with_source(ExecutableSource::Explicit(path.into()))
    }

    pub fn with_warmup(mut self, warmup: Arc<WarmupCoordinator>) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn with_stderr_sink(mut self, sink: Arc<dyn StderrSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_max_stderr_bytes(mut self, max_stderr_bytes: usize) -> Self {
        self.max_stderr_bytes = max_stderr_bytes;
        self
    }

    pub fn source(&self) -> &ExecutableSource {
        &self.source
    }

    pub fn warmup(&self) -> &Arc<WarmupCoordinator> {
        &self.warmup
    }

    /// Resolves the executable this converter would run
    pub fn executable_path(&self) -> Result<PathBuf> {
        self.source.resolve(&self.base_name)
    }

    /// Ensures the executable is resolved and warmed up, without converting
    pub async fn warm_up(&self, token: &CancellationToken) -> Result<PathBuf> {
        let executable = self.executable_path()?;
        self.warmup.ensure_warmed_up(&executable, token).await?;
        Ok(executable)
    }

    /// Converts an SVG document to DXF bytes.
    ///
    /// An empty `input` is rejected the same way as a missing document:
    /// there is nothing for the tool to convert.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for empty input or invalid options (nothing is spawned)
    /// - `Cancelled` if `token` fires before or during the run
    /// - `UnsupportedPlatform` / `ExecutableNotFound` from resolution
    /// - `ConversionFailed` when dxf_outlines exits non-zero
    pub async fn convert(
        &self,
        input: &[u8],
        options: &ConversionOptions,
        token: &CancellationToken,
    ) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Err(SvgDxfError::InvalidArgument(
                "input SVG document is empty".to_string(),
            ));
        }
        options.validate().map_err(SvgDxfError::InvalidArgument)?;
        if token.is_cancelled() {
            return Err(SvgDxfError::Cancelled);
        }

        let executable = self.warm_up(token).await?;
        let args = args::encode(options);

        self.invoke(&executable, &args, input, token)
            .await?
            .into_output()
    }

    /// Buffers `reader` completely, then converts it like [`Converter::convert`]
    pub async fn convert_reader<R>(
        &self,
        mut reader: R,
        options: &ConversionOptions,
        token: &CancellationToken,
    ) -> Result<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        let mut input = Vec::new();
        tokio::select! {
            _ = token.cancelled() => return Err(SvgDxfError::Cancelled),
            read = reader.read_to_end(&mut input) => { read?; }
        }
        self.convert(&input, options, token).await
    }

    /// Runs `executable` with `args`, feeding `input` on stdin.
    ///
    /// The child is killed if `token` fires; no partial output is returned.
    pub async fn invoke(
        &self,
        executable: &Path,
        args: &[String],
        input: &[u8],
        token: &CancellationToken,
    ) -> Result<InvocationResult> {
        tracing::debug!("running {} {}", executable.display(), args.join(" "));
        let start = Instant::now();

        let mut child = Command::new(executable)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SvgDxfError::SpawnFailed {
                path: executable.to_path_buf(),
                source: e,
            })?;

        let (Some(mut stdin), Some(mut stdout), Some(stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            return Err(SvgDxfError::IoError(std::io::Error::other(
                "child stdio was not captured",
            )));
        };

        let sink = Arc::clone(&self.sink);
        let max_stderr_bytes = self.max_stderr_bytes;

        let run = async move {
            let write = async move {
                match stdin.write_all(input).await {
                    // The tool may exit without draining stdin; its exit status decides
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                        tracing::debug!("dxf_outlines closed stdin early");
                    }
                    Err(e) => return Err(e),
                    Ok(()) => {}
                }
                // Dropping stdin signals end of input
                drop(stdin);
                Ok(())
            };
            let read_stdout = async move {
                let mut buf = Vec::new();
                stdout.read_to_end(&mut buf).await.map(|_| buf)
            };
            let read_stderr = collect_stderr(stderr, sink.as_ref(), max_stderr_bytes);

            let (written, stdout, stderr) = tokio::join!(write, read_stdout, read_stderr);
            let status = child.wait().await?;
            written?;
            let (stderr, dropped_stderr_lines) = stderr?;

            Ok::<_, SvgDxfError>(InvocationResult {
                exit_code: status.code().unwrap_or(-1),
                stdout: stdout?,
                stderr,
                dropped_stderr_lines,
            })
        };

        // Dropping `run` drops the child, which kills it
        let result = tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("conversion cancelled, killing {}", executable.display());
                return Err(SvgDxfError::Cancelled);
            }
            result = run => result?,
        };

        tracing::debug!(
            "dxf_outlines exited with {} in {}ms ({} bytes out)",
            result.exit_code,
            start.elapsed().as_millis(),
            result.stdout.len()
        );
        Ok(result)
    }
}

/// Converts with a default [`Converter`] (install dir, process-wide warmup)
pub async fn convert(
    input: &[u8],
    options: &ConversionOptions,
    token: &CancellationToken,
) -> Result<Vec<u8>> {
    Converter::new().convert(input, options, token).await
}

/// Reads stderr line by line into the sink, retaining the longest prefix of
/// lines that fits in `max_bytes`
async fn collect_stderr(
    stderr: ChildStderr,
    sink: &dyn StderrSink,
    max_bytes: usize,
) -> std::io::Result<(Vec<String>, usize)> {
    let mut reader = BufReader::new(stderr);
    let mut buf = Vec::new();
    let mut lines = Vec::new();
    let mut retained = 0usize;
    let mut dropped = 0usize;
    let mut full = false;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\n', '\r']);
        sink.line(line);

        if !full && retained + line.len() <= max_bytes {
            retained += line.len();
            lines.push(line.to_string());
        } else {
            full = true;
            dropped += 1;
        }
    }

    if dropped > 0 {
        tracing::warn!(
            "dropped {} stderr lines beyond {} bytes",
            dropped,
            max_bytes
        );
    }
    Ok((lines, dropped))
}
