//! End-to-end conversion tests against a fake dxf_outlines script
#![cfg(unix)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use svgdxf_outlines::{
    ConversionOptions, Converter, PlatformIdentifier, SvgDxfError, Units, WarmupCoordinator,
};
use svgdxf_testkit::{CIRCLE_SVG, FakeBehavior, FakeTool, RECT_SVG};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn tool_name() -> String {
    PlatformIdentifier::current()
        .unwrap()
        .executable_name("dxf_outlines")
}

fn setup(behavior: FakeBehavior) -> (TempDir, FakeTool, Converter) {
    let temp = TempDir::new().unwrap();
    let tool = FakeTool::install(temp.path(), &tool_name(), behavior);
    let converter = converter_for(temp.path());
    (temp, tool, converter)
}

fn converter_for(dir: &Path) -> Converter {
    Converter::new()
        .with_base_dir(dir)
        .with_warmup(Arc::new(WarmupCoordinator::new(dir.join("warmup.lock"))))
}

#[tokio::test]
async fn test_rect_with_default_options() {
    let (_temp, tool, converter) = setup(FakeBehavior::Dxf);

    let output = converter
        .convert(
            RECT_SVG.as_bytes(),
            &ConversionOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let text = String::from_utf8_lossy(&output);
    assert!(!output.is_empty());
    assert!(text.contains("SECTION"));
    assert!(text.contains("ENTITIES"));

    assert_eq!(
        tool.last_args(),
        vec![
            "--POLY",
            "false",
            "--FLATTENBEZ",
            "false",
            "--ROBO",
            "false",
            "--unit_from_document",
            "true",
            "--encoding",
            "latin_1",
        ]
    );
    assert_eq!(tool.last_stdin(), RECT_SVG.as_bytes());
}

#[tokio::test]
async fn test_circle_with_polyline_and_mm() {
    let (_temp, tool, converter) = setup(FakeBehavior::Dxf);
    let options = ConversionOptions::default()
        .with_polyline(true)
        .with_units(Units::Mm);

    let output = converter
        .convert(CIRCLE_SVG.as_bytes(), &options, &CancellationToken::new())
        .await
        .unwrap();

    assert!(!output.is_empty());
    let args = tool.last_args();
    let units = args.iter().position(|a| a == "--units").unwrap();
    assert_eq!(args[units + 1], "mm");
    let from_doc = args
        .iter()
        .position(|a| a == "--unit_from_document")
        .unwrap();
    assert_eq!(args[from_doc + 1], "false");
    assert_eq!(args[1], "true");
}

#[tokio::test]
async fn test_already_cancelled_returns_cancelled() {
    let (_temp, tool, converter) = setup(FakeBehavior::Dxf);
    let token = CancellationToken::new();
    token.cancel();

    let err = converter
        .convert(RECT_SVG.as_bytes(), &ConversionOptions::default(), &token)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(tool.run_count(), 0);
    assert_eq!(tool.warmup_count(), 0);
}

#[tokio::test]
async fn test_empty_input_spawns_nothing() {
    let (_temp, tool, converter) = setup(FakeBehavior::Dxf);

    let err = converter
        .convert(b"", &ConversionOptions::default(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SvgDxfError::InvalidArgument(_)));
    assert_eq!(tool.run_count(), 0);
    assert_eq!(tool.warmup_count(), 0);
}

#[tokio::test]
async fn test_cancel_during_run_kills_tool() {
    let (_temp, _tool, converter) = setup(FakeBehavior::Slow { seconds: 30 });
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let err = converter
        .convert(RECT_SVG.as_bytes(), &ConversionOptions::default(), &token)
        .await
        .unwrap_err();

    assert!(err.is_cancelled(), "expected Cancelled, got {:?}", err);
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_nonzero_exit_is_conversion_failed() {
    let (_temp, _tool, converter) = setup(FakeBehavior::Fail {
        exit_code: 4,
        stderr_lines: vec!["line one".to_string(), "line two".to_string()],
    });

    let err = converter
        .convert(
            RECT_SVG.as_bytes(),
            &ConversionOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match err {
        SvgDxfError::ConversionFailed { exit_code, stderr } => {
            assert_eq!(exit_code, 4);
            assert_eq!(stderr, "line one\nline two");
        }
        other => panic!("expected ConversionFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stderr_cap_keeps_sink_complete() {
    let (_temp, _tool, converter) = setup(FakeBehavior::StderrFlood { count: 200 });
    let seen = Arc::new(Mutex::new(Vec::<String>::new()));
    let seen_clone = Arc::clone(&seen);
    let converter = converter
        .with_max_stderr_bytes(100)
        .with_stderr_sink(Arc::new(move |line: &str| {
            seen_clone.lock().unwrap().push(line.to_string());
        }));

    let err = converter
        .convert(
            RECT_SVG.as_bytes(),
            &ConversionOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 200);
    assert_eq!(seen[0], "diagnostic line 0");
    assert_eq!(seen[199], "diagnostic line 199");

    match err {
        SvgDxfError::ConversionFailed { exit_code, stderr } => {
            assert_eq!(exit_code, 1);
            assert!(stderr.starts_with("diagnostic line 0\ndiagnostic line 1"));
            let (kept, marker) = stderr.rsplit_once('\n').unwrap();
            let retained: usize = kept.lines().map(str::len).sum();
            assert!(retained <= 100, "retained {} bytes", retained);
            let kept_lines = kept.lines().count();
            assert_eq!(marker, format!("... ({} more lines)", 200 - kept_lines));
        }
        other => panic!("expected ConversionFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stderr_cap_keeps_prefix_only() {
    let long = "x".repeat(90);
    let (_temp, _tool, converter) = setup(FakeBehavior::Fail {
        exit_code: 2,
        stderr_lines: vec!["first".to_string(), long, "last".to_string()],
    });

    let err = converter
        .with_max_stderr_bytes(50)
        .convert(
            RECT_SVG.as_bytes(),
            &ConversionOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match err {
        SvgDxfError::ConversionFailed { exit_code, stderr } => {
            assert_eq!(exit_code, 2);
            assert_eq!(stderr, "first\n... (2 more lines)");
        }
        other => panic!("expected ConversionFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_tool_ignoring_stdin_still_succeeds() {
    let (_temp, _tool, converter) = setup(FakeBehavior::IgnoreStdin);
    // Larger than a pipe buffer, so the write hits a closed pipe
    let mut input = RECT_SVG.as_bytes().to_vec();
    input.resize(4 * 1024 * 1024, b' ');

    let output = converter
        .convert(&input, &ConversionOptions::default(), &CancellationToken::new())
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&output).contains("ENTITIES"));
}

#[tokio::test]
async fn test_convert_reader_buffers_stream() {
    let (_temp, tool, converter) = setup(FakeBehavior::Dxf);

    let output = converter
        .convert_reader(
            CIRCLE_SVG.as_bytes(),
            &ConversionOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(String::from_utf8_lossy(&output).contains("SECTION"));
    assert_eq!(tool.last_stdin(), CIRCLE_SVG.as_bytes());
}

#[tokio::test]
async fn test_missing_tool_in_base_dir() {
    let temp = TempDir::new().unwrap();
    let converter = converter_for(temp.path());

    let err = converter
        .convert(
            RECT_SVG.as_bytes(),
            &ConversionOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match err {
        SvgDxfError::ExecutableNotFound { path, target } => {
            assert_eq!(path, temp.path().join(tool_name()));
            assert_eq!(target, PlatformIdentifier::current().unwrap().suffix());
        }
        other => panic!("expected ExecutableNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_explicit_executable_bypasses_platform_name() {
    let temp = TempDir::new().unwrap();
    let tool = FakeTool::install(temp.path(), "custom-tool", FakeBehavior::Dxf);
    let converter = Converter::new()
        .with_executable(&tool.path)
        .with_warmup(Arc::new(WarmupCoordinator::new(
            temp.path().join("warmup.lock"),
        )));

    let output = converter
        .convert(
            RECT_SVG.as_bytes(),
            &ConversionOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert!(!output.is_empty());
    assert_eq!(tool.run_count(), 1);
}
