//! Helper binary that warms up a tool under a shared lock, then exits
//!
//! Usage: warmup_child <tool_path> <lock_path>
//!
//! Used to test that warmup runs of independent processes never overlap.

use std::env;
use std::path::PathBuf;
use svgdxf_outlines::WarmupCoordinator;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: warmup_child <tool_path> <lock_path>");
        std::process::exit(1);
    }

    let tool = PathBuf::from(&args[1]);
    let coordinator = WarmupCoordinator::new(PathBuf::from(&args[2]));

    coordinator
        .ensure_warmed_up(&tool, &CancellationToken::new())
        .await
        .expect("warmup failed");

    assert!(coordinator.is_warmed_up());
    println!("warmup child {} completed", std::process::id());
}
