//! CLI command structure using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use svgdxf_core::Units;
use svgdxf_core::config::consts;

#[derive(Parser)]
#[command(name = "svgdxf")]
#[command(version, about = "Convert SVG to DXF with the dxf_outlines tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: ./svgdxf.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use this dxf_outlines executable instead of the platform build
    #[arg(long, global = true, value_name = "PATH", env = consts::tool::EXECUTABLE_ENV)]
    pub executable: Option<PathBuf>,

    /// Directory containing the platform dxf_outlines builds
    #[arg(long, global = true, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an SVG document to DXF
    Convert {
        /// Input SVG file, or `-` for stdin
        input: PathBuf,

        /// Output DXF file (default: stdout)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Emit LWPOLYLINE entities
        #[arg(long)]
        polyline: bool,

        /// Flatten Bezier curves into line segments
        #[arg(long)]
        flatten_beziers: bool,

        /// ROBO-Master compatible output
        #[arg(long)]
        robo: bool,

        /// Fixed units (px, in, ft, mm, cm, m); disables units from the document
        #[arg(long)]
        units: Option<Units>,

        /// Output text encoding (e.g. latin_1, utf_8)
        #[arg(long)]
        encoding: Option<String>,
    },

    /// Run the one-time self-extraction of dxf_outlines
    Warmup,

    /// Show the detected platform and executable
    Platform {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
