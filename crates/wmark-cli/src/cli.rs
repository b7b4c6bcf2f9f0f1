//! CLI argument definitions using Clap v4

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use wmark::export::OutputFormat;
use wmark::Anchor;

/// wmark - stamp a text watermark on every photo in a folder
#[derive(Parser, Debug)]
#[command(name = "wmark")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image file or directory of images
    pub path: PathBuf,

    // Text
    /// Watermark text
    #[arg(short = 't', long)]
    pub text: Option<String>,

    /// Use each photo's capture date as the text
    #[arg(short = 'd', long = "use-date")]
    pub use_date: bool,

    // Look
    /// Font size in pixels
    #[arg(short = 's', long = "font-size", value_parser = clap::value_parser!(u32).range(1..))]
    pub font_size: Option<u32>,

    /// Color name (white, black, red, ...) or #RRGGBB
    #[arg(short = 'c', long)]
    pub color: Option<String>,

    /// Opacity percentage
    #[arg(short = 'o', long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub opacity: Option<u8>,

    /// Counter-clockwise rotation in degrees
    #[arg(
        short = 'r',
        long,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(-180..=180)
    )]
    pub rotation: Option<i32>,

    /// Font file tried before the system fonts
    #[arg(short = 'f', long = "font-file")]
    pub font_file: Option<PathBuf>,

    // Placement
    /// Anchor: top_left, top_center, top_right, left_center, center,
    /// right_center, bottom_left, bottom_center, bottom_right
    #[arg(short = 'p', long)]
    pub position: Option<Anchor>,

    /// Manual x of the text's top-left corner (needs --y)
    #[arg(long, requires = "y", allow_negative_numbers = true)]
    pub x: Option<i32>,

    /// Manual y of the text's top-left corner (needs --x)
    #[arg(long, requires = "x", allow_negative_numbers = true)]
    pub y: Option<i32>,

    // Output
    /// Output directory [default: <PATH>_watermark]
    #[arg(short = 'O', long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Output format: keep, jpeg, png
    #[arg(short = 'F', long, default_value = "keep")]
    pub format: OutputFormat,

    /// Prefix output file names
    #[arg(long, conflicts_with_all = ["suffix", "keep_name"])]
    pub prefix: Option<String>,

    /// Suffix output file names [default: _watermark]
    #[arg(long, conflicts_with = "keep_name")]
    pub suffix: Option<String>,

    /// Keep input file names
    #[arg(long = "keep-name")]
    pub keep_name: bool,

    // Stored styles
    /// Start from a saved template
    #[arg(short = 'T', long)]
    pub template: Option<String>,

    /// Save the effective style as a template
    #[arg(long = "save-template", value_name = "NAME")]
    pub save_template: Option<String>,

    /// Template store file
    #[arg(long, value_name = "FILE")]
    pub templates: Option<PathBuf>,

    /// Last-settings file
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Save the effective style as the last-used settings
    #[arg(long)]
    pub remember: bool,

    // Output verbosity
    /// Only print errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log each file as it is processed
    #[arg(short = 'v', long, action = ArgAction::SetTrue)]
    pub verbose: bool,
}
