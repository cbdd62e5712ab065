use std::path::PathBuf;

use clap::Parser;
use color_eyre::{Report, eyre::eyre};

#[derive(Parser, Debug)]
#[command(
    name = "hello-console",
    about = "Renders scrolling text and a sliding sprite with a bitmap-font console",
    long_about = "Opens an OpenGL 3.3 window showing text drawn from a 16x16 glyph atlas PNG, \
                  with a sprite layered above it"
)]
pub struct Cli {
    /// Glyph atlas PNG: 16x16 glyphs ordered by character code
    #[arg(long, value_name = "PNG", value_parser = validate_file_exists)]
    pub font: PathBuf,

    /// Glyph cell width in pixels
    #[arg(long, default_value = "16", value_name = "PIXELS")]
    pub cell_width: i32,

    /// Glyph cell height in pixels
    #[arg(long, default_value = "16", value_name = "PIXELS")]
    pub cell_height: i32,

    /// Initial window height in rows
    #[arg(long, default_value = "25")]
    pub rows: u32,

    /// Initial window width in columns
    #[arg(long, default_value = "40")]
    pub cols: u32,

    /// Sprite image PNG; the font atlas is used when omitted
    #[arg(long, value_name = "PNG", value_parser = validate_file_exists)]
    pub sprite: Option<PathBuf>,
}

impl Cli {
    /// Validate CLI arguments
    pub fn validate(&self) -> Result<(), Report> {
        if self.cell_width <= 0 || self.cell_height <= 0 {
            return Err(eyre!("Cell size must be positive"));
        }

        if self.rows == 0 || self.cols == 0 {
            return Err(eyre!("Window must be at least one cell in each direction"));
        }

        let width = self.cols.checked_mul(self.cell_width as u32);
        let height = self.rows.checked_mul(self.cell_height as u32);
        if width.is_none() || height.is_none() {
            return Err(eyre!("Window size in pixels is too large"));
        }

        Ok(())
    }

    /// Initial window size in pixels. Saturates unless [`Cli::validate`] passed.
    pub fn window_size(&self) -> (u32, u32) {
        (
            self.cols.saturating_mul(self.cell_width as u32),
            self.rows.saturating_mul(self.cell_height as u32),
        )
    }
}

fn validate_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    match () {
        _ if !path.exists() => Err(format!("Input file does not exist: {s}")),
        _ if !path.is_file() => Err(format!("Path is not a file: {s}")),
        _ => Ok(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let manifest = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
        let mut argv = vec!["hello-console", "--font", manifest];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!((cli.cell_width, cli.cell_height), (16, 16));
        assert_eq!(cli.window_size(), (640, 400));
        assert!(cli.sprite.is_none());
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_window_size_follows_cells() {
        let cli = parse(&["--cell-width", "8", "--rows", "10", "--cols", "20"]);
        assert_eq!(cli.window_size(), (160, 160));
    }

    #[test]
    fn test_rejects_invalid_cells() {
        assert!(parse(&["--cell-height", "0"]).validate().is_err());
        assert!(parse(&["--rows", "0"]).validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_window() {
        let cli = parse(&["--cols", "4294967295"]);
        assert!(cli.validate().is_err());
        assert_eq!(cli.window_size().0, u32::MAX);

        assert!(parse(&["--rows", "300000000", "--cell-height", "32"]).validate().is_err());
    }

    #[test]
    fn test_font_must_exist() {
        let result = Cli::try_parse_from(["hello-console", "--font", "/nonexistent/font.png"]);
        assert!(result.is_err());
    }
}
