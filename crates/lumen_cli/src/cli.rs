use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_renderer::{BatchSize, RenderMode, RenderResult};

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "A ray caster for spheres and a checkerboard floor")]
pub struct Args {
    /// Image width in pixels
    #[arg(long, default_value = "1920")]
    pub width: usize,

    /// Image height in pixels
    #[arg(long, default_value = "1080")]
    pub height: usize,

    /// Output file (.bmp, or .png to go through the image crate)
    #[arg(short, long, default_value = "scene.bmp")]
    pub output: PathBuf,

    /// Render mode: serial, parallel or simd
    #[arg(short, long, default_value = "parallel")]
    pub mode: String,

    /// Spheres per SIMD batch (power of two up to 128)
    #[arg(short, long, default_value = "8")]
    pub batch_size: usize,

    /// Number of random spheres in the generated scene
    #[arg(long, default_value = "1024")]
    pub spheres: usize,

    /// Seed for the generated scene
    #[arg(long, default_value = "2023")]
    pub seed: u64,

    /// Add the checkerboard floor
    #[arg(long)]
    pub plane: bool,

    /// Load the scene from a JSON file instead of generating one
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Worker threads for the parallel modes (defaults to one per core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Render an orbiting camera animation instead of a single frame
    #[arg(long)]
    pub show: bool,

    /// Frames in the animation
    #[arg(long, default_value = "60")]
    pub frames: usize,

    /// Directory for animation frames
    #[arg(long, default_value = "show")]
    pub show_dir: PathBuf,

    /// Keep the animation frames but skip the ffmpeg step
    #[arg(long)]
    pub no_video: bool,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Render mode with the requested batch size applied.
    pub fn render_mode(&self) -> RenderResult<RenderMode> {
        match self.mode.parse::<RenderMode>()? {
            RenderMode::Batched(_) => Ok(RenderMode::Batched(BatchSize::try_from(self.batch_size)?)),
            mode => Ok(mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::RenderError;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("lumen").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!((args.width, args.height), (1920, 1080));
        assert_eq!(args.output, PathBuf::from("scene.bmp"));
        assert_eq!(args.spheres, 1024);
        assert_eq!(args.seed, 2023);
        assert_eq!(args.frames, 60);
        assert!(!args.plane && !args.show && !args.no_video);
        assert!(args.scene.is_none() && args.threads.is_none());
        assert_eq!(args.render_mode().unwrap(), RenderMode::Parallel);
    }

    #[test]
    fn test_simd_mode_uses_batch_size() {
        let args = parse(&["-m", "simd", "-b", "32"]);
        assert_eq!(args.render_mode().unwrap(), RenderMode::Batched(BatchSize::B32));
    }

    #[test]
    fn test_batch_size_ignored_outside_simd() {
        let args = parse(&["--mode", "serial", "--batch-size", "3"]);
        assert_eq!(args.render_mode().unwrap(), RenderMode::Serial);
    }

    #[test]
    fn test_bad_mode_and_batch_size() {
        assert!(matches!(
            parse(&["--mode", "gpu"]).render_mode(),
            Err(RenderError::UnknownMode(_))
        ));
        assert!(matches!(
            parse(&["--mode", "simd", "--batch-size", "6"]).render_mode(),
            Err(RenderError::UnsupportedBatchSize(6))
        ));
    }

    #[test]
    fn test_log_level() {
        let args = parse(&["--log-level", "debug"]);
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
        assert!(Args::try_parse_from(["lumen", "--log-level", "loud"]).is_err());
    }
}
