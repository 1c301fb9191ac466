//! Orbiting camera animation.
//!
//! Frames are written as `<dir>/<k>.bmp` and stitched into `<dir>/out.mov`
//! with ffmpeg when it is available.

use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use lumen_core::presets::orbit_camera;
use lumen_renderer::{RenderMode, Renderer};

use crate::cli::Args;

pub fn render_show(renderer: &mut Renderer, args: &Args, mode: RenderMode) -> Result<()> {
    let dir = args.show_dir.as_path();
    reset_dir(dir)?;

    for k in 0..args.frames {
        renderer.set_camera(orbit_camera(k));
        renderer.prepare(args.width, args.height);
        renderer.render_image(mode)?;

        let path = dir.join(format!("{}.bmp", k));
        renderer
            .save_to(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("Frame {}/{} written", k + 1, args.frames);
    }
    log::info!("Wrote {} frames to {}", args.frames, dir.display());

    if !args.no_video {
        encode_video(dir);
    }
    Ok(())
}

/// Remove `dir` and everything in it, then create it empty.
fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("Failed to clear {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
}

/// Run ffmpeg over the frames. Failure leaves the frames in place.
fn encode_video(dir: &Path) {
    let output = dir.join("out.mov");
    let status = Command::new("ffmpeg")
        .args(["-loglevel", "error", "-f", "image2", "-i"])
        .arg(dir.join("%d.bmp"))
        .arg(&output)
        .status();

    match status {
        Ok(status) if status.success() => log::info!("Video written to {}", output.display()),
        Ok(status) => log::error!("ffmpeg failed ({}); frames kept in {}", status, dir.display()),
        Err(e) => log::error!("Could not run ffmpeg: {}; frames kept in {}", e, dir.display()),
    }
}
