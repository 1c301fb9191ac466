use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::presets::demo_scene;
use lumen_core::{Plane, Scene, Surface};
use lumen_renderer::{RenderConfig, RenderMode, Renderer};

mod animation;
mod cli;
mod logger;

use cli::Args;
use logger::init_logger;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the worker pool")?;
    }

    let mode = args.render_mode()?;
    let scene = build_scene(&args)?;
    log::info!(
        "Scene: {} objects, {} lights; mode {}",
        scene.objects.len(),
        scene.lights.len(),
        mode
    );

    let mut renderer = Renderer::new(scene, RenderConfig::default());
    if args.show {
        animation::render_show(&mut renderer, &args, mode)
    } else {
        render_frame(&mut renderer, &args, mode)
    }
}

/// Load the scene file if one was given, otherwise generate the demo field.
fn build_scene(args: &Args) -> Result<Scene> {
    let mut scene = match &args.scene {
        Some(path) => Scene::load(path)
            .with_context(|| format!("Failed to load scene from {}", path.display()))?,
        None => demo_scene(args.spheres, args.seed, false),
    };

    if args.plane && !scene.objects.iter().any(|o| matches!(o, Surface::Plane(_))) {
        scene.objects.push(Plane::default().into());
    }
    Ok(scene)
}

fn render_frame(renderer: &mut Renderer, args: &Args, mode: RenderMode) -> Result<()> {
    renderer.prepare(args.width, args.height);
    renderer.render_image(mode)?;
    save_frame(renderer, &args.output)?;
    log::info!("Saved {}", args.output.display());
    Ok(())
}

/// Save as PNG when the extension asks for it, BMP otherwise.
fn save_frame(renderer: &Renderer, path: &Path) -> Result<()> {
    let is_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

    if is_png {
        renderer
            .image()?
            .to_rgb_image()
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))
    } else {
        renderer
            .save_to(path)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}
