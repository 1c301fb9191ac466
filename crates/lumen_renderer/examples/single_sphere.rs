//! Single sphere example.
//!
//! Renders one red sphere lit by a white light and saves it as BMP.

use lumen_core::{Camera, Light, Scene, Sphere};
use lumen_math::{direction, point, Color};
use lumen_renderer::{RenderConfig, RenderMode, Renderer};

fn main() {
    println!("Lumen Ray Caster - Single Sphere Example");
    println!("========================================");

    let camera = Camera::new(
        point(-5.0, -5.0, 5.0),  // eye
        point(-4.0, -4.0, 4.0),  // screen center
        direction(0.0, 0.0, 1.0), // up
        60.0,
    );
    let scene = Scene::new(camera)
        .with_light(Light::new(point(0.0, 0.0, 5.0), Color::WHITE))
        .with_object(Sphere::new(point(0.0, 2.0, 0.0), 2.0, Color::new(220, 40, 40)));

    let (width, height) = (640, 480);
    let mut renderer = Renderer::new(scene, RenderConfig::default());
    renderer.prepare(width, height);

    println!("Rendering {}x{}...", width, height);
    let start = std::time::Instant::now();
    renderer
        .render_image(RenderMode::Serial)
        .expect("Failed to render");
    println!("Rendered in {:?}", start.elapsed());

    let filename = "single_sphere.bmp";
    renderer.save_to(filename).expect("Failed to save image");
    println!("Saved to {}", filename);
}
