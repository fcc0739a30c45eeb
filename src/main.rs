use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use rastercanvas::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use rastercanvas::{GraphingPaperBackground, Rgba, Scene, SoftwareCanvas, Vec2, Viewport};

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Canvas width in pixels
    #[arg(long, short = 'W', default_value_t = DEFAULT_WIDTH)]
    width: u32,
    /// Canvas height in pixels
    #[arg(long, short = 'H', default_value_t = DEFAULT_HEIGHT)]
    height: u32,
    /// Where to write the rendered bitmap
    #[arg(long, short, default_value = "canvas.bmp")]
    output: PathBuf,
    /// Scene file to render instead of the built-in demo
    #[arg(long, short)]
    scene: Option<PathBuf>,
    /// Also write the rendered scene as JSON
    #[arg(long)]
    save_scene: Option<PathBuf>,
    /// Show the scene in an SDL2 window instead of writing a bitmap
    #[cfg(feature = "window")]
    #[arg(long)]
    window: bool,
}

/// Graph paper, a fan of unit spokes, a small triangle and a translucent
/// thick stroke
fn demo_scene() -> Scene {
    let mut scene = Scene::new("demo", Viewport::new(5.0, -5.0, -5.0, 5.0))
        .with_background(GraphingPaperBackground::new(0.05, 0.05));

    let mut t = 0.0_f32;
    while t <= std::f32::consts::TAU {
        scene.add_primitive(rastercanvas::Line::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(t.cos(), t.sin()),
            Rgba::RED,
            0.0,
        ));
        t += 0.1;
    }

    scene.add_primitive(rastercanvas::Triangle::new(
        Vec2::new(-2.0, 2.0),
        Vec2::new(-2.0, 3.0),
        Vec2::new(-1.0, 2.5),
        Rgba::BLUE,
    ));
    scene.add_primitive(rastercanvas::Line::new(
        Vec2::new(-2.0, -2.0),
        Vec2::new(-3.0, 3.0),
        Rgba::RED.with_alpha(0.5),
        0.1,
    ));
    scene
}

fn run(args: &Args) -> rastercanvas::Result<()> {
    let scene = match &args.scene {
        Some(path) => {
            info!("loading scene from {}", path.display());
            Scene::load(path)?
        },
        None => demo_scene(),
    };

    if let Some(path) = &args.save_scene {
        scene.save(path)?;
    }

    #[cfg(feature = "window")]
    if args.window {
        let mut window = rastercanvas::AcceleratedCanvas::open(
            &scene.name,
            args.width,
            args.height,
            scene.viewport,
            Box::new(rastercanvas::DefaultHandler),
        )?;
        window.load_scene(&scene)?;
        window.run();
        return Ok(());
    }

    let mut canvas = SoftwareCanvas::new(args.width, args.height, scene.viewport)?;
    canvas.load_scene(&scene)?;
    canvas.update();
    canvas.save_bmp(&args.output)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        },
    }
}
