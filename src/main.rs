mod camera;
mod integrator;
mod intersect;
mod material;
mod parser;
mod primitives;
mod ray;
mod render;
mod scene;
mod shading;
mod vector;

use camera::Camera;
use render::{RenderMode, RenderOptions};
use vector::Vec3;

enum ErrorCodes {
    Usage = 1,
    Parse = 2,
}

fn usage_err(message: &str) -> ! {
    println!("Error: {}", message);
    println!();
    usage();
}

fn usage() -> ! {
    println!("Usage: ./raytrace --scene FILE [OPTIONS]");
    println!("Available Options:");
    println!("    --scene FILE                  scene file to render (required)");
    println!("    --out FILE                    output image path (default: out.png)");
    println!("    -w, --width NUMBER            image width (default: 800)");
    println!("    -h, --height NUMBER           image height (default: 600)");
    println!("    --fov DEGREES                 vertical field of view (default: 90)");
    println!("    --look-from X Y Z             camera position (default: 0 0 -5)");
    println!("    --look-to X Y Z               camera target (default: 0 0 0)");
    println!("    --mode depth|normal|full       render mode (default: full)");
    println!("    --depth NUMBER                 max recursion depth (default: 4)");
    println!("    --help                         show this help");
    std::process::exit(ErrorCodes::Usage as i32);
}

fn parse_u32(opt: &Option<String>) -> u32 {
    if let Some(string) = opt {
        if let Ok(int) = string.parse::<u32>() {
            int
        } else {
            usage_err("Argument was not a number!");
        }
    } else {
        usage_err("Argument missing!");
    }
}

fn parse_f64(opt: &Option<String>) -> f64 {
    if let Some(string) = opt {
        if let Ok(value) = string.parse::<f64>() {
            value
        } else {
            usage_err("Argument was not a number!");
        }
    } else {
        usage_err("Argument missing!");
    }
}

fn parse_vec3(args: &mut std::env::Args) -> Vec3 {
    Vec3::new(
        parse_f64(&args.next()),
        parse_f64(&args.next()),
        parse_f64(&args.next()),
    )
}

fn parse_mode(opt: &Option<String>) -> RenderMode {
    match opt.as_deref() {
        Some("depth") => RenderMode::Depth,
        Some("normal") => RenderMode::Normal,
        Some("full") => RenderMode::Full,
        Some(_) => usage_err("Unknown render mode, expected depth|normal|full"),
        None => usage_err("Argument missing!"),
    }
}

fn main() {
    let mut args = std::env::args();
    args.next(); // skip the executable name

    let mut scene_path: Option<String> = None;
    let mut out_path = "out.png".to_string();
    let mut width = 800;
    let mut height = 600;
    let mut fov_degrees = 90.0;
    let mut look_from = Vec3::new(0.0, 0.0, -5.0);
    let mut look_to = Vec3::new(0.0, 0.0, 0.0);
    let mut mode = RenderMode::Full;
    let mut max_depth = 4;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scene" => scene_path = Some(args.next().unwrap_or_else(|| usage_err("Argument missing!"))),
            "--out" => out_path = args.next().unwrap_or_else(|| usage_err("Argument missing!")),
            "-w" | "--width" => width = parse_u32(&args.next()),
            "-h" | "--height" => height = parse_u32(&args.next()),
            "--fov" => fov_degrees = parse_f64(&args.next()),
            "--look-from" => look_from = parse_vec3(&mut args),
            "--look-to" => look_to = parse_vec3(&mut args),
            "--mode" => mode = parse_mode(&args.next()),
            "--depth" => max_depth = parse_u32(&args.next()),
            "--help" => usage(),
            _ => {}
        }
    }

    let scene_path = scene_path.unwrap_or_else(|| usage_err("--scene is required"));

    let scene = match parser::obj::load(std::path::Path::new(&scene_path)) {
        Ok(scene) => scene,
        Err(err) => {
            println!("Error: failed to load scene: {:?}", err);
            std::process::exit(ErrorCodes::Parse as i32);
        }
    };

    let camera = Camera::look_at(
        look_from,
        look_to,
        Vec3::new(0.0, 1.0, 0.0),
        Camera::default_fallback_up(look_from),
        fov_degrees.to_radians(),
        width,
        height,
    );

    let image = render::render(
        &scene,
        &camera,
        RenderOptions {
            mode,
            max_depth,
        },
    );

    if let Err(err) = image.save(&out_path) {
        println!("Error: failed to write output image: {}", err);
        std::process::exit(ErrorCodes::Parse as i32);
    }
    println!("Wrote {}", out_path);
}
