//! VPly CLI - writes sample streams and prints the format tables.

use std::env;
use std::process;

use glam::{Mat4, Quat, Vec3};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use vply::prelude::*;
use vply::types::{describe, ALL_TYPE_IDS};

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "warn",
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_usage(&args[0]);
        return;
    }

    match filtered_args[0] {
        "demo" | "d" => {
            if filtered_args.len() < 2 {
                eprintln!("Usage: {} demo <out.vply>", args[0]);
                process::exit(1);
            }
            if let Err(e) = cmd_demo(filtered_args[1]) {
                error!("demo failed: {}", e);
                process::exit(1);
            }
        }
        "types" | "t" => cmd_types(),
        "help" | "h" | "-h" | "--help" => print_usage(&args[0]),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(&args[0]);
            process::exit(1);
        }
    }
}

/// `RUST_LOG` wins over the command-line level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage(prog: &str) {
    println!("VPly CLI - debug-visualization stream encoder");
    println!();
    println!("Usage: {} [options] <command>", prog);
    println!();
    println!("Commands:");
    println!("  d, demo <out.vply>  Write a sample stream with every primitive kind");
    println!("  t, types            Show primitive tags and attribute type IDs");
    println!("  h, help             Show this help");
    println!();
    println!("Options:");
    println!("  -v, --verbose  Debug output");
    println!("  -vv, --trace   Trace output (very verbose)");
    println!("  -q, --quiet    Warnings only");
}

fn cmd_demo(path: &str) -> vply::Result<()> {
    info!("Writing demo stream: {}", path);
    let mut out = VPlyWriter::create(path)?;

    // Floor grid and a unit box sitting on it.
    out.write_uniform_grid(Mat4::from_scale(Vec3::new(10.0, 1.0, 10.0)), &[])?;
    out.write_box(
        Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0)),
        &[Attribute::new("color", Vec3::new(0.8, 0.2, 0.2))],
    )?;
    out.write_aabb(Vec3::splat(-1.0), Vec3::splat(1.0), &[Attribute::new("id", 1)])?;

    let sphere_xf =
        Mat4::from_rotation_translation(Quat::from_rotation_y(0.5), Vec3::new(2.0, 1.0, 0.0));
    out.write_sphere(Vec3::new(2.0, 1.0, 0.0), 0.5f32, sphere_xf, &[])?;
    out.write_line(Vec3::ZERO, Vec3::Y * 2.0, &[Attribute::new("width", 2.0f32)])?;
    out.write_point(
        Vec3::new(1.0, 2.0, 3.0),
        &[
            Attribute::new("weight", 0.5f32),
            Attribute::new("cell", glam::IVec3::new(1, 2, 3)),
        ],
    )?;

    // Helix as a quadratic strip with per-point parameters.
    let strip_color = Attribute::new("color", Vec3::new(0.1, 0.6, 0.9));
    let mut strip = AttributedLineStrip::new(2, &[strip_color])?;
    for i in 0..32 {
        let t = i as f32 / 31.0;
        let angle = t * std::f32::consts::TAU * 2.0;
        let pos = Vec3::new(angle.cos(), t * 3.0, angle.sin());
        strip.add_point_with(pos, &[Attribute::new("t", t)])?;
    }
    debug!("Strip: {} points, {} bytes", strip.len(), strip.encoded_len());
    out.write_line_strip(&strip)?;

    let count = out.primitive_count();
    let bytes = out.position();
    out.finish()?;
    info!("Wrote {} primitives ({} bytes)", count, bytes);
    Ok(())
}

fn cmd_types() {
    println!("Primitive tags:");
    for id in PrimitiveId::ALL {
        println!("  {:>3}  {}", id.as_i32(), id);
    }
    println!();
    println!("Attribute type IDs:");
    for id in ALL_TYPE_IDS {
        if let Some((element, shape)) = describe(id) {
            let size = element.num_bytes() * shape.num_elements();
            println!("  {:>3}  {} {} ({} bytes)", id, element, shape, size);
        }
    }
    println!("    0  end of attribute list");
}
