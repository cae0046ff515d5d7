//! Render a water surface headlessly and save it as a PNG.
//!
//! Run with: cargo run --example water_demo -- [config.json] [output.png]
//!
//! Set `RUST_LOG=info` to see what the renderer is doing.

use waterplane::{init_logging, render_to_file, RasterImage, WaterConfig};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const FRAMES: u32 = 120;

fn main() -> waterplane::Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => WaterConfig::load(&path)?,
        None => WaterConfig::default(),
    };
    let output = args.next().unwrap_or_else(|| "water.png".to_string());

    let dudv = config
        .dudv_path
        .as_ref()
        .map_or_else(RasterImage::empty, RasterImage::load_ppm_or_empty);

    render_to_file(&output, WIDTH, HEIGHT, &config, &dudv, FRAMES)?;
    println!("Wrote {output}");
    Ok(())
}
