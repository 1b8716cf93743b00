//! Mandelbrot renderer
//!
//! Writes a still image, an animation whose iteration cap grows frame by
//! frame, or both. Settings come from config.toml (or the given path).

use text_colorizer::Colorize;

use mandelbrot::{
    evaluate_grid_with, init_tracing, save_image, stream, AnimationWriter, Cancellation,
    CapSchedule, Config, Error, FrameSequence, RenderContext,
};

mod args;

use args::Mode;

fn main() {
    let args = args::parse_args();

    let config = Config::load(&args.config).unwrap_or_else(|e| {
        eprintln!("Warning: {}", e);
        Config::default()
    });

    init_tracing(&config.logging.level);

    if let Err(e) = run(args.mode, &config) {
        tracing::error!("{}", e);
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(mode: Mode, config: &Config) -> mandelbrot::Result<()> {
    let region = &config.region;
    let render = &config.render;

    if mode.writes_animation() && render.frames == 0 {
        return Err(Error::InvalidInput(
            "an animation needs at least one frame".to_string(),
        ));
    }

    tracing::info!(
        "Sampling x [{}, {}], y [{}, {}] at {}x{}",
        region.x_min,
        region.x_max,
        region.y_min,
        region.y_max,
        region.width,
        region.height
    );
    let (real, imag) = region.coordinate_grids()?;

    let cancel = match render.timeout() {
        Some(timeout) => Cancellation::with_timeout(timeout),
        None => Cancellation::new(),
    };

    if mode.writes_image() {
        let grid = evaluate_grid_with(&real, &imag, render.max_iterations, &cancel, render.threads)?;
        save_image(&grid, &render.image_path, render.image_palette)?;
        println!("Image saved to {}", render.image_path);
    }

    if mode.writes_animation() {
        let schedule = CapSchedule::new(render.growth)?;
        let sequence = FrameSequence::new(&real, &imag, render.frames, schedule)?
            .with_cancellation(cancel.clone())
            .with_threads(render.threads);

        let mut writer = AnimationWriter::create(
            &render.animation_path,
            RenderContext::new(render.animation_palette),
            render.interval_ms,
        )?;
        stream(sequence, &mut writer)?;
        writer.finish()?;
        println!("Gif saved to {}", render.animation_path);
    }

    Ok(())
}
