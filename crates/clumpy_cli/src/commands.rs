//! Subcommand handlers: load arrays, call into `clumpy`, save arrays, report.
use std::path::Path;

use anyhow::{Context, Result};
use clumpy::array::{self, NpyArray};
use clumpy::noise;
use clumpy::ops::{self, AdvectOptions, SplatOptions};
use clumpy::raster::{points_from_array, points_to_array, ScalarImage, VectorImage};
use clumpy::rng::HashRng;
use clumpy::sampling::PoissonDiskSampling;
use glam::Vec2;
use tracing::debug;

use crate::args::{
    AdvectPointsArgs, BridsonPointsArgs, Cli, Command, Curl2dArgs, CullPointsArgs,
    GradientNoiseArgs, SplatPointsArgs, VisualizeSdfArgs, EXAMPLES,
};

/// Dispatches one parsed command line. Relative output paths resolve against the working
/// directory.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::BridsonPoints(args) => bridson_points(&args),
        Command::CullPoints(args) => cull_points(&args),
        Command::SplatPoints(args) => splat_points(&args),
        Command::Curl2d(args) => curl_2d(&args),
        Command::GradientNoise(args) => gradient_noise(&args),
        Command::AdvectPoints(args) => advect_points(&args, Path::new("")),
        Command::VisualizeSdf(args) => visualize_sdf(&args),
        Command::Examples => {
            for example in EXAMPLES {
                println!("clumpy {example}");
            }
            Ok(())
        }
    }
}

fn load(path: &Path) -> Result<NpyArray> {
    array::load(path).with_context(|| format!("Unable to read {}", path.display()))
}

fn save(path: &Path, array: &NpyArray) -> Result<()> {
    array::save(path, array).with_context(|| format!("Unable to write {}", path.display()))
}

fn load_points(path: &Path) -> Result<Vec<Vec2>> {
    let array = load(path)?;
    points_from_array(&array).with_context(|| format!("{} is not a point list", path.display()))
}

fn load_scalar_image(path: &Path) -> Result<ScalarImage> {
    let array = load(path)?;
    ScalarImage::from_array(&array)
        .with_context(|| format!("{} is not a float32 image", path.display()))
}

fn bridson_points(args: &BridsonPointsArgs) -> Result<()> {
    let extent = Vec2::new(args.dims.width as f32, args.dims.height as f32);
    let sampling = PoissonDiskSampling::new(args.min_radius).with_max_attempts(args.max_attempts);
    sampling.validate(extent)?;

    // Negative seeds keep their bit pattern.
    let mut rng = HashRng::new(args.seed as u32);
    let points = sampling.generate(extent, &mut rng);

    save(&args.output, &points_to_array(&points))?;
    println!("Generated {} points.", points.len());
    Ok(())
}

fn cull_points(args: &CullPointsArgs) -> Result<()> {
    let points = load_points(&args.input_pts)?;
    let mask = load_scalar_image(&args.mask_img)?;

    let outcome = ops::cull_points(&points, &mask);

    save(&args.output_pts, &points_to_array(&outcome.kept))?;
    println!("Culled {} points, kept {}.", outcome.removed, outcome.kept.len());
    Ok(())
}

fn splat_points(args: &SplatPointsArgs) -> Result<()> {
    let points = load_points(&args.input_pts)?;
    let options = SplatOptions::new(args.kernel_type, args.kernel_size).with_alpha(args.alpha);

    let image = ops::splat_points(
        &points,
        args.dims.width as usize,
        args.dims.height as usize,
        &options,
    )?;

    save(&args.output_img, &image.into_array())?;
    println!(
        "Splatted {} points into a {}x{} image.",
        points.len(),
        args.dims.width,
        args.dims.height
    );
    Ok(())
}

fn curl_2d(args: &Curl2dArgs) -> Result<()> {
    let field = load_scalar_image(&args.input_img)?;
    let (velocities, range) = ops::curl_2d(&field);

    save(&args.output_img, &velocities.into_array())?;
    println!("Curl range: [{}, {}]", range.min, range.max);
    Ok(())
}

fn gradient_noise(args: &GradientNoiseArgs) -> Result<()> {
    if !args.frequency.is_finite() {
        anyhow::bail!("frequency must be finite, got {}", args.frequency);
    }
    let image = noise::render(
        args.dims.width as usize,
        args.dims.height as usize,
        &args.viewport,
        args.frequency,
        args.seed,
    );

    save(&args.output, &image.into_array())?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

/// Writes frames as `<dir>/000<suffix>`, `<dir>/001<suffix>`, ...
fn advect_points(args: &AdvectPointsArgs, dir: &Path) -> Result<()> {
    let points = load_points(&args.input_pts)?;
    let array = load(&args.velocities_img)?;
    let velocities = VectorImage::from_array(&array).with_context(|| {
        format!("{} is not a velocity image", args.velocities_img.display())
    })?;

    let options = AdvectOptions::new(args.step_size, args.nframes);
    let written = ops::advect_points(&points, &velocities, &options, |frame, image| {
        let path = dir.join(format!("{:03}{}", frame, args.suffix));
        debug!("Writing {}", path.display());
        array::save(&path, &image.clone().into_array())
    })?;

    println!("Wrote {} frames.", written);
    Ok(())
}

fn visualize_sdf(args: &VisualizeSdfArgs) -> Result<()> {
    let field = load_scalar_image(&args.input_img)?;
    let image = ops::visualize_sdf(&field, args.mode);

    save(&args.output_img, &image.into_array())?;
    println!("Wrote {}", args.output_img.display());
    Ok(())
}
