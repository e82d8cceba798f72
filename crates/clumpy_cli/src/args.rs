//! Command-line surface: one subcommand per tool, positional arguments in tool order.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clumpy::noise::Viewport;
use clumpy::ops::{SdfColorMode, SplatKernel};
use clumpy::sampling::DEFAULT_MAX_ATTEMPTS;

/// Generates or processes large swaths of image data as .npy arrays, for use alongside
/// Python plotting scripts.
#[derive(Debug, Parser)]
#[command(name = "clumpy", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate list of 2D points
    #[command(name = "bridson_points")]
    BridsonPoints(BridsonPointsArgs),

    /// Remove points from areas with non-positive pixels
    #[command(name = "cull_points")]
    CullPoints(CullPointsArgs),

    /// Consume a list of 2-tuples and create an image
    #[command(name = "splat_points")]
    SplatPoints(SplatPointsArgs),

    /// Apply the curl operator to a field of scalars
    #[command(name = "curl_2d")]
    Curl2d(Curl2dArgs),

    /// Generate gradient noise in [-1,+1]
    #[command(name = "gradient_noise")]
    GradientNoise(GradientNoiseArgs),

    /// Create an animation by moving points according to a velocity field
    #[command(name = "advect_points")]
    AdvectPoints(AdvectPointsArgs),

    /// Replace non-positive values with color
    #[command(name = "visualize_sdf")]
    VisualizeSdf(VisualizeSdfArgs),

    /// Print a usage example for each command
    Examples,
}

/// Image or domain size written as `<width>x<height>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dims {
    pub width: u32,
    pub height: u32,
}

fn parse_dims(s: &str) -> Result<Dims, String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected <width>x<height>, got '{s}'"))?;
    let width: u32 = w
        .trim()
        .parse()
        .map_err(|_| format!("bad width '{w}' in '{s}'"))?;
    let height: u32 = h
        .trim()
        .parse()
        .map_err(|_| format!("bad height '{h}' in '{s}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("dimensions must be > 0, got '{s}'"));
    }
    Ok(Dims { width, height })
}

fn parse_viewport(s: &str) -> Result<Viewport, String> {
    s.parse().map_err(|e: clumpy::error::Error| e.to_string())
}

fn parse_kernel(s: &str) -> Result<SplatKernel, String> {
    s.parse().map_err(|e: clumpy::error::Error| e.to_string())
}

fn parse_mode(s: &str) -> Result<SdfColorMode, String> {
    s.parse().map_err(|e: clumpy::error::Error| e.to_string())
}

#[derive(Debug, Args)]
pub struct BridsonPointsArgs {
    /// Domain size, e.g. 500x250
    #[arg(value_parser = parse_dims)]
    pub dims: Dims,
    /// Minimum distance between any two points
    pub min_radius: f32,
    /// Seed of the point stream; equal seeds reproduce equal output
    #[arg(allow_hyphen_values = true)]
    pub seed: i32,
    /// Output points, shape (n, 2) float32
    pub output: PathBuf,
    /// Proposals around each active point before it is retired
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
}

#[derive(Debug, Args)]
pub struct CullPointsArgs {
    /// Input points, shape (n, 2) float32
    pub input_pts: PathBuf,
    /// Mask image, shape (h, w) float32
    pub mask_img: PathBuf,
    /// Output points
    pub output_pts: PathBuf,
}

#[derive(Debug, Args)]
pub struct SplatPointsArgs {
    /// Input points, shape (n, 2) float32
    pub input_pts: PathBuf,
    /// Output image size, e.g. 500x250
    #[arg(value_parser = parse_dims)]
    pub dims: Dims,
    /// distance, gaussian or circle
    #[arg(value_parser = parse_kernel)]
    pub kernel_type: SplatKernel,
    /// Odd kernel width in pixels
    pub kernel_size: u32,
    /// Peak intensity in [0, 1]
    pub alpha: f32,
    /// Output image, shape (h, w) uint8
    pub output_img: PathBuf,
}

#[derive(Debug, Args)]
pub struct Curl2dArgs {
    /// Scalar field, shape (h, w) float32
    pub input_img: PathBuf,
    /// Velocity field, shape (h, w, 2) float32
    pub output_img: PathBuf,
}

#[derive(Debug, Args)]
pub struct GradientNoiseArgs {
    /// Output image size, e.g. 1024x1024
    #[arg(value_parser = parse_dims)]
    pub dims: Dims,
    /// Noise-space rectangle as left,bottom,right,top
    #[arg(value_parser = parse_viewport, allow_hyphen_values = true)]
    pub viewport: Viewport,
    /// Lattice cells per viewport unit
    pub frequency: f32,
    /// Seed of the permutation table and lattice offset
    #[arg(allow_hyphen_values = true)]
    pub seed: i32,
    /// Output image, shape (h, w) float32
    #[arg(long, short, default_value = "gradient_noise.npy")]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct AdvectPointsArgs {
    /// Input points, shape (n, 2) float32
    pub input_pts: PathBuf,
    /// Velocity field, shape (h, w, 2) float32
    pub velocities_img: PathBuf,
    /// Velocity multiplier per frame
    #[arg(allow_hyphen_values = true)]
    pub step_size: f32,
    /// Number of frames, also the particle lifetime
    pub nframes: u32,
    /// Frame file suffix; frames are written as 000<suffix>, 001<suffix>, ...
    pub suffix: String,
}

#[derive(Debug, Args)]
pub struct VisualizeSdfArgs {
    /// Signed distance field, shape (h, w) float32
    pub input_img: PathBuf,
    /// rgb or rgba
    #[arg(value_parser = parse_mode)]
    pub mode: SdfColorMode,
    /// Output image, shape (h, w, 3|4) uint8
    pub output_img: PathBuf,
}

/// One invocation per subcommand, printed by `clumpy examples`.
pub const EXAMPLES: &[&str] = &[
    "bridson_points 500x250 10 987 bridson.npy",
    "cull_points bridson.npy shapes.npy culled.npy",
    "splat_points bridson.npy 500x250 gaussian 5 1.0 splat.npy",
    "curl_2d in.npy out.npy",
    "gradient_noise 1024x1024 '-1.0,-1.0,+1.0,+1.0' 3.0 42",
    "advect_points coords.npy speeds.npy 1.0 240 anim.npy",
    "visualize_sdf in.npy rgb out.npy",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(std::iter::once("clumpy").chain(args.iter().copied()))
            .expect("arguments should parse")
            .command
    }

    #[test]
    fn dims_parse_width_by_height() {
        assert_eq!(
            parse_dims("500x250"),
            Ok(Dims {
                width: 500,
                height: 250
            })
        );
        assert!(parse_dims("500").is_err());
        assert!(parse_dims("0x10").is_err());
        assert!(parse_dims("ax10").is_err());
    }

    #[test]
    fn bridson_points_reference_invocation() {
        let Command::BridsonPoints(args) = parse(&["bridson_points", "500x250", "15", "987", "out.npy"])
        else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.dims, Dims { width: 500, height: 250 });
        assert_eq!(args.min_radius, 15.0);
        assert_eq!(args.seed, 987);
        assert_eq!(args.output, PathBuf::from("out.npy"));
        assert_eq!(args.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn negative_seed_and_viewport_are_positional() {
        let Command::GradientNoise(args) =
            parse(&["gradient_noise", "64x32", "-1.0,-1.0,+1.0,+1.0", "3.0", "-7"])
        else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.viewport, Viewport::default());
        assert_eq!(args.seed, -7);
        assert_eq!(args.output, PathBuf::from("gradient_noise.npy"));
    }

    #[test]
    fn splat_kernel_names_are_validated() {
        let ok = parse(&["splat_points", "p.npy", "10x10", "circle", "3", "1.0", "o.npy"]);
        assert!(matches!(
            ok,
            Command::SplatPoints(SplatPointsArgs {
                kernel_type: SplatKernel::Circle,
                ..
            })
        ));

        let bad = Cli::try_parse_from([
            "clumpy", "splat_points", "p.npy", "10x10", "box", "3", "1.0", "o.npy",
        ]);
        assert!(bad.is_err());
    }

    #[test]
    fn every_example_parses() {
        for example in EXAMPLES {
            let args: Vec<&str> = example
                .split_whitespace()
                .map(|a| a.trim_matches('\''))
                .collect();
            parse(&args);
        }
    }

    #[test]
    fn wrong_argument_count_is_rejected() {
        assert!(Cli::try_parse_from(["clumpy", "curl_2d", "in.npy"]).is_err());
        assert!(Cli::try_parse_from(["clumpy", "no_such_command"]).is_err());
    }
}
