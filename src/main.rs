use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Builder;
use gradient_edges::{
    canny_edges_with, threshold_gradient_edges_with, to_grayscale, Average, BucketRule,
    CannyOptions, DirectorySink, EdgeParams, GrayscaleConversion, HysteresisMode, ImageSink,
    Kernel, Luminance, NullSink, PRESET_ALPHA, PRESET_BETA,
};
use log::{info, LevelFilter};

#[derive(Parser)]
#[command(name = "gradient-edges")]
#[command(about = "Compute a binary edge map from a gradient operator")]
#[command(version)]
struct Cli {
    /// Image to read; color images are converted to gray first.
    input: PathBuf,

    /// Where to write the edge map (PNG recommended).
    output: PathBuf,

    /// Gradient operator.
    #[arg(long, value_enum, default_value_t = KernelArg::Sobel)]
    kernel: KernelArg,

    /// Upper threshold as a fraction of the strongest gradient.
    #[arg(long, default_value_t = PRESET_ALPHA)]
    alpha: f64,

    /// Lower threshold as a fraction of the upper one.
    #[arg(long, default_value_t = PRESET_BETA)]
    beta: f64,

    /// Use the legacy suppression + hysteresis pipeline instead of a plain threshold.
    #[arg(long)]
    canny: bool,

    /// Direction buckets for suppression (with --canny).
    #[arg(long, value_enum, default_value_t = BucketRuleArg::Compat)]
    bucket_rule: BucketRuleArg,

    /// Weak pixel resolution (with --canny).
    #[arg(long, value_enum, default_value_t = HysteresisArg::Legacy)]
    hysteresis: HysteresisArg,

    /// Color to gray conversion.
    #[arg(long, value_enum, default_value_t = GrayscaleArg::Luminance)]
    grayscale: GrayscaleArg,

    /// Directory receiving one PNG per pipeline stage.
    #[arg(long)]
    snapshots: Option<PathBuf>,

    /// Log pipeline details.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KernelArg {
    Sobel,
    Scharr,
}

impl From<KernelArg> for Kernel {
    fn from(arg: KernelArg) -> Kernel {
        match arg {
            KernelArg::Sobel => Kernel::SOBEL,
            KernelArg::Scharr => Kernel::SCHARR,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BucketRuleArg {
    Literal,
    Compat,
    Corrected,
}

impl From<BucketRuleArg> for BucketRule {
    fn from(arg: BucketRuleArg) -> BucketRule {
        match arg {
            BucketRuleArg::Literal => BucketRule::Literal,
            BucketRuleArg::Compat => BucketRule::Compat,
            BucketRuleArg::Corrected => BucketRule::Corrected,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HysteresisArg {
    Legacy,
    Strict,
}

impl From<HysteresisArg> for HysteresisMode {
    fn from(arg: HysteresisArg) -> HysteresisMode {
        match arg {
            HysteresisArg::Legacy => HysteresisMode::Legacy,
            HysteresisArg::Strict => HysteresisMode::Strict,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GrayscaleArg {
    Luminance,
    Average,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let params = EdgeParams::new(cli.alpha, cli.beta)?;
    let kernel = Kernel::from(cli.kernel);

    let color = image::open(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?
        .into_rgb8();
    let conversion: &dyn GrayscaleConversion = match cli.grayscale {
        GrayscaleArg::Luminance => &Luminance,
        GrayscaleArg::Average => &Average,
    };
    let gray = to_grayscale(&color, conversion);

    let mut sink: Box<dyn ImageSink> = match &cli.snapshots {
        Some(dir) => Box::new(DirectorySink::new(dir)),
        None => Box::new(NullSink),
    };

    let start = Instant::now();
    let edges = if cli.canny {
        let options = CannyOptions {
            bucket_rule: cli.bucket_rule.into(),
            hysteresis: cli.hysteresis.into(),
        };
        canny_edges_with(&gray, &kernel, &params, options, sink.as_mut())?
    } else {
        threshold_gradient_edges_with(&gray, &kernel, &params, sink.as_mut())?
    };
    info!(
        "{}x{} image, {} edge pixels in {:?}",
        gray.width(),
        gray.height(),
        edges.edge_count(),
        start.elapsed()
    );

    edges
        .to_luma()
        .save(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    Ok(())
}
