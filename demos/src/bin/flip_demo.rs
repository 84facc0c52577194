//! Flips a procedural scene between 3D and 2D, spreading the work over
//! simulated frames.
//!
//! ```bash
//! # 500 bodies, 40 conversions per group per frame, back to 3D afterwards
//! cargo run -p dimshift-demos --bin flip_demo -- --count 500 --batch 40 --round-trip
//!
//! # Settings from a RON file
//! cargo run -p dimshift-demos --bin flip_demo -- --settings conversion.ron
//! ```

use std::path::PathBuf;

use clap::Parser;
use dimshift_convert::{
    AabbHost, ConversionContext, ConversionSettings, Direction, OverlapState, Scene, SweepStatus,
};
use dimshift_core::CancellationToken;
use dimshift_demos::scenes::mixed_grid;

/// Direction of the first sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
enum CliDirection {
    /// 3D to 2D.
    #[default]
    Flatten,
    /// 2D to 3D. Only meaningful after a flatten, so it implies --round-trip.
    Lift,
}

#[derive(Parser, Debug)]
#[command(
    name = "flip_demo",
    about = "Frame-spread 3D/2D conversion of a procedural scene",
    version
)]
struct Args {
    /// Number of bodies in the scene.
    #[arg(long, default_value = "200")]
    count: usize,

    /// Bodies per grid row.
    #[arg(long, default_value = "20")]
    columns: usize,

    /// Batch size for every builtin converter group. Overrides the settings file.
    #[arg(long)]
    batch: Option<u32>,

    /// Direction of the first sweep.
    #[arg(long, default_value = "flatten", value_enum)]
    direction: CliDirection,

    /// Convert back after the first sweep completes.
    #[arg(long)]
    round_trip: bool,

    /// Conversion settings in RON.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Cancel the sweep after this many frames.
    #[arg(long)]
    cancel_after: Option<usize>,

    /// Overlap monitoring frames to run after flattening.
    #[arg(long, default_value = "30")]
    settle_frames: usize,
}

fn load_settings(args: &Args) -> Result<ConversionSettings, String> {
    let mut settings = match &args.settings {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            ConversionSettings::from_ron_str(&text).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => ConversionSettings::default(),
    };
    if let Some(batch) = args.batch {
        settings = settings.with_batch(batch);
        settings.validate().map_err(|e| e.to_string())?;
    }
    Ok(settings)
}

/// Drive one sweep to the end, one `advance` per simulated frame.
fn run_sweep(
    ctx: &mut ConversionContext,
    scene: &mut Scene,
    host: &mut AabbHost,
    direction: Direction,
    cancel_after: Option<usize>,
) -> bool {
    let token = CancellationToken::new();
    if let Err(err) = ctx.begin_sweep(direction, Some(token.clone())) {
        log::error!("{err}");
        return false;
    }
    let mut frame = 0;
    loop {
        frame += 1;
        if cancel_after.is_some_and(|limit| frame > limit) {
            token.cancel();
        }
        match ctx.advance(scene, host) {
            SweepStatus::Yielded { converted } => {
                log::info!("frame {frame}: {converted} converted");
                dimshift_core::profile_plot!("converted_per_frame", converted);
                ctx.step_overlaps(scene, host);
                dimshift_core::profile_frame!();
            }
            SweepStatus::Complete(report) => {
                for (id, err) in &report.failed {
                    log::warn!("{id:?}: {err}");
                }
                return true;
            }
            SweepStatus::Cancelled(report) => {
                log::warn!("cancelled on frame {frame} after {} conversion(s)", report.converted);
                return false;
            }
            SweepStatus::Idle => return false,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    let (mut scene, ids) = mixed_grid(args.count, args.columns);
    let mut ctx = match ConversionContext::new(settings) {
        Ok(ctx) => ctx,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };
    let mut host = AabbHost::new();
    let mut converters = 0;
    for &entity in &ids {
        match ctx.attach_entity(&mut scene, entity) {
            Ok(attached) => converters += attached.len(),
            Err(err) => log::warn!("{entity:?} not attached: {err}"),
        }
    }
    log::info!("{} entities, {converters} converters", ids.len());

    let mut directions = match args.direction {
        CliDirection::Flatten => vec![Direction::ToPlanar],
        CliDirection::Lift => vec![Direction::ToPlanar, Direction::ToVolume],
    };
    if args.round_trip && directions.len() == 1 {
        directions.push(Direction::ToVolume);
    }

    for direction in directions {
        if !run_sweep(&mut ctx, &mut scene, &mut host, direction, args.cancel_after) {
            std::process::exit(2);
        }
        if direction == Direction::ToPlanar {
            for _ in 0..args.settle_frames {
                ctx.step_overlaps(&scene, &mut host);
            }
            let suppressing = ids
                .iter()
                .filter(|id| ctx.overlap_state(**id) != OverlapState::Idle)
                .count();
            log::info!(
                "{suppressing} bodies still suppressing, {} pair(s) suppressed",
                host.suppressed_count()
            );
        }
        if ctx.pending_count() > 0 {
            log::info!("{} joint(s) waiting on their partner", ctx.pending_count());
        }
    }

    let meshes = ctx.take_replaced_meshes();
    if !meshes.is_empty() {
        log::info!("{} replaced mesh(es) handed back", meshes.len());
        for mesh in &meshes {
            log::debug!("released {}", mesh.label().unwrap_or("unlabelled mesh"));
        }
    }
}
