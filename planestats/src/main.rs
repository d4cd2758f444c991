//! Self-check: runs the plane statistics filter over synthetic frames at
//! every CPU level up to the configured cap and reports whether all tiers
//! publish the same properties.
//!
//! Usage: `planestats [config.yaml]`

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::Serialize;
use strum::IntoEnumIterator;

use common::cpu_features;
use common::log_setup::setup_logging;
use planestats::prelude::*;

const WIDTH: u32 = 123;
const HEIGHT: u32 = 37;
const FRAME_COUNT: usize = 8;

#[derive(Debug, Serialize)]
struct LevelRun {
    level: CpuLevel,
    isa: String,
    agrees: bool,
}

#[derive(Debug, Serialize)]
struct FormatRun {
    format: VideoFormat,
    baseline: Vec<FrameProps>,
    levels: Vec<LevelRun>,
}

#[derive(Debug, Serialize)]
struct Report {
    cpu_features: String,
    config: PlaneStatsConfig,
    formats: Vec<FormatRun>,
    all_agree: bool,
}

fn main() -> Result<()> {
    setup_logging(if common::is_debug() { "debug" } else { "info" });

    let config = match std::env::args().nth(1) {
        Some(path) => PlaneStatsConfig::load(&PathBuf::from(path))?,
        None => PlaneStatsConfig::default(),
    };
    log::info!("config: {:?}", config);

    let formats = [
        VideoFormat::integer(8, 3),
        VideoFormat::integer(10, 3),
        VideoFormat::integer(16, 3),
        VideoFormat::float(3),
    ];

    let mut runs = Vec::with_capacity(formats.len());
    for format in formats {
        runs.push(check_format(&config, format)?);
    }

    let all_agree = runs
        .iter()
        .all(|run| run.levels.iter().all(|level| level.agrees));
    let report = Report {
        cpu_features: cpu_features::get().to_string(),
        config,
        formats: runs,
        all_agree,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !all_agree {
        bail!("kernel tiers disagree, see report");
    }
    Ok(())
}

fn check_format(config: &PlaneStatsConfig, format: VideoFormat) -> Result<FormatRun> {
    let frames = synthetic_frames(format, 0)?;
    let references = synthetic_frames(format, 1)?;

    let baseline = run_level(config, CpuLevel::None, format, &frames, &references)?
        .iter()
        .map(|frame| frame.props().clone())
        .collect::<Vec<_>>();

    let mut levels = Vec::new();
    for level in CpuLevel::iter().filter(|level| *level <= config.cpu) {
        let processed = run_level(config, level, format, &frames, &references)?;
        let agrees = processed
            .iter()
            .zip(&baseline)
            .all(|(frame, expected)| props_agree(expected, frame.props()));
        if !agrees {
            log::warn!("{} at cpu level {} disagrees with scalar", format, level);
        }

        levels.push(LevelRun {
            level,
            isa: Isa::detect(level).to_string(),
            agrees,
        });
    }

    Ok(FormatRun {
        format,
        baseline,
        levels,
    })
}

fn run_level(
    config: &PlaneStatsConfig,
    level: CpuLevel,
    format: VideoFormat,
    frames: &[Frame],
    references: &[Frame],
) -> Result<Vec<Frame>> {
    let config = PlaneStatsConfig {
        cpu: level,
        ..config.clone()
    };
    let filter = PlaneStatsFilter::new(&config, format, Some(format))?;

    let mut processed = frames.to_vec();
    filter.process_batch(&mut processed, Some(references))?;
    Ok(processed)
}

/// Deterministic gradients with a per-frame, per-plane offset. `seed`
/// shifts the pattern so reference frames differ from the measured ones.
fn synthetic_frames(format: VideoFormat, seed: u32) -> Result<Vec<Frame>> {
    // Float planes get 256 evenly spaced levels in [0, 1).
    let levels = match format.sample_type {
        SampleType::Integer => format.peak() as u32 + 1,
        SampleType::Float => 256,
    };
    let mut frames = Vec::with_capacity(FRAME_COUNT);

    for index in 0..FRAME_COUNT as u32 {
        let mut frame = Frame::blank(format, WIDTH, HEIGHT)?;
        for plane_index in 0..format.num_planes {
            let offset = index * 31 + plane_index as u32 * 7 + seed * 13;
            let code = move |x: u32, y: u32| (x * 5 + y * 11 + offset) % levels;

            let plane = frame.plane_mut(plane_index)?;
            match plane.format() {
                SampleFormat::U8 => plane.fill_with(|x, y| code(x, y) as u8)?,
                SampleFormat::U16 => plane.fill_with(|x, y| code(x, y) as u16)?,
                SampleFormat::F32 => plane.fill_with(|x, y| code(x, y) as f32 / levels as f32)?,
            }
        }
        frames.push(frame);
    }
    Ok(frames)
}

fn props_agree(expected: &FrameProps, actual: &FrameProps) -> bool {
    expected.len() == actual.len()
        && expected.iter().all(|(key, value)| match (value, actual.get(key)) {
            (PropValue::Int(a), Some(PropValue::Int(b))) => a == b,
            (PropValue::Float(a), Some(PropValue::Float(b))) => {
                a == b || (a - b).abs() <= 1e-9 * a.abs().max(1.0)
            }
            _ => false,
        })
}
