//! Replay an input script in virtual time.

use std::path::PathBuf;

use turntable_common::config::ViewerConfig;
use turntable_core::replay::replay;
use turntable_core::Viewer;
use turntable_model::event::parse_events;

pub fn run(script: PathBuf, width: f64, json: bool, config: ViewerConfig) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&script)
        .map_err(|_| anyhow::anyhow!("Script not found: {}", script.display()))?;
    let events =
        parse_events(&content).map_err(|e| anyhow::anyhow!("Failed to parse script: {e}"))?;

    let total_frames = config.total_frames;
    let mut viewer: Viewer<usize> = Viewer::new(config, width)?;
    for slot in 0..total_frames {
        viewer.load_frame(slot, slot)?;
    }

    let report = replay(&mut viewer, &events)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Simulated {} events from: {}", events.len(), script.display());
    println!(
        "  Applied: {}  Ignored: {}",
        report.events_applied, report.events_ignored
    );
    println!(
        "  Ticks: {} ({} ms of animation)",
        report.ticks, report.ended_at_ms
    );
    println!(
        "  Final frame: {} (slot {} of {})",
        report.final_state.current_frame,
        viewer.normalized_frame(),
        total_frames
    );

    Ok(())
}
