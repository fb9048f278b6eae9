//! Run a live viewer session.

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use tokio::sync::mpsc;
use turntable_common::clock::SessionClock;
use turntable_common::config::ViewerConfig;
use turntable_core::driver::drive;
use turntable_core::Viewer;
use turntable_input::{EventWriter, InputPump, ScriptedBackend};
use turntable_model::event::EventStreamHeader;
use turntable_model::sequence::{SequenceManifest, SequenceNaming};

pub struct PlayOptions {
    pub dir: PathBuf,
    pub script: Option<PathBuf>,
    pub rate: f64,
    pub record: Option<PathBuf>,
    pub width: f64,
    pub prefix: String,
    pub ext: String,
}

pub async fn run(options: PlayOptions, config: ViewerConfig) -> anyhow::Result<()> {
    println!("Playing sequence at: {}", options.dir.display());

    let naming = SequenceNaming {
        prefix: options.prefix,
        extension: options.ext,
    };
    let manifest = SequenceManifest::resolve(&options.dir, naming, config.total_frames)
        .map_err(|e| anyhow::anyhow!("Failed to load sequence: {e}"))?;

    let total_frames = config.total_frames;
    let mut viewer: Viewer<PathBuf> = Viewer::new(config, options.width)?;

    let names: Vec<String> = (0..total_frames)
        .map(|slot| manifest.naming.file_name(slot))
        .collect();
    viewer.subscribe(move |slot: usize| {
        let file = names.get(slot).map(String::as_str).unwrap_or("?");
        tracing::debug!(slot, file, "Frame shown");
    });

    let mut last_percent = None;
    for (slot, path) in manifest.frames.into_iter().enumerate() {
        let progress = viewer.load_frame(slot, path)?;
        let percent = progress.percent();
        if last_percent != Some(percent) && percent % 25 == 0 {
            println!("  Loading... {percent}%");
        }
        last_percent = Some(percent);
    }

    let clock = SessionClock::start();
    let (tx, rx) = mpsc::channel(256);

    let pump = match options.script {
        Some(script) => {
            let backend = ScriptedBackend::from_file(&script, clock.clone(), options.rate)?;
            let mut pump = InputPump::new(Box::new(backend));
            if let Some(record) = options.record {
                let header = EventStreamHeader {
                    schema_version: "1.0".to_string(),
                    epoch_wall: clock.epoch_wall().to_string(),
                    track_width: options.width,
                    total_frames,
                };
                pump = pump.with_recorder(EventWriter::create(record, &header)?);
            }
            let stop = pump.stop_flag();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupted, stopping input");
                    stop.store(true, Ordering::Relaxed);
                }
            });
            println!("  Feeding input from: {}", script.display());
            Some(tokio::spawn(async move { pump.run(tx).await }))
        }
        None => {
            if options.record.is_some() {
                tracing::warn!("--record has no effect without --script");
            }
            drop(tx);
            None
        }
    };

    let stats = drive(&mut viewer, rx).await;

    if let Some(handle) = pump {
        let forwarded = handle.await??;
        println!("  Input events forwarded: {forwarded}");
    }

    println!(
        "  Events: {} received, {} handled, {} rejected",
        stats.events, stats.handled, stats.rejected
    );
    println!("  Ticks: {} in {} ms", stats.ticks, clock.elapsed_ms());
    match viewer.visible_asset() {
        Some(path) => println!(
            "\nStopped on frame {} ({})",
            viewer.normalized_frame(),
            path.display()
        ),
        None => println!("\nStopped on frame {}", viewer.normalized_frame()),
    }

    Ok(())
}
