//! Check a frame directory.

use std::path::PathBuf;

use turntable_common::config::ViewerConfig;
use turntable_model::sequence::{SequenceManifest, SequenceNaming};

pub fn run(dir: PathBuf, prefix: String, ext: String, viewer: ViewerConfig) -> anyhow::Result<()> {
    println!("Checking sequence at: {}", dir.display());

    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let naming = SequenceNaming {
        prefix,
        extension: ext,
    };
    let manifest = SequenceManifest::expected(&dir, naming, viewer.total_frames);
    let scan = manifest
        .scan()
        .map_err(|e| anyhow::anyhow!("Failed to scan sequence: {e}"))?;

    println!(
        "  Frames: {}/{} present ({} .. {})",
        scan.present.len(),
        manifest.len(),
        manifest.naming.file_name(0),
        manifest.naming.file_name(manifest.len().saturating_sub(1))
    );

    if !scan.extra.is_empty() {
        println!("  Stray frames beyond the sequence: {}", scan.extra.len());
        for path in &scan.extra {
            println!("    {}", path.display());
        }
    }

    if scan.is_complete() {
        println!("\nSequence is complete.");
    } else {
        println!("\nMissing frames:");
        for slot in &scan.missing {
            println!("  - {}", manifest.naming.file_name(*slot));
        }
        println!(
            "\n{} frame(s) missing. The viewer will not become ready.",
            scan.missing.len()
        );
    }

    Ok(())
}
