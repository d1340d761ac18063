//! interchange — end-to-end run over a synthetic two-event corridor.
//!
//! Loads a merge and a branch from embedded CSV, splices the merge's mainline
//! exit onto the branch's mainline entry, builds lanes, and writes the
//! OpenDRIVE records as CSV plus a JSON run report.
//!
//! ```text
//! cargo run -p interchange [-- path/to/pipeline_config.json]
//! ```
//!
//! Set `RUST_LOG=debug` for per-unit progress.

mod corridor;

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use od_core::UnitId;
use od_interchange::load_units_reader;
use od_output::{AssembleOptions, BatchOutputObserver, CsvWriter};
use od_pipeline::{PipelineBuilder, PipelineConfig, SplicePair};

use corridor::corridor_csv;

const OUTPUT_DIR: &str = "output/interchange";

fn load_config() -> Result<PipelineConfig> {
    match std::env::args().nth(1) {
        None => Ok(PipelineConfig::default()),
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== interchange — centrelines to OpenDRIVE records ===");
    println!();

    // 1. Configuration.
    let config = load_config()?;

    // 2. Load the corridor.
    let (links, borders) = corridor_csv()?;
    let loaded = load_units_reader(Cursor::new(links), Cursor::new(borders))?;
    for (unit, e) in &loaded.rejected {
        eprintln!("rejected {unit}: {e}");
    }
    println!("Loaded {} units ({} rejected)", loaded.units.len(), loaded.rejected.len());

    // 3. Build the pipeline.
    let pipeline = PipelineBuilder::new(loaded.units)
        .config(config)
        .splices(vec![SplicePair::new(UnitId(0), UnitId(1), 0.0)])
        .build()?;

    // 4. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = BatchOutputObserver::new(writer, AssembleOptions::default());

    // 5. Run.
    let t0 = Instant::now();
    let batch = pipeline.run(&mut obs);
    let elapsed = t0.elapsed();
    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }
    info!("run finished in {:.3} s", elapsed.as_secs_f64());

    let report = serde_json::json!({
        "splices": batch.splices,
        "failed":  batch.failed,
    });
    std::fs::write(Path::new(OUTPUT_DIR).join("report.json"), serde_json::to_string_pretty(&report)?)?;

    // 6. Summary.
    println!("Pipeline complete in {:.3} s", elapsed.as_secs_f64());
    println!("  units     : {} ok, {} failed", batch.units.len(), batch.failed_count());
    println!("  splices   : {} ({} bridged)", batch.splices.len(), batch.approximate_splices().count());
    println!("  roads     : {}", batch.road_count());
    println!();

    println!("{:<6} {:<16} {:>6} {:>10} {:>6}  {}", "Road", "Name", "Unit", "Length m", "Lanes", "Geometry");
    println!("{}", "-".repeat(64));
    for done in &batch.units {
        let Some(lanes) = done.unit.lanes.as_ref() else { continue };
        for (road, id) in done.ids.roads.iter() {
            let kinds: Vec<&str> = done
                .unit
                .classification(road)
                .map(|c| c.segments.iter().map(|s| s.kind.name()).collect())
                .unwrap_or_default();
            let length = done.unit.classification(road).map_or(0.0, |c| c.length());
            println!(
                "{:<6} {:<16} {:>6} {:>10.2} {:>6}  {}",
                id.0,
                road.name(),
                done.unit.id.0,
                length,
                lanes.table(road).lane_count,
                kinds.join(" "),
            );
        }
    }
    for failed in &batch.failed {
        println!("{} failed at {}: {}", failed.id, failed.stage, failed.reason);
    }

    Ok(())
}
