use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use songbook_build::ingest::{read_categories, read_songs};
use songbook_build::models::{Meta, DATASET_VERSION};
use songbook_build::pipeline::build_dataset;
use songbook_build::progress::{finish_phase, format_duration, phase_spinner, set_log_only};
use songbook_build::render::{render_index_html, render_markdown};
use songbook_build::safety::validate_output_dir;
use songbook_build::search_index::build_search_index;
use songbook_build::validate::validate_dataset;

#[derive(Parser)]
#[command(name = "songbook-build")]
#[command(about = "Build the static songbook site from the song JSON dataset")]
struct Args {
    /// Data directory holding karaoke_song_list.json, to_review.json and
    /// categories.txt
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Output directory (defaults to dist/, or internal/ with --internal)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Internal build: the review queue may be merged in
    #[arg(long)]
    internal: bool,

    /// Merge the review queue (only honored together with --internal)
    #[arg(long)]
    include_review: bool,

    /// Hide spinners and print plain log lines
    #[arg(long)]
    log_only: bool,
}

const ARTIFACTS: [&str; 5] = [
    "songbook.json",
    "songbook.md",
    "validation_report.json",
    "search_index.json",
    "index.html",
];

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    set_log_only(args.log_only);
    let start = Instant::now();

    let out_dir = args.out_dir.unwrap_or_else(|| {
        PathBuf::from(if args.internal { "internal" } else { "dist" })
    });
    validate_output_dir(&out_dir, &args.data_dir, &ARTIFACTS)?;
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let pb = phase_spinner("Phase 1: Reading inputs");
    let categories = read_categories(&args.data_dir.join("categories.txt"))?;
    let mut songs = read_songs(&args.data_dir.join("karaoke_song_list.json"))?;
    if args.include_review && args.internal {
        songs.extend(read_songs(&args.data_dir.join("to_review.json"))?);
    }
    finish_phase(
        &pb,
        format!(
            "Phase 1: Read {} records, {} categories",
            songs.len(),
            categories.len()
        ),
    );

    let pb = phase_spinner("Phase 2: Normalizing");
    let mut dataset = build_dataset(songs, &categories);
    dataset.meta = Some(Meta {
        generated_at: Utc::now().to_rfc3339(),
        version: DATASET_VERSION,
    });
    finish_phase(
        &pb,
        format!(
            "Phase 2: {} songs, {} artists after dedup",
            dataset.songs.len(),
            dataset.artists.len()
        ),
    );

    let pb = phase_spinner("Phase 3: Validating");
    let report = validate_dataset(&dataset, &categories);
    finish_phase(&pb, format!("Phase 3: {} issues", report.summary.issues));

    let pb = phase_spinner("Phase 4: Building search index");
    let index = build_search_index(&dataset);
    finish_phase(&pb, format!("Phase 4: {} index entries", index.songs.len()));

    let pb = phase_spinner("Phase 5: Writing artifacts");
    write_json(&out_dir.join("songbook.json"), &dataset)?;
    write_json(&out_dir.join("validation_report.json"), &report)?;
    write_json(&out_dir.join("search_index.json"), &index)?;
    write_text(&out_dir.join("songbook.md"), &render_markdown(&dataset, &categories))?;
    write_text(&out_dir.join("index.html"), &render_index_html(&dataset)?)?;
    finish_phase(&pb, format!("Phase 5: Wrote {} artifacts", ARTIFACTS.len()));

    println!("\n{:=<60}", "");
    println!("Build complete!");
    println!("  Songs: {}", dataset.songs.len());
    println!("  Artists: {}", dataset.artists.len());
    println!("  Categories: {}", dataset.categories.len());
    println!("  Validation issues: {}", report.summary.issues);
    println!("  Elapsed: {}", format_duration(start.elapsed()));
    println!("{:=<60}", "");
    println!("Built:");
    for artifact in ARTIFACTS {
        println!(" - {}", out_dir.join(artifact).display());
    }

    Ok(())
}
