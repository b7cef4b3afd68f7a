//! Enrich the raw song list with guessed lyrics URLs.
//! Fills missing `lyrics_url`/`fallback_url` fields without overwriting
//! existing values; safe to re-run.
//!
//! Usage: enrich-urls <karaoke_song_list.json> [output.json] [--in-place]

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;

use songbook_build::enrich::enrich_records;
use songbook_build::safety::validate_enrich_output;

#[derive(Parser)]
#[command(name = "enrich-urls")]
#[command(about = "Fill missing lyrics_url/fallback_url fields in a song list")]
struct Args {
    input: PathBuf,

    /// Output path; defaults to the input with --in-place
    output: Option<PathBuf>,

    /// Allow writing back onto the input file
    #[arg(long)]
    in_place: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let output = match args.output {
        Some(path) => path,
        None if args.in_place => args.input.clone(),
        None => bail!("No output path given (pass one, or --in-place to rewrite the input)"),
    };
    validate_enrich_output(&output, &args.input, args.in_place)?;

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let data: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse JSON in {}", args.input.display()))?;
    let Value::Array(records) = data else {
        bail!("Expected a JSON array in {}", args.input.display());
    };

    let total = records.len();
    let enriched = enrich_records(records);
    let filled = enriched
        .iter()
        .filter_map(Value::as_object)
        .filter(|rec| rec.contains_key("lyrics_url"))
        .count();

    let json = serde_json::to_string_pretty(&Value::Array(enriched))?;
    std::fs::write(&output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Enriched {} of {} records -> {}", filled, total, output.display());
    Ok(())
}
