//! Safety checks to prevent accidental data loss.
//!
//! The build writes a handful of well-known artifacts into its output
//! directory; these checks validate that doing so can never clobber the
//! source data the build was derived from.

use anyhow::{bail, Result};
use std::path::Path;

/// Source file names the build must never overwrite.
const SOURCE_FILES: [&str; 3] = ["karaoke_song_list.json", "to_review.json", "categories.txt"];

/// Validates that an output directory is safe to write artifacts into.
///
/// Checks:
/// - Output directory cannot be the data directory itself
/// - No artifact path may coincide with a known source file
pub fn validate_output_dir(out_dir: &Path, data_dir: &Path, artifacts: &[&str]) -> Result<()> {
    if out_dir == data_dir {
        bail!(
            "Safety check failed: output directory '{}' is the data directory",
            out_dir.display()
        );
    }

    for artifact in artifacts {
        if SOURCE_FILES.contains(artifact) {
            bail!(
                "Safety check failed: artifact '{}' matches a source file name",
                artifact
            );
        }
        let target = out_dir.join(artifact);
        for source in SOURCE_FILES {
            if target == data_dir.join(source) {
                bail!(
                    "Safety check failed: artifact '{}' would overwrite source '{}'",
                    target.display(),
                    source
                );
            }
        }
    }

    Ok(())
}

/// Validates the enrichment tool's output path: writing back onto the
/// input requires an explicit opt-in.
pub fn validate_enrich_output(output: &Path, input: &Path, in_place: bool) -> Result<()> {
    if output == input && !in_place {
        bail!(
            "Safety check failed: output '{}' is the input file (pass --in-place to overwrite)",
            output.display()
        );
    }
    Ok(())
}
