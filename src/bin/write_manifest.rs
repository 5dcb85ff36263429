//! Manifest writer for the disease model artifacts.
//!
//! Records the SHA-256 digest of each artifact in `manifest.json` so the
//! application can detect modified or swapped files at startup.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin write_manifest -- <model_dir>
//! ```

use std::env;
use std::path::PathBuf;

use medipredict::adapters::artifact::{ArtifactManifest, ModelArtifact};
use medipredict::Disease;

fn parse_args() -> Result<PathBuf, String> {
    let mut args = env::args().skip(1);
    let model_dir = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| "Usage: write_manifest <model_dir>".to_string())?;
    if let Some(extra) = args.next() {
        return Err(format!("Unexpected argument: {extra}"));
    }
    Ok(model_dir)
}

fn main() -> Result<(), String> {
    let model_dir = parse_args()?;
    if !model_dir.is_dir() {
        return Err(format!("Not a directory: {model_dir:?}"));
    }

    // Refuse to record digests for artifacts the application would reject.
    for disease in Disease::ALL {
        let path = model_dir.join(disease.artifact_file());
        let artifact = ModelArtifact::load(&path).map_err(|e| e.to_string())?;
        artifact
            .check_schema(disease.profile(), &path.display().to_string())
            .map_err(|e| e.to_string())?;
    }

    let files: Vec<&str> = Disease::ALL.iter().map(Disease::artifact_file).collect();
    let manifest = ArtifactManifest::build(&model_dir, &files).map_err(|e| e.to_string())?;
    manifest.write(&model_dir).map_err(|e| e.to_string())?;

    println!(
        "Wrote {:?} ({} files)",
        model_dir.join(ArtifactManifest::FILE_NAME),
        manifest.files.len()
    );
    for (file, digest) in &manifest.files {
        println!("  {file}: {digest}");
    }

    Ok(())
}
