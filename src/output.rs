//! Output path resolution and saving of generated images.

use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::error::GenerateError;
use crate::generators::ArtifactMetadata;
use crate::params::OutputFormat;
use crate::ports::Artifact;

/// Resolve the output path: use explicit path or the suggested name.
#[must_use]
pub fn resolve_output_path(explicit: Option<&str>, metadata: &ArtifactMetadata) -> PathBuf {
    match explicit {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(&metadata.name),
    }
}

/// Save a generated image to `output_path`.
///
/// The temp file is moved into place, unless the path's extension names a
/// different raster format than the one generated, in which case the image is
/// re-encoded.
///
/// # Errors
///
/// Returns an error if the file cannot be written or conversion fails.
pub fn save_artifact(
    artifact: Artifact,
    metadata: &ArtifactMetadata,
    output_path: &Path,
) -> Result<(), GenerateError> {
    match conversion_target(&metadata.format, output_path) {
        Some(target) => convert_and_save(&artifact, target, output_path),
        None => artifact.persist(output_path),
    }
}

/// The format to re-encode into, when the output extension asks for one the
/// artifact is not already in.
fn conversion_target(format: &OutputFormat, output_path: &Path) -> Option<ImageFormat> {
    let ext = output_path.extension()?.to_str()?;
    let wanted = ImageFormat::from_extension(ext)?;
    match ImageFormat::from_extension(format.as_str()) {
        Some(have) if have == wanted => None,
        _ => Some(wanted),
    }
}

/// Decode the artifact and save it in the target format.
fn convert_and_save(
    artifact: &Artifact,
    target: ImageFormat,
    output_path: &Path,
) -> Result<(), GenerateError> {
    let data = artifact.read()?;
    let img = image::load_from_memory(&data)
        .map_err(|e| GenerateError::ImageConversion(format!("Failed to decode image: {e}")))?;

    img.save_with_format(output_path, target).map_err(|e| {
        GenerateError::ImageConversion(format!("Failed to save as {target:?}: {e}"))
    })
}
