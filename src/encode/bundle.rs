use crate::encode::metadata::AnimationMetadata;
use crate::foundation::error::{SketchError, SketchResult};
use std::io::{Cursor, Write as _};
use zip::write::SimpleFileOptions;

/// Entry names inside a bundle for base name `name`.
pub fn entry_names(name: &str) -> (String, String) {
    (format!("{name}.gif"), format!("{name}_metadata.json"))
}

/// Zip the exported GIF and its pretty-printed metadata into one archive.
///
/// `gif` is `None` when nothing has been exported yet, which is a precondition failure.
#[tracing::instrument(skip(gif, metadata), fields(gif_bytes = gif.map(<[u8]>::len)))]
pub fn package_bundle(
    gif: Option<&[u8]>,
    metadata: &AnimationMetadata,
    name: &str,
) -> SketchResult<Vec<u8>> {
    let gif = gif.ok_or_else(|| SketchError::precondition("Please generate a GIF first"))?;
    validate_base_name(name)?;
    let json = metadata.to_json_pretty()?;
    let (gif_name, json_name) = entry_names(name);

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file(
        gif_name.as_str(),
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored),
    )
    .map_err(|e| SketchError::archive(format!("start '{gif_name}': {e}")))?;
    zip.write_all(gif)
        .map_err(|e| SketchError::archive(format!("write '{gif_name}': {e}")))?;

    zip.start_file(
        json_name.as_str(),
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated),
    )
    .map_err(|e| SketchError::archive(format!("start '{json_name}': {e}")))?;
    zip.write_all(json.as_bytes())
        .map_err(|e| SketchError::archive(format!("write '{json_name}': {e}")))?;

    let out = zip
        .finish()
        .map_err(|e| SketchError::archive(format!("finalize archive: {e}")))?;
    Ok(out.into_inner())
}

fn validate_base_name(name: &str) -> SketchResult<()> {
    if name.trim().is_empty() {
        return Err(SketchError::validation("bundle name must not be empty"));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(SketchError::validation(format!(
            "bundle name '{name}' must be a plain file stem"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/bundle.rs"]
mod tests;
