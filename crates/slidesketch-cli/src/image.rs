use std::path::Path;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// MIME subtype for an image file, inferred from its extension.
pub fn image_subtype(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("png"),
        "jpg" | "jpeg" => Some("jpeg"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        _ => None,
    }
}

/// Encode raw image bytes as `data:image/<subtype>;base64,<payload>`.
pub fn encode_data_url(subtype: &str, bytes: &[u8]) -> String {
    format!("data:image/{};base64,{}", subtype, STANDARD.encode(bytes))
}

/// Read an image file and turn it into a data URL.
pub fn data_url_from_path(path: &Path) -> anyhow::Result<String> {
    let subtype = image_subtype(path).with_context(|| {
        format!(
            "unsupported image type for {} (expected .png, .jpg, .jpeg, .gif or .webp)",
            path.display()
        )
    })?;
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(encode_data_url(subtype, &bytes))
}
