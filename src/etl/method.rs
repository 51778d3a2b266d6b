//! Method names as relative path segments

use eyre::Result;

/// Split a method name into the path segments used for both its endpoint
/// URL and its output file.
///
/// Empty segments are dropped, so `/customers` and `customers` name the same
/// method. `.` and `..` are rejected so a method can never point outside
/// the API base path or the output folder.
pub fn method_segments(method: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = method
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        eyre::bail!("Method name is empty: '{}'", method);
    }
    if let Some(segment) = segments.iter().find(|s| **s == "." || **s == "..") {
        eyre::bail!("Method '{}' contains a '{}' segment", method, segment);
    }
    Ok(segments)
}
