/// Lowercased extension of a file name, without the leading dot.
///
/// Everything after the last dot of the final path segment counts, so a bare
/// `.png` has extension `png`. A trailing dot means no extension.
pub fn file_ext(file_name: &str) -> Option<String> {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext.to_lowercase()),
        _ => None,
    }
}

/// Human readable size, whole megabytes and kilobytes are shown as `1MB`, `512KB`.
pub fn human_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    if size >= MB && size % MB == 0 {
        format!("{}MB", size / MB)
    } else if size >= KB && size % KB == 0 {
        format!("{}KB", size / KB)
    } else {
        format!("{size}B")
    }
}
