/// Format a byte count as a human-readable size string (e.g., "4 KB", "2 MB").
///
/// Uses exact integer division; values that aren't clean multiples of KB/MB
/// are shown in bytes. For approximate/fractional display, see [`format_bytes_approx`].
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1024 * 1024 && bytes.is_multiple_of(1024 * 1024) {
        format!("{} MB", bytes / (1024 * 1024))
    } else if bytes >= 1024 && bytes.is_multiple_of(1024) {
        format!("{} KB", bytes / 1024)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Format a byte count with fractional KB/MB/GB (e.g., "1.5 KB", "4.4 GB").
///
/// Better for disc images and cache sizes where exact binary alignment isn't guaranteed.
pub fn format_bytes_approx(bytes: u64) -> String {
    const GB: u64 = 1024 * 1024 * 1024;
    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Lowercased extension of a file name, without the dot.
///
/// Returns `None` for names without a dot or with a trailing dot.
pub fn file_extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() || ext.contains(['/', '\\', ' ']) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 bytes");
        assert_eq!(format_bytes(512), "512 bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(262144), "256 KB");
        assert_eq!(format_bytes(4194304), "4 MB");
        assert_eq!(format_bytes(1025), "1025 bytes");
    }

    #[test]
    fn test_format_bytes_approx() {
        assert_eq!(format_bytes_approx(0), "0 B");
        assert_eq!(format_bytes_approx(1536), "1.5 KB");
        assert_eq!(format_bytes_approx(1048576), "1.0 MB");
        assert_eq!(format_bytes_approx(1_459_978_240), "1.4 GB");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Game (USA).SFC").as_deref(), Some("sfc"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension("trailing."), None);
        assert_eq!(file_extension("Super Mario Bros. 3"), None);
    }
}
