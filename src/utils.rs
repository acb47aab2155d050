/// Both separators count, so Windows-style selections classify the same on every host.
fn is_separator(c: char) -> bool {
    c == '\\' || c == '/'
}

/// Extension of the final path segment, dot included (`"c:\\a.txt"` -> `".txt"`).
///
/// Scans backwards: a separator before any dot means there is no extension.
pub fn extension_of(path: &str) -> Option<&str> {
    for (idx, c) in path.char_indices().rev() {
        if is_separator(c) {
            return None;
        }
        if c == '.' {
            return Some(&path[idx..]);
        }
    }
    None
}

/// File name with its extension stripped, using the same backwards scan as `extension_of`.
/// A trailing segment without a dot is returned unchanged.
pub fn display_name_of(path: &str) -> &str {
    for (idx, c) in path.char_indices().rev() {
        if is_separator(c) {
            return &path[idx + c.len_utf8()..];
        }
        if c == '.' {
            let start = path[..idx]
                .rfind(is_separator)
                .map(|sep| sep + 1)
                .unwrap_or(0);
            return &path[start..idx];
        }
    }
    path
}

/// Whether the execute bit is set for anyone. Always false where there is no such bit.
#[cfg(unix)]
pub fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
pub fn is_executable(_meta: &std::fs::Metadata) -> bool {
    false
}

/// Ordinal, case-insensitive comparison of two extensions.
pub fn same_extension(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
