use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Category folders sit at depth 1 (2 under `Files by Extension`), handlers one below.
const REGISTRY_DEPTH: usize = 3;

/// Collects the handler registry as `(path, is_dir)` in sorted pre-order, hidden entries skipped.
pub fn collect_registry(root: &Path) -> Vec<(PathBuf, bool)> {
    WalkDir::new(root)
        .max_depth(REGISTRY_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.')
        })
        .filter_map(|result| match result {
            Ok(entry) => Some((entry.path().to_path_buf(), entry.file_type().is_dir())),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping registry entry");
                None
            }
        })
        .collect()
}

/// Box-drawing labels for `paths`, one per entry.
///
/// * `paths` **must** be in pre-order (parents before children, siblings sorted),
///   which is what `collect_registry` yields.
/// * The first label is the root itself.
pub fn build_tree_labels(paths: &[(PathBuf, bool)], root_path: &Path) -> Vec<String> {
    // parent -> index of its last child, to pick "└─" over "├─".
    let mut last_child = HashMap::<&Path, usize>::new();
    for (idx, (path, _)) in paths.iter().enumerate() {
        if let Some(parent) = path.parent() {
            last_child.insert(parent, idx);
        }
    }

    // still_open[d] is true while the ancestor at depth d+1 has siblings below it.
    let mut still_open: Vec<bool> = Vec::new();
    let mut labels = Vec::with_capacity(paths.len());

    for (idx, (path, is_dir)) in paths.iter().enumerate() {
        let rel = path.strip_prefix(root_path).unwrap_or(path);
        let depth = rel.components().count();

        if depth == 0 {
            let name = root_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| ".".to_string());
            labels.push(format!("{}/", name));
            continue;
        }

        let is_last = path
            .parent()
            .and_then(|p| last_child.get(p))
            .is_some_and(|&last| last == idx);

        still_open.truncate(depth - 1);
        let mut label: String = still_open
            .iter()
            .map(|open| if *open { "│  " } else { "   " })
            .collect();
        label.push_str(if is_last { "└─ " } else { "├─ " });
        label.push_str(&rel.file_name().unwrap_or_default().to_string_lossy());
        if *is_dir {
            label.push('/');
        }
        labels.push(label);
        still_open.push(!is_last);
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    #[test]
    fn labels_draw_branches() {
        let root = PathBuf::from("/h/Open With Handlers for");
        let paths = vec![
            (root.clone(), true),
            (root.join("All files"), true),
            (root.join("All files/bar.exe"), false),
            (root.join("Everything"), true),
            (root.join("Everything/foo.exe"), false),
            (root.join("Everything/zip.exe"), false),
        ];
        let labels = build_tree_labels(&paths, &root);
        assert_eq!(
            labels,
            vec![
                "Open With Handlers for/",
                "├─ All files/",
                "│  └─ bar.exe",
                "└─ Everything/",
                "   ├─ foo.exe",
                "   └─ zip.exe",
            ]
        );
    }

    #[test]
    fn registry_walk_skips_hidden_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("Open With Handlers for");
        fs::create_dir_all(root.join("Files by Extension").join("(.md)")).unwrap();
        fs::create_dir_all(root.join("Everything")).unwrap();
        File::create(root.join("Files by Extension").join("(.md)").join("glow")).unwrap();
        File::create(root.join("Everything").join(".DS_Store")).unwrap();

        let entries = collect_registry(&root);
        let rel: Vec<String> = entries
            .iter()
            .map(|(p, _)| p.strip_prefix(&root).unwrap().display().to_string())
            .collect();
        assert_eq!(
            rel,
            vec![
                "".to_string(),
                "Everything".to_string(),
                "Files by Extension".to_string(),
                PathBuf::from("Files by Extension").join("(.md)").display().to_string(),
                PathBuf::from("Files by Extension")
                    .join("(.md)")
                    .join("glow")
                    .display()
                    .to_string(),
            ]
        );

        let labels = build_tree_labels(&entries, &root);
        assert_eq!(labels.last().unwrap(), "      └─ glow");
    }
}
