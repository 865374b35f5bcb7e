// ─── Classpath Builder ───
// Flattens the resolved dependency tree into the ordered list of JARs the
// forked JVM needs.

use std::path::PathBuf;

use tracing::debug;

use crate::core::maven::DependencyNode;

/// Collect the local file of every node, root first, then each child subtree
/// in order (pre-order).
///
/// Nodes without a file are skipped. An artifact reachable through several
/// paths appears once per path.
pub fn flatten_classpath(root: &DependencyNode) -> Vec<PathBuf> {
    let mut entries = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if let Some(file) = node.file() {
            entries.push(file.clone());
        }
        stack.extend(node.children.iter().rev());
    }

    debug!("Classpath has {} entries", entries.len());
    entries
}

/// Uses `;` on Windows, `:` on Linux/macOS.
pub fn get_classpath_separator() -> &'static str {
    if cfg!(target_os = "windows") {
        ";"
    } else {
        ":"
    }
}

/// Join entries with the platform separator, for display.
pub fn join_classpath(entries: &[PathBuf]) -> String {
    entries
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(get_classpath_separator())
}
