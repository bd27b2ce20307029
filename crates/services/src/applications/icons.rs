//! Icon resolution for application entries.
//!
//! Icon names from desktop entries are resolved against the `hicolor`
//! fallback theme in every XDG icon base directory, then `/usr/share/pixmaps`.

use std::path::{Path, PathBuf};

/// Size subdirectories in search order.
const SIZES: &[&str] = &[
    "scalable", "48x48", "64x64", "128x128", "256x256", "32x32", "24x24", "22x22", "16x16",
];

const EXTENSIONS: &[&str] = &["svg", "png", "xpm"];

const PIXMAPS: &str = "/usr/share/pixmaps";

/// Resolve an icon name or path to a file on disk.
pub fn lookup_icon(name: &str) -> Option<PathBuf> {
    let mut roots: Vec<PathBuf> = icon_base_dirs()
        .into_iter()
        .map(|base| base.join("hicolor"))
        .collect();
    roots.push(PathBuf::from(PIXMAPS));
    lookup_icon_in(name, &roots)
}

/// Resolve `name` against explicit search roots.
///
/// A root containing size subdirectories is treated as a theme; any other
/// root is searched flat, the way `pixmaps` is laid out.
pub fn lookup_icon_in(name: &str, roots: &[PathBuf]) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    let path = Path::new(name);
    if path.is_absolute() {
        return path.is_file().then(|| path.to_path_buf());
    }

    roots.iter().find_map(|root| {
        SIZES
            .iter()
            .map(|size| root.join(size).join("apps"))
            .chain(std::iter::once(root.clone()))
            .find_map(|dir| find_with_extension(&dir, name))
    })
}

fn find_with_extension(dir: &Path, name: &str) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|candidate| candidate.is_file())
}

/// Icon base directories in XDG search order.
fn icon_base_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".icons"));
    }

    if let Some(data_home) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        dirs.push(PathBuf::from(data_home).join("icons"));
    } else if let Some(home) = std::env::var_os("HOME") {
        dirs.push(PathBuf::from(home).join(".local/share/icons"));
    }

    if let Some(data_dirs) = std::env::var_os("XDG_DATA_DIRS").filter(|v| !v.is_empty()) {
        dirs.extend(std::env::split_paths(&data_dirs).map(|d| d.join("icons")));
    } else {
        dirs.push(PathBuf::from("/usr/local/share/icons"));
        dirs.push(PathBuf::from("/usr/share/icons"));
    }

    dirs
}
