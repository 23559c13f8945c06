// src/paths.rs
//! Path safety: can a file-based layer's location be served from the
//! project's folder tree?
//!
//! The anchor is the project base directory. A layer path either relates to
//! it (and may or may not escape upward), or lives on an unrelated
//! filesystem root (another drive on multi-root platforms), which the
//! original platform error is reclassified into instead of propagated.

use std::path::{Component, Path, PathBuf};

/// Result of relating a layer path to the project base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelativePathOutcome {
    /// The relative path from base to target.
    Related(PathBuf),
    /// No common filesystem root; no relative path exists.
    CrossDriveUnrelated,
}

/// Policy decision for one layer path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathVerdict {
    /// Path is acceptable; remaining file-based checks may proceed.
    Contained,
    /// Path escapes the allowed folder tree.
    ParentFolderEscape,
    /// Path is on an unrelated drive. `flagged` is true when the configured
    /// policy turns this into a finding; when false the layer is skipped
    /// silently, and the caller must also skip its remaining file-based
    /// checks (preserved legacy behavior).
    CrossDrive { flagged: bool },
}

/// Computes the relative path from `base` to `target`, both absolute.
/// `.` and `..` segments are collapsed lexically first, so a path that hops
/// through a sibling directory but lands inside the base does not read as
/// an escape.
#[must_use]
pub fn relative_path(base: &Path, target: &Path) -> RelativePathOutcome {
    let base_components = lexical_components(base);
    let target_components = lexical_components(target);

    // Multi-root platforms: differing prefixes (drive letters, UNC shares)
    // mean no relative path exists at all.
    let base_prefix = base_components.first().and_then(as_prefix);
    let target_prefix = target_components.first().and_then(as_prefix);
    if base_prefix != target_prefix {
        return RelativePathOutcome::CrossDriveUnrelated;
    }

    let mut common = 0;
    while common < base_components.len()
        && common < target_components.len()
        && base_components[common] == target_components[common]
    {
        common += 1;
    }

    let mut relative = PathBuf::new();
    for _ in common..base_components.len() {
        relative.push("..");
    }
    for component in &target_components[common..] {
        relative.push(component.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    RelativePathOutcome::Related(relative)
}

/// Collapses `.` and `..` segments without touching the filesystem.
fn lexical_components(path: &Path) -> Vec<Component<'_>> {
    let mut out: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last().copied() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // Above the root there is nothing left to pop.
                Some(Component::RootDir | Component::Prefix(_)) | None => {}
                _ => out.push(component),
            },
            _ => out.push(component),
        }
    }
    out
}

fn as_prefix<'a>(component: &Component<'a>) -> Option<std::path::PrefixComponent<'a>> {
    match component {
        Component::Prefix(prefix) => Some(*prefix),
        _ => None,
    }
}

/// Applies the parent-folder / other-drive policy to one layer path.
#[derive(Debug, Clone)]
pub struct PathSafetyEvaluator<'a> {
    base: &'a Path,
    allow_parent_folder: bool,
    parent_folder: &'a str,
    prevent_other_drive: bool,
    cloud_hosting: bool,
}

impl<'a> PathSafetyEvaluator<'a> {
    #[must_use]
    pub fn new(
        base: &'a Path,
        allow_parent_folder: bool,
        parent_folder: &'a str,
        prevent_other_drive: bool,
        cloud_hosting: bool,
    ) -> Self {
        Self {
            base,
            allow_parent_folder,
            parent_folder,
            prevent_other_drive,
            cloud_hosting,
        }
    }

    #[must_use]
    pub fn evaluate(&self, layer_path: &Path) -> PathVerdict {
        self.classify(relative_path(self.base, layer_path))
    }

    /// Policy step, split out so the cross-drive branch is testable on
    /// single-root platforms.
    #[must_use]
    pub fn classify(&self, outcome: RelativePathOutcome) -> PathVerdict {
        match outcome {
            RelativePathOutcome::CrossDriveUnrelated => PathVerdict::CrossDrive {
                flagged: self.prevent_other_drive || self.cloud_hosting,
            },
            RelativePathOutcome::Related(relative) => {
                if self.allow_parent_folder {
                    // Substring match over the whole relative path, not a
                    // depth-bounded segment check.
                    if relative.to_string_lossy().contains(self.parent_folder) {
                        return PathVerdict::ParentFolderEscape;
                    }
                    PathVerdict::Contained
                } else if relative
                    .components()
                    .any(|component| component == Component::ParentDir)
                {
                    PathVerdict::ParentFolderEscape
                } else {
                    PathVerdict::Contained
                }
            }
        }
    }
}
