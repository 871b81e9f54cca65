//! Locating the file behind an image reference.

use crate::config::Layout;
use std::path::PathBuf;

/// Which rule located an image. Rules are tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRule {
    /// `results/...`, relative to the project root.
    ProjectResults,
    /// `file:///abs/path`, scheme stripped.
    FileUrl,
    /// `../...`, relative to the document directory.
    DocumentRelative,
    /// Anything else, assumed relative to the project root.
    ProjectDefault,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub rule: SourceRule,
    pub path: PathBuf,
}

/// Resolve an image `src` value to a filesystem path.
pub fn resolve_source(src: &str, layout: &Layout) -> ResolvedSource {
    let (rule, path) = if src.starts_with("results/") {
        (SourceRule::ProjectResults, layout.project_root.join(src))
    } else if let Some(abs) = src.strip_prefix("file://") {
        (SourceRule::FileUrl, PathBuf::from(abs))
    } else if src.starts_with("../") {
        (SourceRule::DocumentRelative, layout.document_dir.join(src))
    } else {
        (SourceRule::ProjectDefault, layout.project_root.join(src))
    };

    log::debug!("{} -> {} ({:?})", src, path.display(), rule);
    ResolvedSource { rule, path }
}
