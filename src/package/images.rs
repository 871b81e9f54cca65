//! Collecting referenced images into the bundle's `images/` directory.

use super::resolve::resolve_source;
use crate::config::{Layout, IMAGES_DIR};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref IMAGE_SRC: Regex =
        Regex::new(r#"(?i)src="([^"]+\.(?:png|pdf|jpg|jpeg|gif|svg))""#).unwrap();
}

/// Original `src` value to bundled path, for one packaging run.
#[derive(Debug, Clone, Default)]
pub struct ImageMap {
    paths: IndexMap<String, String>,
    /// Destination file name to the source file that claimed it.
    claimed: HashMap<String, PathBuf>,
    counter: usize,
}

impl ImageMap {
    pub fn new() -> Self {
        Self {
            counter: 1,
            ..Default::default()
        }
    }

    /// Bundled path (`images/<name>`) for an already processed `src`.
    pub fn get(&self, src: &str) -> Option<&str> {
        self.paths.get(src).map(String::as_str)
    }

    /// Mappings in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.paths.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Pick a destination file name for `source`.
    ///
    /// The basename is used unless another source file already claimed it,
    /// in which case the running counter is appended to the stem. The
    /// boolean is false when `source` itself already owns the name and no
    /// copy is needed.
    pub fn assign_name(&self, source: &Path) -> (String, bool) {
        let original = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        match self.claimed.get(&original) {
            None => return (original, true),
            Some(owner) if owner == source => return (original, false),
            Some(_) => {}
        }

        let mut n = self.counter;
        loop {
            let candidate = numbered_name(&original, n);
            match self.claimed.get(&candidate) {
                None => return (candidate, true),
                Some(owner) if owner == source => return (candidate, false),
                Some(_) => n += 1,
            }
        }
    }

    /// Record a completed copy and advance the counter.
    pub fn record(&mut self, src: &str, source: &Path, name: &str) -> String {
        let bundled = format!("{}/{}", IMAGES_DIR, name);
        self.paths.insert(src.to_string(), bundled.clone());
        self.claimed.insert(name.to_string(), source.to_path_buf());
        self.counter += 1;
        bundled
    }
}

/// `figure.png` with `3` becomes `figure_3.png`.
fn numbered_name(name: &str, n: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, n, ext),
        _ => format!("{}_{}", name, n),
    }
}

/// Copy a file with its permissions and timestamps.
pub fn copy_preserving(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;
    let meta = fs::metadata(from)?;
    let mut times = FileTimes::new();
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    File::options()
        .write(true)
        .open(to)
        .or_else(|_| File::open(to))?
        .set_times(times)
}

/// Result of scanning one document.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub html: String,
    pub map: ImageMap,
    /// Number of `src` attributes pointing at an image.
    pub references: usize,
    /// Source paths that did not exist.
    pub missing: Vec<PathBuf>,
    /// Source paths that could not be copied.
    pub failed: Vec<PathBuf>,
}

/// Copy every referenced image into `layout.images_dir` and point the
/// `src` attributes at the copies.
///
/// Missing files and copy failures are logged and leave the attribute as
/// written.
pub fn collect(html: &str, layout: &Layout) -> Collected {
    let references = IMAGE_SRC.find_iter(html).count();
    log::info!("Found {} image references", references);

    let mut map = ImageMap::new();
    let mut missing = Vec::new();
    let mut failed = Vec::new();

    let output = IMAGE_SRC.replace_all(html, |caps: &Captures| {
        let attr = &caps[0];
        let src = &caps[1];

        if let Some(bundled) = map.get(src) {
            return attr.replacen(src, bundled, 1);
        }

        let source = resolve_source(src, layout).path;
        if !source.exists() {
            log::warn!("Image not found: {}", source.display());
            missing.push(source);
            return attr.to_string();
        }
        let source = fs::canonicalize(&source).unwrap_or(source);

        let (name, needs_copy) = map.assign_name(&source);
        if needs_copy {
            let dest = layout.images_dir.join(&name);
            if let Err(e) = copy_preserving(&source, &dest) {
                log::warn!("Error copying {}: {}", source.display(), e);
                failed.push(source);
                return attr.to_string();
            }
            log::info!("Copied: {} -> {}/{}", file_label(&source), IMAGES_DIR, name);
        }

        let bundled = map.record(src, &source, &name);
        attr.replacen(src, &bundled, 1)
    });

    Collected {
        html: output.into_owned(),
        map,
        references,
        missing,
        failed,
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
