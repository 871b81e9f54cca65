//! Standalone bundle: rendered HTML plus its images, and a zip of both.

pub mod archive;
pub mod cleanup;
pub mod images;
pub mod resolve;

pub use archive::write_archive;
pub use cleanup::standalone_cleanup;
pub use images::{collect, copy_preserving, Collected, ImageMap};
pub use resolve::{resolve_source, ResolvedSource, SourceRule};

use crate::config::Layout;
use crate::error::{PackageError, Result};
use std::path::{Path, PathBuf};

/// Outcome of [`package_file`].
#[derive(Debug, Clone)]
pub struct PackageReport {
    /// Image references found in the source HTML.
    pub references: usize,
    /// Distinct references now pointing into `images/`.
    pub copied: usize,
    pub missing: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    pub html: PathBuf,
    pub archive: PathBuf,
    /// Archive entry names.
    pub entries: Vec<String>,
}

/// Copy images into `layout.images_dir` and return the cleaned standalone
/// HTML with the collection details.
///
/// The images directory must already exist.
pub fn package_html(html: &str, layout: &Layout) -> Collected {
    let mut collected = collect(html, layout);
    collected.html = standalone_cleanup(&collected.html);
    collected
}

/// Build the standalone directory and archive from `layout.html`.
pub fn package_file(layout: &Layout) -> Result<PackageReport> {
    create_dir(&layout.standalone_dir)?;
    create_dir(&layout.images_dir)?;
    log::info!("Creating standalone package in {}", layout.standalone_dir.display());

    let html = std::fs::read_to_string(&layout.html).map_err(|source| PackageError::ReadHtml {
        path: layout.html.clone(),
        source,
    })?;

    let collected = package_html(&html, layout);

    std::fs::write(&layout.standalone_html, &collected.html).map_err(|source| {
        PackageError::WriteHtml {
            path: layout.standalone_html.clone(),
            source,
        }
    })?;
    log::info!("Created standalone HTML: {}", layout.standalone_html.display());
    log::info!(
        "Copied {} unique images to {}",
        collected.map.len(),
        layout.images_dir.display()
    );

    log::info!("Creating zip file: {}", layout.archive.display());
    let entries = write_archive(&layout.archive, &layout.standalone_html, &layout.images_dir)?;

    if !collected.missing.is_empty() || !collected.failed.is_empty() {
        log::warn!(
            "{} image references left unchanged ({} missing, {} failed to copy)",
            collected.missing.len() + collected.failed.len(),
            collected.missing.len(),
            collected.failed.len()
        );
    }
    log::info!(
        "Standalone package created: {} ({} entries)",
        layout.archive.display(),
        entries.len()
    );

    Ok(PackageReport {
        references: collected.references,
        copied: collected.map.len(),
        missing: collected.missing,
        failed: collected.failed,
        html: layout.standalone_html.clone(),
        archive: layout.archive.clone(),
        entries,
    })
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| PackageError::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn setup() -> (tempfile::TempDir, Layout) {
        let root = tempfile::tempdir().unwrap();
        let doc_dir = root.path().join("docs").join("report");
        fs::create_dir_all(&doc_dir).unwrap();
        let layout = Layout::from_config(&doc_dir, &Config::default());
        (root, layout)
    }

    #[test]
    fn test_package_file() {
        let (_root, layout) = setup();
        fs::create_dir_all(layout.project_root.join("results")).unwrap();
        fs::write(layout.project_root.join("results/a.png"), b"a").unwrap();
        fs::write(
            &layout.html,
            concat!(
                "<html><head><base href=\"file:///somewhere/\">\n<style>\np {}\n</style></head>\n",
                "<body>\n<p><img src=\"results/a.png\" alt=\"a\" /></p>\n",
                "<p><img src=\"results/gone.png\" alt=\"gone\" /></p>\n",
                "<p>$$x^2$$</p>\n</body></html>"
            ),
        )
        .unwrap();

        let report = package_file(&layout).unwrap();
        let html = fs::read_to_string(&layout.standalone_html).unwrap();

        assert_eq!(report.references, 2);
        assert_eq!(report.copied, 1);
        assert_eq!(report.missing.len(), 1);
        assert!(report.failed.is_empty());
        assert_eq!(
            report.entries,
            vec!["methods_steps_and_results.html", "images/a.png"]
        );
        assert!(!html.contains("<base"));
        assert!(html.contains(r#"src="images/a.png""#));
        assert!(html.contains(r#"src="results/gone.png""#));
        assert!(html.contains("<div class=\"math-display\">\n$$x^2$$\n</div>"));
        assert!(html.contains(".math-display {"));
        assert!(layout.archive.is_file());
    }

    #[test]
    fn test_package_file_missing_html() {
        let (_root, layout) = setup();
        let err = package_file(&layout).unwrap_err();
        assert!(err.to_string().contains("methods_steps_and_results.html"));
    }

    #[test]
    fn test_repackaging_keeps_image_set() {
        let (_root, layout) = setup();
        fs::create_dir_all(layout.project_root.join("plots")).unwrap();
        fs::write(layout.project_root.join("plots/fig.png"), b"1").unwrap();
        fs::write(&layout.html, r#"<img src="plots/fig.png"><img src="plots/fig.png">"#).unwrap();

        package_file(&layout).unwrap();
        let report = package_file(&layout).unwrap();

        assert_eq!(report.copied, 1);
        assert_eq!(fs::read_dir(&layout.images_dir).unwrap().count(), 1);
    }
}
