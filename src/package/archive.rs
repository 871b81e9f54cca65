//! Zip archive of the standalone bundle.

use crate::config::IMAGES_DIR;
use crate::error::{PackageError, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Write `zip_path` with the HTML at the archive root and every file of
/// `images_dir` under `images/`.
///
/// Returns the entry names in archive order.
pub fn write_archive(zip_path: &Path, html_path: &Path, images_dir: &Path) -> Result<Vec<String>> {
    build(zip_path, html_path, images_dir).map_err(|e| {
        PackageError::Archive {
            path: zip_path.to_path_buf(),
            message: e.to_string(),
        }
        .into()
    })
}

fn build(
    zip_path: &Path,
    html_path: &Path,
    images_dir: &Path,
) -> std::result::Result<Vec<String>, zip::result::ZipError> {
    let file = File::create(zip_path)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut entries = Vec::new();

    let html_name = html_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "index.html".to_string());
    zip.start_file(html_name.as_str(), options)?;
    zip.write_all(&fs::read(html_path)?)?;
    log::info!("Added {}", html_name);
    entries.push(html_name);

    for image in image_files(images_dir)? {
        let name = format!(
            "{}/{}",
            IMAGES_DIR,
            image.file_name().unwrap_or_default().to_string_lossy()
        );
        zip.start_file(name.as_str(), options)?;
        zip.write_all(&fs::read(&image)?)?;
        log::info!("Added {}", name);
        entries.push(name);
    }

    zip.finish()?.flush()?;
    Ok(entries)
}

/// Regular files directly inside `dir`, sorted by name.
pub fn image_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Read;

    #[test]
    fn test_write_archive() {
        let dir = tempfile::tempdir().unwrap();
        let html = dir.path().join("report.html");
        let images = dir.path().join("images");
        fs::create_dir_all(images.join("nested")).unwrap();
        fs::write(&html, "<html></html>").unwrap();
        fs::write(images.join("b.png"), b"b").unwrap();
        fs::write(images.join("a.svg"), b"<svg/>").unwrap();

        let zip_path = dir.path().join("bundle.zip");
        let entries = write_archive(&zip_path, &html, &images).unwrap();
        assert_eq!(entries, vec!["report.html", "images/a.svg", "images/b.png"]);

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 3);
        let mut content = String::new();
        archive
            .by_name("report.html")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<html></html>");
    }

    #[test]
    fn test_missing_images_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let html = dir.path().join("report.html");
        fs::write(&html, "<html></html>").unwrap();

        let err = write_archive(&dir.path().join("x.zip"), &html, &dir.path().join("images"))
            .unwrap_err();
        assert!(err.to_string().contains("x.zip"));
    }
}
