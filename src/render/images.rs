//! Rewriting document-relative image paths to project-root-relative ones.
//!
//! The rendered page carries `<base href="file://<project root>/">`, so an
//! image written as `../../results/plot.png` next to the Markdown has to
//! become `results/plot.png` to keep resolving.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::path::Path;

lazy_static! {
    static ref IMG_TAG: Regex = Regex::new(r"<img[^>]+>").unwrap();
    static ref SRC_ATTR: Regex = Regex::new(r#"src="([^"]+)""#).unwrap();
}

/// Strip `prefix` from matching `<img src>` paths whose target exists under
/// `project_root`. Tags that don't qualify are left as written.
///
/// Returns the new HTML and the number of rewritten tags.
pub fn rewrite_image_paths(html: &str, project_root: &Path, prefix: &str) -> (String, usize) {
    let mut rewritten = 0;

    let output = IMG_TAG.replace_all(html, |caps: &Captures| {
        let tag = &caps[0];
        match rewrite_tag(tag, project_root, prefix) {
            Some(new_tag) => {
                rewritten += 1;
                new_tag
            }
            None => tag.to_string(),
        }
    });

    (output.into_owned(), rewritten)
}

fn rewrite_tag(tag: &str, project_root: &Path, prefix: &str) -> Option<String> {
    let old_path = SRC_ATTR.captures(tag)?.get(1)?.as_str();
    let new_path = old_path.strip_prefix(prefix).filter(|p| !p.is_empty())?;

    if !project_root.join(new_path).exists() {
        log::debug!("keeping {}: not found under project root", old_path);
        return None;
    }

    Some(tag.replacen(
        &format!(r#"src="{}""#, old_path),
        &format!(r#"src="{}""#, new_path),
        1,
    ))
}
