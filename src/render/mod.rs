//! Markdown report to MathJax HTML.

pub mod images;
pub mod markdown;
pub mod template;

pub use images::rewrite_image_paths;
pub use template::{wrap_page, PageOptions};

use crate::config::Layout;
use crate::error::{RenderError, Result};
use crate::math::protect;
use std::path::{Path, PathBuf};

/// Inputs for rendering one document.
#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    /// Absolute project root; image paths are rewritten against it.
    pub project_root: &'a Path,
    /// Prefix marking an image path as relative to the document directory.
    pub image_prefix: &'a str,
    /// Page title; derived from the Markdown when unset.
    pub title: Option<&'a str>,
    /// Title used when none is configured and the Markdown has no `# ` heading.
    pub fallback_title: &'a str,
}

/// Body conversion result.
#[derive(Debug, Clone)]
pub struct RenderedBody {
    pub html: String,
    pub math_expressions: usize,
    pub rewritten_images: usize,
}

/// Outcome of [`render_file`].
#[derive(Debug, Clone)]
pub struct RenderReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub math_expressions: usize,
    pub rewritten_images: usize,
}

/// Convert Markdown to an HTML body with math preserved verbatim.
pub fn render_markdown(markdown: &str, options: &RenderOptions<'_>) -> RenderedBody {
    let protected = protect(markdown);
    let html = markdown::to_html(&protected.text, &protected.table);
    let (html, rewritten_images) =
        rewrite_image_paths(&html, options.project_root, options.image_prefix);

    RenderedBody {
        html,
        math_expressions: protected.table.len(),
        rewritten_images,
    }
}

/// Convert Markdown to a complete page.
pub fn render_document(markdown: &str, options: &RenderOptions<'_>) -> String {
    render_page(markdown, options).0
}

fn render_page(markdown: &str, options: &RenderOptions<'_>) -> (String, RenderedBody) {
    let body = render_markdown(markdown, options);
    let derived;
    let title = match options.title {
        Some(title) => title,
        None => {
            derived = markdown::first_heading(markdown);
            derived.as_deref().unwrap_or(options.fallback_title)
        }
    };

    let page = wrap_page(
        &body.html,
        &PageOptions {
            title,
            project_root: options.project_root,
        },
    );
    (page, body)
}

/// Render `layout.markdown` into `layout.html`, overwriting it.
pub fn render_file(layout: &Layout) -> Result<RenderReport> {
    let markdown = std::fs::read_to_string(&layout.markdown).map_err(|source| {
        RenderError::ReadSource {
            path: layout.markdown.clone(),
            source,
        }
    })?;

    let fallback_title = layout
        .markdown
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Document".to_string());
    let options = RenderOptions {
        project_root: &layout.project_root,
        image_prefix: &layout.image_prefix,
        title: layout.title.as_deref(),
        fallback_title: &fallback_title,
    };

    let (page, body) = render_page(&markdown, &options);

    std::fs::write(&layout.html, page).map_err(|source| RenderError::WriteOutput {
        path: layout.html.clone(),
        source,
    })?;

    log::info!(
        "Rendered {} to {} ({} math expressions, {} image paths rewritten)",
        file_name(&layout.markdown),
        file_name(&layout.html),
        body.math_expressions,
        body.rewritten_images
    );

    Ok(RenderReport {
        source: layout.markdown.clone(),
        output: layout.html.clone(),
        math_expressions: body.math_expressions,
        rewritten_images: body.rewritten_images,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn options(root: &Path) -> RenderOptions<'_> {
        RenderOptions {
            project_root: root,
            image_prefix: "../../",
            title: None,
            fallback_title: "Document",
        }
    }

    #[test]
    fn test_inline_math_and_table() {
        let input = "Energy: $E=mc^2$ and a table:\n\n| A | B |\n|---|---|\n| 1 | 2 |";
        let body = render_markdown(input, &options(Path::new("/nonexistent")));

        assert!(body.html.contains("<p>Energy: $E=mc^2$ and a table:</p>"));
        assert!(body.html.contains("<table>"));
        assert_eq!(body.html.matches("<th>").count(), 2);
        assert_eq!(body.html.matches("<tr>").count(), 2);
        assert_eq!(body.html.matches("<td>").count(), 2);
        assert_eq!(body.math_expressions, 1);
    }

    #[test]
    fn test_math_not_touched_by_markdown() {
        let input = "Let $a_1 * b_2 * c$ hold.\n\n$$\n\\sum_{i=1}^n x_i * y_i\n$$\n";
        let body = render_markdown(input, &options(Path::new("/nonexistent")));

        assert!(body.html.contains("$a_1 * b_2 * c$"));
        assert!(body.html.contains("$$\n\\sum_{i=1}^n x_i * y_i\n$$"));
        assert!(!body.html.contains("<em>"));
        assert!(!body.html.contains("<!--MATH"));
        assert!(!body.html.contains("MATHINLINE"));
    }

    #[test]
    fn test_math_in_code_block_does_not_leak() {
        let input = "```sh\necho $HOME and $PATH\n```\n";
        let body = render_markdown(input, &options(Path::new("/nonexistent")));

        assert!(body.html.contains("echo $HOME and $PATH"));
        assert!(!body.html.contains("MATHINLINE"));
    }

    #[test]
    fn test_math_on_continuation_line() {
        let input = "The rate where\n$\\alpha$ is the *decay* constant.";
        let body = render_markdown(input, &options(Path::new("/nonexistent")));
        assert_eq!(
            body.html,
            "<p>The rate where\n$\\alpha$ is the <em>decay</em> constant.</p>\n"
        );
    }

    #[test]
    fn test_math_opening_list_item() {
        let input = "- $n$ genomes with **high** constraint";
        let body = render_markdown(input, &options(Path::new("/nonexistent")));
        assert_eq!(
            body.html,
            "<ul>\n<li>$n$ genomes with <strong>high</strong> constraint</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_math_opening_paragraph() {
        let input = "$x$ is *important* here.";
        let body = render_markdown(input, &options(Path::new("/nonexistent")));
        assert_eq!(body.html, "<p>$x$ is <em>important</em> here.</p>\n");
    }

    #[test]
    fn test_title_from_heading() {
        let html = render_document("# Genome Constraints\n\ntext", &options(Path::new("/p")));
        assert!(html.contains("<title>Genome Constraints</title>"));

        let html = render_document("no heading", &options(Path::new("/p")));
        assert!(html.contains("<title>Document</title>"));
    }

    #[test]
    fn test_render_file() {
        let root = tempfile::tempdir().unwrap();
        let doc_dir = root.path().join("docs").join("report");
        fs::create_dir_all(&doc_dir).unwrap();
        fs::create_dir_all(root.path().join("results")).unwrap();
        fs::write(root.path().join("results/fig.png"), b"png").unwrap();
        fs::write(
            doc_dir.join("methods_steps_and_results.md"),
            "# Report\n\n![fig](../../results/fig.png)\n\n$$x^2$$\n",
        )
        .unwrap();

        let layout = Layout::from_config(&doc_dir, &Config::default());
        let report = render_file(&layout).unwrap();
        let html = fs::read_to_string(&layout.html).unwrap();

        assert_eq!(report.math_expressions, 1);
        assert_eq!(report.rewritten_images, 1);
        assert!(html.contains(r#"src="results/fig.png""#));
        assert!(html.contains(&format!(
            r#"<base href="file://{}/">"#,
            layout.project_root.display()
        )));
        assert!(html.contains("$$x^2$$"));
    }

    #[test]
    fn test_render_file_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::from_config(dir.path(), &Config::default());
        let err = render_file(&layout).unwrap_err();
        assert!(err.to_string().contains("methods_steps_and_results.md"));
    }
}
