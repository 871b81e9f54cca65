//! # mathdoc
//!
//! Build tooling for a Markdown report with TeX math: render it to a
//! MathJax-enabled HTML page, then package that page and every image it
//! references into a self-contained bundle.
//!
//! ## Pipelines
//!
//! - **Render**: protect `$$...$$` and `$...$` spans, convert Markdown
//!   (tables and fenced code) to HTML, restore the math verbatim, rewrite
//!   `../../` image paths to project-root-relative ones, and wrap the body in
//!   a styled page whose `<base>` points at the project root.
//! - **Package**: copy every referenced image into `standalone/images/`,
//!   point the page at the copies, drop the `<base>` tag, tidy display math,
//!   and zip the page with its images.
//!
//! ## Quick Start
//!
//! ```rust
//! use mathdoc::{render_markdown, RenderOptions};
//! use std::path::Path;
//!
//! let options = RenderOptions {
//!     project_root: Path::new("/tmp/project"),
//!     image_prefix: "../../",
//!     title: None,
//!     fallback_title: "Report",
//! };
//! let body = render_markdown("Energy: $E=mc^2$", &options);
//! assert_eq!(body.html, "<p>Energy: $E=mc^2$</p>\n");
//! ```
//!
//! Whole-file runs go through a [`Layout`]:
//!
//! ```no_run
//! use mathdoc::{package_file, render_file, Config, Layout};
//! use std::path::Path;
//!
//! let dir = Path::new("docs/Final_presentation");
//! let layout = Layout::from_config(dir, &Config::discover(dir)?);
//! render_file(&layout)?;
//! let report = package_file(&layout)?;
//! println!("{} images bundled", report.copied);
//! # Ok::<(), mathdoc::Error>(())
//! ```
//!
//! ## Failure model
//!
//! Unreadable sources and unwritable outputs are errors. A missing or
//! uncopyable image is logged at `warn` level, its reference is left as
//! written, and the run carries on.

pub mod config;
pub mod error;
pub mod math;
pub mod package;
pub mod render;

pub use config::{Config, Layout};
pub use error::{ConfigError, Error, PackageError, RenderError, Result};
pub use math::{protect, MathKind, MathTable, Placeholder};
pub use package::{package_file, package_html, ImageMap, PackageReport};
pub use render::{render_document, render_file, render_markdown, RenderOptions, RenderReport};

/// Render and then package, as one run.
pub fn build(layout: &Layout) -> Result<(RenderReport, PackageReport)> {
    let rendered = render_file(layout)?;
    let packaged = package_file(layout)?;
    Ok((rendered, packaged))
}
