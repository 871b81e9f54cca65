//! Page template wrapped around the rendered body.

use std::path::Path;

/// Values substituted into the page template.
#[derive(Debug, Clone)]
pub struct PageOptions<'a> {
    pub title: &'a str,
    /// Absolute project root, emitted as the document `<base>`.
    pub project_root: &'a Path,
}

/// Wrap an HTML body into a complete MathJax-enabled page.
pub fn wrap_page(body: &str, options: &PageOptions<'_>) -> String {
    let mut output = String::with_capacity(body.len() + STYLES.len() + MATHJAX_HEAD.len() + 512);

    output.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    output.push_str("    <meta charset=\"UTF-8\">\n");
    output.push_str(&format!(
        "    <base href=\"{}\">\n",
        base_href(options.project_root)
    ));
    output.push_str(&format!("    <title>{}</title>\n", escape_html(options.title)));
    output.push_str(STYLES);
    output.push_str(MATHJAX_HEAD);
    output.push_str("</head>\n<body>\n");
    output.push_str(body);
    output.push_str("\n</body>\n</html>");

    output
}

/// `file://` URL of a directory, with a trailing slash.
pub fn base_href(root: &Path) -> String {
    let root = root.to_string_lossy().replace('\\', "/");
    let root = root.trim_end_matches('/');
    if root.starts_with('/') {
        format!("file://{}/", root)
    } else {
        format!("file:///{}/", root)
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const STYLES: &str = r#"    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
            line-height: 1.6;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            color: #333;
        }
        h1, h2, h3, h4 {
            color: #2c3e50;
            margin-top: 1.5em;
        }
        h1 {
            border-bottom: 3px solid #3498db;
            padding-bottom: 10px;
        }
        h2 {
            border-bottom: 2px solid #ecf0f1;
            padding-bottom: 5px;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            margin: 1em 0;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #3498db;
            color: white;
        }
        tr:nth-child(even) {
            background-color: #f2f2f2;
        }
        img {
            max-width: 100%;
            height: auto;
            display: block;
            margin: 20px auto;
            border: 1px solid #ddd;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        code {
            background-color: #f4f4f4;
            padding: 2px 4px;
            border-radius: 3px;
            font-family: 'Courier New', monospace;
        }
        pre {
            background-color: #f4f4f4;
            padding: 10px;
            border-radius: 5px;
            overflow-x: auto;
        }
        blockquote {
            border-left: 4px solid #3498db;
            margin: 0;
            padding-left: 20px;
            color: #555;
        }
    </style>
"#;

const MATHJAX_HEAD: &str = r#"    <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
    <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
    <script>
        window.MathJax = {
            tex: {
                inlineMath: [['$', '$']],
                displayMath: [['$$', '$$']],
                processEscapes: true,
                processEnvironments: true
            },
            options: {
                skipHtmlTags: ['script', 'noscript', 'style', 'textarea', 'pre']
            }
        };
    </script>
"#;
