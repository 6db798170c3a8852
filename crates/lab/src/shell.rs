//! Standalone HTML document around a rendered lab.

use std::fmt::Write;
use std::path::Path;

use html_escape::encode_double_quoted_attribute;
use lab_config::ShellSettings;

/// Wrap a rendered fragment in a complete HTML document.
///
/// `<base>` points at the lab folder so relative links and images in the
/// document resolve against it.
pub(crate) fn wrap_document(fragment: &str, document_path: &Path, shell: &ShellSettings) -> String {
    let mut html = String::with_capacity(fragment.len() + 512);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    writeln!(
        html,
        "<base href=\"{}\">",
        encode_double_quoted_attribute(&base_href(document_path))
    )
    .unwrap();
    if let Some(stylesheet) = &shell.stylesheet {
        writeln!(
            html,
            "<link href=\"{}\" rel=\"stylesheet\">",
            encode_double_quoted_attribute(stylesheet)
        )
        .unwrap();
    }
    if let Some(script) = &shell.script {
        writeln!(
            html,
            "<script src=\"{}\"></script>",
            encode_double_quoted_attribute(script)
        )
        .unwrap();
    }
    html.push_str("</head>\n<body>\n");
    html.push_str(fragment);
    if !fragment.ends_with('\n') {
        html.push('\n');
    }
    html.push_str("</body>\n</html>\n");

    html
}

/// Directory of the document as a `file://` URL with a trailing slash.
fn base_href(document_path: &Path) -> String {
    let dir = document_path.parent().unwrap_or(Path::new(""));
    let mut href = format!("file://{}", dir.display()).replace('\\', "/");
    if !href.ends_with('/') {
        href.push('/');
    }
    href
}
