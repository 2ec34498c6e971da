//! Document assembly.
//!
//! Wraps a caller's HTML fragment and stylesheet into one self-contained
//! document the engine can load:
//!
//! ```text
//! <html><head><style>{css}</style></head><body>{html}</body></html>
//! ```
//!
//! # Trust Boundary
//!
//! Nothing is sanitized or escaped. The fragment goes into `<body>` verbatim
//! and the stylesheet into `<style>` verbatim, so scripts, external resource
//! references and markup that closes the wrapper elements all reach the
//! engine as written. Callers of this service are treated as trusted; put an
//! authenticating proxy in front of it when that does not hold.

/// Assemble a complete HTML document from a fragment and optional stylesheet.
///
/// An absent stylesheet produces an empty `<style>` block.
///
/// # Example
///
/// ```rust
/// use html2pdf_service::assemble_document;
///
/// assert_eq!(
///     assemble_document("<p>hi</p>", Some("p { color: red }")),
///     "<html><head><style>p { color: red }</style></head><body><p>hi</p></body></html>"
/// );
/// assert_eq!(
///     assemble_document("<p>hi</p>", None),
///     "<html><head><style></style></head><body><p>hi</p></body></html>"
/// );
/// ```
pub fn assemble_document(html: &str, css: Option<&str>) -> String {
    assemble_with_base(html, css, None)
}

/// Like [`assemble_document`], with a base stylesheet emitted first.
///
/// The base sheet gets its own `<style>` element ahead of the caller's, so
/// the caller's rules win on equal specificity and the caller's block is
/// still exactly `css`.
pub fn assemble_with_base(html: &str, css: Option<&str>, base: Option<&str>) -> String {
    let css = css.unwrap_or("");
    let base_len = base.map_or(0, |b| b.len() + "<style></style>".len());

    let mut document = String::with_capacity(html.len() + css.len() + base_len + 64);
    document.push_str("<html><head>");
    if let Some(base) = base {
        document.push_str("<style>");
        document.push_str(base);
        document.push_str("</style>");
    }
    document.push_str("<style>");
    document.push_str(css);
    document.push_str("</style></head><body>");
    document.push_str(html);
    document.push_str("</body></html>");
    document
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style_block(document: &str) -> &str {
        let start = document.rfind("<style>").unwrap() + "<style>".len();
        let end = document.rfind("</style>").unwrap();
        &document[start..end]
    }

    fn body(document: &str) -> &str {
        let start = document.find("<body>").unwrap() + "<body>".len();
        let end = document.rfind("</body>").unwrap();
        &document[start..end]
    }

    #[test]
    fn test_absent_css_gives_empty_style_block() {
        let doc = assemble_document("<h1>T</h1>", None);
        assert_eq!(style_block(&doc), "");
        assert_eq!(body(&doc), "<h1>T</h1>");
    }

    #[test]
    fn test_css_is_inserted_verbatim() {
        let css = "body > p::after { content: \"</x>\"; } @page { size: A4 }";
        let doc = assemble_document("<p>x</p>", Some(css));
        assert_eq!(style_block(&doc), css);
    }

    #[test]
    fn test_html_is_not_escaped() {
        let html = "<script>document.title = '<&>';</script><b>bold</b> & \"quoted\"";
        let doc = assemble_document(html, None);
        assert_eq!(body(&doc), html);
    }

    #[test]
    fn test_empty_fragment() {
        assert_eq!(
            assemble_document("", None),
            "<html><head><style></style></head><body></body></html>"
        );
    }

    #[test]
    fn test_base_stylesheet_precedes_caller_css() {
        let doc = assemble_with_base("<p>x</p>", Some("p{color:red}"), Some("body{margin:0}"));
        assert_eq!(
            doc,
            "<html><head><style>body{margin:0}</style><style>p{color:red}</style></head>\
             <body><p>x</p></body></html>"
        );
        assert_eq!(style_block(&doc), "p{color:red}");
    }

    #[test]
    fn test_without_base_matches_plain_assembly() {
        assert_eq!(
            assemble_with_base("<i>a</i>", Some("i{}"), None),
            assemble_document("<i>a</i>", Some("i{}"))
        );
    }
}
