use scraper::{Html, Node};

const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Plain text of `markup`: every text node outside script/style, in document
/// order, joined with newlines. Malformed markup is parsed best-effort.
///
/// The HTML5 parser runs with scripting enabled, so a `<noscript>` body is a
/// single raw text node and its markup reaches the output verbatim.
pub fn normalize(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let skipped = node.ancestors().any(|ancestor| {
            matches!(ancestor.value(), Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if !skipped {
            parts.push(&**text);
        }
    }

    parts.join("\n")
}
