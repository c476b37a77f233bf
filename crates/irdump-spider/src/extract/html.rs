use scraper::{Html, Selector};

/// Extensions recognised as investor documents, matched case-insensitively.
pub const DOCUMENT_EXTENSIONS: [&str; 6] = [".pdf", ".zip", ".ppt", ".pptx", ".xls", ".xlsx"];

lazy_static::lazy_static! {
    static ref ANCHOR: Selector = Selector::parse("a[href]").expect("anchor selector");
}

/// Hrefs of every anchor whose value ends in one of [`DOCUMENT_EXTENSIONS`], in document order.
///
/// Parsing is lenient: unclosed tags and unknown elements never fail, they only hide the
/// links the parser cannot find. Duplicates are kept.
pub fn extract_links(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    doc.select(&ANCHOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| is_document(href))
        .map(str::to_string)
        .collect()
}

fn is_document(href: &str) -> bool {
    let href = href.to_lowercase();
    DOCUMENT_EXTENSIONS.iter().any(|ext| href.ends_with(ext))
}
