//! HTML parsers for the two page levels: the territorial-unit index and the
//! per-municipality detail page.

pub mod detail;
pub mod index;
pub mod numeric;

pub use detail::parse_detail;
pub use index::parse_index;
pub use numeric::parse_int;

use scraper::ElementRef;

/// Concatenated text of an element, whitespace-trimmed at both ends
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub(crate) fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}
