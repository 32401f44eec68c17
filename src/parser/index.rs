use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::constants::{DETAIL_LINK_MARKER, INDEX_NAME_HEADERS, NAME_CELL_CLASS};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Result, ScraperError};
use crate::types::MunicipalityRef;

use super::{element_text, has_class};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("valid selector: table"));
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector: a[href]"));

/// Extract every municipality link from a territorial-unit index page.
///
/// Output keeps document order and is neither sorted nor deduplicated. A page
/// without tables or links is not an error: it yields an empty list and a
/// diagnostic. Only an unusable `base_url` fails.
pub fn parse_index(
    markup: &str,
    base_url: &str,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<MunicipalityRef>> {
    let base = Url::parse(base_url).map_err(|e| {
        ScraperError::IndexParse(format!("'{}' cannot be used as a base URL: {}", base_url, e))
    })?;
    let document = Html::parse_document(markup);

    let tables: Vec<ElementRef> = document.select(&TABLE).collect();
    if tables.is_empty() {
        sink.report(Diagnostic::NoTablesFound);
        return Ok(Vec::new());
    }

    let mut municipalities = Vec::new();
    for table in tables {
        for link in table.select(&LINK) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            if !href.contains(DETAIL_LINK_MARKER) {
                continue;
            }

            let Some(name_cell) = enclosing_cell(link).and_then(following_name_cell) else {
                sink.report(Diagnostic::LinkWithoutNameCell {
                    href: href.to_string(),
                });
                continue;
            };

            let detail_url = match base.join(href) {
                Ok(url) => url.to_string(),
                Err(_) => {
                    sink.report(Diagnostic::UnresolvableLink {
                        href: href.to_string(),
                    });
                    continue;
                }
            };

            let municipality = MunicipalityRef {
                id: element_text(link),
                name: element_text(name_cell),
                detail_url,
            };
            sink.report(Diagnostic::MunicipalityFound {
                id: municipality.id.clone(),
                name: municipality.name.clone(),
                url: municipality.detail_url.clone(),
            });
            municipalities.push(municipality);
        }
    }

    if municipalities.is_empty() {
        sink.report(Diagnostic::NoMunicipalityLinks);
    }
    Ok(municipalities)
}

fn enclosing_cell(link: ElementRef<'_>) -> Option<ElementRef<'_>> {
    link.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "td")
}

fn following_name_cell(cell: ElementRef<'_>) -> Option<ElementRef<'_>> {
    cell.next_siblings().filter_map(ElementRef::wrap).find(|el| {
        el.value().name() == "td"
            && has_class(*el, NAME_CELL_CLASS)
            && el
                .value()
                .attr("headers")
                .is_some_and(|h| INDEX_NAME_HEADERS.contains(&h))
    })
}
