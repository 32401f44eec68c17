use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::constants::{
    COLUMN_ELIGIBLE_VOTERS, COLUMN_ENVELOPES_ISSUED, COLUMN_VALID_VOTES, ELIGIBLE_VOTERS_HEADER,
    ENVELOPES_ISSUED_HEADER, NAME_CELL_CLASS, NUMBER_CELL_CLASS, PARTY_HEADERS_PATTERN,
    VALID_VOTES_HEADER,
};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Result, ScraperError};
use crate::types::{DetailPage, MunicipalitySummary, PartyVoteMap};

use super::{element_text, numeric::parse_int};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("valid selector: table"));
static TABLE_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table tr").expect("valid selector: table tr"));
static NAME_CELL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!("td.{}", NAME_CELL_CLASS)).expect("valid selector: name cell")
});
static NUMBER_CELL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!("td.{}", NUMBER_CELL_CLASS)).expect("valid selector: number cell")
});
static PARTY_HEADERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(PARTY_HEADERS_PATTERN).expect("valid regex: party headers"));

fn summary_selector(header: &str) -> Selector {
    Selector::parse(&format!(r#"td[headers="{}"]"#, header)).expect("valid selector: summary cell")
}

static ELIGIBLE_VOTERS: Lazy<Selector> = Lazy::new(|| summary_selector(ELIGIBLE_VOTERS_HEADER));
static ENVELOPES_ISSUED: Lazy<Selector> = Lazy::new(|| summary_selector(ENVELOPES_ISSUED_HEADER));
static VALID_VOTES: Lazy<Selector> = Lazy::new(|| summary_selector(VALID_VOTES_HEADER));

/// Extract the summary counters and party results from one municipality page.
///
/// Field and row problems never fail the page; they degrade to `None` (summary)
/// or a dropped row (party) and are reported to `sink`. The page fails with
/// [`ScraperError::PageParse`] only when it holds no table at all.
pub fn parse_detail(markup: &str, sink: &dyn DiagnosticSink) -> Result<DetailPage> {
    let document = Html::parse_document(markup);
    if document.select(&TABLE).next().is_none() {
        return Err(ScraperError::PageParse(
            "page contains no result tables".to_string(),
        ));
    }

    let summary = MunicipalitySummary {
        eligible_voters: summary_field(&document, &ELIGIBLE_VOTERS, COLUMN_ELIGIBLE_VOTERS, sink),
        envelopes_issued: summary_field(&document, &ENVELOPES_ISSUED, COLUMN_ENVELOPES_ISSUED, sink),
        valid_votes: summary_field(&document, &VALID_VOTES, COLUMN_VALID_VOTES, sink),
    };

    Ok(DetailPage {
        summary,
        parties: party_results(&document, sink),
    })
}

fn summary_field(
    document: &Html,
    selector: &Selector,
    field: &'static str,
    sink: &dyn DiagnosticSink,
) -> Option<u64> {
    let Some(cell) = document.select(selector).next() else {
        sink.report(Diagnostic::SummaryFieldMissing { field });
        return None;
    };
    let text = element_text(cell);
    let value = parse_int(&text);
    if value.is_none() && !text.is_empty() {
        sink.report(Diagnostic::SummaryFieldUnparsable { field, text });
    }
    value
}

fn party_results(document: &Html, sink: &dyn DiagnosticSink) -> PartyVoteMap {
    let mut parties = PartyVoteMap::new();

    for row in document.select(&TABLE_ROW) {
        let name = first_party_cell(row, &NAME_CELL)
            .map(element_text)
            .filter(|name| !name.is_empty());
        let votes = first_party_cell(row, &NUMBER_CELL).map(element_text);

        match (name, votes) {
            (Some(party), Some(text)) => match parse_int(&text) {
                Some(count) => {
                    parties.insert(party, count);
                }
                None => sink.report(Diagnostic::UnparsableVotes { party, text }),
            },
            (Some(party), None) => sink.report(Diagnostic::PartyRowWithoutVotes { party }),
            (None, Some(text)) => sink.report(Diagnostic::VoteCellWithoutParty { text }),
            // header and summary rows
            (None, None) => {}
        }
    }

    parties
}

fn first_party_cell<'a>(row: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    row.select(selector).find(|cell| {
        cell.value()
            .attr("headers")
            .is_some_and(|h| PARTY_HEADERS.is_match(h))
    })
}
