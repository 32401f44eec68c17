use anyhow::Result;
use std::sync::Arc;

use election_scraper::constants::UTF8_BOM;
use election_scraper::diagnostics::{CollectingSink, Diagnostic};
use election_scraper::infra::InMemoryFetcher;
use election_scraper::output::write_csv_file;
use election_scraper::{ErrorKind, Pipeline, RetryPolicy};

const INDEX_URL: &str = "https://www.volby.cz/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=12&xnumnuts=7103";
const TOWN_A_URL: &str =
    "https://www.volby.cz/pls/ps2017nss/ps311?xjazyk=CZ&xkraj=12&xobec=501234&xvyber=7103";
const TOWN_B_URL: &str =
    "https://www.volby.cz/pls/ps2017nss/ps311?xjazyk=CZ&xkraj=12&xobec=501235&xvyber=7103";

const INDEX_HTML: &str = include_str!("fixtures/index.html");
const TOWN_A_HTML: &str = include_str!("fixtures/detail_town_a.html");
const TOWN_B_HTML: &str = include_str!("fixtures/detail_town_b.html");

fn site() -> InMemoryFetcher {
    InMemoryFetcher::new()
        .with_page(INDEX_URL, INDEX_HTML)
        .with_page(TOWN_A_URL, TOWN_A_HTML)
        .with_page(TOWN_B_URL, TOWN_B_HTML)
}

fn pipeline(fetcher: InMemoryFetcher) -> (Pipeline, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::new());
    let pipeline = Pipeline::new(Arc::new(fetcher), sink.clone(), RetryPolicy::none());
    (pipeline, sink)
}

#[tokio::test]
async fn test_two_towns_reconcile_into_one_table() -> Result<()> {
    let (pipeline, _sink) = pipeline(site());

    let table = pipeline.run_table(INDEX_URL).await?;

    assert_eq!(
        table.columns(),
        vec![
            "id",
            "name",
            "eligible_voters",
            "envelopes_issued",
            "valid_votes",
            "PartyX",
            "PartyY"
        ]
    );
    assert_eq!(table.row_count(), 2);

    let town_a = &table.rows[0];
    assert_eq!((town_a.id.as_str(), town_a.name.as_str()), ("501234", "TownA"));
    assert_eq!(town_a.eligible_voters, Some(1000));
    assert_eq!(town_a.envelopes_issued, Some(600));
    assert_eq!(town_a.valid_votes, Some(580));
    assert_eq!(town_a.votes, vec![300, 280]);

    let town_b = &table.rows[1];
    assert_eq!(town_b.name, "TownB");
    assert_eq!(town_b.eligible_voters, Some(500));
    assert_eq!(town_b.envelopes_issued, Some(0));
    assert_eq!(town_b.valid_votes, Some(0));
    assert_eq!(table.party_votes("501235", "PartyX"), Some(0));
    assert_eq!(table.party_votes("501235", "PartyY"), Some(0));

    Ok(())
}

#[tokio::test]
async fn test_failed_detail_fetch_skips_only_that_town() -> Result<()> {
    let fetcher = site().fail_times(TOWN_B_URL, 1);
    let (pipeline, sink) = pipeline(fetcher);

    let result = pipeline.run(INDEX_URL).await?;

    assert_eq!(result.discovered, 2);
    assert_eq!(result.table.row_count(), 1);
    assert_eq!(result.table.rows[0].name, "TownA");
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].municipality.id, "501235");
    assert_eq!(result.skipped[0].kind, ErrorKind::Fetch);
    assert_eq!(
        sink.count_where(|d| matches!(d, Diagnostic::MunicipalitySkipped { id, .. } if id == "501235")),
        1
    );
    Ok(())
}

#[tokio::test]
async fn test_index_without_links_yields_empty_table() -> Result<()> {
    let fetcher = InMemoryFetcher::new().with_page(INDEX_URL, "<html><body><table></table></body></html>");
    let (pipeline, sink) = pipeline(fetcher);

    let result = pipeline.run(INDEX_URL).await?;

    assert!(result.is_empty());
    assert_eq!(result.discovered, 0);
    assert_eq!(sink.count_where(|d| *d == Diagnostic::NoMunicipalityLinks), 1);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_index_is_fatal() {
    let fetcher = InMemoryFetcher::new().fail_times(INDEX_URL, 10);
    let (pipeline, _sink) = pipeline(fetcher);

    let err = pipeline.run(INDEX_URL).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Fetch);
}

#[tokio::test]
async fn test_repeated_index_link_is_kept_twice() -> Result<()> {
    let doubled = INDEX_HTML.replace("501235", "501234").replace("TownB", "TownA");
    let fetcher = InMemoryFetcher::new()
        .with_page(INDEX_URL, doubled)
        .with_page(TOWN_A_URL, TOWN_A_HTML);
    let (pipeline, _sink) = pipeline(fetcher);

    let table = pipeline.run_table(INDEX_URL).await?;

    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[0], table.rows[1]);
    Ok(())
}

#[tokio::test]
async fn test_run_to_csv_file() -> Result<()> {
    let (pipeline, _sink) = pipeline(site());
    let table = pipeline.run_table(INDEX_URL).await?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("vysledky_testov.csv");
    let rows = write_csv_file(&table, &path)?;
    assert_eq!(rows, 2);

    let bytes = std::fs::read(&path)?;
    assert!(bytes.starts_with(UTF8_BOM));
    let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec())?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "id;name;eligible_voters;envelopes_issued;valid_votes;PartyX;PartyY",
            "501234;TownA;1000;600;580;300;280",
            "501235;TownB;500;0;0;0;0",
        ]
    );
    Ok(())
}
