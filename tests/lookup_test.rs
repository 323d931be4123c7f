mod common;

use common::{FakeSource, release};
use vinylcli::{
    discogs::{SearchQuery, SourceError},
    lookup::{LookupError, LookupResult, lookup, lookup_query},
};

#[test]
fn test_detect_barcodes_and_titles() {
    assert_eq!(
        SearchQuery::detect("5099902894225"),
        SearchQuery::Barcode("5099902894225".to_string())
    );
    assert_eq!(
        SearchQuery::detect(" 012345678905 "),
        SearchQuery::Barcode("012345678905".to_string())
    );
    assert_eq!(
        SearchQuery::detect("1234567"),
        SearchQuery::Text("1234567".to_string())
    );
    assert_eq!(
        SearchQuery::detect("123456789012345"),
        SearchQuery::Text("123456789012345".to_string())
    );
    assert_eq!(
        SearchQuery::detect("Thriller"),
        SearchQuery::Text("Thriller".to_string())
    );
    assert_eq!(SearchQuery::detect("1999 Prince").param(), "q");
    assert_eq!(SearchQuery::detect("50999028").param(), "barcode");
}

#[tokio::test]
async fn test_lookup_builds_record_from_first_match() {
    let source = FakeSource::new()
        .with_release("Thriller", release(7, "Michael Jackson - Thriller", &["Pop"]), 20.0)
        .with_release("Thriller", release(8, "Thriller (Picture Disc)", &["Pop"]), 99.0);

    let result = lookup(&source, "Thriller").await.unwrap();

    let LookupResult::Found(record) = result else {
        panic!("expected a match");
    };
    assert_eq!(record.key, "Thriller");
    assert_eq!(record.release_id(), Some(7));
    assert_eq!(record.tracklist.as_ref().unwrap().len(), 2);
    assert_eq!(record.price_for("Mint (M)"), 20.0);
    assert_eq!(
        source.calls(),
        vec!["search:Thriller", "detail:7", "prices:7"]
    );
}

#[tokio::test]
async fn test_lookup_without_match_is_not_found() {
    let source = FakeSource::new();

    let result = lookup(&source, "0000000000000").await.unwrap();

    assert_eq!(
        result,
        LookupResult::NotFound {
            key: "0000000000000".to_string()
        }
    );
    assert_eq!(result.key(), "0000000000000");
    assert_eq!(source.calls(), vec!["search:0000000000000"]);
}

#[tokio::test]
async fn test_failing_search_is_lookup_failed() {
    let source = FakeSource::new().failing_search("Thriller");

    let err = lookup(&source, "Thriller").await.unwrap_err();

    let LookupError::LookupFailed { query, source } = err;
    assert_eq!(query, "Thriller");
    assert!(matches!(source, SourceError::Unavailable(_)));
}

#[tokio::test]
async fn test_failing_detail_aborts_lookup() {
    let source = FakeSource::new()
        .with_release("Bad", release(9, "Bad", &["Pop"]), 5.0)
        .failing_detail(9);

    let result = lookup_query(&source, &SearchQuery::Text("Bad".to_string())).await;

    assert!(matches!(
        result,
        Err(LookupError::LookupFailed {
            source: SourceError::Status { status: 500, .. },
            ..
        })
    ));
    assert!(!source.calls().contains(&"prices:9".to_string()));
}

#[tokio::test]
async fn test_match_without_id_is_lookup_failed() {
    let mut anonymous = release(1, "No Id", &[]);
    anonymous.id = None;
    let source = FakeSource::new().with_release("No Id", anonymous, 1.0);

    let result = lookup(&source, "No Id").await;

    assert!(matches!(result, Err(LookupError::LookupFailed { .. })));
}
