//! Persistence tests on real files

use firechair::analytics::Aggregator;
use firechair::config::StorageConfig;
use firechair::models::{Listing, ListingFields};
use firechair::storage::{ListingRepository, PersistenceSink, SqliteListingRepository};
use tempfile::TempDir;

fn listing(url: &str, price: Option<&str>, mileage: Option<&str>) -> Listing {
    Listing::new(
        url,
        ListingFields {
            price: price.map(String::from),
            mileage: mileage.map(String::from),
        },
    )
}

fn storage_config(dir: &TempDir) -> StorageConfig {
    StorageConfig {
        output_dir: dir.path().join("export"),
        sqlite_path: dir.path().join("db").join("motorrad.db"),
        write_csv: true,
        write_database: true,
    }
}

#[test]
fn test_overlapping_crawls_keep_first_record() {
    let dir = TempDir::new().unwrap();
    let sink = PersistenceSink::from_config(&storage_config(&dir)).unwrap();

    let first = Aggregator::aggregate(vec![
        listing("https://x/s-anzeige/a", Some("3.000 €"), None),
        listing("https://x/s-anzeige/b", Some("2.000 €"), None),
    ]);
    let outcome = sink.persist(&first, "honda-cbr", "honda-cbr").unwrap();
    assert_eq!((outcome.inserted, outcome.ignored), (2, 0));

    // A broader query finds one known listing at a new price
    let second = Aggregator::aggregate(vec![
        listing("https://x/s-anzeige/a", Some("2.500 €"), None),
        listing("https://x/s-anzeige/c", Some("1.000 €"), None),
    ]);
    let outcome = sink.persist(&second, "honda", "honda").unwrap();
    assert_eq!((outcome.inserted, outcome.ignored), (1, 1));

    let repo = SqliteListingRepository::new(dir.path().join("db").join("motorrad.db")).unwrap();
    assert_eq!(repo.count().unwrap(), 3);

    let a = repo.get_by_url("https://x/s-anzeige/a").unwrap().unwrap();
    assert_eq!(a.price.as_deref(), Some("3.000 €"));
    assert_eq!(a.label.as_deref(), Some("honda-cbr"));

    // Each query keeps its own CSV snapshot
    let honda = std::fs::read_to_string(dir.path().join("export").join("honda.csv")).unwrap();
    assert!(honda.contains("https://x/s-anzeige/a,2.500 €,"));
    assert!(dir.path().join("export").join("honda-cbr.csv").exists());
}

#[test]
fn test_database_only_sink() {
    let dir = TempDir::new().unwrap();
    let mut config = storage_config(&dir);
    config.write_csv = false;

    let sink = PersistenceSink::from_config(&config).unwrap();
    let outcome = sink
        .persist(
            &Aggregator::aggregate(vec![listing("https://x/s-anzeige/a", None, None)]),
            "q",
            "q",
        )
        .unwrap();

    assert_eq!(outcome.csv_path, None);
    assert_eq!(outcome.inserted, 1);
    assert!(!dir.path().join("export").exists());
}
