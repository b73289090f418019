use httpmock::prelude::*;
use longbox::adapters::catalog::CatalogStore;
use longbox::adapters::comicvine::ComicVineClient;
use longbox::adapters::mylar::MylarClient;
use longbox::adapters::reading_list;
use longbox::core::reconcile;
use longbox::core::volume::PublisherPolicy;
use longbox::{EnrichmentDriver, EnrichmentOptions};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn fast_options() -> EnrichmentOptions {
    EnrichmentOptions {
        rate_limit: Duration::ZERO,
        ..Default::default()
    }
}

fn write_reading_list(dir: &std::path::Path, name: &str, books: &[(&str, &str, &str)]) {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><ReadingList><Name>List</Name><Books>",
    );
    for (series, number, year) in books {
        xml.push_str(&format!(
            "<Book Series=\"{}\" Number=\"{}\" Volume=\"{}\"></Book>",
            series, number, year
        ));
    }
    xml.push_str("</Books><Matchers /></ReadingList>");
    fs::write(dir.join(name), xml).unwrap();
}

#[tokio::test]
async fn end_to_end_run_enriches_and_persists_the_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let lists_dir = temp_dir.path().join("ReadingLists");
    fs::create_dir(&lists_dir).unwrap();
    write_reading_list(
        &lists_dir,
        "image.cbl",
        &[("Saga", "1", "2012"), ("Saga", "2", "2012")],
    );

    let cv = MockServer::start();
    let volume_mock = cv.mock(|when, then| {
        when.method(GET)
            .path("/volumes/")
            .query_param("filter", "name:Saga");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "results": [{
                    "id": 4050,
                    "name": "Saga",
                    "start_year": "2012",
                    "publisher": {"name": "Image"},
                    "count_of_issues": 66
                }]
            }));
    });
    let issues_mock = cv.mock(|when, then| {
        when.method(GET)
            .path("/issues/")
            .query_param("filter", "volume:4050");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "results": [
                    {"id": 101, "issue_number": "1"},
                    {"id": 102, "issue_number": "2"}
                ]
            }));
    });

    let mylar = MockServer::start();
    let check_mock = mylar.mock(|when, then| {
        when.method(GET).path("/api").query_param("cmd", "getComic");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"data": {"comic": []}}));
    });
    let add_mock = mylar.mock(|when, then| {
        when.method(GET).path("/api").query_param("cmd", "addComic");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"success": true}));
    });

    let store = CatalogStore::new(temp_dir.path().join("Data").join("data.csv"));
    let catalog = store.load().unwrap();
    let entries = reading_list::load_reading_lists(&lists_dir).unwrap();
    let (mut set, merge_stats) = reconcile::merge(catalog, &entries);

    let driver = EnrichmentDriver::new(
        ComicVineClient::new(cv.url(""), "cv-key"),
        MylarClient::new(mylar.url(""), "mylar-key"),
        EnrichmentOptions {
            auto_add: true,
            ..fast_options()
        },
    );
    let stats = driver.enrich(&mut set, merge_stats).await;
    store.save(&set).unwrap();

    volume_mock.assert();
    issues_mock.assert();
    check_mock.assert();
    add_mock.assert();

    assert_eq!(stats.series_total, 1);
    assert_eq!(stats.volume.match_single, 1);
    assert_eq!(stats.issues.full, 1);
    assert_eq!(stats.library.found_added, 1);

    let csv = fs::read_to_string(temp_dir.path().join("Data").join("data.csv")).unwrap();
    assert!(csv.starts_with("Series,Year,IssueList,Publisher,ComicID,NumIssues,InMylar"));
    assert!(csv.contains("Saga,2012,1 [101]; 2 [102]; ,Image,4050,66,True"));

    let summary = stats.render();
    assert!(summary.contains("Match (Single) = 1"));
    assert!(summary.contains("Found (Added) = 1"));
}

#[tokio::test]
async fn second_run_reuses_resolved_ids_without_new_searches() {
    let temp_dir = TempDir::new().unwrap();
    let lists_dir = temp_dir.path().join("ReadingLists");
    fs::create_dir(&lists_dir).unwrap();
    write_reading_list(&lists_dir, "image.cbl", &[("Saga", "1", "2012")]);

    let data_file = temp_dir.path().join("data.csv");
    fs::write(
        &data_file,
        "Series,Year,IssueList,Publisher,ComicID,NumIssues,InMylar\n\
         Saga,2012,1 [101]; ,Image,4050,66,True\n",
    )
    .unwrap();

    // No expectations registered: any request would 404 and show up in the
    // stats as a failure.
    let cv = MockServer::start();
    let mylar = MockServer::start();

    let store = CatalogStore::new(&data_file);
    let catalog = store.load().unwrap();
    let entries = reading_list::load_reading_lists(&lists_dir).unwrap();
    let (mut set, merge_stats) = reconcile::merge(catalog, &entries);

    let driver = EnrichmentDriver::new(
        ComicVineClient::new(cv.url(""), "cv-key"),
        MylarClient::new(mylar.url(""), "mylar-key"),
        fast_options(),
    );
    let stats = driver.enrich(&mut set, merge_stats).await;
    store.save(&set).unwrap();

    assert_eq!(stats.searches_used, 0);
    assert_eq!(stats.volume.match_existing, 1);
    assert_eq!(stats.volume.lookup_failed, 0);
    assert_eq!(stats.issues.full, 1);
    assert_eq!(stats.library.found_unchecked, 1);

    let csv = fs::read_to_string(&data_file).unwrap();
    assert!(csv.contains("Saga,2012,1 [101]; ,Image,4050,66,True"));
}

#[tokio::test]
async fn unreachable_services_still_produce_a_complete_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let lists_dir = temp_dir.path().join("ReadingLists");
    fs::create_dir(&lists_dir).unwrap();
    write_reading_list(
        &lists_dir,
        "mixed.cbl",
        &[("Saga", "1", "2012"), ("Paper Girls", "1", "2015")],
    );

    let cv = MockServer::start();
    cv.mock(|when, then| {
        when.method(GET).path("/volumes/");
        then.status(500);
    });
    let mylar = MockServer::start();
    mylar.mock(|when, then| {
        when.method(GET).path("/api");
        then.status(500);
    });

    let store = CatalogStore::new(temp_dir.path().join("data.csv"));
    let entries = reading_list::load_reading_lists(&lists_dir).unwrap();
    let (mut set, merge_stats) = reconcile::merge(store.load().unwrap(), &entries);

    let driver = EnrichmentDriver::new(
        ComicVineClient::new(cv.url(""), "cv-key"),
        MylarClient::new(mylar.url(""), "mylar-key"),
        fast_options(),
    );
    let stats = driver.enrich(&mut set, merge_stats).await;
    store.save(&set).unwrap();

    // Both series degraded to sentinels but were processed and reported.
    assert_eq!(stats.series_total, 2);
    assert_eq!(stats.volume.lookup_failed, 2);
    assert_eq!(stats.issues.none.len(), 2);
    assert_eq!(stats.library.missing_not_added, 2);

    let csv = fs::read_to_string(temp_dir.path().join("data.csv")).unwrap();
    assert!(csv.contains("Saga,2012,1 [Unknown]; ,Unknown,Unknown,Unknown,False"));
    assert!(csv.contains("Paper Girls,2015,1 [Unknown]; ,Unknown,Unknown,Unknown,False"));
}

#[tokio::test]
async fn call_budget_limits_searches_across_the_whole_run() {
    let temp_dir = TempDir::new().unwrap();
    let lists_dir = temp_dir.path().join("ReadingLists");
    fs::create_dir(&lists_dir).unwrap();
    write_reading_list(
        &lists_dir,
        "lists.cbl",
        &[
            ("Aardvark", "1", "1977"),
            ("Saga", "1", "2012"),
            ("Zot!", "1", "1984"),
        ],
    );

    let cv = MockServer::start();
    let search_mock = cv.mock(|when, then| {
        when.method(GET).path("/volumes/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"results": []}));
    });
    let mylar = MockServer::start();

    let entries = reading_list::load_reading_lists(&lists_dir).unwrap();
    let (mut set, merge_stats) = reconcile::merge(vec![], &entries);

    let driver = EnrichmentDriver::new(
        ComicVineClient::new(cv.url(""), "cv-key"),
        MylarClient::new(mylar.url(""), "mylar-key"),
        EnrichmentOptions {
            search_limit: 2,
            library_enabled: false,
            ..fast_options()
        },
    );
    let stats = driver.enrich(&mut set, merge_stats).await;

    search_mock.assert_hits(2);
    assert_eq!(stats.searches_used, 2);
    assert_eq!(stats.volume.no_match, 2);
    // The third series still reached its report.
    assert_eq!(stats.series_total, 3);
    assert_eq!(stats.library.missing_unchecked, 3);
}

#[test]
fn publisher_policy_flows_from_the_settings_file() {
    use clap::Parser;
    use longbox::{CliConfig, FileConfig, RunConfig};

    let file = FileConfig::from_toml_str(
        r#"
        [comicvine]
        api_key = "k"

        [publishers]
        blacklist = ["Panini Comics"]
        preferred = ["Image"]
        "#,
    )
    .unwrap();
    let cli = CliConfig::parse_from(["longbox"]);
    let run = RunConfig::resolve(&cli, file);

    let policy: &PublisherPolicy = &run.options.policy;
    assert_eq!(policy.blacklist, vec!["Panini Comics".to_string()]);
    assert_eq!(policy.preferred, vec!["Image".to_string()]);
}
