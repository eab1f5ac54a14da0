use httpmock::prelude::*;
use lead_scout::core::export::businesses_from_csv;
use lead_scout::domain::model::Category;
use lead_scout::domain::ports::SourceAdapter;
use lead_scout::{ListingAdapter, ListingProfile, LocalStorage, ScoutConfig, ScoutEngine, ScoutPipeline};
use tempfile::TempDir;

const MODERN_SITE: &str = r#"<html><head>
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="stylesheet" href="/css/bootstrap.min.css">
</head><body><h1>Harbour Cafe</h1></body></html>"#;

fn directory_page(server: &MockServer) -> String {
    format!(
        r#"<html><body>
        <div class="card">
          <h2>Harbour Cafe</h2>
          <p class="addr">3 Quay Street, Galway</p>
          <a class="site" href="{}">Website</a>
        </div>
        <div class="card">
          <h2>Broken Site Bakery</h2>
          <a class="site" href="{}">Website</a>
        </div>
        <div class="card">
          <h2>Paper Menu Diner</h2>
          <span class="tel">091 555 0101</span>
        </div>
        </body></html>"#,
        server.url("/harbour"),
        server.url("/broken")
    )
}

fn config_for(server: &MockServer, output: &str) -> ScoutConfig {
    let toml = format!(
        r#"
[run]
location = "Galway"
sources = ["localdir"]

[[jobs]]
category = "cafes"
max_results = 10

[pacing]
min_delay_secs = 0.0
max_delay_secs = 0.0
analysis_delay_secs = 0.0

[[listings]]
source = "localdir"
base_url = "{}"
path_template = "/search/{{query}}/{{location}}"
containers = ["div.card"]
name = [{{ selector = "h2" }}]
address = [{{ selector = "p.addr" }}]
phone = [{{ selector = "span.tel" }}]
website = [{{ selector = "a.site", attr = "href" }}]

[fetcher]
timeout_secs = 5

[output]
path = "{}"
"#,
        server.base_url(),
        output
    );
    let config = ScoutConfig::from_toml_str(&toml).unwrap();
    lead_scout::utils::validation::Validate::validate(&config).unwrap();
    config
}

#[tokio::test]
async fn test_listing_adapter_reads_directory_page() {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/search/cafes/Galway");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(directory_page(&server));
    });

    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&server, temp_dir.path().to_str().unwrap());
    let profile = config.custom_profile("localdir").unwrap().clone();
    let adapter = ListingAdapter::new(profile).unwrap();

    let listings = adapter.search("cafes", "Galway", 2).await.unwrap();

    page.assert();
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].name.as_deref(), Some("Harbour Cafe"));
    assert_eq!(listings[0].address.as_deref(), Some("3 Quay Street, Galway"));
    assert_eq!(listings[0].source, "localdir");
}

#[tokio::test]
async fn test_listing_adapter_http_error_is_err() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/s/plumbers/Dublin");
        then.status(403);
    });

    let adapter = ListingAdapter::new(ListingProfile::yell().with_base_url(&server.base_url())).unwrap();
    assert!(adapter.search("plumbers", "Dublin", 5).await.is_err());
}

#[tokio::test]
async fn test_end_to_end_run_writes_both_csvs() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search/cafes/Galway");
        then.status(200).body(directory_page(&server));
    });
    let harbour = server.mock(|when, then| {
        when.method(GET).path("/harbour");
        then.status(200).body(MODERN_SITE);
    });
    server.mock(|when, then| {
        when.method(GET).path("/broken");
        then.status(500);
    });

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let config = config_for(&server, &output_path);

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ScoutPipeline::from_config(storage, &config).unwrap();
    let engine = ScoutEngine::new(pipeline);

    let outcome = engine.run().await.unwrap();
    harbour.assert();

    let discovery = &outcome.discovery.summary;
    assert_eq!(discovery.total, 3);
    assert_eq!(discovery.with_website, 2);
    assert_eq!(discovery.failed_searches, 0);

    let analysis = &outcome.analysis.summary;
    assert_eq!(analysis.total, 3);
    assert_eq!(analysis.with_website, 1);
    assert_eq!(analysis.needs_website, 3);
    assert_eq!(analysis.fetch_failures, 1);

    let scored = &outcome.analysis.report.scored;
    assert_eq!(scored[0].result.score, 6);
    assert_eq!(
        scored[0].result.details,
        vec!["Mobile viewport: +3", "CSS framework: +3"]
    );
    assert_eq!(scored[1].result.score, 0);
    assert!(scored[1].result.details[0].starts_with("Error: "));
    assert_eq!(scored[2].result.details, vec!["No website found"]);
    assert!(scored[2].result.url.is_none());

    let top = outcome.analysis.report.top_candidates(2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].result.score, 0);

    // businesses CSV reads back through the normalizer
    let businesses_csv = std::fs::read(temp_dir.path().join("businesses.csv")).unwrap();
    let businesses = businesses_from_csv(&businesses_csv).unwrap();
    assert_eq!(businesses.len(), 3);
    assert!(businesses.iter().all(|b| b.category == Category::Cafe));
    assert_eq!(businesses[2].website, "");

    let scored_csv =
        std::fs::read_to_string(temp_dir.path().join("scored_leads.csv")).unwrap();
    let mut lines = scored_csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "name,address,website,phone,category,location,source,score,has_website,needs_website,details,url"
    );
    let harbour_row = lines.next().unwrap();
    assert!(harbour_row.starts_with("Harbour Cafe,"));
    assert!(harbour_row.contains(",6,true,true,Mobile viewport: +3 | CSS framework: +3,"));
    assert_eq!(scored_csv.lines().count(), 4);
}

#[tokio::test]
async fn test_score_command_rescores_saved_businesses() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/harbour");
        then.status(200).body(MODERN_SITE);
    });

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    std::fs::write(
        temp_dir.path().join("input.csv"),
        format!(
            "name,address,website,phone,category,location,source\n\
             Harbour Cafe,,{},,cafes,Galway,manual\n\
             Quiet Solicitors,,NO_WEBSITE,,solicitors,Galway,manual\n",
            server.url("/harbour")
        ),
    )
    .unwrap();

    let config = config_for(&server, &output_path);
    let pipeline = ScoutPipeline::from_config(LocalStorage::new(output_path.clone()), &config).unwrap();
    let engine = ScoutEngine::new(pipeline);

    let outcome = engine.score("input.csv").await.unwrap();

    assert_eq!(outcome.summary.total, 2);
    assert_eq!(outcome.report.scored[0].result.score, 6);
    assert_eq!(outcome.report.scored[1].business.category, Category::Lawyer);
    assert!(!outcome.report.scored[1].result.has_website);
    assert!(temp_dir.path().join("scored_leads.csv").exists());
}

#[tokio::test]
async fn test_missing_input_is_a_system_error() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let server = MockServer::start();
    let config = config_for(&server, &output_path);

    let pipeline = ScoutPipeline::from_config(LocalStorage::new(output_path), &config).unwrap();
    let err = ScoutEngine::new(pipeline).score("nope.csv").await.unwrap_err();

    assert_eq!(
        err.category(),
        lead_scout::utils::error::ErrorCategory::System
    );
}
