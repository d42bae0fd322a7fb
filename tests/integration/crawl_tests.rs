//! Integration tests for the crawler
//!
//! These tests use wiremock to create a mock catalog site and run the full
//! brand → model → price cascade end-to-end.

use autospot_crawler::config::{Backend, Config};
use autospot_crawler::crawler::{run_crawl, Coordinator, HttpFetcher, Stage};
use autospot_crawler::storage::{FileStorage, SqliteStorage};
use autospot_crawler::CrawlError;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX: &str = r#"
<html><body>
<div class="model-carousel">
    <a href="/cars/kia/"><span style="background-image:url(/img/kia.png)"></span>Киа</a>
    <a href="/cars/lada/"><span style="background-image:url(/img/lada.png)"></span>Лада</a>
    <a href="/cars/bmw/"><span style="background-image:url(/img/bmw.png)"></span>BMW</a>
</div>
</body></html>
"#;

const KIA_MODELS: &str = r#"
<html><body><ul class="carlist">
    <li><a href="/cars/kia/rio/">
        <div class="car-photo" style="background-image:url(/img/rio.jpg)"></div>
        <div class="car-title">Рио</div>
        <div class="complete-set">12 предложений</div>
    </a></li>
    <li><a href="/cars/kia/ceed/">
        <div class="car-photo" style="background-image:url(/img/ceed.jpg)"></div>
        <div class="car-title">Ceed</div>
        <div class="complete-set">нет в наличии</div>
    </a></li>
</ul></body></html>
"#;

const LADA_MODELS: &str = r#"
<html><body><ul class="carlist">
    <li><a href="/cars/lada/vesta/">
        <div class="car-photo" style="background-image:url(/img/vesta.jpg)"></div>
        <div class="car-title">Веста</div>
        <div class="complete-set">4</div>
    </a></li>
</ul></body></html>
"#;

const BMW_MODELS: &str = r#"
<html><body><ul class="carlist">
    <li><a href="/cars/bmw/x5/">
        <div class="car-photo" style="background-image:url(/img/x5.jpg)"></div>
        <div class="car-title">X5</div>
        <div class="complete-set">1</div>
    </a></li>
</ul></body></html>
"#;

const PRICE_PAGE: &str = r##"
<html><body>
<div class="car__unit__wrapper">
    <div class="car__unit__block">
        <div class="car__unit__name">
            <span class="standart">Рио Комфорт</span>
            <span class="metalic"><i style="background-color:#ff0000"></i>Красный</span>
        </div>
        <div class="car__unit__img"><div class="car-card-photo" style="background-image:url(/img/unit.jpg)"></div></div>
        <div class="car__unit__sett">
            <div class="sett_unit"><span class="sett_unit-left">Двигатель</span><span class="sett_unit-right">1.6 л</span></div>
        </div>
        <div class="unit__price_price">1 100 000 ₽</div>
    </div>
</div>
<div class="car-card-equipment car-card">
    <div class="car-card-photo" style="background-image:url(/img/card.jpg)"></div>
    <div class="car-card-right">
        <ul class="carinfo"><li><span class="label">Комплектация</span><span class="value">Комфорт</span></li></ul>
        <ul class="carinfo last"><li><span class="label"></span><span class="value">—</span></li></ul>
    </div>
    <table class="car-list">
        <tr><th>Цвет</th><th>Цена</th></tr>
        <tr><td class="car-list-color"><i class="color" style="background:#fff"></i>Белый</td><td class="car-list-price">1 150 000 ₽</td></tr>
    </table>
</div>
</body></html>
"##;

const EMPTY_PRICE_PAGE: &str = r#"<html><body><div class="car__unit__wrapper"></div></body></html>"#;

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Mounts the whole catalog; the Lada listing responds with `lada`
async fn mount_catalog(server: &MockServer, lada: ResponseTemplate) {
    mount(server, "/", html(INDEX)).await;
    mount(server, "/cars/kia/", html(KIA_MODELS)).await;
    mount(server, "/cars/lada/", lada).await;
    mount(server, "/cars/bmw/", html(BMW_MODELS)).await;
    mount(server, "/cars/kia/rio/", html(PRICE_PAGE)).await;
    mount(server, "/cars/kia/ceed/", html(EMPTY_PRICE_PAGE)).await;
    mount(server, "/cars/lada/vesta/", html(EMPTY_PRICE_PAGE)).await;
    mount(server, "/cars/bmw/x5/", html(EMPTY_PRICE_PAGE)).await;
}

fn create_test_config(base_url: &str, data_dir: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.crawler.request_timeout = 5;
    config.crawler.connect_timeout = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.data_dir = data_dir.to_string_lossy().into_owned();
    config.output.database_path = data_dir.join("catalog.db").to_string_lossy().into_owned();
    config
}

fn read_json(dir: &Path, key: &str) -> Value {
    let content = std::fs::read_to_string(dir.join(key))
        .unwrap_or_else(|e| panic!("artifact {} missing: {}", key, e));
    serde_json::from_str(&content).expect("artifact is valid JSON")
}

#[tokio::test]
async fn test_full_crawl_writes_layout() {
    let server = MockServer::start().await;
    mount_catalog(&server, html(LADA_MODELS)).await;
    let dir = tempfile::tempdir().unwrap();

    let config = create_test_config(&server.uri(), dir.path());
    let report = run_crawl(config).await.expect("crawl runs");

    assert!(report.is_success(), "report: {:?}", report);
    assert_eq!(report.stage(Stage::Model).unwrap().succeeded, 3);
    assert_eq!(report.stage(Stage::Price).unwrap().succeeded, 4);

    let brands = read_json(dir.path(), "brands.json");
    assert_eq!(
        brands,
        json!([
            {"name": "Киа", "image_url": "/img/kia.png", "alias": "kia", "models_url": "/models/kia.json"},
            {"name": "Лада", "image_url": "/img/lada.png", "alias": "lada", "models_url": "/models/lada.json"},
            {"name": "BMW", "image_url": "/img/bmw.png", "alias": "bmw", "models_url": "/models/bmw.json"}
        ])
    );

    let kia = read_json(dir.path(), "models/kia.json");
    assert_eq!(kia[0]["alias"], "rio");
    assert_eq!(kia[0]["offers"], 12);
    assert_eq!(kia[0]["prices_url"], "/prices/kia_rio.json");

    let rio = read_json(dir.path(), "prices/kia_rio.json");
    assert_eq!(rio["discount"][0]["alias"], "rio_komfort");
    assert_eq!(rio["discount"][0]["color"], json!({"name": "Красный", "code": "#ff0000"}));
    assert_eq!(rio["discount"][0]["price"]["dealer"], "1 100 000 ₽");
    assert_eq!(rio["discount"][0]["settings"]["dvigatel"], "1.6 л");
    assert_eq!(rio["price"][0]["info"], json!({"komplektaciya": "Комфорт"}));
    assert_eq!(
        rio["price"][0]["prices"],
        json!([{"color": {"name": "Белый", "code": "#fff"}, "price": "1 150 000 ₽"}])
    );

    for key in [
        "prices/kia_ceed.json",
        "prices/lada_vesta.json",
        "prices/bmw_x5.json",
    ] {
        assert_eq!(read_json(dir.path(), key), json!({"discount": [], "price": []}));
    }
}

#[tokio::test]
async fn test_offers_sentinel_does_not_fail_page() {
    let server = MockServer::start().await;
    mount_catalog(&server, html(LADA_MODELS)).await;
    let dir = tempfile::tempdir().unwrap();

    let report = run_crawl(create_test_config(&server.uri(), dir.path()))
        .await
        .unwrap();

    assert!(report.stage(Stage::Model).unwrap().is_success());
    let kia = read_json(dir.path(), "models/kia.json");
    assert_eq!(kia[1]["alias"], "ceed");
    assert_eq!(kia[1]["offers"], Value::Null);
}

#[tokio::test]
async fn test_partial_failure_keeps_sibling_artifacts() {
    let server = MockServer::start().await;
    // The Lada listing fails only after its siblings have had time to persist.
    mount_catalog(
        &server,
        ResponseTemplate::new(500).set_delay(Duration::from_millis(300)),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();

    let config = create_test_config(&server.uri(), dir.path());
    let coordinator = Coordinator::new(
        &config,
        Arc::new(HttpFetcher::new(reqwest::Client::new())),
        Arc::new(FileStorage::new(dir.path())),
    )
    .unwrap();
    let report = coordinator.run().await.unwrap();

    let models = report.stage(Stage::Model).unwrap();
    assert_eq!(models.attempted, 3);
    assert_eq!(models.succeeded, 2);
    assert_eq!(models.failures[0].target, "lada");

    assert!(dir.path().join("models/kia.json").exists());
    assert!(dir.path().join("models/bmw.json").exists());
    assert!(!dir.path().join("models/lada.json").exists());

    // Price pages of the surviving brands are still crawled.
    assert!(dir.path().join("prices/kia_rio.json").exists());
    assert!(dir.path().join("prices/bmw_x5.json").exists());
    assert!(!dir.path().join("prices/lada_vesta.json").exists());

    assert!(matches!(
        report.into_result(),
        Err(CrawlError::Incomplete { failed: 1, .. })
    ));
}

#[tokio::test]
async fn test_price_parse_error_is_isolated() {
    let server = MockServer::start().await;
    mount(&server, "/", html(INDEX)).await;
    mount(&server, "/cars/kia/", html(KIA_MODELS)).await;
    mount(&server, "/cars/lada/", html(LADA_MODELS)).await;
    mount(&server, "/cars/bmw/", html(BMW_MODELS)).await;
    mount(&server, "/cars/kia/rio/", html(&PRICE_PAGE.replace("background-color:", "color:"))).await;
    mount(&server, "/cars/kia/ceed/", html(EMPTY_PRICE_PAGE)).await;
    mount(&server, "/cars/lada/vesta/", html(EMPTY_PRICE_PAGE)).await;
    mount(&server, "/cars/bmw/x5/", html(EMPTY_PRICE_PAGE)).await;
    let dir = tempfile::tempdir().unwrap();

    let report = run_crawl(create_test_config(&server.uri(), dir.path()))
        .await
        .unwrap();

    let prices = report.stage(Stage::Price).unwrap();
    assert_eq!(prices.attempted, 4);
    assert_eq!(prices.failed(), 1);
    assert_eq!(prices.failures[0].target, "kia_rio");
    assert!(prices.failures[0].error.contains("/cars/kia/rio/"));
    assert!(!dir.path().join("prices/kia_rio.json").exists());
    assert!(dir.path().join("prices/kia_ceed.json").exists());
}

#[tokio::test]
async fn test_index_failure_aborts_crawl() {
    let server = MockServer::start().await;
    mount(&server, "/", ResponseTemplate::new(503)).await;
    Mock::given(method("GET"))
        .and(path("/cars/kia/"))
        .respond_with(html(KIA_MODELS))
        .expect(0)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let result = run_crawl(create_test_config(&server.uri(), dir.path())).await;

    assert!(matches!(result, Err(CrawlError::Fetch(_))));
    assert!(!dir.path().join("brands.json").exists());
}

#[tokio::test]
async fn test_bounded_concurrency_sqlite_backend() {
    let server = MockServer::start().await;
    mount_catalog(&server, html(LADA_MODELS)).await;
    let dir = tempfile::tempdir().unwrap();

    let mut config = create_test_config(&server.uri(), dir.path());
    config.crawler.max_concurrent_fetches = 1;
    config.output.backend = Backend::Sqlite;
    let db_path = config.output.database_path.clone();

    let report = run_crawl(config).await.unwrap();
    assert!(report.is_success());

    let storage = SqliteStorage::new(Path::new(&db_path)).unwrap();
    assert_eq!(storage.count().unwrap(), 1 + 3 + 4);
    let body = storage.get("models/lada.json").unwrap().unwrap();
    let lada: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(lada[0]["alias"], "vesta");
    assert_eq!(lada[0]["prices_url"], "/prices/lada_vesta.json");
}
