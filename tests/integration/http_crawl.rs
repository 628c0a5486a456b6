//! End-to-end crawls against wiremock servers

use crate::support::{anchors, html};
use sitegraph::config::Config;
use sitegraph::crawler::{crawl, SITE_ROOT_DESCRIPTION};
use sitegraph::output::render_tree;
use sitegraph::CrawlError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_site_with_self_link_about_products_and_external() {
    let server = MockServer::start().await;
    let external = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("<a href=\"/\">elsewhere</a>"))
        .expect(0)
        .mount(&external)
        .await;

    let external_home = format!("{}/", external.uri());
    let home = anchors(&[
        ("/", "home"),
        ("/about", "about"),
        ("/products", "products"),
        (external_home.as_str(), "external"),
    ]);
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&home))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html(&anchors(&[("/", "home"), ("/career", "career")])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/career"))
        .respond_with(html("<p>We are hiring</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let graph = crawl(&server.uri(), &Config::default()).await.unwrap();

    assert_eq!(graph.len(), 4);

    let root = graph.root();
    assert_eq!(root.uri(), "/");
    assert_eq!(root.description(), SITE_ROOT_DESCRIPTION);
    let root_links: Vec<&str> = graph.links(root).map(|p| p.uri()).collect();
    assert_eq!(root_links, vec!["/", "/about", "/products"]);
    assert_eq!(root.links()[0], root.id());

    let about = graph.find("/about").unwrap();
    let about_links: Vec<&str> = graph.links(about).map(|p| p.uri()).collect();
    assert_eq!(about_links, vec!["/", "/career"]);
    assert_eq!(about.links()[0], root.id());

    let products = graph.find("/products").unwrap();
    assert!(products.links().is_empty());
    assert!(products.description().contains("404"));
    assert_eq!(products.status(), Some(404));
    assert!(products.is_failure());

    let career = graph.find("/career").unwrap();
    assert!(career.links().is_empty());
    assert!(graph.pages().all(|p| p.is_complete()));

    let stats = graph.stats();
    assert_eq!(stats.pages, 4);
    assert_eq!(stats.fetches, 4);
    assert_eq!(stats.failed_statuses, 1);
    assert_eq!(stats.off_site_links, 1);

    let expected = "\
/ \"site root\"
  (showed) / \"site root\"
  /about \"about\"
    (showed) / \"site root\"
    /career \"career\"
  /products \"products (404)\"
";
    assert_eq!(render_tree(&graph), expected);
}

#[tokio::test]
async fn test_cycle_between_two_pages_terminates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(&anchors(&[("/b", "to b")])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(&anchors(&[("/a", "back to a")])))
        .expect(1)
        .mount(&server)
        .await;

    let seed = format!("{}/a", server.uri());
    let graph = crawl(&seed, &Config::default()).await.unwrap();

    let a = graph.root();
    let b = graph.find("/b").unwrap();
    assert_eq!(graph.len(), 2);
    assert_eq!(a.links(), &[b.id()]);
    assert_eq!(b.links(), &[a.id()]);
}

#[tokio::test]
async fn test_shared_page_is_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&anchors(&[("/a", "a"), ("/b", "b")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(&anchors(&[("/shared", "from a")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(&anchors(&[
            ("/shared", "from b"),
            ("/shared#section", "section"),
            ("/shared ", "padded"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(html("<p>shared</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let graph = crawl(&server.uri(), &Config::default()).await.unwrap();

    let shared = graph.find("/shared").unwrap();
    let a = graph.find("/a").unwrap();
    let b = graph.find("/b").unwrap();
    assert_eq!(a.links(), &[shared.id()]);
    // Duplicates within one page are kept as repeated references
    assert_eq!(b.links(), &[shared.id(), shared.id(), shared.id()]);
    assert_eq!(graph.len(), 4);
}

#[tokio::test]
async fn test_query_string_is_part_of_the_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&anchors(&[
            ("/list?page=1", "page 1"),
            ("/list?page=2", "page 2"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(html("<p>list</p>"))
        .expect(2)
        .mount(&server)
        .await;

    let graph = crawl(&server.uri(), &Config::default()).await.unwrap();

    assert!(graph.find("/list?page=1").is_some());
    assert!(graph.find("/list?page=2").is_some());
    assert_eq!(graph.len(), 3);
}

#[tokio::test]
async fn test_links_keep_document_order_when_fetches_finish_out_of_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&anchors(&[
            ("/slow", "slow"),
            ("/medium", "medium"),
            ("/fast", "fast"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<p>slow</p>").set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/medium"))
        .respond_with(html("<p>medium</p>").set_delay(Duration::from_millis(100)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fast"))
        .respond_with(html("<p>fast</p>"))
        .mount(&server)
        .await;

    let graph = crawl(&server.uri(), &Config::default()).await.unwrap();

    let order: Vec<&str> = graph.links(graph.root()).map(|p| p.uri()).collect();
    assert_eq!(order, vec!["/slow", "/medium", "/fast"]);
}

#[tokio::test]
async fn test_unsupported_schemes_and_non_html_are_not_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&anchors(&[
            ("mailto:team@example.com", "mail"),
            ("javascript:void(0)", "js"),
            ("/manual.pdf", "manual"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/manual.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<a href=\"/hidden\">hidden</a>".to_vec(), "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html("<p>hidden</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let graph = crawl(&server.uri(), &Config::default()).await.unwrap();

    let manual = graph.find("/manual.pdf").unwrap();
    assert_eq!(graph.root().links(), &[manual.id()]);
    assert!(manual.links().is_empty());
    assert_eq!(graph.stats().skipped_links, 2);
    assert_eq!(graph.stats().non_html, 1);
}

#[tokio::test]
async fn test_relative_links_on_redirected_page_use_final_location() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&anchors(&[("/legacy/guide", "guide")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/legacy/guide"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/guide"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/guide"))
        .respond_with(html(&anchors(&[("intro", "intro")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/intro"))
        .respond_with(html("<p>intro</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let graph = crawl(&server.uri(), &Config::default()).await.unwrap();

    let guide = graph.find("/legacy/guide").unwrap();
    let intro = graph.find("/docs/intro").unwrap();
    assert_eq!(guide.links(), &[intro.id()]);
}

#[tokio::test]
async fn test_network_failure_aborts_crawl() {
    // Bind then drop a listener so the port is very likely closed
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let seed = format!("http://127.0.0.1:{}/", port);
    let result = crawl(&seed, &Config::default()).await;

    match result {
        Err(CrawlError::Fetch { url, .. }) => assert!(url.contains(&port.to_string())),
        other => panic!("expected fetch error, got {:?}", other.map(|g| g.len())),
    }
}

#[tokio::test]
async fn test_relative_seed_is_rejected() {
    let result = crawl("about/team", &Config::default()).await;
    assert!(matches!(result, Err(CrawlError::Url(_))));
}
