//! Shared test helpers

use async_trait::async_trait;
use sitegraph::crawler::{FetchResponse, Fetcher};
use sitegraph::BoxError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;
use wiremock::ResponseTemplate;

/// Builds an HTML response for a wiremock server
pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
}

/// Builds a page body consisting of the given anchors
pub fn anchors(links: &[(&str, &str)]) -> String {
    let mut body = String::from("<!DOCTYPE html><html><body>\n");
    for (href, text) in links {
        body.push_str(&format!("<a href=\"{}\">{}</a>\n", href, text));
    }
    body.push_str("</body></html>\n");
    body
}

enum Route {
    Html { body: String, delay: Duration },
    Fail { delay: Duration },
}

/// In-memory fetcher serving scripted pages by path
///
/// Unknown paths answer 404. Tracks how many fetches ran and the highest
/// number that were in flight at once.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: HashMap<String, Route>,
    fetches: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fetched: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, path: &str, body: &str) -> Self {
        self.slow_page(path, body, Duration::ZERO)
    }

    pub fn slow_page(mut self, path: &str, body: &str, delay: Duration) -> Self {
        self.routes.insert(
            path.to_string(),
            Route::Html {
                body: body.to_string(),
                delay,
            },
        );
        self
    }

    pub fn failing(mut self, path: &str, delay: Duration) -> Self {
        self.routes.insert(path.to_string(), Route::Fail { delay });
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn fetched_paths(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, BoxError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.fetched.lock().unwrap().push(url.path().to_string());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let outcome: Result<FetchResponse, BoxError> = match self.routes.get(url.path()) {
            Some(Route::Html { body, delay }) => {
                tokio::time::sleep(*delay).await;
                Ok(FetchResponse {
                    status: 200,
                    final_url: url.clone(),
                    content_type: Some("text/html".to_string()),
                    body: body.as_bytes().to_vec(),
                })
            }
            Some(Route::Fail { delay }) => {
                tokio::time::sleep(*delay).await;
                Err(format!("connection reset by peer: {}", url).into())
            }
            None => Ok(FetchResponse {
                status: 404,
                final_url: url.clone(),
                content_type: Some("text/html".to_string()),
                body: Vec::new(),
            }),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}
