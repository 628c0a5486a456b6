//! Integration tests for the crawler
//!
//! `http_crawl` drives full crawls against wiremock servers; `properties`
//! uses a scripted in-memory fetcher to check timing-sensitive behavior.

mod http_crawl;
mod support;
