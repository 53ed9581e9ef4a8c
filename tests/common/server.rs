//! Mock page server

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixtures::page_body;

/// Start a server answering `pages` page requests for `id`.
///
/// Pages listed in `failing` answer HTTP 500. Every page expects exactly one
/// request, checked when the server is dropped.
pub async fn page_server(id: &str, pages: u32, failing: &[u32]) -> MockServer {
    let server = MockServer::start().await;
    for page in 0..pages {
        let response = if failing.contains(&page) {
            ResponseTemplate::new(500)
        } else {
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(page_body(page))
        };
        Mock::given(method("GET"))
            .and(path(format!("/resources/{id}/pages/page{page}")))
            .respond_with(response)
            .expect(1)
            .mount(&server)
            .await;
    }
    server
}

/// Start a server that must never be contacted
pub async fn silent_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    server
}
