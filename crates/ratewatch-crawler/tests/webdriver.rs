//! Wire-level tests for `WebDriverSession` against a wiremock endpoint.

use std::time::Duration;

use ratewatch_crawler::{
    BrowserOptions, DriverError, ElementHandle, Locator, PageDriver, WebDriverSession,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4a4e7b6b8b8b";

async fn mount_new_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/session"))
        .and(body_partial_json(json!({
            "capabilities": { "alwaysMatch": { "browserName": "chrome" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { "sessionId": "s-1", "capabilities": { "browserName": "chrome" } }
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn start(server: &MockServer) -> WebDriverSession {
    WebDriverSession::start(&server.uri(), &BrowserOptions::default(), Duration::from_secs(5))
        .await
        .expect("session should start")
}

#[tokio::test]
async fn start_reads_session_id() {
    let server = MockServer::start().await;
    mount_new_session(&server).await;

    let session = start(&server).await;

    assert_eq!(session.session_id(), Some("s-1"));
}

#[tokio::test]
async fn refused_session_is_a_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "value": {
                "error": "session not created",
                "message": "Chrome failed to start",
                "stacktrace": ""
            }
        })))
        .mount(&server)
        .await;

    let err = WebDriverSession::start(
        &server.uri(),
        &BrowserOptions::default(),
        Duration::from_secs(5),
    )
    .await
    .err()
    .expect("start should fail");

    assert!(
        matches!(&err, DriverError::Protocol { error, .. } if error == "session not created"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn navigate_posts_url() {
    let server = MockServer::start().await;
    mount_new_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/session/s-1/url"))
        .and(body_json(json!({ "url": "https://ratings.example.org/player/1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = start(&server).await;
    session
        .navigate("https://ratings.example.org/player/1")
        .await
        .expect("navigate should succeed");
}

#[tokio::test]
async fn find_element_maps_no_such_element_to_none() {
    let server = MockServer::start().await;
    mount_new_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/session/s-1/element"))
        .and(body_json(json!({ "using": "tag name", "value": "h1" })))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "value": { "error": "no such element", "message": "Unable to locate element" }
        })))
        .mount(&server)
        .await;

    let mut session = start(&server).await;
    let found = session
        .find_element(&Locator::tag("h1"))
        .await
        .expect("lookup should not error");

    assert_eq!(found, None);
}

#[tokio::test]
async fn find_elements_reads_every_reference() {
    let server = MockServer::start().await;
    mount_new_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/session/s-1/elements"))
        .and(body_json(json!({ "using": "css selector", "value": "a[href^='/event/']" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [ { ELEMENT_KEY: "e-1" }, { ELEMENT_KEY: "e-2" } ]
        })))
        .mount(&server)
        .await;

    let mut session = start(&server).await;
    let found = session
        .find_elements(&Locator::css("a[href^='/event/']"))
        .await
        .expect("lookup should succeed");

    assert_eq!(found, vec![ElementHandle::new("e-1"), ElementHandle::new("e-2")]);
}

#[tokio::test]
async fn element_reads_and_click() {
    let server = MockServer::start().await;
    mount_new_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/session/s-1/element/e-9/text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "Online Open" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/s-1/element/e-9/attribute/disabled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/s-1/element/e-9/click"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/s-1/source"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "value": "<html><h1>x</h1></html>" })),
        )
        .mount(&server)
        .await;

    let mut session = start(&server).await;
    let element = ElementHandle::new("e-9");

    assert_eq!(session.element_text(&element).await.unwrap(), "Online Open");
    assert_eq!(session.attribute(&element, "disabled").await.unwrap(), None);
    session.click(&element).await.expect("click should succeed");
    assert_eq!(session.page_source().await.unwrap(), "<html><h1>x</h1></html>");
}

#[tokio::test]
async fn close_deletes_session_once() {
    let server = MockServer::start().await;
    mount_new_session(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/session/s-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = start(&server).await;
    session.close().await.expect("close should succeed");
    session.close().await.expect("second close is a no-op");

    assert_eq!(session.session_id(), None);
    assert!(matches!(
        session.page_source().await,
        Err(DriverError::NoSession)
    ));
}

#[tokio::test]
async fn non_json_body_is_unexpected_response() {
    let server = MockServer::start().await;
    mount_new_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/session/s-1/source"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let mut session = start(&server).await;
    let err = session.page_source().await.unwrap_err();

    assert!(matches!(err, DriverError::UnexpectedResponse { .. }), "{err:?}");
}
