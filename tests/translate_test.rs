//! Tests for the LibreTranslate-compatible HTTP translator.

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vordr::VordrError;
use vordr::providers::HttpTranslator;
use vordr::providers::traits::Translator;

#[tokio::test]
async fn translates_with_source_hint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_partial_json(serde_json::json!({
            "q": "hola mundo",
            "source": "es",
            "target": "en",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "translatedText": "hello world"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translator = HttpTranslator::new(server.uri());
    let result = translator.translate("hola mundo", "es").await.unwrap();

    assert_eq!(result, "hello world");
}

#[tokio::test]
async fn sends_api_key_in_body_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_partial_json(serde_json::json!({
            "api_key": "secret-key"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "translatedText": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translator = HttpTranslator::new(server.uri()).with_api_key("secret-key");
    let result = translator.translate("texte", "fr").await.unwrap();

    assert_eq!(result, "ok");
}

#[tokio::test]
async fn server_error_surfaces_as_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let translator = HttpTranslator::new(server.uri());
    let err = translator.translate("texte", "fr").await.unwrap_err();

    match err {
        VordrError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_surfaces_as_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let translator = HttpTranslator::new(server.uri());
    let err = translator.translate("texte", "fr").await.unwrap_err();

    assert!(matches!(err, VordrError::Http(_)));
}
