//! Backend registration endpoints, driven through the SDK.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use spray_proxy::config::ProxyConfig;
use spray_proxy::http::HttpServer;
use spray_sdk::{SdkError, SprayClient};

mod common;

fn admin_config() -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.admin.dynamic_backends = true;
    config
}

#[tokio::test]
async fn test_register_list_unregister() {
    let proxy = common::start_proxy(admin_config()).await;
    let sdk = SprayClient::with_client(common::client(), &proxy.url());

    assert!(sdk.list().await.unwrap().is_empty());
    assert_eq!(sdk.register("http://a").await.unwrap(), vec!["http://a"]);

    let err = sdk.register("http://a").await.unwrap_err();
    assert!(matches!(
        err,
        SdkError::Status { status, ref body } if status == StatusCode::BAD_REQUEST && body == "already there"
    ));
    assert_eq!(sdk.list().await.unwrap(), vec!["http://a"]);

    assert_eq!(
        sdk.register("http://b").await.unwrap(),
        vec!["http://a", "http://b"]
    );
    assert_eq!(sdk.unregister("http://a").await.unwrap(), vec!["http://b"]);
    assert_eq!(sdk.unregister("http://zzz").await.unwrap(), vec!["http://b"]);
    assert_eq!(&*proxy.registry.list(), ["http://b"]);
}

#[tokio::test]
async fn test_missing_server_parameter() {
    let server = HttpServer::new(admin_config()).unwrap();

    for method in ["POST", "DELETE"] {
        let res = server
            .router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/backends")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{method}");
        let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"server parameter is missing");
    }

    let res = server
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/backends?server=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_key_required_when_configured() {
    let mut config = admin_config();
    config.admin.api_key = Some("s3cret".into());
    let proxy = common::start_proxy(config).await;

    let anonymous = SprayClient::with_client(common::client(), &proxy.url());
    let err = anonymous.list().await.unwrap_err();
    assert!(matches!(err, SdkError::Status { status, .. } if status == StatusCode::UNAUTHORIZED));

    let wrong = anonymous.clone().with_api_key("nope");
    assert!(wrong.register("http://a").await.is_err());

    let admin = anonymous.with_api_key("s3cret");
    assert_eq!(admin.register("http://a").await.unwrap(), vec!["http://a"]);

    // The relay itself is never guarded.
    let res = common::client()
        .post(format!("{}/hook", proxy.url()))
        .body("x")
        .send()
        .await
        .unwrap();
    assert_ne!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_absent_when_disabled() {
    let backend = common::start_ok_backend().await;
    let mut config = ProxyConfig::default();
    config.backends = vec![backend.url()];
    let proxy = common::start_proxy(config).await;

    // Without dynamic backends, /backends is just another path to relay.
    let res = common::client()
        .post(format!("{}/backends?server=http://evil", proxy.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "proxied");
    assert_eq!(backend.requests().len(), 1);
    assert_eq!(&*proxy.registry.list(), [backend.url()]);
}

#[tokio::test]
async fn test_other_methods_on_backends_are_relayed() {
    let backend = common::start_ok_backend().await;
    let mut config = admin_config();
    config.backends = vec![backend.url()];
    config.admin.api_key = Some("s3cret".into());
    let proxy = common::start_proxy(config).await;

    let res = common::client()
        .put(format!("{}/backends?server=x", proxy.url()))
        .body("payload")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "proxied");
    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].uri.to_string(), "/backends?server=x");
    assert_eq!(&*proxy.registry.list(), [backend.url()]);
}

#[tokio::test]
async fn test_health() {
    let proxy = common::start_proxy(ProxyConfig::default()).await;
    let sdk = SprayClient::with_client(common::client(), &proxy.url());
    assert!(sdk.health().await.unwrap());
}
