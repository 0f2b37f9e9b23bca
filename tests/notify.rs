// ABOUTME: Integration tests for response delivery over HTTP.
// ABOUTME: A local hyper server stands in for the pre-signed callback URL.

mod support;

use bytes::Bytes;
use ecr_release::custom_resource::{
    DeploymentEvent, HttpNotifier, IncomingEvent, NotifyError, RequestType, ResponseNotifier,
    process, process_incoming,
};
use ecr_release::registry::Registry;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::CONTENT_TYPE;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use support::fake_registry::FakeRegistry;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Debug)]
struct Received {
    method: String,
    content_type: Option<String>,
    body: Value,
}

/// Accept one request, answer with `status`, and hand back what arrived.
async fn serve_once(status: StatusCode) -> (String, oneshot::Receiver<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let tx = Arc::new(Mutex::new(Some(tx)));
        let service = service_fn(move |req: Request<Incoming>| {
            let tx = tx.clone();
            async move {
                let method = req.method().to_string();
                let content_type = req
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let bytes = req.into_body().collect().await?.to_bytes();
                let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

                let sender = tx.lock().unwrap().take();
                if let Some(sender) = sender {
                    let _ = sender.send(Received {
                        method,
                        content_type,
                        body,
                    });
                }

                let response = Response::builder()
                    .status(status)
                    .body(Full::new(Bytes::new()))
                    .unwrap();
                Ok::<_, hyper::Error>(response)
            }
        });
        let _ = http1::Builder::new()
            .serve_connection(TokioIo::new(stream), service)
            .await;
    });

    (format!("http://{addr}/callback?signature=abc"), rx)
}

fn event(response_url: &str) -> DeploymentEvent {
    DeploymentEvent {
        request_type: RequestType::Create,
        response_url: response_url.to_string(),
        stack_id: "stack-1".to_string(),
        request_id: "req-1".to_string(),
        logical_resource_id: "StageTag".to_string(),
        physical_resource_id: None,
        resource_properties: json!({
            "repositoryName": "team/api",
            "imageTag": "1.2.3",
            "stageTag": "uat"
        }),
    }
}

#[tokio::test]
async fn delivers_response_as_json_put() {
    support::init_tracing();
    let (url, received) = serve_once(StatusCode::OK).await;
    let registry: Arc<dyn Registry> =
        Arc::new(FakeRegistry::new().with_image("sha256:feed", &["1.2.3"]));

    let response = process(&event(&url), &registry, &HttpNotifier::new())
        .await
        .unwrap();
    assert!(response.is_success());

    let received = received.await.unwrap();
    assert_eq!(received.method, "PUT");
    assert_eq!(received.content_type.as_deref(), Some("application/json"));
    assert_eq!(received.body["Status"], "SUCCESS");
    assert_eq!(received.body["RequestId"], "req-1");
    assert_eq!(received.body["StackId"], "stack-1");
    assert_eq!(received.body["LogicalResourceId"], "StageTag");
    assert_eq!(received.body["Data"]["ImageDigest"], "sha256:feed");
    assert_eq!(received.body["Data"]["StageTag"], "uat");
    assert_eq!(received.body["Data"]["RepositoryName"], "team/api");
    assert!(received.body.get("Reason").is_none());
}

#[tokio::test]
async fn delivers_failed_response_with_reason() {
    let (url, received) = serve_once(StatusCode::OK).await;
    let registry: Arc<dyn Registry> = Arc::new(FakeRegistry::new());

    let response = process(&event(&url), &registry, &HttpNotifier::new())
        .await
        .unwrap();
    assert!(!response.is_success());

    let received = received.await.unwrap();
    assert_eq!(received.body["Status"], "FAILED");
    let reason = received.body["Reason"].as_str().unwrap();
    assert!(reason.contains("1.2.3") && reason.contains("team/api"), "{reason}");
}

#[tokio::test]
async fn error_status_is_a_delivery_failure() {
    let (url, _received) = serve_once(StatusCode::FORBIDDEN).await;
    let response = ecr_release::custom_resource::respond(
        &event(&url),
        &(Arc::new(FakeRegistry::new()) as Arc<dyn Registry>),
    )
    .await;

    let err = HttpNotifier::new().notify(&url, &response).await.unwrap_err();

    assert!(matches!(err, NotifyError::Delivery { .. }));
    assert!(err.to_string().contains(&url));
}

#[tokio::test]
async fn unreachable_callback_fails_process() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/callback", listener.local_addr().unwrap());
    drop(listener);

    let registry: Arc<dyn Registry> = Arc::new(FakeRegistry::new());
    let result = process(&event(&url), &registry, &HttpNotifier::new()).await;

    assert!(matches!(result, Err(NotifyError::Delivery { .. })));
}

#[tokio::test]
async fn malformed_event_still_gets_failed_response() {
    let (url, received) = serve_once(StatusCode::OK).await;
    let raw = json!({
        "RequestType": "Upsert",
        "ResponseURL": url,
        "StackId": "stack-1",
        "RequestId": "req-9",
        "LogicalResourceId": "StageTag",
        "ResourceProperties": {}
    })
    .to_string();
    let registry = Arc::new(FakeRegistry::new());
    let connector: Arc<dyn Registry> = registry.clone();

    let incoming = IncomingEvent::from_json(&raw).unwrap();
    let response = process_incoming(&incoming, &connector, &HttpNotifier::new())
        .await
        .unwrap();
    assert!(!response.is_success());

    let received = received.await.unwrap();
    assert_eq!(received.method, "PUT");
    assert_eq!(received.body["Status"], "FAILED");
    assert_eq!(received.body["RequestId"], "req-9");
    assert_eq!(received.body["StackId"], "stack-1");
    let reason = received.body["Reason"].as_str().unwrap();
    assert!(reason.contains("Upsert"), "{reason}");
    assert!(registry.calls().is_empty());
}
