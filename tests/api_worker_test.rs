//! Integration tests for the service worker preview endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;
    use webnotify::router::HistoryMode;
    use webnotify::worker::PayloadPolicy;

    use crate::test_utils::{body_to_string, test_app, test_app_with_config, test_config};

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method("POST")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        serde_json::from_str(&body_to_string(response.into_body()).await).unwrap()
    }

    /// Tests a full payload is shown as sent
    #[tokio::test]
    async fn it_previews_a_full_payload() {
        let app = test_app().await;

        let response = app
            .oneshot(post(
                "/api/worker/push",
                r#"{"title":"T","body":"B","url":"/x"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["title"], "T");
        assert_eq!(body["options"]["body"], "B");
        assert_eq!(body["options"]["data"], "/x");
        assert_eq!(body["options"]["icon"], "/pwa-192x192.png");
        assert_eq!(body["options"]["badge"], "/pwa-192x192.png");
    }

    /// Tests a push without data uses the defaults
    #[tokio::test]
    async fn it_previews_an_empty_push() {
        let app = test_app().await;

        let response = app.oneshot(post("/api/worker/push", "")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["title"], "WebNotifyApp");
        assert_eq!(body["options"]["body"], "New notification");
        assert_eq!(body["options"]["data"], "/");
    }

    /// Tests malformed data falls back to defaults by default
    #[tokio::test]
    async fn it_defaults_malformed_payloads() {
        let app = test_app().await;

        let response = app
            .oneshot(post("/api/worker/push", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["title"], "WebNotifyApp");
    }

    /// Tests a wrongly typed field only defaults that field, even when strict
    #[tokio::test]
    async fn it_keeps_valid_fields_next_to_wrongly_typed_ones() {
        let mut config = test_config("./dist", HistoryMode::Hash);
        config.payload_policy = PayloadPolicy::Strict;
        let app = test_app_with_config(config).await;

        let response = app
            .oneshot(post(
                "/api/worker/push",
                r#"{"title":"T","body":{"text":"B"},"url":"/x"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["title"], "T");
        assert_eq!(body["options"]["body"], "New notification");
        assert_eq!(body["options"]["data"], "/x");
    }

    /// Tests malformed data fails under the strict policy
    #[tokio::test]
    async fn it_rejects_malformed_payloads_when_strict() {
        let mut config = test_config("./dist", HistoryMode::Hash);
        config.payload_policy = PayloadPolicy::Strict;
        let app = test_app_with_config(config).await;

        let response = app
            .oneshot(post("/api/worker/push", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    /// Tests the URL from a push is the one opened on click
    #[tokio::test]
    async fn it_opens_the_pushed_url_on_click() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(post("/api/worker/push", r#"{"url":"/#/announcement/3"}"#))
            .await
            .unwrap();
        let notification = body_to_string(response.into_body()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/worker/notificationclick")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(notification))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["closed"], true);
        assert_eq!(body["opened"], "/#/announcement/3");
    }
}
