//! Integration tests for the route table API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;
    use webnotify::router::HistoryMode;

    use crate::test_utils::{body_to_string, test_app, test_app_with_config, test_config};

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    /// Tests resolving the home route from a hash location
    #[tokio::test]
    async fn it_resolves_home() {
        let app = test_app().await;

        let response = app
            .oneshot(get("/api/router/resolve?location=%2F"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        assert_eq!(body["view"], "Home");
        assert_eq!(body["name"], "Home");
    }

    /// Tests resolving an announcement binds the id param
    #[tokio::test]
    async fn it_resolves_announcement_from_hash_location() {
        let app = test_app().await;

        let response = app
            .oneshot(get("/api/router/resolve?location=%2F%23%2Fannouncement%2F42"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        assert_eq!(body["view"], "Announcement");
        assert_eq!(body["params"]["id"], "42");
    }

    /// Tests web history resolves the same view from a plain path
    #[tokio::test]
    async fn it_resolves_announcement_from_web_location() {
        let app = test_app_with_config(test_config("./dist", HistoryMode::Web)).await;

        let response = app
            .oneshot(get("/api/router/resolve?location=%2Fannouncement%2F42"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        assert_eq!(body["view"], "Announcement");
        assert_eq!(body["params"]["id"], "42");
    }

    /// Tests unknown locations return 404
    #[tokio::test]
    async fn it_returns_404_for_unknown_locations() {
        let app = test_app().await;

        let response = app
            .oneshot(get("/api/router/resolve?location=%2F%23%2Fnope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Tests building an href for a named route
    #[tokio::test]
    async fn it_builds_hrefs() {
        let app = test_app().await;

        let response = app
            .oneshot(get("/api/router/href/Announcement?id=7"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
        assert_eq!(body["href"], "/#/announcement/7");
    }

    /// Tests missing params and unknown names return 400
    #[tokio::test]
    async fn it_returns_400_for_bad_href_requests() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(get("/api/router/href/Announcement"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.oneshot(get("/api/router/href/Nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
