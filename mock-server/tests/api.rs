use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, router, Hit, Hits, TRACKING_PIXEL};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn pixel_request(query: &str, cookie: Option<&str>) -> Request<String> {
    let mut builder = Request::builder()
        .uri(format!("/mtracking.gif?{query}"))
        .header(http::header::ACCEPT_LANGUAGE, "de");
    if let Some(cookie) = cookie {
        builder = builder.header(http::header::COOKIE, cookie);
    }
    builder.body(String::new()).unwrap()
}

fn set_cookies(response: &axum::response::Response) -> Vec<String> {
    response
        .headers()
        .get_all(http::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn cookie_value(set_cookies: &[String], name: &str) -> Option<String> {
    set_cookies.iter().find_map(|c| {
        let pair = c.split(';').next()?;
        let (n, v) = pair.split_once('=')?;
        (n == name).then(|| v.to_string())
    })
}

// --- pixel ---

#[tokio::test]
async fn pixel_returns_gif() {
    let resp = app()
        .oneshot(pixel_request("page_url=home", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "image/gif");
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], TRACKING_PIXEL);
}

#[tokio::test]
async fn unknown_visitor_gets_identity_cookies() {
    let resp = app()
        .oneshot(pixel_request("page_url=app_started", None))
        .await
        .unwrap();

    let cookies = set_cookies(&resp);
    assert_eq!(cookies.len(), 3);
    assert!(cookie_value(&cookies, "mtc_id").is_some());
    assert!(cookie_value(&cookies, "mtc_sid").is_some());
    assert!(cookie_value(&cookies, "mautic_device_id").is_some());
    assert!(cookie_value(&cookies, "mtc_device_id").is_none());
}

#[tokio::test]
async fn known_contact_is_reissued() {
    let resp = app()
        .oneshot(pixel_request(
            "page_url=home",
            Some("mtc_id=42; mtc_sid=s-1; mtc_device_id=d-1"),
        ))
        .await
        .unwrap();

    let cookies = set_cookies(&resp);
    assert_eq!(cookie_value(&cookies, "mtc_id").as_deref(), Some("42"));
    assert_eq!(cookie_value(&cookies, "mtc_sid").as_deref(), Some("s-1"));
    assert_eq!(cookie_value(&cookies, "mautic_device_id").as_deref(), Some("d-1"));
}

// --- hits ---

#[tokio::test]
async fn hits_are_recorded() {
    let hits = Hits::default();
    let resp = router(hits.clone())
        .oneshot(pixel_request(
            "page_url=screen_home_event_click&page_title=App+Event%3A+Click",
            Some("mtc_id=7"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let recorded = hits.read().await;
    assert_eq!(recorded.len(), 1);
    let hit = &recorded[0];
    assert_eq!(hit.query["page_url"], "screen_home_event_click");
    assert_eq!(hit.query["page_title"], "App Event: Click");
    assert_eq!(hit.cookies["mtc_id"], "7");
    assert_eq!(hit.accept_language.as_deref(), Some("de"));
}

#[tokio::test]
async fn hits_list_and_clear() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(pixel_request("page_url=dashboard", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(Request::builder().uri("/hits").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let hits: Vec<Hit> = body_json(resp).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].query["page_url"], "dashboard");
    assert!(hits[0].cookies.is_empty());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/hits")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(Request::builder().uri("/hits").body(String::new()).unwrap())
        .await
        .unwrap();
    let hits: Vec<Hit> = body_json(resp).await;
    assert!(hits.is_empty());
}
