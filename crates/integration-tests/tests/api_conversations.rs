use axum::http::StatusCode;
use integration_tests::http::send;
use integration_tests::Harness;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn post_and_page_messages() {
    let h = Harness::new();
    let app = h.router();
    let conv = h.open_conversation().await;
    let uri = format!("/api/v1/threads/{}/messages", conv.thread_id);

    for i in 1..=5 {
        let (status, message) = send(
            &app,
            "POST",
            &uri,
            Some(json!({ "user_id": conv.claimer, "text": format!("M{i}") })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(message["text"], format!("M{i}"));
    }

    let (status, page) =
        send(&app, "GET", &format!("{uri}?user_id={}&limit=2", conv.finder), None).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = page["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, ["M4", "M5"]);
    let cursor = page["next_cursor"].as_str().unwrap().to_string();

    let (status, page) = send(
        &app,
        "GET",
        &format!("{uri}?user_id={}&limit=2&cursor={cursor}", conv.finder),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = page["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, ["M2", "M3"]);
    assert!(page["next_cursor"].is_string());
}

#[tokio::test]
async fn outsider_gets_forbidden() {
    let h = Harness::new();
    let app = h.router();
    let conv = h.open_conversation().await;
    let uri = format!("/api/v1/threads/{}/messages", conv.thread_id);
    let outsider = Uuid::now_v7();

    let (status, body) = send(
        &app,
        "POST",
        &uri,
        Some(json!({ "user_id": outsider, "text": "let me in" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["reason"], "not_participant");

    let (status, _) = send(&app, "GET", &format!("{uri}?user_id={outsider}"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_thread_is_not_found() {
    let h = Harness::new();
    let app = h.router();
    let uri = format!("/api/v1/threads/{}/messages", Uuid::now_v7());

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(json!({ "user_id": Uuid::now_v7(), "text": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", &format!("{uri}?user_id={}", Uuid::now_v7()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_text_is_bad_request() {
    let h = Harness::new();
    let app = h.router();
    let conv = h.open_conversation().await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/threads/{}/messages", conv.thread_id),
        Some(json!({ "user_id": conv.finder, "text": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn hidden_conversation_is_forbidden_and_leaves_inbox() {
    let h = Harness::new();
    let app = h.router();
    let conv = h.open_conversation().await;

    let (status, body) =
        send(&app, "GET", &format!("/api/v1/users/{}/conversations", conv.finder), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversations"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["conversations"][0]["id"], json!(conv.thread_id));
    assert!(body["conversations"][0]["last_message"].is_null());

    h.claims.mark_handed_off(conv.claim.id, conv.finder).await.unwrap();
    h.claims.confirm_receipt(conv.claim.id, conv.claimer).await.unwrap();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/threads/{}/messages?user_id={}", conv.thread_id, conv.finder),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["reason"], "hidden");

    let (_, body) =
        send(&app, "GET", &format!("/api/v1/users/{}/conversations", conv.finder), None).await;
    assert_eq!(body["conversations"].as_array().map(Vec::len), Some(0));
}
