//! End-to-end flow through the watch page handlers against a mocked backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::to_bytes;
use axum::extract::{Form, Query, State};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vidnotes::handlers::{self, NoteForm, RetryForm, WatchQuery};
use vidnotes::host_page::PageEvent;
use vidnotes::{AppState, Config, HostPage, MemoryStore, SessionState};

async fn backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_or_create_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_id": 9})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "Timestamp: [00:05] - Key Point: Opening\nTimestamp: [01:10] - Key Point: Demo",
            "debug_info": {"timestamp": "2024-01-01T00:00:00", "summary_length": 80, "transcript_length": 1200}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/9/watched_videos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"entry_id": 1})))
        .mount(&server)
        .await;
    server
}

fn state(server: &MockServer) -> Arc<AppState> {
    let config = Config {
        backend_url: server.uri(),
        ..Config::default()
    };
    Arc::new(AppState::with_store(config, Arc::new(MemoryStore::new())).unwrap())
}

fn watch_query(video_id: &str) -> Query<WatchQuery> {
    Query(WatchQuery {
        v: Some(video_id.to_string()),
        t: None,
        url: None,
    })
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_switching_videos_replaces_panel() {
    let server = backend().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/users/9/notes_by_video/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let state = state(&server);

    let first = body_text(handlers::watch(State(state.clone()), watch_query("aaa")).await).await;
    assert!(first.contains(r#"data-video-id="aaa""#));
    assert!(first.contains("Opening"));
    assert!(first.contains("No notes for this video yet."));

    let second = body_text(handlers::watch(State(state.clone()), watch_query("bbb")).await).await;
    assert!(second.contains(r#"data-video-id="bbb""#));
    assert!(!second.contains(r#"data-video-id="aaa""#));

    let session = state.session.lock().await;
    assert_eq!(
        session.page().events(),
        &[PageEvent::Inserted(1), PageEvent::Removed(1), PageEvent::Inserted(2)]
    );
    assert_eq!(session.state(), SessionState::SummaryShown);
}

#[tokio::test]
async fn test_saving_a_note_through_the_form() {
    let server = backend().await;
    Mock::given(method("POST"))
        .and(path("/users/9/notes"))
        .and(body_json(json!({"video_id": "aaa", "content": "check the demo"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/9/notes_by_video/aaa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/9/notes_by_video/aaa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 3,
            "video_id": "aaa",
            "content": "check the demo",
            "created_at": "2024-03-04T05:06:07.123456",
            "updated_at": "2024-03-04T05:06:07.123456"
        }])))
        .mount(&server)
        .await;
    let state = state(&server);

    handlers::watch(State(state.clone()), watch_query("aaa")).await;

    let redirect = handlers::save_note(
        State(state.clone()),
        Form(NoteForm {
            video_id: "aaa".into(),
            content: "  check the demo ".into(),
        }),
    )
    .await
    .into_response();
    assert!(redirect.status().is_redirection());

    let page = body_text(handlers::watch(State(state.clone()), watch_query("aaa")).await).await;
    assert!(page.contains(r#"<div class="yt-individual-note">check the demo</div>"#));
    assert!(page.contains("Note saved."));
}

#[tokio::test]
async fn test_empty_note_is_rejected_without_request() {
    let server = backend().await;
    Mock::given(method("GET"))
        .and(path("/users/9/notes_by_video/aaa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/9/notes"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let state = state(&server);

    handlers::watch(State(state.clone()), watch_query("aaa")).await;
    let redirect = handlers::save_note(
        State(state.clone()),
        Form(NoteForm {
            video_id: "aaa".into(),
            content: "   ".into(),
        }),
    )
    .await
    .into_response();
    assert!(redirect.status().is_redirection());

    let page = body_text(handlers::watch(State(state.clone()), watch_query("aaa")).await).await;
    assert!(page.contains("notice-alert"));
    assert!(page.contains("Note content cannot be empty."));
}

#[tokio::test]
async fn test_leaving_the_watch_page_during_a_slow_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_or_create_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_id": 9})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"summary": "Timestamp: [00:05] - Key Point: Opening"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let state = state(&server);

    let leave = async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        let started = Instant::now();
        let query = Query(WatchQuery {
            v: None,
            t: None,
            url: None,
        });
        handlers::watch(State(state.clone()), query).await;
        started.elapsed()
    };
    let (_, waited) = tokio::join!(handlers::watch(State(state.clone()), watch_query("aaa")), leave);

    assert!(waited < Duration::from_secs(1), "leaving waited {:?}", waited);
    assert!(state.session.lock().await.page().panel().is_none());
}

#[tokio::test]
async fn test_retry_names_the_mounted_video() {
    let server = backend().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/users/9/notes_by_video/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let state = state(&server);
    handlers::watch(State(state.clone()), watch_query("aaa")).await;

    let redirect = handlers::retry_summary(
        State(state.clone()),
        Form(RetryForm {
            video_id: "bbb".into(),
        }),
    )
    .await
    .into_response();
    assert!(redirect.status().is_redirection());

    let session = state.session.lock().await;
    assert_eq!(session.page().panel().map(|p| p.video_id.as_str()), Some("aaa"));
    assert_eq!(session.page().events(), &[PageEvent::Inserted(1)]);
    assert!(session
        .page()
        .notices()
        .iter()
        .any(|n| n.message.starts_with("Summary Error:")));
}
