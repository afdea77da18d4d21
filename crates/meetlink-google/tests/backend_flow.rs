//! Full backend path: stored token, refresh, Calendar calls.

use chrono::Utc;
use meetlink_core::MeetingRequest;
use meetlink_google::{
    CalendarErrorCode, GoogleBackend, GoogleConfig, MeetingBackend, TokenInfo, TokenStorage,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn scopes() -> Vec<String> {
    vec![GoogleConfig::DEFAULT_SCOPE.to_string()]
}

fn config(server: &MockServer, dir: &tempfile::TempDir) -> GoogleConfig {
    GoogleConfig::new()
        .with_token_path(dir.path().join("token.json"))
        .with_credentials_file(dir.path().join("credentials.json"))
        .with_api_base_url(server.uri())
        .with_token_url(format!("{}/token", server.uri()))
        .with_time_zone("America/New_York")
        .with_interactive(false)
}

#[tokio::test]
async fn expired_token_is_refreshed_before_create() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("refresh_token=stored-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.fresh",
            "expires_in": 3599,
            "scope": GoogleConfig::DEFAULT_SCOPE,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .and(header("authorization", "Bearer ya29.fresh"))
        .and(query_param("conferenceDataVersion", "1"))
        .and(query_param("sendUpdates", "all"))
        .and(body_string_contains("\"timeZone\":\"America/New_York\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "evt42",
            "summary": "Planning",
            "htmlLink": "https://www.google.com/calendar/event?eid=evt42",
            "start": {"dateTime": "2030-01-01T10:00:00-05:00"},
            "end": {"dateTime": "2030-01-01T10:30:00-05:00"},
            "attendees": [{"email": "alice@example.com"}],
            "conferenceData": {
                "entryPoints": [{"entryPointType": "video", "uri": "https://meet.google.com/plan-ning-xyz"}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config(&server, &dir);
    let storage = TokenStorage::new(&config.token_path);
    storage
        .save(
            &TokenInfo::new("ya29.stale", Some("stored-refresh".to_string()), Some(0), scopes())
                .with_client("client-id", "client-secret"),
        )
        .unwrap();

    let backend = GoogleBackend::new(config).unwrap();
    let request = MeetingRequest::starting_in("Planning", Utc::now(), 60, 30)
        .unwrap()
        .with_attendees(vec!["alice@example.com".to_string()]);
    let meeting = backend.create_meeting(request).await.unwrap();

    assert_eq!(meeting.meet_link, "https://meet.google.com/plan-ning-xyz");
    assert_eq!(meeting.id.as_deref(), Some("evt42"));
    assert_eq!(meeting.attendees, Some(vec!["alice@example.com".to_string()]));

    let saved = storage.load().unwrap().unwrap();
    assert_eq!(saved.access_token, "ya29.fresh");
    assert_eq!(saved.refresh_token.as_deref(), Some("stored-refresh"));
}

#[tokio::test]
async fn every_call_rereads_the_token_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .and(header("authorization", "Bearer first"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/calendars/primary/events"))
        .and(header("authorization", "Bearer second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config(&server, &dir);
    let storage = TokenStorage::new(&config.token_path);
    let backend = GoogleBackend::new(config).unwrap();

    storage
        .save(&TokenInfo::new("first", None, Some(3600), scopes()))
        .unwrap();
    backend.list_upcoming(5).await.unwrap();

    storage
        .save(&TokenInfo::new("second", None, Some(3600), scopes()))
        .unwrap();
    backend.list_upcoming(5).await.unwrap();
}

#[tokio::test]
async fn expired_token_without_refresh_needs_login() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = config(&server, &dir);
    TokenStorage::new(&config.token_path)
        .save(&TokenInfo::new("old", None, Some(0), scopes()))
        .unwrap();

    let backend = GoogleBackend::new(config).unwrap();
    let err = backend.list_upcoming(5).await.unwrap_err();
    assert_eq!(err.code(), CalendarErrorCode::AuthenticationFailed);
    assert!(server.received_requests().await.unwrap().is_empty());
}
