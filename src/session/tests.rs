use super::*;
use crate::error::ValidationError;
use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use std::{net::TcpListener, time::Duration};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

fn identity_body(id: i64, username: &str, kind: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{username}@example.com"),
        "username": username,
        "user_type": kind,
        "created_at": "2024-05-01T10:00:00",
        "profile_pic": null
    })
}

async fn store_for(server: &MockServer) -> Result<SessionStore> {
    Ok(SessionStore::new(ApiClient::new(&server.uri())?))
}

async fn logged_in_store(server: &MockServer) -> Result<SessionStore> {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(identity_body(1, "ana", "consumer")))
        .up_to_n_times(1)
        .mount(server)
        .await;

    let store = store_for(server).await?;
    store
        .authenticate("ana@example.com", &secret("hunter2222"), AccountKind::Consumer)
        .await?;
    Ok(store)
}

#[test]
fn account_kind_parses_case_insensitively() {
    assert_eq!("Consumer".parse::<AccountKind>(), Ok(AccountKind::Consumer));
    assert_eq!(" business ".parse::<AccountKind>(), Ok(AccountKind::Business));
    assert!("admin".parse::<AccountKind>().is_err());
    assert_eq!(AccountKind::Business.to_string(), "business");
}

#[test]
fn new_store_is_logged_out_and_idle() -> Result<()> {
    let store = SessionStore::new(ApiClient::new("http://localhost:8001")?);
    assert!(store.identity().is_none());
    assert!(!store.is_authenticated());
    assert!(!store.is_loading());
    Ok(())
}

#[tokio::test]
async fn authenticate_holds_parsed_identity() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/consumer/login"))
        .and(body_json(json!({
            "email": "ana@example.com",
            "password": "hunter2222",
            "user_type": "consumer"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "email": "ana@example.com",
            "username": "ana",
            "user_type": "consumer",
            "created_at": "2024-05-01T10:00:00",
            "profile_pic": "/static/ana.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await?;
    let identity = store
        .authenticate(" ana@example.com ", &secret("hunter2222"), AccountKind::Consumer)
        .await?;

    let expected = Identity {
        id: 42,
        email: "ana@example.com".to_string(),
        username: "ana".to_string(),
        kind: AccountKind::Consumer,
        created_at: Some("2024-05-01T10:00:00".to_string()),
        profile_pic: Some("/static/ana.png".to_string()),
    };
    assert_eq!(identity, expected);
    assert_eq!(store.identity(), Some(expected));
    assert!(!store.is_loading());
    Ok(())
}

#[tokio::test]
async fn authenticate_replaces_instead_of_merging() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    let store = logged_in_store(&server).await?;

    let mut second = identity_body(2, "bea", "business");
    second["created_at"] = Value::Null;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(second))
        .mount(&server)
        .await;

    store
        .authenticate("bea@example.com", &secret("hunter2222"), AccountKind::Business)
        .await?;

    let identity = store.identity().ok_or_else(|| anyhow!("expected identity"))?;
    assert_eq!(identity.id, 2);
    assert_eq!(identity.kind, AccountKind::Business);
    // The previous identity had a creation timestamp; it must not carry over.
    assert_eq!(identity.created_at, None);
    Ok(())
}

#[tokio::test]
async fn failed_authenticate_keeps_previous_identity() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    let store = logged_in_store(&server).await?;
    let before = store.identity();

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect email or password"})),
        )
        .mount(&server)
        .await;

    let err = store
        .authenticate("ana@example.com", &secret("wrong-password"), AccountKind::Consumer)
        .await
        .err();

    assert_eq!(
        err,
        Some(Error::Authentication("Incorrect email or password".to_string()))
    );
    assert_eq!(store.identity(), before);
    assert!(!store.is_loading());
    Ok(())
}

#[tokio::test]
async fn authenticate_falls_back_without_detail() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address"}]
        })))
        .mount(&server)
        .await;

    let store = store_for(&server).await?;
    let err = store
        .authenticate("not-an-email", &secret("hunter2222"), AccountKind::Consumer)
        .await
        .err();

    assert_eq!(err, Some(Error::Authentication("Login failed.".to_string())));
    assert!(store.identity().is_none());
    Ok(())
}

#[tokio::test]
async fn authenticate_rejects_incomplete_success_body() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    let store = logged_in_store(&server).await?;
    let before = store.identity();

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9, "email": "x@example.com"})))
        .mount(&server)
        .await;

    let err = store
        .authenticate("x@example.com", &secret("hunter2222"), AccountKind::Consumer)
        .await
        .err();

    assert_eq!(err, Some(Error::Authentication("Login failed.".to_string())));
    assert_eq!(store.identity(), before);
    assert!(!store.is_loading());
    Ok(())
}

#[tokio::test]
async fn blank_email_fails_before_request() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_for(&server).await?;
    let err = store
        .authenticate("   ", &secret("hunter2222"), AccountKind::Consumer)
        .await
        .err();
    assert_eq!(err, Some(Error::Validation(ValidationError::EmptyEmail)));

    let err = store.request_password_reset("").await.err();
    assert_eq!(err, Some(Error::Validation(ValidationError::EmptyEmail)));
    assert!(!store.is_loading());
    Ok(())
}

#[tokio::test]
async fn loading_is_set_only_while_in_flight() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(identity_body(5, "cai", "consumer"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let store = store_for(&server).await?;
    assert!(!store.is_loading());

    let handle = {
        let store = store.clone();
        tokio::spawn(async move {
            store
                .authenticate("cai@example.com", &secret("hunter2222"), AccountKind::Consumer)
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(store.is_loading());

    handle.await??;
    assert!(!store.is_loading());
    assert!(store.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn transport_failure_clears_loading() -> Result<()> {
    let port = match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener.local_addr()?.port(),
        Err(_) => return Ok(()),
    };

    let store = SessionStore::new(ApiClient::new(&format!("http://127.0.0.1:{port}"))?);
    let err = store
        .register("dan", "dan@example.com", &secret("hunter2222"), AccountKind::Consumer)
        .await
        .err();

    assert!(matches!(err, Some(Error::Transport(_))));
    assert!(!store.is_loading());
    assert!(store.identity().is_none());
    Ok(())
}

#[tokio::test]
async fn register_holds_new_identity() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/consumer/signup"))
        .and(body_json(json!({
            "username": "eve",
            "email": "eve@example.com",
            "password": "hunter2222",
            "user_type": "consumer"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(identity_body(11, "eve", "consumer")))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await?;
    let identity = store
        .register("eve", "eve@example.com", &secret("hunter2222"), AccountKind::Consumer)
        .await?;

    assert_eq!(identity.id, 11);
    assert_eq!(identity.username, "eve");
    assert_eq!(store.identity(), Some(identity));
    assert!(!store.is_loading());
    Ok(())
}

#[tokio::test]
async fn register_surfaces_detail_and_keeps_state() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    let store = logged_in_store(&server).await?;
    let before = store.identity();

    Mock::given(method("POST"))
        .and(path(SIGNUP_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "Email already registered"})))
        .mount(&server)
        .await;

    let err = store
        .register("ana", "ana@example.com", &secret("hunter2222"), AccountKind::Consumer)
        .await
        .err();

    assert_eq!(
        err,
        Some(Error::Authentication("Email already registered".to_string()))
    );
    assert_eq!(store.identity(), before);
    Ok(())
}

#[tokio::test]
async fn register_falls_back_on_non_json_error() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SIGNUP_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let store = store_for(&server).await?;
    let err = store
        .register("fay", "fay@example.com", &secret("hunter2222"), AccountKind::Business)
        .await
        .err();

    assert_eq!(
        err,
        Some(Error::Authentication(
            "Failed to create account via API.".to_string()
        ))
    );
    Ok(())
}

#[tokio::test]
async fn clear_session_always_logs_out() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    let store = logged_in_store(&server).await?;
    assert!(store.is_authenticated());

    store.clear_session();
    assert!(store.identity().is_none());

    // Already logged out: still fine.
    store.clear_session();
    assert!(store.identity().is_none());
    Ok(())
}

#[tokio::test]
async fn clones_share_state() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    let store = logged_in_store(&server).await?;
    let other = store.clone();

    assert_eq!(other.identity(), store.identity());
    other.clear_session();
    assert!(!store.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn reset_request_hides_client_errors() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }

    for status in [200, 204, 404, 422] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/consumer/forgot-password"))
            .and(body_json(json!({"email": "ghost@example.com"})))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server).await?;
        store
            .request_password_reset("ghost@example.com")
            .await
            .map_err(|err| anyhow!("status {status} should succeed: {err}"))?;
    }
    Ok(())
}

#[tokio::test]
async fn reset_request_fails_on_server_error() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(FORGOT_PASSWORD_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "smtp down"})))
        .mount(&server)
        .await;

    let store = store_for(&server).await?;
    let err = store.request_password_reset("ana@example.com").await.err();

    assert_eq!(
        err,
        Some(Error::Service {
            status: 500,
            message: "Failed to connect to the reset service.".to_string()
        })
    );
    Ok(())
}

#[tokio::test]
async fn reset_request_hides_transport_cause() -> Result<()> {
    let port = match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener.local_addr()?.port(),
        Err(_) => return Ok(()),
    };

    let store = SessionStore::new(ApiClient::new(&format!("http://127.0.0.1:{port}"))?);
    let err = store.request_password_reset("ana@example.com").await.err();

    assert_eq!(
        err,
        Some(Error::Transport(
            "Failed to connect to the reset service.".to_string()
        ))
    );
    Ok(())
}

#[tokio::test]
async fn reset_request_does_not_touch_session() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    let store = logged_in_store(&server).await?;
    let before = store.identity();

    Mock::given(method("POST"))
        .and(path(FORGOT_PASSWORD_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(store.request_password_reset("ana@example.com").await.is_err());
    assert_eq!(store.identity(), before);
    Ok(())
}

#[tokio::test]
async fn complete_reset_succeeds() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/consumer/reset-password"))
        .and(body_json(json!({"token": "reset-token", "new_password": "brand-new-pass"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server).await?;
    store
        .complete_password_reset(&secret("reset-token"), &secret("brand-new-pass"))
        .await?;
    Ok(())
}

#[tokio::test]
async fn complete_reset_surfaces_detail() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RESET_PASSWORD_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Password reset token has expired. Please request a new one."
        })))
        .mount(&server)
        .await;

    let store = store_for(&server).await?;
    let err = store
        .complete_password_reset(&secret("old-token"), &secret("brand-new-pass"))
        .await
        .err();

    assert_eq!(
        err,
        Some(Error::Service {
            status: 400,
            message: "Password reset token has expired. Please request a new one.".to_string()
        })
    );
    Ok(())
}

#[tokio::test]
async fn complete_reset_falls_back_without_body() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RESET_PASSWORD_PATH))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let store = store_for(&server).await?;
    let err = store
        .complete_password_reset(&secret("token"), &secret("brand-new-pass"))
        .await
        .err();

    assert_eq!(
        err,
        Some(Error::Service {
            status: 502,
            message: "Password reset failed.".to_string()
        })
    );
    Ok(())
}

#[tokio::test]
async fn complete_reset_reraises_transport_error() -> Result<()> {
    let port = match TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener.local_addr()?.port(),
        Err(_) => return Ok(()),
    };

    let store = SessionStore::new(ApiClient::new(&format!("http://127.0.0.1:{port}"))?);
    let err = store
        .complete_password_reset(&secret("token"), &secret("brand-new-pass"))
        .await
        .err();

    assert!(
        matches!(err, Some(Error::Transport(message)) if message.starts_with("Unable to reach the server"))
    );
    Ok(())
}
