use anyhow::Result;
use chrono::Utc;
use invitely_core::{Guest, NewGuest, NotificationEvent};
use invitely_server::routes::paths;
use serde_json::{Value, json};
use uuid::Uuid;

#[path = "support/mod.rs"]
mod support;

use support::{build_test_app, wait_for_observers};

#[tokio::test]
async fn observer_receives_creation_then_check_in() -> Result<()> {
    let app = build_test_app()?;
    let mut observer = app
        .server
        .get_websocket(paths::WS)
        .await
        .into_websocket()
        .await;
    wait_for_observers(&app.state, 1).await;

    let created: Value = app
        .server
        .post(paths::INVITEES)
        .json(&json!({"name": "A", "phone": "123"}))
        .await
        .json();
    let id = created["id"].as_str().unwrap_or_default();
    app.server
        .put(&paths::with_param(paths::INVITEE_CHECKIN, "id", id))
        .await
        .assert_status_ok();

    let first: Value = observer.receive_json().await;
    assert_eq!(first, json!({"event": "new_invitee", "data": created}));

    let second: Value = observer.receive_json().await;
    assert_eq!(second, json!({"event": "checkin", "guest": "A"}));
    Ok(())
}

#[tokio::test]
async fn burst_of_events_reaches_a_live_observer_in_full() -> Result<()> {
    let app = build_test_app()?;
    let mut observer = app
        .server
        .get_websocket(paths::WS)
        .await
        .into_websocket()
        .await;
    wait_for_observers(&app.state, 1).await;

    let template =
        NewGuest::new("Burst", "1").into_guest(Uuid::now_v7(), Utc::now())?;
    for n in 0..200 {
        app.state.publish(NotificationEvent::NewInvitee {
            data: Guest {
                family_count: n + 1,
                ..template.clone()
            },
        });
    }
    assert_eq!(app.state.hub.len(), 1);

    for n in 0..200 {
        let event: Value = observer.receive_json().await;
        assert_eq!(event["event"], "new_invitee");
        assert_eq!(event["data"]["family_count"], n + 1);
    }
    assert_eq!(app.state.hub.len(), 1);
    Ok(())
}

#[tokio::test]
async fn every_observer_gets_each_event_once() -> Result<()> {
    let app = build_test_app()?;
    let mut first = app
        .server
        .get_websocket(paths::WS)
        .await
        .into_websocket()
        .await;
    let mut second = app
        .server
        .get_websocket(paths::WS)
        .await
        .into_websocket()
        .await;
    wait_for_observers(&app.state, 2).await;

    for name in ["R1", "R2"] {
        app.server
            .post(paths::INVITEES)
            .json(&json!({"name": name, "phone": "1"}))
            .await
            .assert_status_ok();
    }

    for observer in [&mut first, &mut second] {
        let one: Value = observer.receive_json().await;
        let two: Value = observer.receive_json().await;
        assert_eq!(one["data"]["name"], "R1");
        assert_eq!(two["data"]["name"], "R2");
    }
    Ok(())
}

#[tokio::test]
async fn inbound_messages_are_ignored() -> Result<()> {
    let app = build_test_app()?;
    let mut observer = app
        .server
        .get_websocket(paths::WS)
        .await
        .into_websocket()
        .await;
    wait_for_observers(&app.state, 1).await;

    observer.send_text("hello").await;
    observer.send_text("{\"event\": \"checkin\"}").await;

    app.server
        .post(paths::INVITEES)
        .json(&json!({"name": "A", "phone": "123"}))
        .await
        .assert_status_ok();

    let event: Value = observer.receive_json().await;
    assert_eq!(event["event"], "new_invitee");
    assert_eq!(app.state.hub.len(), 1);
    Ok(())
}

#[tokio::test]
async fn closed_observer_is_removed_and_others_keep_receiving() -> Result<()> {
    let app = build_test_app()?;
    let leaving = app
        .server
        .get_websocket(paths::WS)
        .await
        .into_websocket()
        .await;
    let mut staying = app
        .server
        .get_websocket(paths::WS)
        .await
        .into_websocket()
        .await;
    wait_for_observers(&app.state, 2).await;

    leaving.close().await;
    wait_for_observers(&app.state, 1).await;

    let response = app
        .server
        .post(paths::INVITEES)
        .json(&json!({"name": "A", "phone": "123"}))
        .await;
    response.assert_status_ok();

    let event: Value = staying.receive_json().await;
    assert_eq!(event["event"], "new_invitee");

    let health: Value = app.server.get(paths::HEALTH).await.json();
    assert_eq!(health["observers"], 1);
    Ok(())
}

#[tokio::test]
async fn mutations_succeed_with_no_observers() -> Result<()> {
    let app = build_test_app()?;

    let created: Value = app
        .server
        .post(paths::INVITEES)
        .json(&json!({"name": "A", "phone": "123"}))
        .await
        .json();
    let id = created["id"].as_str().unwrap_or_default();

    app.server
        .put(&paths::with_param(paths::INVITEE_CHECKIN, "id", id))
        .await
        .assert_status_ok();
    assert!(app.state.hub.is_empty());
    Ok(())
}
