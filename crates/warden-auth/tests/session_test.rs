//! Integration tests for the session lifecycle under concurrency.

mod helpers;

use std::sync::Arc;

use std::time::Duration;

use uuid::Uuid;

use warden_cache::keys;
use warden_core::ErrorKind;
use warden_database::SessionRepository;
use warden_entity::permission::PermissionSet;
use warden_entity::session::SessionStatus;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_succeeds_exactly_once() {
    let core = Arc::new(helpers::TestCore::new(3));
    let record = core
        .sessions
        .create_session(Uuid::new_v4(), "10.0.0.1", None, None)
        .await
        .unwrap();

    let first = {
        let core = core.clone();
        let token = record.refresh_token.clone();
        tokio::spawn(async move { core.sessions.refresh(&token, None).await })
    };
    let second = {
        let core = core.clone();
        let token = record.refresh_token.clone();
        tokio::spawn(async move { core.sessions.refresh(&token, None).await })
    };
    let outcomes = [first.await.unwrap(), second.await.unwrap()];

    let winners: Vec<_> = outcomes.iter().filter_map(|o| o.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    let loser = outcomes.iter().find_map(|o| o.as_ref().err()).unwrap();
    assert_eq!(loser.kind, ErrorKind::SessionNotFound);

    let rotated = winners[0];
    assert_eq!(rotated.id, record.id);
    assert!(core.sessions.validate(&rotated.session_token).await.is_ok());
    assert!(core.sessions.validate(&record.session_token).await.is_err());
    assert!(core.sessions.refresh(&record.refresh_token, None).await.is_err());
}

#[tokio::test]
async fn test_cap_evicts_oldest_first() {
    let core = helpers::TestCore::new(3);
    let user = Uuid::new_v4();

    let mut created = Vec::new();
    for _ in 0..4 {
        created.push(
            core.sessions
                .create_session(user, "10.0.0.1", None, None)
                .await
                .unwrap(),
        );
    }

    let live: Vec<Uuid> = core
        .sessions
        .list_sessions(user)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    let expected: Vec<Uuid> = created[1..].iter().map(|r| r.id).collect();
    assert_eq!(live, expected);

    let err = core
        .sessions
        .authenticate(&created[0].session_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SessionNotFound);
    assert_eq!(err.public_message(), "Please re-authenticate");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_logins_respect_cap() {
    let core = Arc::new(helpers::TestCore::new(2));
    let user = Uuid::new_v4();

    let logins: Vec<_> = (0..10)
        .map(|i| {
            let core = core.clone();
            tokio::spawn(async move {
                core.sessions
                    .create_session(user, &format!("10.0.0.{i}"), None, None)
                    .await
            })
        })
        .collect();
    for login in logins {
        login.await.unwrap().unwrap();
    }

    assert_eq!(core.sessions.list_sessions(user).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_logout_drops_principal() {
    let core = helpers::TestCore::new(3);
    let user = Uuid::new_v4();
    core.authz
        .grant(user, PermissionSet::new(["admin"], ["user:list"]))
        .await;
    let record = core
        .sessions
        .create_session(user, "10.0.0.1", Some("curl/8"), None)
        .await
        .unwrap();

    let principal = core.sessions.authenticate(&record.session_token).await.unwrap();
    assert!(principal.roles().contains("admin"));

    assert!(core.sessions.invalidate(&record.session_token).await.unwrap());
    let err = core
        .sessions
        .authenticate(&record.session_token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SessionNotFound);

    let stored = core
        .session_repo
        .find_by_id(record.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SessionStatus::Invalid);
    assert_eq!(stored.invalidated_reason.as_deref(), Some("logout"));
}

#[tokio::test]
async fn test_create_under_busy_user_lock_is_retryable_and_stores_nothing() {
    let core = helpers::TestCore::without_lock_wait(3);
    let user = Uuid::new_v4();
    let held = core
        .locks
        .try_acquire(&keys::session_lock_name(user), Duration::from_secs(30))
        .await
        .unwrap();

    let err = core
        .sessions
        .create_session(user, "10.0.0.1", None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::LockTimeout);
    assert!(err.is_retryable());
    assert!(core.sessions.list_sessions(user).await.unwrap().is_empty());
    assert!(core.session_repo.find_active_by_user(user).await.unwrap().is_empty());

    assert!(core.locks.release(&held).await.unwrap());
    core.sessions
        .create_session(user, "10.0.0.1", None, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_refresh_under_busy_user_lock_keeps_old_tokens() {
    let core = helpers::TestCore::without_lock_wait(3);
    let user = Uuid::new_v4();
    let record = core
        .sessions
        .create_session(user, "10.0.0.1", None, None)
        .await
        .unwrap();
    let held = core
        .locks
        .try_acquire(&keys::session_lock_name(user), Duration::from_secs(30))
        .await
        .unwrap();

    let err = core
        .sessions
        .refresh(&record.refresh_token, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::LockTimeout);
    assert!(err.is_retryable());

    let stored = core.session_repo.find_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SessionStatus::Active);
    assert_eq!(stored.session_token, record.session_token);
    assert_eq!(stored.refresh_token, record.refresh_token);
    assert_eq!(stored.expires_at, record.expires_at);

    assert!(core.locks.release(&held).await.unwrap());
    let rotated = core.sessions.refresh(&record.refresh_token, None).await.unwrap();
    assert_ne!(rotated.refresh_token, record.refresh_token);
}
