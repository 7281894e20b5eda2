use chrono::Duration;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, EngineError, MAX_SESSION_TTL_HOURS, Role};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn session_count(db: &DatabaseConnection) -> i64 {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT COUNT(*) AS n FROM sessions",
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

#[tokio::test]
async fn login_opens_session_and_stamps_last_signed_in() {
    let (engine, db) = engine_with_db().await;
    let created = engine
        .create_user("rahim", "secret", "Rahim", Role::Staff)
        .await
        .unwrap();
    assert_eq!(created.last_signed_in, None);

    let session = engine.login("rahim", "secret").await.unwrap();
    assert_eq!(session.user.id, created.id);
    assert!(session.user.last_signed_in.is_some());
    assert_eq!(session_count(&db).await, 1);

    let user = engine.authenticate(&session.token).await.unwrap();
    assert_eq!(user.username, "rahim");
    assert_eq!(user.role, Role::Staff);
}

#[tokio::test]
async fn wrong_password_opens_nothing() {
    let (engine, db) = engine_with_db().await;
    engine
        .create_user("rahim", "secret", "Rahim", Role::Staff)
        .await
        .unwrap();

    let invalid = EngineError::Unauthorized("invalid credentials".to_string());
    assert_eq!(engine.login("rahim", "nope").await.unwrap_err(), invalid);
    assert_eq!(engine.login("nobody", "secret").await.unwrap_err(), invalid);
    assert_eq!(engine.login("", "").await.unwrap_err(), invalid);
    assert_eq!(session_count(&db).await, 0);

    let user = engine.users().await.unwrap().remove(0);
    assert_eq!(user.last_signed_in, None);
}

#[tokio::test]
async fn logout_invalidates_token() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_user("rahim", "secret", "Rahim", Role::Staff)
        .await
        .unwrap();

    let session = engine.login("rahim", "secret").await.unwrap();
    assert!(engine.logout(&session.token).await.unwrap());
    assert!(!engine.logout(&session.token).await.unwrap());
    assert_eq!(
        engine.authenticate(&session.token).await.unwrap_err(),
        EngineError::Unauthorized("session not found".to_string())
    );
}

#[tokio::test]
async fn expired_session_is_rejected_and_removed() {
    let (engine, db) = engine_with_db().await;
    engine
        .create_user("rahim", "secret", "Rahim", Role::Staff)
        .await
        .unwrap();
    let session = engine.login("rahim", "secret").await.unwrap();

    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "UPDATE sessions SET expires_at = ? WHERE token = ?",
        vec![
            (chrono::Utc::now() - Duration::hours(1)).into(),
            session.token.clone().into(),
        ],
    ))
    .await
    .unwrap();

    assert_eq!(
        engine.authenticate(&session.token).await.unwrap_err(),
        EngineError::Unauthorized("session expired".to_string())
    );
    assert_eq!(session_count(&db).await, 0);
}

#[tokio::test]
async fn purge_removes_only_expired_sessions() {
    let (engine, db) = engine_with_db().await;
    engine
        .create_user("rahim", "secret", "Rahim", Role::Staff)
        .await
        .unwrap();
    let stale = engine.login("rahim", "secret").await.unwrap();
    let fresh = engine.login("rahim", "secret").await.unwrap();

    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "UPDATE sessions SET expires_at = ? WHERE token = ?",
        vec![
            (chrono::Utc::now() - Duration::minutes(5)).into(),
            stale.token.clone().into(),
        ],
    ))
    .await
    .unwrap();

    assert_eq!(engine.purge_expired_sessions().await.unwrap(), 1);
    assert!(engine.authenticate(&fresh.token).await.is_ok());
}

#[tokio::test]
async fn change_password_keeps_current_session_only() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_user("rahim", "secret", "Rahim", Role::Staff)
        .await
        .unwrap();
    let current = engine.login("rahim", "secret").await.unwrap();
    let other = engine.login("rahim", "secret").await.unwrap();

    assert_eq!(
        engine
            .change_password(&current.user, "wrong", "better", Some(&current.token))
            .await
            .unwrap_err(),
        EngineError::Unauthorized("current password is incorrect".to_string())
    );

    engine
        .change_password(&current.user, "secret", "better", Some(&current.token))
        .await
        .unwrap();

    assert!(engine.authenticate(&current.token).await.is_ok());
    assert!(engine.authenticate(&other.token).await.is_err());
    assert!(engine.login("rahim", "secret").await.is_err());
    assert!(engine.login("rahim", "better").await.is_ok());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_user("rahim", "secret", "Rahim", Role::Staff)
        .await
        .unwrap();
    assert_eq!(
        engine
            .create_user(" rahim ", "other", "Another", Role::Admin)
            .await
            .unwrap_err(),
        EngineError::ExistingKey("rahim".to_string())
    );
}

#[tokio::test]
async fn roles_gate_user_listing() {
    let (engine, _db) = engine_with_db().await;
    let staff = engine
        .create_user("rahim", "secret", "Rahim", Role::Staff)
        .await
        .unwrap();
    let promoted = engine.set_role("rahim", Role::Admin).await.unwrap();
    assert!(promoted.is_admin());

    assert_eq!(
        engine.list_users(&staff).await.unwrap_err(),
        EngineError::Forbidden("admin access required".to_string())
    );
    assert_eq!(engine.list_users(&promoted).await.unwrap().len(), 1);
    assert_eq!(engine.count_staff(&promoted).await.unwrap(), 0);
    assert_eq!(
        engine.count_staff(&staff).await.unwrap_err(),
        EngineError::Forbidden("admin access required".to_string())
    );
    engine
        .create_user("karim", "secret", "Karim", Role::Staff)
        .await
        .unwrap();
    assert_eq!(engine.count_staff(&promoted).await.unwrap(), 1);
    assert_eq!(engine.user(&staff, staff.id).await.unwrap().username, "rahim");
}

#[tokio::test]
async fn session_ttl_must_be_positive() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let err = Engine::builder()
        .database(db)
        .session_ttl(Duration::zero())
        .build()
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput("session ttl must be positive".to_string())
    );
}

#[tokio::test]
async fn oversized_session_ttl_is_rejected() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let err = Engine::builder()
        .database(db.clone())
        .session_ttl(Duration::hours(10_000_000_000))
        .build()
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput(format!(
            "session ttl must be at most {MAX_SESSION_TTL_HOURS} hours"
        ))
    );

    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .session_ttl(Duration::hours(MAX_SESSION_TTL_HOURS))
        .build()
        .await
        .unwrap();
    engine
        .create_user("rahim", "secret", "Rahim", Role::Staff)
        .await
        .unwrap();
    let session = engine.login("rahim", "secret").await.unwrap();
    assert!(session.expires_at > chrono::Utc::now() + Duration::days(365));
}

#[tokio::test]
async fn login_drops_the_users_expired_sessions() {
    let (engine, db) = engine_with_db().await;
    engine
        .create_user("rahim", "secret", "Rahim", Role::Staff)
        .await
        .unwrap();
    engine
        .create_user("karim", "secret", "Karim", Role::Staff)
        .await
        .unwrap();
    let stale = engine.login("rahim", "secret").await.unwrap();
    let other = engine.login("karim", "secret").await.unwrap();

    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "UPDATE sessions SET expires_at = ?",
        vec![(chrono::Utc::now() - Duration::hours(1)).into()],
    ))
    .await
    .unwrap();

    engine.login("rahim", "secret").await.unwrap();
    assert_eq!(session_count(&db).await, 2);
    assert_eq!(
        engine.authenticate(&stale.token).await.unwrap_err(),
        EngineError::Unauthorized("session not found".to_string())
    );
    assert_eq!(
        engine.authenticate(&other.token).await.unwrap_err(),
        EngineError::Unauthorized("session expired".to_string())
    );
}
