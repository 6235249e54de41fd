use chrono::Duration;
use tg_payments::config::PaymentMethod;
use tg_payments::migrations::MigrationManager;
use tg_payments::storage::postgres::is_canonical_uuid;
use tg_payments::storage::{
    ChatMessage, ConfirmationStatus, FileKind, NewConfirmation, NewSubmission, PgRecordStore,
    RecordStore,
};

use super::test_utils::{base_time, profile, PAYER_ID};
use super::TestDatabase;

#[test]
fn test_only_canonical_uuids_reach_lookups() {
    assert!(is_canonical_uuid("123e4567-e89b-12d3-a456-426614174000"));

    for id in [
        "",
        "not-a-uuid",
        "123E4567-E89B-12D3-A456-426614174000",
        "123e4567e89b12d3a456426614174000",
        "{123e4567-e89b-12d3-a456-426614174000}",
        "123e4567-e89b-12d3-a456-42661417400g",
        "123e4567-e89b-12d3-a456_426614174000",
        "123e4567-e89b-12d3-a456-4266141740000",
        "1' OR '1'='1",
    ] {
        assert!(!is_canonical_uuid(id), "{:?} should be rejected", id);
    }
}

macro_rules! test_db_or_skip {
    () => {
        match TestDatabase::try_create().await {
            Some(db) => db,
            None => {
                eprintln!("TEST_DATABASE_URL not set, skipping");
                return;
            }
        }
    };
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let db = test_db_or_skip!();

    MigrationManager::run_migrations(&db.pool)
        .await
        .expect("second run should be a no-op");

    let client = db.pool.get().await.unwrap();
    let versions: i64 = client
        .query_one("SELECT COUNT(*) FROM schema_migrations", &[])
        .await
        .unwrap()
        .get(0);
    assert_eq!(versions, MigrationManager::latest_version() as i64);

    let secondary: Vec<String> = client
        .query(
            "SELECT indexname::text FROM pg_indexes \
             WHERE schemaname = 'public' AND indexname LIKE 'idx_%' ORDER BY indexname",
            &[],
        )
        .await
        .unwrap()
        .iter()
        .map(|row| row.get(0))
        .collect();
    assert_eq!(
        secondary,
        vec!["idx_album_submissions_created", "idx_confirmations_created"]
    );

    drop(client);
    db.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_user_upsert_tracks_latest_language() {
    let db = test_db_or_skip!();
    let store = PgRecordStore::new(db.pool.clone());

    assert_eq!(store.user_language("2001").await.unwrap(), None);

    store
        .upsert_user(&profile(PAYER_ID, "payer", Some("en")))
        .await
        .unwrap();
    store
        .upsert_user(&profile(PAYER_ID, "payer_renamed", Some("ru")))
        .await
        .unwrap();
    assert_eq!(
        store.user_language("2001").await.unwrap().as_deref(),
        Some("ru")
    );

    // a missing client language is stored as english
    store
        .upsert_user(&profile(3001, "quiet", None))
        .await
        .unwrap();
    assert_eq!(
        store.user_language("3001").await.unwrap().as_deref(),
        Some("en")
    );

    let client = db.pool.get().await.unwrap();
    let username: String = client
        .query_one("SELECT username FROM users WHERE id = '2001'", &[])
        .await
        .unwrap()
        .get(0);
    assert_eq!(username, "payer_renamed");

    drop(client);
    db.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_confirmation_compare_and_set() {
    let db = test_db_or_skip!();
    let store = PgRecordStore::new(db.pool.clone());

    let id = store
        .create_confirmation(&NewConfirmation {
            user: profile(PAYER_ID, "payer", Some("ru")),
            payment_method: PaymentMethod::TelegramWallet,
            created_at: base_time(),
        })
        .await
        .unwrap();

    let pending = store.get_confirmation(&id).await.unwrap().unwrap();
    assert_eq!(pending.status, ConfirmationStatus::Pending);
    assert_eq!(pending.payment_method, PaymentMethod::TelegramWallet);
    assert_eq!(pending.user.language_code.as_deref(), Some("ru"));
    assert_eq!(pending.created_at, base_time());

    let confirmed_at = base_time() + Duration::hours(1);
    let confirmed = store
        .confirm_pending(&id, "1001", confirmed_at)
        .await
        .unwrap()
        .expect("first confirm wins");
    assert_eq!(confirmed.status, ConfirmationStatus::Confirmed);
    assert_eq!(confirmed.confirmed_by.as_deref(), Some("1001"));
    assert_eq!(confirmed.confirmed_at, Some(confirmed_at));

    let again = store
        .confirm_pending(&id, "1002", base_time() + Duration::hours(2))
        .await
        .unwrap();
    assert!(again.is_none());
    assert_eq!(store.get_confirmation(&id).await.unwrap(), Some(confirmed));

    assert!(store.get_confirmation("not-a-uuid").await.unwrap().is_none());
    assert!(store
        .confirm_pending("not-a-uuid", "1001", confirmed_at)
        .await
        .unwrap()
        .is_none());

    db.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_confirmations_are_listed_newest_first() {
    let db = test_db_or_skip!();
    let store = PgRecordStore::new(db.pool.clone());

    let mut ids = Vec::new();
    for i in 0..7 {
        let id = store
            .create_confirmation(&NewConfirmation {
                user: profile(5000 + i, &format!("payer{}", i), None),
                payment_method: PaymentMethod::Bank,
                created_at: base_time() + Duration::minutes(i as i64),
            })
            .await
            .unwrap();
        ids.push(id);
    }

    assert_eq!(store.count_confirmations().await.unwrap(), 7);

    let first_page: Vec<String> = store
        .list_confirmations(0, 5)
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .collect();
    let expected: Vec<String> = ids.iter().rev().take(5).cloned().collect();
    assert_eq!(first_page, expected);

    let second_page = store.list_confirmations(5, 5).await.unwrap();
    assert_eq!(second_page.len(), 2);
    assert_eq!(second_page[1].id, ids[0]);

    assert!(store.list_confirmations(10, 5).await.unwrap().is_empty());

    db.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_submissions_by_index_and_id() {
    let db = test_db_or_skip!();
    let store = PgRecordStore::new(db.pool.clone());

    assert_eq!(store.count_submissions().await.unwrap(), 0);
    assert!(store.submission_at(0).await.unwrap().is_none());

    let older = store
        .create_submission(&NewSubmission {
            user: profile(PAYER_ID, "payer", None),
            file_kind: FileKind::Photo,
            storage_path: "album/2001/1.jpg".to_string(),
            file_name: None,
            caption: Some("first".to_string()),
            created_at: base_time(),
        })
        .await
        .unwrap();
    let newer = store
        .create_submission(&NewSubmission {
            user: profile(PAYER_ID, "payer", None),
            file_kind: FileKind::Pdf,
            storage_path: "album/2001/2_menu.pdf".to_string(),
            file_name: Some("menu.pdf".to_string()),
            caption: None,
            created_at: base_time() + Duration::minutes(1),
        })
        .await
        .unwrap();

    assert_eq!(store.count_submissions().await.unwrap(), 2);
    assert!(store.get_submission("not-a-uuid").await.unwrap().is_none());
    assert_eq!(store.submission_at(0).await.unwrap().unwrap().id, newer);
    assert_eq!(store.submission_at(1).await.unwrap().unwrap().id, older);
    assert!(store.submission_at(2).await.unwrap().is_none());

    let pdf = store.get_submission(&newer).await.unwrap().unwrap();
    assert_eq!(pdf.file_kind, FileKind::Pdf);
    assert_eq!(pdf.file_name.as_deref(), Some("menu.pdf"));
    assert_eq!(pdf.caption, None);
    assert_eq!(pdf.user.username, "payer");

    db.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_chat_messages_are_saved() {
    let db = test_db_or_skip!();
    let store = PgRecordStore::new(db.pool.clone());

    store
        .save_chat_message(&ChatMessage {
            chat_id: PAYER_ID as i64,
            user_id: PAYER_ID.to_string(),
            text: "see you at eight".to_string(),
            message_id: 12,
            date: base_time(),
        })
        .await
        .unwrap();

    let client = db.pool.get().await.unwrap();
    let row = client
        .query_one(
            "SELECT chat_id, text, message_id FROM chat_messages WHERE user_id = '2001'",
            &[],
        )
        .await
        .unwrap();
    assert_eq!(row.get::<_, i64>(0), PAYER_ID as i64);
    assert_eq!(row.get::<_, String>(1), "see you at eight");
    assert_eq!(row.get::<_, i32>(2), 12);

    drop(client);
    db.cleanup().await.unwrap();
}
