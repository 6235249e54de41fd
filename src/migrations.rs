use deadpool_postgres::Pool;
use log::{info, warn};
use tokio_postgres::Transaction;

pub struct MigrationManager;

impl MigrationManager {
    pub async fn run_migrations(
        pool: &Pool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Running database migrations...");
        let mut client = pool.get().await?;

        let needs_init = client
            .query_opt(
                "SELECT 1 FROM pg_tables WHERE schemaname = 'public' AND tablename = 'schema_migrations'",
                &[],
            )
            .await?
            .is_none();

        if needs_init {
            let transaction = client.transaction().await?;
            Self::initial_setup(&transaction).await?;
            transaction.commit().await?;
            info!("Initial database setup completed");
        }

        let current_version = Self::get_current_version(&client).await?;
        if current_version > Self::latest_version() {
            warn!(
                "Database schema version {} is newer than this build ({})",
                current_version,
                Self::latest_version()
            );
        } else {
            info!("Database schema is up to date");
        }

        Ok(())
    }

    async fn initial_setup(
        transaction: &Transaction<'_>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let migration_sql = r#"
            CREATE TABLE schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            );

            -- gen_random_uuid() is core from postgres 13, the extension covers older servers
            CREATE EXTENSION IF NOT EXISTS pgcrypto;

            CREATE TABLE users (
                id TEXT PRIMARY KEY,
                username VARCHAR(255) NOT NULL DEFAULT '',
                first_name VARCHAR(255) NOT NULL DEFAULT '',
                last_name VARCHAR(255) NOT NULL DEFAULT '',
                language_code VARCHAR(16),
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
                updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            );

            CREATE TABLE confirmations (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id TEXT NOT NULL,
                username VARCHAR(255) NOT NULL DEFAULT '',
                first_name VARCHAR(255) NOT NULL DEFAULT '',
                last_name VARCHAR(255) NOT NULL DEFAULT '',
                language_code VARCHAR(16),
                payment_method VARCHAR(32) NOT NULL
                    CHECK (payment_method IN ('bank', 'visa', 'telegram_wallet', 'crypto')),
                status VARCHAR(16) NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'confirmed')),
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
                confirmed_at TIMESTAMP WITH TIME ZONE,
                confirmed_by TEXT
            );

            CREATE TABLE album_submissions (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id TEXT NOT NULL,
                username VARCHAR(255) NOT NULL DEFAULT '',
                first_name VARCHAR(255) NOT NULL DEFAULT '',
                last_name VARCHAR(255) NOT NULL DEFAULT '',
                file_type VARCHAR(16) NOT NULL CHECK (file_type IN ('photo', 'image', 'PDF')),
                storage_path TEXT NOT NULL,
                file_name TEXT,
                caption TEXT,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
            );

            CREATE TABLE chat_messages (
                id SERIAL PRIMARY KEY,
                chat_id BIGINT NOT NULL,
                user_id TEXT NOT NULL,
                text TEXT NOT NULL,
                message_id INTEGER NOT NULL,
                date TIMESTAMP WITH TIME ZONE NOT NULL
            );

            -- console pages and album browsing walk newest first
            CREATE INDEX idx_confirmations_created ON confirmations(created_at DESC);
            CREATE INDEX idx_album_submissions_created ON album_submissions(created_at DESC);

            INSERT INTO schema_migrations (version) VALUES (1);
        "#;

        transaction.batch_execute(migration_sql).await?;
        Ok(())
    }

    async fn get_current_version(
        client: &deadpool_postgres::Object,
    ) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        let row = client
            .query_one("SELECT MAX(version) FROM schema_migrations", &[])
            .await?;
        Ok(row.get::<_, Option<i32>>(0).unwrap_or(0))
    }

    pub fn latest_version() -> i32 {
        1 // increment this when adding new migrations
    }
}
