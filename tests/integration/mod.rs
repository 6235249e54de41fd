use deadpool_postgres::Pool;
use std::env;
use tg_payments::migrations::MigrationManager;
use tg_payments::storage::postgres::create_pool;

pub mod mock_bot;
pub mod pg_store_tests;
pub mod test_utils;

type TestResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// throwaway postgres database, created per test on the server from TEST_DATABASE_URL
pub struct TestDatabase {
    pub pool: Pool,
    pub db_name: String,
    admin_url: String,
}

impl TestDatabase {
    /// None when TEST_DATABASE_URL is not set, so postgres tests can skip themselves
    pub async fn try_create() -> Option<Self> {
        let admin_url = env::var("TEST_DATABASE_URL").ok()?;
        let db = Self::new(admin_url)
            .await
            .expect("Failed to create test database");
        MigrationManager::run_migrations(&db.pool)
            .await
            .expect("Failed to run migrations");
        Some(db)
    }

    async fn new(admin_url: String) -> TestResult<Self> {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

        let db_name = format!("test_payments_{}", fastrand::u64(..));

        let admin_pool = create_pool(&admin_url)?;
        let admin_client = admin_pool.get().await?;
        admin_client
            .execute(&format!("CREATE DATABASE \"{}\"", db_name), &[])
            .await?;
        drop(admin_client);
        admin_pool.close();

        // same server and credentials, only the database name differs
        let mut test_url = url::Url::parse(&admin_url)?;
        test_url.set_path(&format!("/{}", db_name));
        let pool = create_pool(test_url.as_str())?;
        let _client = pool.get().await?;

        Ok(Self {
            pool,
            db_name,
            admin_url,
        })
    }

    /// drops the test database; call at the end of every test
    pub async fn cleanup(&self) -> TestResult<()> {
        self.pool.close();

        let admin_pool = create_pool(&self.admin_url)?;
        let admin_client = admin_pool.get().await?;
        admin_client
            .execute(
                "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
                 WHERE datname = $1 AND pid <> pg_backend_pid()",
                &[&self.db_name],
            )
            .await?;
        admin_client
            .execute(&format!("DROP DATABASE IF EXISTS \"{}\"", self.db_name), &[])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_setup() {
        let Some(db) = TestDatabase::try_create().await else {
            eprintln!("TEST_DATABASE_URL not set, skipping");
            return;
        };

        let client = db.pool.get().await.expect("Failed to get database client");
        let tables = client
            .query(
                "SELECT table_name FROM information_schema.tables WHERE table_schema = 'public'",
                &[],
            )
            .await
            .expect("Failed to check schema");
        let table_names: Vec<String> = tables.iter().map(|row| row.get(0)).collect();
        for table in ["users", "confirmations", "album_submissions", "chat_messages"] {
            assert!(
                table_names.contains(&table.to_string()),
                "missing table {}",
                table
            );
        }

        let version: i32 = client
            .query_one("SELECT MAX(version) FROM schema_migrations", &[])
            .await
            .expect("Failed to read schema version")
            .get(0);
        assert_eq!(version, MigrationManager::latest_version());

        drop(client);
        db.cleanup().await.expect("Failed to cleanup test database");
    }
}
