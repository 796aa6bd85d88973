//! SQLite profile repository implementation.

use sqlx::Row;
use uuid::Uuid;

use engitutor_core::profile::repository::ProfileRepository;
use engitutor_types::error::RepositoryError;
use engitutor_types::profile::Profile;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ProfileRepository`.
pub struct SqliteProfileRepository {
    pool: DatabasePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl ProfileRepository for SqliteProfileRepository {
    async fn get_profile(&self, owner_id: &Uuid) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM profiles WHERE id = ?")
            .bind(owner_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let id: String = row
                    .try_get("id")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                let id = Uuid::parse_str(&id)
                    .map_err(|e| RepositoryError::Query(format!("invalid profile id: {e}")))?;
                let full_name: Option<String> = row
                    .try_get("full_name")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                let email: String = row
                    .try_get("email")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;

                Ok(Some(Profile { id, full_name, email }))
            }
            None => Ok(None),
        }
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO profiles (id, full_name, email) VALUES (?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET full_name = excluded.full_name, email = excluded.email"#,
        )
        .bind(profile.id.to_string())
        .bind(&profile.full_name)
        .bind(&profile.email)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn update_full_name(
        &self,
        owner_id: &Uuid,
        full_name: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE profiles SET full_name = ? WHERE id = ?")
            .bind(full_name)
            .bind(owner_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_repo() -> (tempfile::TempDir, SqliteProfileRepository) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, SqliteProfileRepository::new(pool))
    }

    #[tokio::test]
    async fn upsert_and_get_roundtrip() {
        let (_dir, repo) = test_repo().await;
        let profile = Profile {
            id: Uuid::now_v7(),
            full_name: Some("Ada Lovelace".to_string()),
            email: "ada@example.edu".to_string(),
        };
        repo.upsert_profile(&profile).await.unwrap();

        let fetched = repo.get_profile(&profile.id).await.unwrap().unwrap();
        assert_eq!(fetched.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(fetched.email, "ada@example.edu");
    }

    #[tokio::test]
    async fn update_full_name_leaves_email_untouched() {
        let (_dir, repo) = test_repo().await;
        let profile = Profile {
            id: Uuid::now_v7(),
            full_name: None,
            email: "student@example.edu".to_string(),
        };
        repo.upsert_profile(&profile).await.unwrap();

        repo.update_full_name(&profile.id, Some("New Name")).await.unwrap();

        let fetched = repo.get_profile(&profile.id).await.unwrap().unwrap();
        assert_eq!(fetched.full_name.as_deref(), Some("New Name"));
        assert_eq!(fetched.email, "student@example.edu");
    }

    #[tokio::test]
    async fn update_missing_profile_is_not_found() {
        let (_dir, repo) = test_repo().await;
        let err = repo
            .update_full_name(&Uuid::now_v7(), Some("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn get_missing_profile_returns_none() {
        let (_dir, repo) = test_repo().await;
        assert!(repo.get_profile(&Uuid::now_v7()).await.unwrap().is_none());
    }
}
