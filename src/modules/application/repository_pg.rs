use chrono::{DateTime, Utc};

use crate::{
    api::error,
    modules::{
        analytics::schema::ApplicationStat,
        application::{
            model::InsertApplication, repository::ApplicationRepository,
            schema::ApplicationEntity,
        },
    },
};

#[derive(Clone)]
pub struct ApplicationRepositoryPg {
    pool: sqlx::PgPool,
}

impl ApplicationRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ApplicationRepository for ApplicationRepositoryPg {
    async fn create(&self, application: &InsertApplication) -> Result<(), error::SystemError> {
        sqlx::query(
            r#"
            INSERT INTO applications (
                id, name, email, phone, experience, message, files,
                status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&application.id)
        .bind(&application.name)
        .bind(&application.email)
        .bind(&application.phone)
        .bind(&application.experience)
        .bind(&application.message)
        .bind(&application.files)
        .bind(&application.status)
        .bind(application.created_at)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self, archived: bool) -> Result<Vec<ApplicationEntity>, error::SystemError> {
        let applications = sqlx::query_as::<_, ApplicationEntity>(
            "SELECT * FROM applications WHERE archived = $1 ORDER BY created_at DESC",
        )
        .bind(archived)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    async fn update_status(
        &self,
        id: &str,
        status: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("UPDATE applications SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(status)
            .bind(updated_at)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn archive(
        &self,
        id: &str,
        archived_at: DateTime<Utc>,
        auto_delete_date: DateTime<Utc>,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            r#"
            UPDATE applications
            SET archived = TRUE, archived_at = $2, auto_delete_date = $3, updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(archived_at)
        .bind(auto_delete_date)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, error::SystemError> {
        let rows = sqlx::query(
            "DELETE FROM applications WHERE archived = TRUE AND auto_delete_date <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows)
    }

    async fn daily_counts(&self, limit: i64) -> Result<Vec<ApplicationStat>, error::SystemError> {
        let stats = sqlx::query_as::<_, ApplicationStat>(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS date, COUNT(*) AS count
            FROM applications
            GROUP BY 1
            ORDER BY date DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }
}
