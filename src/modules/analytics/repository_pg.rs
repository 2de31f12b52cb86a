use chrono::NaiveDate;

use crate::{
    api::error,
    modules::analytics::{
        repository::AnalyticsRepository,
        schema::{PageViewEntity, SocialClickEntity},
    },
};

#[derive(Clone)]
pub struct AnalyticsRepositoryPg {
    pool: sqlx::PgPool,
}

impl AnalyticsRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AnalyticsRepository for AnalyticsRepositoryPg {
    async fn increment_page_view(&self, date: NaiveDate) -> Result<i64, error::SystemError> {
        let views = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO page_views (date, views)
            VALUES ($1, 1)
            ON CONFLICT (date) DO UPDATE SET views = page_views.views + 1
            RETURNING views
            "#,
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(views)
    }

    async fn increment_social_click(
        &self,
        date: NaiveDate,
        platform: &str,
    ) -> Result<i64, error::SystemError> {
        let clicks = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO social_analytics (date, platform, clicks)
            VALUES ($1, $2, 1)
            ON CONFLICT (date, platform) DO UPDATE SET clicks = social_analytics.clicks + 1
            RETURNING clicks
            "#,
        )
        .bind(date)
        .bind(platform)
        .fetch_one(&self.pool)
        .await?;
        Ok(clicks)
    }

    async fn page_views(&self, limit: i64) -> Result<Vec<PageViewEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, PageViewEntity>(
            "SELECT date, views FROM page_views ORDER BY date DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn social_clicks(
        &self,
        limit: i64,
    ) -> Result<Vec<SocialClickEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, SocialClickEntity>(
            "SELECT date, platform, clicks FROM social_analytics ORDER BY date DESC, platform LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
