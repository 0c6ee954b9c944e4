use async_trait::async_trait;
use chrono::NaiveDateTime;
use layover_core::models::LayoverInterest;
use layover_core::repository::LayoverInterestRepository;
use std::error::Error;

/// Reads the `layovers` table maintained by the layover bookmarking service
pub struct PostgresLayoverRepository {
    pub pool: sqlx::PgPool,
}

#[derive(sqlx::FromRow)]
struct LayoverRow {
    user_id: String,
    iata_code: String,
    arrive: NaiveDateTime,
    depart: NaiveDateTime,
}

impl From<LayoverRow> for LayoverInterest {
    fn from(row: LayoverRow) -> Self {
        Self {
            user_id: row.user_id,
            iata_code: row.iata_code,
            arrive: row.arrive,
            depart: row.depart,
        }
    }
}

#[async_trait]
impl LayoverInterestRepository for PostgresLayoverRepository {
    async fn interests_at(
        &self,
        airports: &[String],
    ) -> Result<Vec<LayoverInterest>, Box<dyn Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, LayoverRow>(
            r#"
            SELECT user_id, iata_code, arrive, depart
            FROM layovers
            WHERE iata_code = ANY($1)
            "#,
        )
        .bind(airports.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LayoverInterest::from).collect())
    }
}

/// Fixed set of interest rows, for development and tests
#[derive(Default)]
pub struct InMemoryLayoverRepository {
    rows: Vec<LayoverInterest>,
}

impl InMemoryLayoverRepository {
    pub fn new(rows: Vec<LayoverInterest>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl LayoverInterestRepository for InMemoryLayoverRepository {
    async fn interests_at(
        &self,
        airports: &[String],
    ) -> Result<Vec<LayoverInterest>, Box<dyn Error + Send + Sync>> {
        Ok(self
            .rows
            .iter()
            .filter(|row| airports.contains(&row.iata_code))
            .cloned()
            .collect())
    }
}
