//! `SQLite` implementation of [`FoodRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use foodbase_app::ports::FoodRepository;
use foodbase_domain::error::FoodbaseError;
use foodbase_domain::food::{Food, FoodPatch};
use foodbase_domain::id::FoodId;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Food`].
struct Wrapper(Food);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Food> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let id = FoodId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Food {
            id,
            name: row.try_get("name")?,
            carbs: row.try_get("carbs")?,
            prot: row.try_get("prot")?,
            fat: row.try_get("fat")?,
            serving_size: row.try_get("serving_size")?,
            serving_unit: row.try_get("serving_unit")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO foods (id, name, carbs, prot, fat, serving_size, serving_unit) VALUES (?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT id, name, carbs, prot, fat, serving_size, serving_unit FROM foods WHERE id = ?";
const SELECT_ALL: &str =
    "SELECT id, name, carbs, prot, fat, serving_size, serving_unit FROM foods ORDER BY seq";
// COALESCE keeps the stored value for every field the patch leaves out.
const UPDATE_RETURNING: &str = "UPDATE foods SET name = COALESCE(?, name), carbs = COALESCE(?, carbs), prot = COALESCE(?, prot), fat = COALESCE(?, fat) WHERE id = ? RETURNING id, name, carbs, prot, fat, serving_size, serving_unit";
const DELETE_RETURNING: &str = "DELETE FROM foods WHERE id = ? RETURNING id, name, carbs, prot, fat, serving_size, serving_unit";
const DELETE_ALL: &str = "DELETE FROM foods";

/// `SQLite`-backed food repository.
pub struct SqliteFoodRepository {
    pool: SqlitePool,
}

impl SqliteFoodRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl FoodRepository for SqliteFoodRepository {
    fn create(&self, food: Food) -> impl Future<Output = Result<Food, FoodbaseError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(food.id.to_string())
                .bind(&food.name)
                .bind(food.carbs)
                .bind(food.prot)
                .bind(food.fat)
                .bind(food.serving_size)
                .bind(food.serving_unit.as_deref())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(food)
        }
    }

    fn get_by_id(
        &self,
        id: FoodId,
    ) -> impl Future<Output = Result<Option<Food>, FoodbaseError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Food>, FoodbaseError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        id: FoodId,
        patch: FoodPatch,
    ) -> impl Future<Output = Result<Option<Food>, FoodbaseError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(UPDATE_RETURNING)
                .bind(patch.name.as_deref().map(str::trim))
                .bind(patch.carbs)
                .bind(patch.prot)
                .bind(patch.fat)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn delete(
        &self,
        id: FoodId,
    ) -> impl Future<Output = Result<Option<Food>, FoodbaseError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(DELETE_RETURNING)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn delete_all(&self) -> impl Future<Output = Result<u64, FoodbaseError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_ALL)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteFoodRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteFoodRepository::new(db.pool().clone())
    }

    fn banana() -> Food {
        Food::builder()
            .name("banana")
            .carbs(4.0)
            .prot(0.2)
            .fat(1.0)
            .build()
            .unwrap()
    }

    fn hamburger() -> Food {
        Food::builder()
            .name("hamburger")
            .carbs(16.0)
            .prot(22.0)
            .fat(21.0)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_food_when_valid() {
        let repo = setup().await;
        let food = banana();
        let id = food.id;

        repo.create(food.clone()).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched, food);
    }

    #[tokio::test]
    async fn should_store_serving_fields_through_roundtrip() {
        let repo = setup().await;
        let food = Food::builder()
            .name("oats")
            .carbs(66.0)
            .prot(17.0)
            .fat(7.0)
            .serving_size(40.0)
            .serving_unit("g")
            .build()
            .unwrap();
        repo.create(food.clone()).await.unwrap();

        let fetched = repo.get_by_id(food.id).await.unwrap().unwrap();
        assert_eq!(fetched.serving_size, Some(40.0));
        assert_eq!(fetched.serving_unit.as_deref(), Some("g"));
    }

    #[tokio::test]
    async fn should_return_none_when_food_not_found() {
        let repo = setup().await;
        let result = repo.get_by_id(FoodId::new()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_list_foods_in_insertion_order() {
        let repo = setup().await;
        repo.create(hamburger()).await.unwrap();
        repo.create(banana()).await.unwrap();

        let names: Vec<String> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|food| food.name)
            .collect();
        assert_eq!(names, vec!["hamburger", "banana"]);
    }

    #[tokio::test]
    async fn should_reject_duplicate_id() {
        let repo = setup().await;
        let food = banana();
        repo.create(food.clone()).await.unwrap();

        let result = repo.create(food).await;
        assert!(matches!(result, Err(FoodbaseError::Storage(_))));
    }

    #[tokio::test]
    async fn should_reject_invalid_record_bypassing_domain_validation() {
        let repo = setup().await;
        let mut food = banana();
        food.carbs = -1.0;

        let result = repo.create(food).await;
        assert!(matches!(result, Err(FoodbaseError::Storage(_))));
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_merge_only_present_fields_when_updating() {
        let repo = setup().await;
        let food = banana();
        repo.create(food.clone()).await.unwrap();

        let patch = FoodPatch {
            name: Some("apple".to_string()),
            carbs: Some(3.0),
            ..FoodPatch::default()
        };
        let updated = repo.update(food.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.id, food.id);
        assert_eq!(updated.name, "apple");
        assert_eq!(updated.carbs.to_bits(), 3.0_f64.to_bits());
        assert_eq!(updated.prot.to_bits(), food.prot.to_bits());
        assert_eq!(updated.fat.to_bits(), food.fat.to_bits());

        let fetched = repo.get_by_id(food.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn should_return_none_when_updating_missing_food() {
        let repo = setup().await;
        let patch = FoodPatch {
            fat: Some(2.0),
            ..FoodPatch::default()
        };
        let result = repo.update(FoodId::new(), patch).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_delete_food_and_return_prior_state() {
        let repo = setup().await;
        let food = banana();
        repo.create(food.clone()).await.unwrap();

        let removed = repo.delete(food.id).await.unwrap();
        assert_eq!(removed, Some(food.clone()));

        assert!(repo.get_by_id(food.id).await.unwrap().is_none());
        assert!(repo.delete(food.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_remove_every_food_when_deleting_all() {
        let repo = setup().await;
        repo.create(banana()).await.unwrap();
        repo.create(hamburger()).await.unwrap();

        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert!(repo.get_all().await.unwrap().is_empty());
        assert_eq!(repo.delete_all().await.unwrap(), 0);
    }
}
