//! Food service: use-cases for managing food records.

use foodbase_domain::error::{FoodbaseError, NotFoundError};
use foodbase_domain::food::{Food, FoodPatch};
use foodbase_domain::id::FoodId;

use crate::ports::FoodRepository;

/// Application service for food CRUD operations.
pub struct FoodService<R> {
    repo: R,
}

fn not_found(id: FoodId) -> FoodbaseError {
    NotFoundError {
        entity: "Food",
        id: id.to_string(),
    }
    .into()
}

impl<R: FoodRepository> FoodService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persist a new food after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`FoodbaseError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    pub async fn create_food(&self, food: Food) -> Result<Food, FoodbaseError> {
        food.validate()?;
        let created = self.repo.create(food).await?;
        tracing::debug!(food_id = %created.id, name = %created.name, "food created");
        Ok(created)
    }

    /// Look up a food by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`FoodbaseError::NotFound`] when no food with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_food(&self, id: FoodId) -> Result<Food, FoodbaseError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// List all foods.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_foods(&self) -> Result<Vec<Food>, FoodbaseError> {
        self.repo.get_all().await
    }

    /// Merge a partial update into an existing food.
    ///
    /// An empty patch returns the stored record unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`FoodbaseError::Validation`] if a present field is out of
    /// range, [`FoodbaseError::NotFound`] if the food does not exist, or a
    /// storage error from the repository.
    pub async fn update_food(&self, id: FoodId, patch: FoodPatch) -> Result<Food, FoodbaseError> {
        patch.validate()?;
        if patch.is_empty() {
            return self.get_food(id).await;
        }
        let updated = self
            .repo
            .update(id, patch)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::debug!(food_id = %id, "food updated");
        Ok(updated)
    }

    /// Delete a food by id and return its last state.
    ///
    /// # Errors
    ///
    /// Returns [`FoodbaseError::NotFound`] if the food does not exist,
    /// or a storage error from the repository.
    pub async fn delete_food(&self, id: FoodId) -> Result<Food, FoodbaseError> {
        let removed = self.repo.delete(id).await?.ok_or_else(|| not_found(id))?;
        tracing::debug!(food_id = %id, "food deleted");
        Ok(removed)
    }

    /// Remove every food, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn clear_foods(&self) -> Result<u64, FoodbaseError> {
        let removed = self.repo.delete_all().await?;
        tracing::info!(removed, "foods cleared");
        Ok(removed)
    }
}
