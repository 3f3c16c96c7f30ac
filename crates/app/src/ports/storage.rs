//! Storage port: repository trait for persisting foods.
//!
//! Every method maps to a single atomic store operation; implementations
//! must not split a call into a read followed by a write.

use std::future::Future;

use foodbase_domain::error::FoodbaseError;
use foodbase_domain::food::{Food, FoodPatch};
use foodbase_domain::id::FoodId;

/// Repository for persisting and querying [`Food`] records.
pub trait FoodRepository {
    /// Persist a new record.
    fn create(&self, food: Food) -> impl Future<Output = Result<Food, FoodbaseError>> + Send;

    /// Get a record by its identifier.
    fn get_by_id(
        &self,
        id: FoodId,
    ) -> impl Future<Output = Result<Option<Food>, FoodbaseError>> + Send;

    /// Get all records in the store's natural order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Food>, FoodbaseError>> + Send;

    /// Merge the present fields of `patch` into the record and return the
    /// updated record, or `None` when no record has this id.
    fn update(
        &self,
        id: FoodId,
        patch: FoodPatch,
    ) -> impl Future<Output = Result<Option<Food>, FoodbaseError>> + Send;

    /// Remove a record and return its prior state, or `None` when no record
    /// has this id.
    fn delete(
        &self,
        id: FoodId,
    ) -> impl Future<Output = Result<Option<Food>, FoodbaseError>> + Send;

    /// Remove every record and return how many were removed.
    fn delete_all(&self) -> impl Future<Output = Result<u64, FoodbaseError>> + Send;
}
