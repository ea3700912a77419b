//! Core validator trait

use async_trait::async_trait;

/// A validation module the host can run against a record pair.
///
/// Every call is a fresh, self-contained invocation: nothing the module did
/// in an earlier call is visible to it.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validate a record against its previous version
    ///
    /// # Returns
    /// * `Ok(Execution)` - The module ran; it may still have aborted
    /// * `Err(ValidationError)` - The module could not be run at all
    async fn validate(
        &self,
        records: &super::RecordPair,
    ) -> Result<super::Execution, super::ValidationError>;

    /// Get validator name (for logging)
    fn name(&self) -> &str;
}
