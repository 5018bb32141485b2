use async_trait::async_trait;

use crate::core::error::AppError;

/// Destination for report photos. Returns a URL the stored image can be
/// fetched from.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store_image(
        &self,
        owner_id: i64,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError>;
}
