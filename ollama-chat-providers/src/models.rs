//! Model list lookup with a static fallback

use tracing::{info, warn};

use crate::base::ChatProvider;

/// Ask the server for its models, falling back to `fallback` when the
/// request fails or the server reports none.
///
/// Failures are only logged; callers always get a usable list.
pub async fn fetch_models_or_default(
    provider: &dyn ChatProvider,
    fallback: &[String],
) -> Vec<String> {
    match provider.list_models().await {
        Ok(models) if !models.is_empty() => {
            info!("Found {} model(s) at {}", models.len(), provider.api_base());
            models
        }
        Ok(_) => {
            warn!(
                "{} reported no models, using fallback list",
                provider.api_base()
            );
            fallback.to_vec()
        }
        Err(e) => {
            warn!("Failed to fetch models from {}: {}", provider.api_base(), e);
            fallback.to_vec()
        }
    }
}
