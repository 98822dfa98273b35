use tokio::sync::OnceCell;

use crate::calendly::SchedulingApi;
use crate::error::{CalendlyError, CalendlyResult};

/// Remembers the authenticated user's URI for the life of the process so the
/// list tools don't hit `/users/me` on every call.
///
/// A failed lookup leaves the slot empty; the next call tries again.
#[derive(Debug, Default)]
pub struct UserUriCache {
    uri: OnceCell<String>,
}

impl UserUriCache {
    pub async fn user_uri(&self, api: &dyn SchedulingApi) -> CalendlyResult<String> {
        let uri = self
            .uri
            .get_or_try_init(|| async {
                let user = api.get_current_user().await?;
                tracing::info!(user_uri = %user.uri, "Resolved Calendly user");
                Ok::<_, CalendlyError>(user.uri)
            })
            .await?;
        Ok(uri.clone())
    }
}
