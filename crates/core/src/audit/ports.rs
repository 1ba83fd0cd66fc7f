//! Port interface for the audit log

use async_trait::async_trait;
use esignbridge_domain::{ApiLog, NewApiLog, Result};

#[async_trait]
pub trait ApiLogRepository: Send + Sync {
    async fn save(&self, log: &NewApiLog) -> Result<i64>;

    /// Logs whose endpoint or request body mention `invoice`, newest first.
    async fn find_by_invoice(&self, invoice: &str) -> Result<Vec<ApiLog>>;

    /// Newest `limit` logs.
    async fn find_all(&self, limit: usize) -> Result<Vec<ApiLog>>;
}
