use async_trait::async_trait;

use crate::error::NotifyError;

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;
    async fn notify(&self, text: &str) -> Result<(), NotifyError>;
}
