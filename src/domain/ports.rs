use crate::domain::model::{ChartImage, ComposedPost, PublishReceipt};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of "today".
pub trait Clock: Send + Sync {
    fn today(&self) -> Result<NaiveDate>;
}

impl<T: Clock + ?Sized> Clock for Box<T> {
    fn today(&self) -> Result<NaiveDate> {
        (**self).today()
    }
}

pub trait Storage: Send + Sync {
    /// Writes `data` under `path` and returns the location written.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Confirms the credentials and returns the account's screen name.
    async fn verify(&self) -> Result<String>;

    async fn publish(&self, post: &ComposedPost, chart: &ChartImage) -> Result<PublishReceipt>;
}
