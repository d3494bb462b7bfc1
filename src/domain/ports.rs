use crate::core::registry::FacilityRegistry;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn registry_path(&self) -> Option<&str>;
    fn output_path(&self) -> Option<&str>;
    fn top_n(&self) -> usize;
}

/// Anything that can produce a validated registry snapshot.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    async fn load(&self) -> Result<FacilityRegistry>;
}
