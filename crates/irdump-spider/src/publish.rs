use std::path::Path;
use tracing::info;

/// Side effect run once for every newly downloaded file, in download order.
///
/// Failures belong to the implementation; a publish hook cannot fail a scrape pass.
#[async_trait::async_trait]
pub trait Publish: Send + Sync {
    async fn publish(&self, path: &Path);
}

/// Default hook: records the intent to publish and does nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPublisher;

#[async_trait::async_trait]
impl Publish for LogPublisher {
    async fn publish(&self, path: &Path) {
        info!("would publish {}", path.display());
    }
}
