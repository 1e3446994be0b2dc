use crate::domain::model::LinkList;
use crate::utils::error::{Result, ViewerError};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// 取得連結清單的原始內容（每行一個 URL）
#[async_trait]
pub trait LinkFetcher: Send + Sync {
    async fn fetch(&self) -> Result<String>;
}

/// 連結清單可用時被通知的一方
pub trait LinkSubscriber: Send + Sync {
    fn on_links_loaded(&self, links: &LinkList);
}

/// 外部圖片載入器，只回報成功或失敗
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, url: &Url) -> Result<()>;
}

/// 連結清單取得失敗後是否重試。回傳 `None` 表示放棄。
pub trait RetryPolicy: Send + Sync {
    fn next_delay(&self, attempt: u32, error: &ViewerError) -> Option<Duration>;
}

/// 預設策略：失敗即終止
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn next_delay(&self, _attempt: u32, _error: &ViewerError) -> Option<Duration> {
        None
    }
}

pub trait ConfigProvider: Send + Sync {
    fn links_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn image_timeout(&self) -> Duration;
    fn concurrent_loads(&self) -> usize;
}
