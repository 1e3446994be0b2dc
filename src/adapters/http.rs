use crate::core::{ConfigProvider, ImageLoader, LinkFetcher};
use crate::utils::error::{Result, ViewerError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// 以 HTTP GET 取得連結清單
#[derive(Debug, Clone)]
pub struct HttpLinkFetcher {
    client: Client,
    endpoint: String,
}

impl HttpLinkFetcher {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.links_url(), config.request_timeout())
    }
}

#[async_trait]
impl LinkFetcher for HttpLinkFetcher {
    async fn fetch(&self) -> Result<String> {
        tracing::debug!("Requesting link list from: {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;

        tracing::debug!("Link list response status: {}", response.status());
        if !response.status().is_success() {
            return Err(ViewerError::HttpStatusError {
                url: self.endpoint.clone(),
                status: response.status().as_u16(),
            });
        }

        // 不使用 response.text()，非 UTF-8 內容要視為失敗而不是替換字元
        let bytes = response.bytes().await?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

/// 以 HTTP GET 確認 URL 可取得圖片內容。不做解碼與快取。
#[derive(Debug, Clone)]
pub struct HttpImageLoader {
    client: Client,
}

impl HttpImageLoader {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &Url) -> Result<()> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ViewerError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !content_type.is_empty() && !content_type.starts_with("image/") {
            return Err(ViewerError::ImageLoadError {
                message: format!("{} is not an image ({})", url, content_type),
            });
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(ViewerError::ImageLoadError {
                message: format!("{} returned an empty body", url),
            });
        }
        Ok(())
    }
}
