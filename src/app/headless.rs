use crate::adapters::{HttpImageLoader, HttpLinkFetcher};
use crate::config::ViewerConfig;
use crate::core::gallery::{GalleryRuntime, GallerySnapshot};
use crate::core::link_service::LinkBroadcastService;
use crate::core::presenter::GalleryPresenter;
use crate::core::viewer::ViewerSession;
use crate::core::{ConfigProvider, FetchStatus};
use crate::utils::error::Result;
use serde::Serialize;
use std::time::Duration;

const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Serialize)]
pub struct SwipeWalk {
    pub start: usize,
    /// 連續往左滑經過的位置
    pub forward: Vec<usize>,
    /// 連續往右滑經過的位置
    pub backward: Vec<usize>,
}

impl SwipeWalk {
    pub fn from_session(session: &ViewerSession, presenter: &GalleryPresenter) -> Self {
        let mut forward = Vec::new();
        let mut cursor = session.clone();
        while cursor.swipe_left(presenter) {
            forward.push(cursor.index());
        }

        let mut backward = Vec::new();
        let mut cursor = session.clone();
        while cursor.swipe_right(presenter) {
            backward.push(cursor.index());
        }

        Self {
            start: session.index(),
            forward,
            backward,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewerReport {
    pub fetch: FetchStatus,
    pub gallery: Option<GallerySnapshot>,
    pub walk: Option<SwipeWalk>,
}

/// 不含畫面的完整流程：取得清單、載入每張圖、選擇性地從 `start` 開始瀏覽。
pub async fn run(config: &ViewerConfig, start: Option<usize>) -> Result<ViewerReport> {
    let fetcher = HttpLinkFetcher::from_config(config)?;
    let loader = HttpImageLoader::new(config.image_timeout())?;

    let service = LinkBroadcastService::spawn(fetcher);
    let mut runtime = GalleryRuntime::new(loader, config.concurrent_loads());
    let subscriber = runtime.subscriber();
    let token = service.subscribe(&subscriber).await?;

    loop {
        tokio::select! {
            _ = runtime.run_until_settled() => break,
            _ = tokio::time::sleep(STATUS_POLL_INTERVAL) => {
                if service.status().await? == FetchStatus::Failed {
                    break;
                }
            }
        }
    }
    service.unsubscribe(token).await;

    let fetch = service.status().await?;
    if fetch == FetchStatus::Failed {
        return Ok(ViewerReport {
            fetch,
            gallery: None,
            walk: None,
        });
    }

    let snapshot = runtime.snapshot();
    tracing::info!(
        "🖼️ {} images: {} loaded, {} failed",
        snapshot.total,
        snapshot.loaded,
        snapshot.failed
    );

    let walk = start.and_then(|index| {
        let session = ViewerSession::open(runtime.presenter(), index);
        if session.is_none() {
            tracing::warn!("Item {} is not loaded, viewer not opened", index);
        }
        session.map(|session| SwipeWalk::from_session(&session, runtime.presenter()))
    });

    Ok(ViewerReport {
        fetch,
        gallery: Some(snapshot),
        walk,
    })
}
