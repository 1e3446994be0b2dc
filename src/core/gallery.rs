use crate::core::presenter::GalleryPresenter;
use crate::domain::model::{ItemState, LinkList, LoadOutcome, LoadStatus};
use crate::domain::ports::{ImageLoader, LinkSubscriber};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use url::Url;

#[derive(Debug, Clone)]
pub enum GalleryEvent {
    LinksLoaded(LinkList),
    ImageLoaded {
        index: usize,
        url: Url,
        outcome: LoadOutcome,
    },
}

/// 把服務的廣播轉成 runtime 佇列中的事件
pub struct ChannelSubscriber {
    tx: mpsc::UnboundedSender<GalleryEvent>,
}

impl LinkSubscriber for ChannelSubscriber {
    fn on_links_loaded(&self, links: &LinkList) {
        if self.tx.send(GalleryEvent::LinksLoaded(links.clone())).is_err() {
            tracing::debug!("Gallery runtime is gone, dropping link list");
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GallerySnapshot {
    pub total: usize,
    pub loaded: usize,
    pub failed: usize,
    pub items: Vec<ItemState>,
}

/// 縮圖格的事件迴圈。
///
/// 連結清單與每張圖片的載入結果都經由同一條佇列進來，只有這個 task 會修改 presenter。
pub struct GalleryRuntime {
    presenter: GalleryPresenter,
    loader: Arc<dyn ImageLoader>,
    permits: Arc<Semaphore>,
    tx: mpsc::UnboundedSender<GalleryEvent>,
    rx: mpsc::UnboundedReceiver<GalleryEvent>,
    links_received: bool,
}

impl GalleryRuntime {
    pub fn new<L>(loader: L, concurrent_loads: usize) -> Self
    where
        L: ImageLoader + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let permits = concurrent_loads.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            presenter: GalleryPresenter::new(),
            loader: Arc::new(loader),
            permits: Arc::new(Semaphore::new(permits)),
            tx,
            rx,
            links_received: false,
        }
    }

    /// 交給 `LinkBroadcastService::subscribe` 的訂閱者，呼叫端需持有回傳的 `Arc`
    pub fn subscriber(&self) -> Arc<ChannelSubscriber> {
        Arc::new(ChannelSubscriber {
            tx: self.tx.clone(),
        })
    }

    pub fn presenter(&self) -> &GalleryPresenter {
        &self.presenter
    }

    pub fn is_settled(&self) -> bool {
        self.links_received && self.presenter.is_settled()
    }

    /// 處理事件直到收到清單且每張圖都有結果。
    ///
    /// 清單取得失敗時永遠不會返回，呼叫端應自行加上逾時。
    pub async fn run_until_settled(&mut self) {
        while !self.is_settled() {
            // runtime 自己持有 tx，佇列不會關閉
            let Some(event) = self.rx.recv().await else {
                return;
            };
            self.handle(event);
        }
    }

    pub fn handle(&mut self, event: GalleryEvent) {
        match event {
            GalleryEvent::LinksLoaded(links) => {
                self.links_received = true;
                self.presenter.set_links(&links);
                self.start_loads();
            }
            GalleryEvent::ImageLoaded {
                index,
                url,
                outcome,
            } => {
                if self.presenter.complete_load(index, &url, outcome) {
                    tracing::debug!("Item {} -> {:?}", index, outcome);
                }
            }
        }
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        let items = self.presenter.items().to_vec();
        let count = |status: LoadStatus| items.iter().filter(|item| item.status == status).count();
        GallerySnapshot {
            total: items.len(),
            loaded: count(LoadStatus::Loaded),
            failed: count(LoadStatus::Failed),
            items,
        }
    }

    fn start_loads(&mut self) {
        for index in 0..self.presenter.len() {
            let Some(url) = self.presenter.begin_load(index) else {
                continue;
            };
            let loader = Arc::clone(&self.loader);
            let permits = Arc::clone(&self.permits);
            let tx = self.tx.clone();

            tokio::spawn(async move {
                let outcome = match permits.acquire_owned().await {
                    Ok(_permit) => match loader.load(&url).await {
                        Ok(()) => LoadOutcome::Loaded,
                        Err(e) => {
                            tracing::debug!("Image {} failed to load: {}", url, e);
                            LoadOutcome::Failed
                        }
                    },
                    Err(_) => LoadOutcome::Failed,
                };
                let _ = tx.send(GalleryEvent::ImageLoaded {
                    index,
                    url,
                    outcome,
                });
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{Result, ViewerError};
    use async_trait::async_trait;

    /// 檔名含 "broken" 的圖片一律失敗
    struct StubLoader;

    #[async_trait]
    impl ImageLoader for StubLoader {
        async fn load(&self, url: &Url) -> Result<()> {
            if url.path().contains("broken") {
                Err(ViewerError::ImageLoadError {
                    message: format!("cannot decode {url}"),
                })
            } else {
                Ok(())
            }
        }
    }

    fn links(items: &[&str]) -> LinkList {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_runs_until_every_item_settles() {
        let mut runtime = GalleryRuntime::new(StubLoader, 2);
        let subscriber = runtime.subscriber();
        subscriber.on_links_loaded(&links(&[
            "https://img.test/a.png",
            "https://img.test/broken.png",
            "nonsense",
            "https://img.test/b.png",
        ]));

        runtime.run_until_settled().await;

        let snapshot = runtime.snapshot();
        assert_eq!(snapshot.total, 4);
        assert_eq!(snapshot.loaded, 2);
        assert_eq!(snapshot.failed, 2);
        assert_eq!(
            runtime.presenter().next_link(0).map(|(i, _)| i),
            Some(3)
        );
    }

    #[tokio::test]
    async fn test_unbounded_load_limit_is_clamped() {
        let mut runtime = GalleryRuntime::new(StubLoader, usize::MAX);
        runtime
            .subscriber()
            .on_links_loaded(&links(&["https://img.test/a.png"]));

        runtime.run_until_settled().await;
        assert_eq!(runtime.snapshot().loaded, 1);
    }

    #[tokio::test]
    async fn test_empty_list_settles_immediately() {
        let mut runtime = GalleryRuntime::new(StubLoader, 1);
        assert!(!runtime.is_settled());
        runtime.subscriber().on_links_loaded(&LinkList::default());

        runtime.run_until_settled().await;
        assert_eq!(runtime.snapshot().total, 0);
    }

    #[tokio::test]
    async fn test_stale_completion_after_new_list_is_ignored() {
        let mut runtime = GalleryRuntime::new(StubLoader, 1);
        runtime.handle(GalleryEvent::LinksLoaded(links(&["https://img.test/new.png"])));
        runtime.handle(GalleryEvent::ImageLoaded {
            index: 0,
            url: Url::parse("https://img.test/old.png").unwrap(),
            outcome: LoadOutcome::Loaded,
        });

        assert!(runtime.presenter().item(0).unwrap().is_pending());
    }
}
