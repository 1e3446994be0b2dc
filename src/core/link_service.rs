use crate::domain::model::{FetchStatus, LinkList};
use crate::domain::ports::{LinkFetcher, LinkSubscriber, NoRetry, RetryPolicy};
use crate::utils::error::{Result, ViewerError};
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use tokio::sync::{mpsc, oneshot};

/// 訂閱識別碼，取消訂閱時使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionToken(u64);

enum FetchState {
    Idle,
    Fetching,
    Ready(LinkList),
    Failed,
}

impl FetchState {
    fn status(&self) -> FetchStatus {
        match self {
            FetchState::Idle => FetchStatus::Idle,
            FetchState::Fetching => FetchStatus::Fetching,
            FetchState::Ready(links) => FetchStatus::Ready { links: links.len() },
            FetchState::Failed => FetchStatus::Failed,
        }
    }
}

enum Command {
    Subscribe {
        subscriber: Weak<dyn LinkSubscriber>,
        reply: oneshot::Sender<SubscriptionToken>,
    },
    Unsubscribe {
        token: SubscriptionToken,
        reply: oneshot::Sender<()>,
    },
    Status {
        reply: oneshot::Sender<FetchStatus>,
    },
    FetchCompleted(Result<String>),
}

/// 連結清單服務：建立時發出唯一一次請求，結果快取後廣播給所有訂閱者。
///
/// 所有狀態都由背景 actor task 持有，訂閱、取消訂閱與取得結果都經由同一條
/// 佇列排序，因此在取得完成後才訂閱的一方一定會在 `subscribe` 返回前收到快取的清單。
#[derive(Clone)]
pub struct LinkBroadcastService {
    tx: mpsc::UnboundedSender<Command>,
}

impl LinkBroadcastService {
    /// 必須在 tokio runtime 內呼叫
    pub fn spawn<F>(fetcher: F) -> Self
    where
        F: LinkFetcher + 'static,
    {
        Self::spawn_with_policy(fetcher, NoRetry)
    }

    pub fn spawn_with_policy<F, P>(fetcher: F, policy: P) -> Self
    where
        F: LinkFetcher + 'static,
        P: RetryPolicy + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut actor = ServiceActor::new(rx);

        actor.start_fetch(Arc::new(fetcher), Arc::new(policy), tx.clone());
        tokio::spawn(actor.run());

        Self { tx }
    }

    /// 註冊訂閱者。若清單已就緒，返回前會先同步送出一次快取結果。
    ///
    /// 服務只保留弱參考；呼叫端負責維持 `Arc` 的生命週期。
    pub async fn subscribe<S>(&self, subscriber: &Arc<S>) -> Result<SubscriptionToken>
    where
        S: LinkSubscriber + 'static,
    {
        let subscriber: Arc<dyn LinkSubscriber> = subscriber.clone();
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Subscribe {
                subscriber: Arc::downgrade(&subscriber),
                reply,
            })
            .map_err(|_| ViewerError::ServiceClosed)?;
        rx.await.map_err(|_| ViewerError::ServiceClosed)
    }

    /// 重複呼叫或使用未知的 token 都不會出錯
    pub async fn unsubscribe(&self, token: SubscriptionToken) {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Command::Unsubscribe { token, reply }).is_ok() {
            let _ = rx.await;
        }
    }

    pub async fn status(&self) -> Result<FetchStatus> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Status { reply })
            .map_err(|_| ViewerError::ServiceClosed)?;
        rx.await.map_err(|_| ViewerError::ServiceClosed)
    }
}

struct ServiceActor {
    rx: mpsc::UnboundedReceiver<Command>,
    state: FetchState,
    subscribers: BTreeMap<SubscriptionToken, Weak<dyn LinkSubscriber>>,
    next_token: u64,
}

impl ServiceActor {
    fn new(rx: mpsc::UnboundedReceiver<Command>) -> Self {
        Self {
            rx,
            state: FetchState::Idle,
            subscribers: BTreeMap::new(),
            next_token: 0,
        }
    }

    fn start_fetch(
        &mut self,
        fetcher: Arc<dyn LinkFetcher>,
        policy: Arc<dyn RetryPolicy>,
        tx: mpsc::UnboundedSender<Command>,
    ) {
        debug_assert!(matches!(self.state, FetchState::Idle));
        self.state = FetchState::Fetching;

        tokio::spawn(async move {
            let mut attempt = 0u32;
            let result = loop {
                attempt += 1;
                match fetcher.fetch().await {
                    Ok(body) => break Ok(body),
                    Err(e) => match policy.next_delay(attempt, &e) {
                        Some(delay) => {
                            tracing::debug!(
                                "Link fetch attempt {} failed: {}, retrying in {:?}",
                                attempt,
                                e,
                                delay
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => break Err(e),
                    },
                }
            };
            // 完成結果交回 actor 處理，不在這裡修改共享狀態
            let _ = tx.send(Command::FetchCompleted(result));
        });
    }

    async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Subscribe { subscriber, reply } => {
                    let token = self.register(subscriber);
                    let _ = reply.send(token);
                }
                Command::Unsubscribe { token, reply } => {
                    if self.subscribers.remove(&token).is_some() {
                        tracing::debug!("Unsubscribed {:?}", token);
                    }
                    let _ = reply.send(());
                }
                Command::Status { reply } => {
                    let _ = reply.send(self.state.status());
                }
                Command::FetchCompleted(result) => self.on_fetch_completed(result),
            }
        }
        tracing::debug!("Link service stopped");
    }

    fn register(&mut self, subscriber: Weak<dyn LinkSubscriber>) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token);
        self.next_token += 1;

        if let FetchState::Ready(links) = &self.state {
            if let Some(subscriber) = subscriber.upgrade() {
                subscriber.on_links_loaded(links);
            }
        }
        self.subscribers.insert(token, subscriber);
        tracing::debug!("Subscribed {:?} ({} active)", token, self.subscribers.len());
        token
    }

    fn on_fetch_completed(&mut self, result: Result<String>) {
        match result {
            Ok(body) => {
                let links = LinkList::from_body(&body);
                tracing::info!("📥 Loaded {} links", links.len());
                self.state = FetchState::Ready(links.clone());
                self.broadcast(&links);
            }
            Err(e) => {
                // 取得失敗不通知任何訂閱者，也不重試
                tracing::warn!("❌ Link list fetch failed: {}", e);
                self.state = FetchState::Failed;
            }
        }
    }

    fn broadcast(&mut self, links: &LinkList) {
        // BTreeMap 依 token 遞增排序，即註冊順序
        self.subscribers.retain(|token, subscriber| match subscriber.upgrade() {
            Some(subscriber) => {
                subscriber.on_links_loaded(links);
                true
            }
            None => {
                tracing::debug!("Dropping released subscriber {:?}", token);
                false
            }
        });
    }
}
