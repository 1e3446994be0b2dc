use crate::core::navigation::ItemNavigationIndex;
use crate::domain::model::{ItemState, LinkList, LoadOutcome, Selection};
use url::Url;

/// 縮圖格的資料模型：每個連結對應一個 [`ItemState`]。
///
/// 只能由單一執行環境修改（見 `GalleryRuntime`），本身不做同步。
#[derive(Debug, Default)]
pub struct GalleryPresenter {
    items: Vec<ItemState>,
}

impl GalleryPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 換上新的清單，所有項目重設為待載入
    pub fn set_links(&mut self, links: &LinkList) {
        self.items = links.iter().map(ItemState::pending).collect();
        tracing::debug!("Presenter reset with {} items", self.items.len());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn item(&self, index: usize) -> Option<&ItemState> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[ItemState] {
        &self.items
    }

    /// 所有項目都已成功或失敗
    pub fn is_settled(&self) -> bool {
        self.items.iter().all(|item| !item.is_pending())
    }

    /// 開始載入前解析 URL；無法解析的連結直接標記失敗。
    pub fn begin_load(&mut self, index: usize) -> Option<Url> {
        let item = self.items.get_mut(index)?;
        if !item.is_pending() {
            return None;
        }
        match Url::parse(&item.url) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!("Item {} has an invalid URL '{}': {}", index, item.url, e);
                item.mark_failed();
                None
            }
        }
    }

    /// 套用圖片載入結果。URL 與目前位置不符（清單已被替換）時忽略。
    pub fn complete_load(&mut self, index: usize, url: &Url, outcome: LoadOutcome) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            tracing::debug!("Ignoring load result for missing item {}", index);
            return false;
        };
        if Url::parse(&item.url).ok().as_ref() != Some(url) {
            tracing::debug!("Ignoring stale load result for item {} ({})", index, url);
            return false;
        }
        match outcome {
            LoadOutcome::Loaded => {
                item.mark_loaded();
                true
            }
            LoadOutcome::Failed => item.mark_failed(),
        }
    }

    pub fn select(&self, index: usize) -> Selection {
        match self.items.get(index) {
            None => Selection::OutOfRange,
            Some(item) if item.loaded() => match Url::parse(&item.url) {
                Ok(url) => Selection::Open { index, url },
                Err(_) => Selection::NotReady,
            },
            Some(_) => Selection::NotReady,
        }
    }

    pub fn next_link(&self, from: usize) -> Option<(usize, Url)> {
        let index = ItemNavigationIndex::find_next(&self.items, from)?;
        self.parsed(index)
    }

    pub fn previous_link(&self, from: usize) -> Option<(usize, Url)> {
        let index = ItemNavigationIndex::find_previous(&self.items, from)?;
        self.parsed(index)
    }

    fn parsed(&self, index: usize) -> Option<(usize, Url)> {
        let url = Url::parse(&self.items[index].url).ok()?;
        Some((index, url))
    }
}
