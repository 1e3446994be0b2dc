use crate::core::presenter::GalleryPresenter;
use crate::domain::model::Selection;
use url::Url;

/// 全螢幕檢視中的目前圖片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerSession {
    index: usize,
    url: Url,
}

impl ViewerSession {
    /// 只有已載入的項目可以開啟
    pub fn open(presenter: &GalleryPresenter, index: usize) -> Option<Self> {
        match presenter.select(index) {
            Selection::Open { index, url } => Some(Self { index, url }),
            Selection::NotReady | Selection::OutOfRange => None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// 往左滑：下一張。沒有可顯示的圖片時停在原處並回傳 `false`。
    pub fn swipe_left(&mut self, presenter: &GalleryPresenter) -> bool {
        self.move_to(presenter.next_link(self.index))
    }

    /// 往右滑：上一張
    pub fn swipe_right(&mut self, presenter: &GalleryPresenter) -> bool {
        self.move_to(presenter.previous_link(self.index))
    }

    fn move_to(&mut self, target: Option<(usize, Url)>) -> bool {
        match target {
            Some((index, url)) => {
                tracing::debug!("Viewer moved {} -> {}", self.index, index);
                self.index = index;
                self.url = url;
                true
            }
            None => false,
        }
    }
}
