use serde::Serialize;
use std::ops::Deref;
use std::sync::Arc;

/// 遠端取得的圖片連結清單，順序即顯示順序。
///
/// 取得後不可變；重新取得時整份替換。內部以 `Arc<[String]>` 共享，
/// 廣播給多個訂閱者時只複製指標。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkList(Arc<[String]>);

impl LinkList {
    /// 依換行切分回應內容。
    ///
    /// 結尾的換行不會產生空元素，中間的空行保留為空字串，`\r\n` 視同 `\n`。
    pub fn from_body(body: &str) -> Self {
        body.lines().map(str::to_owned).collect()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for LinkList {
    fn default() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

impl Deref for LinkList {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl FromIterator<String> for LinkList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<String>> for LinkList {
    fn from(links: Vec<String>) -> Self {
        Self(links.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Pending,
    Loaded,
    Failed,
}

/// 單一格子的載入狀態
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemState {
    pub url: String,
    pub status: LoadStatus,
}

impl ItemState {
    pub fn pending(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: LoadStatus::Pending,
        }
    }

    pub fn loaded(&self) -> bool {
        self.status == LoadStatus::Loaded
    }

    pub fn failed(&self) -> bool {
        self.status == LoadStatus::Failed
    }

    pub fn is_pending(&self) -> bool {
        self.status == LoadStatus::Pending
    }

    pub fn mark_loaded(&mut self) {
        self.status = LoadStatus::Loaded;
    }

    /// 已載入的項目不會再退回失敗狀態
    pub fn mark_failed(&mut self) -> bool {
        if self.loaded() {
            return false;
        }
        self.status = LoadStatus::Failed;
        true
    }
}

/// 單張圖片的載入結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Open { index: usize, url: url::Url },
    NotReady,
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FetchStatus {
    /// 建構期間的初始狀態；`spawn` 返回前已進入 `Fetching`
    Idle,
    Fetching,
    Ready { links: usize },
    Failed,
}
