pub mod gallery;
pub mod link_service;
pub mod navigation;
pub mod presenter;
pub mod viewer;

pub use crate::domain::model::{FetchStatus, ItemState, LinkList, LoadOutcome, LoadStatus, Selection};
pub use crate::domain::ports::{
    ConfigProvider, ImageLoader, LinkFetcher, LinkSubscriber, NoRetry, RetryPolicy,
};
pub use crate::utils::error::Result;
