// Adapters layer: 對外部系統的實作（HTTP 取得清單、圖片載入）

pub mod http;

pub use http::{HttpImageLoader, HttpLinkFetcher};
