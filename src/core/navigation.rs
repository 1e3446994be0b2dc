use crate::domain::model::ItemState;

/// 在項目清單中尋找下一個／上一個已載入完成的位置。
///
/// 待載入與載入失敗一律視為不可瀏覽，只有 `loaded` 的項目會被選中。
pub struct ItemNavigationIndex;

impl ItemNavigationIndex {
    /// 從 `from + 1` 往後找第一個已載入的位置
    pub fn find_next(items: &[ItemState], from: usize) -> Option<usize> {
        let start = from.checked_add(1)?;
        items
            .get(start..)?
            .iter()
            .position(ItemState::loaded)
            .map(|offset| start + offset)
    }

    /// 從 `from - 1` 往前找第一個已載入的位置。
    ///
    /// `from` 超出清單長度時，從最後一個項目開始往前找。
    pub fn find_previous(items: &[ItemState], from: usize) -> Option<usize> {
        let end = from.min(items.len());
        items[..end].iter().rposition(ItemState::loaded)
    }
}
