//! # 位地址映射
//!
//! 槽位 `i` 到 `(行, 列, 通道)` 的映射，嵌入端与提取端共用这一份定义。
//!
//! 遍历顺序固定为：行在外层、列在内层，像素内通道按 0, 1, 2 排列。
//! 修改这一顺序会使已有的隐写图像无法恢复。

use crate::constants::CHANNELS_PER_PIXEL;
use crate::error::{Result, StegoError};

/// 单个槽位在像素网格中的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAddress {
    pub row: usize,
    pub col: usize,
    pub channel: usize,
}

/// 网格的槽位总数，即 `width * height * 3`。
pub fn capacity(width: usize, height: usize) -> usize {
    width
        .saturating_mul(height)
        .saturating_mul(CHANNELS_PER_PIXEL)
}

/// 将线性槽位索引映射为像素网格中的位置。
///
/// # Errors
///
/// 当 `slot >= width * height * 3` 时返回 [`StegoError::SlotOutOfRange`]，不会回绕。
pub fn locate(slot: usize, width: usize, height: usize) -> Result<SlotAddress> {
    let capacity = capacity(width, height);
    if slot >= capacity {
        return Err(StegoError::SlotOutOfRange { slot, capacity });
    }

    let row_len = width * CHANNELS_PER_PIXEL;
    Ok(SlotAddress {
        row: slot / row_len,
        col: (slot / CHANNELS_PER_PIXEL) % width,
        channel: slot % CHANNELS_PER_PIXEL,
    })
}

/// [`locate`] 的逆映射。
pub fn slot_index(address: SlotAddress, width: usize) -> usize {
    (address.row * width + address.col) * CHANNELS_PER_PIXEL + address.channel
}
