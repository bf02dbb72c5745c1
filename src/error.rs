//! # 错误类型模块
//!
//! 隐写核心及其协作组件 (像素网格、文本编码) 可能返回的全部错误。

use thiserror::Error;

/// 隐写核心的错误。
#[derive(Error, Debug)]
pub enum StegoError {
    /// 载荷加上帧开销无法放入图像的可用槽位。
    #[error("Not enough space in the image: required {required} bits, available {available} bits")]
    CapacityExceeded { required: usize, available: usize },

    /// 载荷长度超出长度前缀 (`u32`) 的表示范围。
    #[error("Payload of {len} bytes cannot be described by a 32-bit length prefix")]
    PayloadTooLarge { len: usize },

    /// 遍历完全部槽位仍未遇到零字节终止符。
    #[error("No terminator found: the image does not contain a terminated hidden message")]
    NoTerminatorFound,

    /// 长度前缀声明的长度超出了图像能容纳的最大载荷。
    #[error("Declared payload length {declared} exceeds the image maximum of {max} bytes")]
    InvalidLength { declared: usize, max: usize },

    #[error("Slot {slot} is outside the grid capacity of {capacity} slots")]
    SlotOutOfRange { slot: usize, capacity: usize },

    #[error("Pixel ({row}, {col}) is outside the {width}x{height} grid")]
    PixelOutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("Unknown text encoding label: {0}")]
    UnknownEncoding(String),

    /// 文本中存在目标编码无法表示的字符。
    #[error("Text contains characters that cannot be represented in {encoding}")]
    Unmappable { encoding: &'static str },

    #[error("Recovered bytes are not valid {encoding} text")]
    MalformedText { encoding: &'static str },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, StegoError>;
