//! # lsb_codec 库
//!
//! 本库包含 LSB 通道隐写编解码器的核心逻辑：位地址映射、嵌入与提取，
//! 以及围绕它们的像素网格访问、文本编码和命令行处理。

// 声明库包含的所有模块。

pub mod address;
pub mod bits;
pub mod cli;
pub mod constants;
pub mod error;
pub mod grid;
pub mod handler;
pub mod steganography;
pub mod text;

pub use error::{Result, StegoError};
pub use grid::{Carrier, PixelGrid};
pub use steganography::{Framing, embed, embed_in_place, extract};
