//! # 文本编码模块
//!
//! 在可读文本与隐写载荷字节之间转换。默认使用 Big5 (代码页 950)，
//! 与旧版工具生成的图像保持一致。隐写核心本身只处理字节，不关心这里的选择。

use crate::constants::DEFAULT_TEXT_ENCODING;
use crate::error::{Result, StegoError};
use encoding_rs::{BIG5, Encoding};

/// 基于单一字符编码的文本编解码器。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCodec {
    encoding: &'static Encoding,
}

impl Default for TextCodec {
    fn default() -> Self {
        Self { encoding: BIG5 }
    }
}

impl TextCodec {
    /// 按 WHATWG 标签 (如 `big5`、`csbig5`、`utf-8`、`gbk`) 查找编码。
    ///
    /// UTF-16 等只能解码的编码会被替换为其输出编码 (UTF-8)。
    pub fn for_label(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| StegoError::UnknownEncoding(label.to_string()))?;
        Ok(Self {
            encoding: encoding.output_encoding(),
        })
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// 将文本编码为字节。
    ///
    /// # Errors
    ///
    /// 文本包含该编码无法表示的字符时返回 [`StegoError::Unmappable`]。
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        let (bytes, _, had_unmappable) = self.encoding.encode(text);
        if had_unmappable {
            return Err(StegoError::Unmappable {
                encoding: self.name(),
            });
        }
        Ok(bytes.into_owned())
    }

    /// 将字节解码为文本，不做 BOM 嗅探也不替换非法序列。
    ///
    /// # Errors
    ///
    /// 字节不是合法的该编码文本时返回 [`StegoError::MalformedText`]。
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or(StegoError::MalformedText {
                encoding: self.name(),
            })
    }
}

/// 默认编码标签对应的编解码器。
pub fn default_codec() -> Result<TextCodec> {
    TextCodec::for_label(DEFAULT_TEXT_ENCODING)
}
