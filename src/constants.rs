/// 每个像素参与隐写的颜色通道数 (R, G, B)。
/// Alpha 通道即使存在也不会被读写。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 一个字节的位数，同时也是一个 "字节组" 占用的槽位数。
/// 每个槽位 (通道的最低有效位) 存储 1 bit。
pub const BITS_PER_BYTE: usize = 8;

/// 空终止模式下，载荷之后追加的零位数量。
pub const TERMINATOR_BITS: usize = 8;

/// 长度前缀模式下，用于隐写载荷长度的字节数。
/// 长度以小端序 `u32` 存储，因此需要 4 * 8 = 32 个槽位。
pub const LENGTH_PREFIX_BYTES: usize = 4;

/// 未指定 `--encoding` 时使用的文本编码标签 (Big5，即代码页 950)。
pub const DEFAULT_TEXT_ENCODING: &str = "big5";

/// 未指定目标路径时，隐写结果图像文件名的前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 未指定目标路径时，恢复文本文件名的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";
