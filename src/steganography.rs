//! # 隐写核心
//!
//! 将字节载荷逐位写入像素通道的最低有效位，并按相同顺序读回。
//!
//! 载荷的每个字节按 "低位先出" 的顺序占用 8 个连续槽位，槽位顺序由
//! [`crate::address`] 定义。帧格式见 [`Framing`]。

use crate::address::{self, SlotAddress};
use crate::bits::{lsb, reverse_bits, with_lsb};
use crate::constants::{BITS_PER_BYTE, CHANNELS_PER_PIXEL, LENGTH_PREFIX_BYTES, TERMINATOR_BITS};
use crate::error::{Result, StegoError};
use crate::grid::PixelGrid;
use log::{debug, warn};

/// 隐写流的帧格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// 4 字节小端序长度前缀 + 载荷。载荷可以包含任意字节。
    #[default]
    LengthPrefixed,

    /// 载荷 + 8 个零位终止符，与旧版工具生成的图像逐位兼容。
    ///
    /// 载荷中的 `0x00` 字节与终止符无法区分，恢复时会在该处截断。
    NullTerminated,
}

impl Framing {
    /// 隐藏 `len` 字节载荷所需的槽位数。
    pub fn required_bits(self, len: usize) -> usize {
        let overhead = match self {
            Framing::LengthPrefixed => LENGTH_PREFIX_BYTES * BITS_PER_BYTE,
            Framing::NullTerminated => TERMINATOR_BITS,
        };
        len.saturating_mul(BITS_PER_BYTE).saturating_add(overhead)
    }

    /// 在给定槽位数下可隐藏的最大载荷字节数。
    pub fn max_payload_len(self, capacity: usize) -> usize {
        let bytes = capacity / BITS_PER_BYTE;
        match self {
            Framing::LengthPrefixed => bytes
                .saturating_sub(LENGTH_PREFIX_BYTES)
                .min(u32::MAX as usize),
            Framing::NullTerminated => bytes.saturating_sub(TERMINATOR_BITS / BITS_PER_BYTE),
        }
    }
}

/// 嵌入状态：先隐藏载荷，再补零直到终止符写满。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Hiding,
    FillingWithZeros { emitted: usize },
}

/// 以像素为单位缓冲通道修改的写入器。
///
/// 一个像素的三个通道处理完毕时写回网格；流在像素中途结束时，
/// 由 [`PixelWriter::finish`] 写回已修改的部分。
struct PixelWriter<'a, G: PixelGrid + ?Sized> {
    grid: &'a mut G,
    width: usize,
    height: usize,
    pending: Option<(usize, usize, [u8; 3])>,
}

impl<'a, G: PixelGrid + ?Sized> PixelWriter<'a, G> {
    fn new(grid: &'a mut G) -> Self {
        let (width, height) = (grid.width(), grid.height());
        Self {
            grid,
            width,
            height,
            pending: None,
        }
    }

    fn write_bit(&mut self, slot: usize, bit: u8) -> Result<()> {
        let SlotAddress { row, col, channel } = address::locate(slot, self.width, self.height)?;

        if !matches!(self.pending, Some((r, c, _)) if r == row && c == col) {
            self.flush()?;
            self.pending = Some((row, col, self.grid.get_channels(row, col)?));
        }
        if let Some((_, _, channels)) = &mut self.pending {
            channels[channel] = with_lsb(channels[channel], bit);
        }

        if channel == CHANNELS_PER_PIXEL - 1 {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some((row, col, channels)) = self.pending.take() {
            self.grid.set_channels(row, col, channels)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.flush()
    }
}

/// 按槽位顺序读取最低有效位，缓存当前像素避免重复访问网格。
struct PixelReader<'a, G: PixelGrid + ?Sized> {
    grid: &'a G,
    width: usize,
    height: usize,
    cached: Option<(usize, usize, [u8; 3])>,
}

impl<'a, G: PixelGrid + ?Sized> PixelReader<'a, G> {
    fn new(grid: &'a G) -> Self {
        Self {
            grid,
            width: grid.width(),
            height: grid.height(),
            cached: None,
        }
    }

    fn read_bit(&mut self, slot: usize) -> Result<u8> {
        let SlotAddress { row, col, channel } = address::locate(slot, self.width, self.height)?;
        let channels = match self.cached {
            Some((r, c, channels)) if r == row && c == col => channels,
            _ => {
                let channels = self.grid.get_channels(row, col)?;
                self.cached = Some((row, col, channels));
                channels
            }
        };
        Ok(lsb(channels[channel]))
    }

    /// 读取从 `first_slot` 开始的一个字节组并还原为字节。
    fn read_byte(&mut self, first_slot: usize) -> Result<u8> {
        let mut value = 0u8;
        for slot in first_slot..first_slot + BITS_PER_BYTE {
            value = (value << 1) | self.read_bit(slot)?;
        }
        Ok(reverse_bits(value))
    }
}

/// 将字节流与 `terminator_bits` 个零位写入网格，返回写入的槽位数。
///
/// 调用方必须事先确认容量足够。
fn write_stream<G: PixelGrid + ?Sized>(
    grid: &mut G,
    stream: impl IntoIterator<Item = u8>,
    terminator_bits: usize,
) -> Result<usize> {
    let mut bytes = stream.into_iter();
    let mut writer = PixelWriter::new(grid);
    let mut state = State::Hiding;
    let mut current = 0u8;
    let mut slot = 0usize;

    loop {
        if slot % BITS_PER_BYTE == 0 {
            if state == State::Hiding {
                match bytes.next() {
                    Some(byte) => current = byte,
                    None => state = State::FillingWithZeros { emitted: 0 },
                }
            }
            if let State::FillingWithZeros { emitted } = state {
                if emitted >= terminator_bits {
                    break;
                }
            }
        }

        let bit = match &mut state {
            State::Hiding => (current >> (slot % BITS_PER_BYTE)) & 1,
            State::FillingWithZeros { emitted } => {
                *emitted += 1;
                0
            }
        };
        writer.write_bit(slot, bit)?;
        slot += 1;
    }

    // 流可能在像素中途结束，已修改的通道仍需写回
    writer.finish()?;
    Ok(slot)
}

/// 在网格上原地隐藏载荷。
///
/// 容量不足时在修改网格之前返回错误，网格保持原样。成功后，
/// 被隐写流覆盖的通道与原值最多相差 1，其余通道完全不变。
///
/// # Errors
///
/// * [`StegoError::CapacityExceeded`] - 载荷加帧开销超出网格槽位数。
/// * [`StegoError::PayloadTooLarge`] - 长度前缀模式下载荷超过 `u32::MAX` 字节。
/// * 网格访问器报告的越界错误。
pub fn embed_in_place<G: PixelGrid + ?Sized>(
    payload: &[u8],
    grid: &mut G,
    framing: Framing,
) -> Result<()> {
    let required = framing.required_bits(payload.len());
    let available = grid.capacity();
    if required > available {
        return Err(StegoError::CapacityExceeded {
            required,
            available,
        });
    }

    let written = match framing {
        Framing::LengthPrefixed => {
            let len = u32::try_from(payload.len())
                .map_err(|_| StegoError::PayloadTooLarge { len: payload.len() })?;
            let stream = len.to_le_bytes().into_iter().chain(payload.iter().copied());
            write_stream(grid, stream, 0)?
        }
        Framing::NullTerminated => {
            if payload.contains(&0) {
                warn!("Payload contains a 0x00 byte; recovery will stop at the first one");
            }
            write_stream(grid, payload.iter().copied(), TERMINATOR_BITS)?
        }
    };

    debug!(
        "Embedded {} payload bytes into {written} of {available} slots ({framing:?})",
        payload.len()
    );
    Ok(())
}

/// 在网格的副本上隐藏载荷并返回副本，原网格不受影响。
pub fn embed<G: PixelGrid + Clone>(payload: &[u8], grid: &G, framing: Framing) -> Result<G> {
    let mut doctored = grid.clone();
    embed_in_place(payload, &mut doctored, framing)?;
    Ok(doctored)
}

/// 从网格中恢复隐藏的载荷。
///
/// # Errors
///
/// * [`StegoError::NoTerminatorFound`] - 空终止模式下遍历完全部槽位仍未遇到零字节。
/// * [`StegoError::InvalidLength`] - 长度前缀模式下声明的长度超出图像容量。
pub fn extract<G: PixelGrid + ?Sized>(grid: &G, framing: Framing) -> Result<Vec<u8>> {
    match framing {
        Framing::LengthPrefixed => extract_length_prefixed(grid),
        Framing::NullTerminated => extract_null_terminated(grid),
    }
}

fn extract_null_terminated<G: PixelGrid + ?Sized>(grid: &G) -> Result<Vec<u8>> {
    let mut reader = PixelReader::new(grid);
    let mut recovered = Vec::new();
    let mut value = 0u8;

    for slot in 0..grid.capacity() {
        value = (value << 1) | reader.read_bit(slot)?;

        if (slot + 1) % BITS_PER_BYTE == 0 {
            let byte = reverse_bits(value);
            if byte == 0 {
                debug!("Found terminator after {} bytes", recovered.len());
                return Ok(recovered);
            }
            recovered.push(byte);
            value = 0;
        }
    }

    Err(StegoError::NoTerminatorFound)
}

fn extract_length_prefixed<G: PixelGrid + ?Sized>(grid: &G) -> Result<Vec<u8>> {
    let capacity = grid.capacity();
    let max = Framing::LengthPrefixed.max_payload_len(capacity);
    if capacity < Framing::LengthPrefixed.required_bits(0) {
        return Err(StegoError::InvalidLength { declared: 0, max });
    }

    let mut reader = PixelReader::new(grid);
    let mut prefix = [0u8; LENGTH_PREFIX_BYTES];
    for (i, byte) in prefix.iter_mut().enumerate() {
        *byte = reader.read_byte(i * BITS_PER_BYTE)?;
    }

    let declared = u32::from_le_bytes(prefix) as usize;
    if declared > max {
        return Err(StegoError::InvalidLength { declared, max });
    }
    debug!("Length prefix declares {declared} bytes");

    (0..declared)
        .map(|i| reader.read_byte((LENGTH_PREFIX_BYTES + i) * BITS_PER_BYTE))
        .collect()
}
