//! # 像素网格模块
//!
//! 定义隐写核心访问像素的接口 [`PixelGrid`]，并为 `image` 库的 RGB/RGBA 缓冲区
//! 以及基于文件的 [`Carrier`] 提供实现。

use crate::address;
use crate::error::{Result, StegoError};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

/// 隐写核心所需的像素网格访问器。
///
/// 每个像素暴露三个 8 位通道 (通道 0、1、2)。越界的行列属于调用方的编程错误，
/// 实现必须返回 [`StegoError::PixelOutOfBounds`]，不得截断到边界。
pub trait PixelGrid {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn get_channels(&self, row: usize, col: usize) -> Result<[u8; 3]>;

    fn set_channels(&mut self, row: usize, col: usize, channels: [u8; 3]) -> Result<()>;

    /// 网格的槽位总数。
    fn capacity(&self) -> usize {
        address::capacity(self.width(), self.height())
    }
}

fn out_of_bounds(row: usize, col: usize, width: usize, height: usize) -> StegoError {
    StegoError::PixelOutOfBounds {
        row,
        col,
        width,
        height,
    }
}

/// 行列转换为 `image` 使用的 `(x, y)` 坐标，超出 `u32` 的值视为越界。
fn to_xy(row: usize, col: usize) -> Option<(u32, u32)> {
    Some((u32::try_from(col).ok()?, u32::try_from(row).ok()?))
}

impl PixelGrid for RgbImage {
    fn width(&self) -> usize {
        self.dimensions().0 as usize
    }

    fn height(&self) -> usize {
        self.dimensions().1 as usize
    }

    fn get_channels(&self, row: usize, col: usize) -> Result<[u8; 3]> {
        to_xy(row, col)
            .and_then(|(x, y)| self.get_pixel_checked(x, y))
            .map(|pixel| pixel.0)
            .ok_or_else(|| out_of_bounds(row, col, PixelGrid::width(self), PixelGrid::height(self)))
    }

    fn set_channels(&mut self, row: usize, col: usize, channels: [u8; 3]) -> Result<()> {
        let (width, height) = (PixelGrid::width(self), PixelGrid::height(self));
        let pixel = to_xy(row, col)
            .and_then(|(x, y)| self.get_pixel_mut_checked(x, y))
            .ok_or_else(|| out_of_bounds(row, col, width, height))?;
        *pixel = Rgb(channels);
        Ok(())
    }
}

impl PixelGrid for RgbaImage {
    fn width(&self) -> usize {
        self.dimensions().0 as usize
    }

    fn height(&self) -> usize {
        self.dimensions().1 as usize
    }

    fn get_channels(&self, row: usize, col: usize) -> Result<[u8; 3]> {
        to_xy(row, col)
            .and_then(|(x, y)| self.get_pixel_checked(x, y))
            .map(|Rgba([r, g, b, _])| [*r, *g, *b])
            .ok_or_else(|| out_of_bounds(row, col, PixelGrid::width(self), PixelGrid::height(self)))
    }

    fn set_channels(&mut self, row: usize, col: usize, [r, g, b]: [u8; 3]) -> Result<()> {
        let (width, height) = (PixelGrid::width(self), PixelGrid::height(self));
        let pixel = to_xy(row, col)
            .and_then(|(x, y)| self.get_pixel_mut_checked(x, y))
            .ok_or_else(|| out_of_bounds(row, col, width, height))?;
        // Alpha 保持原值
        let alpha = pixel.0[3];
        *pixel = Rgba([r, g, b, alpha]);
        Ok(())
    }
}

/// 从文件加载、可写回文件的载体图像。
///
/// 带 Alpha 通道的源图像保留为 RGBA，其余统一转换为 RGB。
/// 高位深 (如 16 位) 图像会被降为每通道 8 位。
#[derive(Debug, Clone)]
pub enum Carrier {
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

impl Carrier {
    /// 解码图像文件，格式由文件内容和扩展名决定。
    ///
    /// # Errors
    ///
    /// 文件无法读取或不是受支持的 (无损) 图像格式时返回 [`StegoError::Image`]。
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path)?;
        Ok(Self::from_image(image))
    }

    pub fn from_image(image: DynamicImage) -> Self {
        if image.color().has_alpha() {
            Carrier::Rgba(image.to_rgba8())
        } else {
            Carrier::Rgb(image.to_rgb8())
        }
    }

    /// 按目标路径的扩展名编码并保存图像。
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        match self {
            Carrier::Rgb(buffer) => buffer.save(path)?,
            Carrier::Rgba(buffer) => buffer.save(path)?,
        }
        Ok(())
    }
}

impl PixelGrid for Carrier {
    fn width(&self) -> usize {
        match self {
            Carrier::Rgb(buffer) => PixelGrid::width(buffer),
            Carrier::Rgba(buffer) => PixelGrid::width(buffer),
        }
    }

    fn height(&self) -> usize {
        match self {
            Carrier::Rgb(buffer) => PixelGrid::height(buffer),
            Carrier::Rgba(buffer) => PixelGrid::height(buffer),
        }
    }

    fn get_channels(&self, row: usize, col: usize) -> Result<[u8; 3]> {
        match self {
            Carrier::Rgb(buffer) => buffer.get_channels(row, col),
            Carrier::Rgba(buffer) => buffer.get_channels(row, col),
        }
    }

    fn set_channels(&mut self, row: usize, col: usize, channels: [u8; 3]) -> Result<()> {
        match self {
            Carrier::Rgb(buffer) => buffer.set_channels(row, col, channels),
            Carrier::Rgba(buffer) => buffer.set_channels(row, col, channels),
        }
    }
}
