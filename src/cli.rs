//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::constants::DEFAULT_TEXT_ENCODING;
use crate::steganography::Framing;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 的颜色通道中隐藏或恢复文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 的颜色通道中隐藏或恢复文本。"
)]
pub struct Cli {
    /// 输出更详细的日志，可重复使用 (-v, -vv, -vvv)。
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像 (如 PNG, BMP) 中隐藏文本文件内容。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 显示图像可隐藏的最大字节数。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径 (UTF-8)。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 隐写完成后，保存结果图像的输出路径。默认为输入图像旁的 `doctored_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 允许覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,

    /// 使用旧版的空终止格式 (载荷不能包含零字节)。
    #[arg(long)]
    pub legacy: bool,

    /// 直接隐藏文件的原始字节，不做文本编码转换。
    #[arg(long)]
    pub raw: bool,

    /// 载荷使用的文本编码标签。
    #[arg(short, long, default_value = DEFAULT_TEXT_ENCODING)]
    pub encoding: String,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本后，保存文本内容的输出路径。默认为图像旁的 `recovered_<名称>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 允许覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,

    /// 图像使用旧版的空终止格式。
    #[arg(long)]
    pub legacy: bool,

    /// 直接写出恢复的原始字节，不做文本编码转换。
    #[arg(long)]
    pub raw: bool,

    /// 载荷使用的文本编码标签。
    #[arg(short, long, default_value = DEFAULT_TEXT_ENCODING)]
    pub encoding: String,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 按旧版的空终止格式计算。
    #[arg(long)]
    pub legacy: bool,
}

/// 由 `--legacy` 开关决定帧格式。
pub fn framing(legacy: bool) -> Framing {
    if legacy {
        Framing::NullTerminated
    } else {
        Framing::LengthPrefixed
    }
}
