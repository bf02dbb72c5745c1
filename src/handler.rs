//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、文本编码转换、调用核心隐写算法以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, RecoverArgs, framing};
use crate::constants::{DOCTORED_PREFIX, RECOVERED_PREFIX};
use crate::grid::{Carrier, PixelGrid};
use crate::steganography::{embed_in_place, extract};
use crate::text::TextCodec;
use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// 在 `source` 旁生成 `<前缀><文件名>.<扩展名>` 形式的默认输出路径。
fn default_output_path(source: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    source.with_file_name(format!("{prefix}{stem}.{extension}"))
}

/// 未指定 `--force` 时拒绝覆盖已存在的文件。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn open_carrier(path: &Path) -> Result<Carrier> {
    Carrier::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

fn text_codec(label: &str) -> Result<TextCodec> {
    TextCodec::for_label(label).with_context(|| {
        format!(
            "Unsupported text encoding: {}",
            label.red().bold()
        )
    })
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本文件、将文本转换为载荷字节、检查隐写空间是否足够、
/// 调用隐写核心函数写入载荷，最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径及格式选项的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或文本文件。
/// * 文本无法用所选编码表示。
/// * 图像文件没有足够的空间来隐藏文本。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_output_path(&args.image, DOCTORED_PREFIX, "png"));
    ensure_writable(&dest, args.force)?;

    let mut carrier = open_carrier(&args.image)?;

    let content = fs::read(&args.text).with_context(|| {
        format!(
            "Unable to read text file: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;

    let payload = if args.raw {
        content
    } else {
        let text = String::from_utf8(content).with_context(|| {
            format!(
                "Text file is not valid UTF-8: {}",
                args.text.to_string_lossy().red().bold()
            )
        })?;
        text_codec(&args.encoding)?.encode(&text)?
    };

    let framing = framing(args.legacy);
    let available_space = framing.max_payload_len(carrier.capacity());

    anyhow::ensure!(
        available_space >= payload.len(),
        "Not enough space in the image to hide the text. \nRequired: {}, Available: {}",
        payload.len().to_string().red().bold(),
        available_space.to_string().green().bold()
    );

    embed_in_place(&payload, &mut carrier, framing).with_context(|| {
        "Failed to hide the message in the image. \nThe image may be corrupt."
    })?;
    info!(
        "Hid {} bytes in {} ({framing:?})",
        payload.len(),
        args.image.display()
    );

    carrier.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数取回载荷、
/// 将载荷转换为文本，最后写入目标文本文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径及格式选项的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件。
/// * 图像中没有可识别的隐写数据。
/// * 恢复的字节不是所选编码的合法文本。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let text_path = args
        .text
        .clone()
        .unwrap_or_else(|| default_output_path(&args.image, RECOVERED_PREFIX, "txt"));
    ensure_writable(&text_path, args.force)?;

    let carrier = open_carrier(&args.image)?;

    let payload = extract(&carrier, framing(args.legacy)).with_context(|| {
        format!(
            "Failed to recover the hidden message from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    info!("Recovered {} bytes from {}", payload.len(), args.image.display());

    let content = if args.raw {
        payload
    } else {
        text_codec(&args.encoding)?
            .decode(&payload)
            .with_context(|| {
                format!(
                    "The recovered data is not valid {} text. \nTry --raw or another --encoding.",
                    args.encoding.red().bold()
                )
            })?
            .into_bytes()
    };

    fs::write(&text_path, content).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            text_path.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        text_path.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 输出图像的槽位数以及在所选帧格式下可隐藏的最大字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let carrier = open_carrier(&args.image)?;
    let slots = carrier.capacity();
    let max_payload = framing(args.legacy).max_payload_len(slots);

    println!(
        "{} ({}x{}): {} slots, up to {} bytes of hidden data",
        args.image.to_string_lossy().bold(),
        carrier.width(),
        carrier.height(),
        slots.to_string().green(),
        max_payload.to_string().green().bold()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let source = Path::new("/tmp/pictures/original.bmp");
        assert_eq!(
            default_output_path(source, DOCTORED_PREFIX, "png"),
            PathBuf::from("/tmp/pictures/doctored_original.png")
        );
        assert_eq!(
            default_output_path(Path::new("doctored_original.png"), RECOVERED_PREFIX, "txt"),
            PathBuf::from("recovered_doctored_original.txt")
        );
    }
}
