//! # 命令处理逻辑模块
//!
//! 包含处理 `encode`、`decode` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。
//! 所有输出文件都只在内存中的变换完全成功之后才会写入。

use crate::bitmap::{Raster, parse, serialize};
use crate::cli::{CapacityArgs, DecodeArgs, EncodeArgs};
use crate::error::StegError;
use crate::steganography::{decode, encode};
use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::fs;
use std::path::Path;

/// 处理 'Encode' 命令的执行逻辑。
///
/// 负责读取载体图像和载荷文件、调用隐写核心函数隐藏长度和载荷，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `EncodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或载荷文件。
/// * 输入图像不是合法的 P6 格式。
/// * 图像没有足够的空间来隐藏载荷。
/// * 无法写入到目标图像文件。
pub fn handle_encode(args: EncodeArgs) -> Result<()> {
    let carrier = load_raster(&args.input_image)?;

    let payload = fs::read(&args.payload_file)
        .map_err(StegError::from)
        .with_context(|| {
            format!(
                "Unable to read payload file: {}",
                args.payload_file.to_string_lossy().red().bold()
            )
        })?;

    let stego = encode(&carrier, &payload).with_context(|| {
        format!(
            "Not enough space in the image to hide the payload. \nRequired: {}, Available: {}",
            payload.len().to_string().red().bold(),
            carrier.capacity().to_string().green().bold()
        )
    })?;

    fs::write(&args.output_image, serialize(&stego))
        .map_err(StegError::from)
        .with_context(|| {
            format!(
                "Unable to write to target image file: {}",
                args.output_image.to_string_lossy().red().bold()
            )
        })?;

    info!(
        "Encoded {} bytes from {} into {}",
        payload.len(),
        args.payload_file.display(),
        args.output_image.display()
    );
    println!(
        "The payload has been successfully hidden and saved: {}",
        args.output_image.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Decode' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数获取载荷长度和内容，
/// 最后将恢复的载荷写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `DecodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件，或其不是合法的 P6 格式。
/// * 解码出的长度超过图像容量 (图像可能不含隐藏数据或已损坏)，此时不会创建输出文件。
/// * 无法写入到目标文件。
pub fn handle_decode(args: DecodeArgs) -> Result<()> {
    let stego = load_raster(&args.input_image)?;

    let payload = decode(&stego).with_context(|| {
        format!(
            "Failed to recover the payload from '{}'. \nThe image may not contain a hidden payload or is corrupted.",
            args.input_image.to_string_lossy().red().bold()
        )
    })?;

    fs::write(&args.output_file, &payload)
        .map_err(StegError::from)
        .with_context(|| {
            format!(
                "Unable to write to target file: {}",
                args.output_file.to_string_lossy().red().bold()
            )
        })?;

    info!(
        "Decoded {} bytes from {} into {}",
        payload.len(),
        args.input_image.display(),
        args.output_file.display()
    );
    println!(
        "The payload has been successfully recovered and saved: {}",
        args.output_file.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑：报告图像尺寸及最多可隐藏的字节数，不写入任何文件。
///
/// # Errors
///
/// 无法读取输入图像或其不是合法的 P6 格式时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<usize> {
    let carrier = load_raster(&args.input_image)?;
    let capacity = carrier.capacity();

    println!(
        "{}: {}x{} pixels, max channel value {}, capacity {} bytes",
        args.input_image.to_string_lossy().bold(),
        carrier.width(),
        carrier.height(),
        carrier.max_channel_value(),
        capacity.to_string().green().bold()
    );

    Ok(capacity)
}

/// 读取并解析一个 P6 图像文件。
fn load_raster(path: &Path) -> Result<Raster> {
    let bytes = fs::read(path).map_err(StegError::from).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    parse(&bytes).with_context(|| {
        format!(
            "'{}' is not a supported binary PPM (P6) image.",
            path.to_string_lossy().red().bold()
        )
    })
}
