//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和位置参数。
//! 除自动生成的 `--help` 与 `--version` 之外不识别任何其他选项。

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在二进制 PPM (P6) 图像中隐藏或恢复任意文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在二进制 PPM (P6) 图像中隐藏或恢复任意文件。\n\n日志级别可通过 RUST_LOG 环境变量控制，例如 RUST_LOG=ppm_hide=debug。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：encode (隐藏)、decode (恢复) 和 capacity (查询容量)。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 将任意文件隐藏进 PPM 载体图像，并保存为新的图像。
    Encode(EncodeArgs),

    /// 从经过隐写的 PPM 图像中恢复隐藏的文件。
    Decode(DecodeArgs),

    /// 显示 PPM 载体图像的尺寸及可隐藏的最大字节数。
    Capacity(CapacityArgs),
}

/// 'encode' 命令所需的参数。
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// 用作载体的输入 PPM 图像文件路径。
    pub input_image: PathBuf,

    /// 要隐藏的载荷文件路径 (任意二进制文件)。
    pub payload_file: PathBuf,

    /// 隐写完成后，保存结果图像的输出路径。
    pub output_image: PathBuf,
}

/// 'decode' 命令所需的参数。
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// 已隐藏数据的 PPM 图像文件路径。
    pub input_image: PathBuf,

    /// 恢复数据后，保存载荷内容的输出路径。
    pub output_file: PathBuf,
}

/// 'capacity' 命令所需的参数。
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// 要查询容量的 PPM 图像文件路径。
    pub input_image: PathBuf,
}
