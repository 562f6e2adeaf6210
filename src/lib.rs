//! # ppm_hide 库
//!
//! 本库包含 PPM 图像 LSB 隐写工具的核心逻辑：
//! 位图模型 (`bitmap`)、容量计算 (`capacity`) 与隐写编解码器 (`steganography`)。

// 声明库包含的所有模块。

pub mod bitmap;
pub mod capacity;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod steganography;

pub use bitmap::Raster;
pub use error::StegError;
