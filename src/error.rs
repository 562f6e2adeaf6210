//! # 错误类型模块
//!
//! 定义了库中所有核心操作可能返回的错误。

use thiserror::Error;

/// 隐写库的错误类型。
#[derive(Error, Debug)]
pub enum StegError {
    /// 载体图像的字节流不符合 P6 格式，例如头部损坏、尺寸非法或像素数据被截断。
    #[error("Malformed carrier image: {0}")]
    Format(String),

    /// 载荷长度超过载体的隐写容量，或解码出的长度字段超过容量 (数据损坏或非隐写图像)。
    #[error("Payload of {requested} bytes does not fit into the carrier capacity of {capacity} bytes")]
    Capacity { requested: u64, capacity: usize },

    /// 外部文件读写失败。
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
