use crate::constants::{BITS_PER_BYTE, CHANNELS_PER_PIXEL, LENGTH_PREFIX_BITS};

/// 计算给定尺寸的图像最多能隐藏多少字节的载荷。
///
/// 总通道字节数减去长度前缀占用的 32 个之后，按每 8 个通道字节一个载荷字节向下取整。
/// 图像过小时返回 0。
pub fn capacity(width: usize, height: usize) -> usize {
    capacity_for_channels(width.saturating_mul(height).saturating_mul(CHANNELS_PER_PIXEL))
}

/// 与 [`capacity`] 相同，但直接以通道字节总数计算。
pub fn capacity_for_channels(channels: usize) -> usize {
    channels.saturating_sub(LENGTH_PREFIX_BITS) / BITS_PER_BYTE
}
