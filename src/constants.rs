/// 二进制 PPM (Portable Pixmap) 文件头部的魔数。
pub const PPM_MAGIC: &[u8; 2] = b"P6";

/// 每个像素包含的通道字节数 (R, G, B)。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 隐写编解码器所支持的最大通道值。
/// 只支持 8 位色深，因此每个通道恰好占用一个字节。
pub const MAX_SUPPORTED_CHANNEL_VALUE: usize = 255;

/// 长度前缀所占的位数。
/// 载荷长度以 `u32` 大端序 (最高位在前) 写入，
/// 每个通道字节的最低位存储 1 bit，因此需要 32 个通道字节。
pub const LENGTH_PREFIX_BITS: usize = 32;

/// 每个载荷字节占用的通道字节数 (每个通道字节 1 bit)。
pub const BITS_PER_BYTE: usize = 8;

/// 通道字节中保留的高 7 位掩码。
pub const UPPER_BITS_MASK: u8 = 0xFE;

/// 通道字节中用于隐写的最低有效位掩码。
pub const LSB_MASK: u8 = 0x01;
