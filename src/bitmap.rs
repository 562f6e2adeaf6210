//! # 位图模型模块
//!
//! 负责二进制 PPM (P6) 载体图像的解析与序列化。
//! 解析时会原样保留头部字节 (包括注释与非标准空白) 以及像素数据之后的多余字节，
//! 因此对任何解析得到的 `Raster`，序列化结果与原始文件逐字节一致，
//! 经过隐写修改后也只有通道字节发生变化。

use crate::capacity::capacity;
use crate::constants::{CHANNELS_PER_PIXEL, MAX_SUPPORTED_CHANNEL_VALUE, PPM_MAGIC};
use crate::error::StegError;
use log::debug;

/// 内存中的 RGB 光栅图像。
///
/// `channel_bytes` 按行优先顺序存储，每个像素依次贡献 R、G、B 三个字节，
/// 其长度恒等于 `width * height * 3`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    max_channel_value: u8,
    header: Vec<u8>,
    channel_bytes: Vec<u8>,
    trailer: Vec<u8>,
}

impl Raster {
    /// 根据尺寸与像素数据构造一个新的光栅图像，并生成标准头部 `P6\n<w> <h>\n<max>\n`。
    ///
    /// # Errors
    ///
    /// 尺寸为零、最大通道值为零或 `channel_bytes` 长度与尺寸不符时返回 [`StegError::Format`]。
    pub fn new(
        width: usize,
        height: usize,
        max_channel_value: u8,
        channel_bytes: Vec<u8>,
    ) -> Result<Self, StegError> {
        validate_dimensions(width, height)?;
        validate_max_value(max_channel_value as usize)?;
        let expected = channel_len(width, height)?;
        if channel_bytes.len() != expected {
            return Err(StegError::Format(format!(
                "expected {expected} channel bytes for a {width}x{height} image, got {}",
                channel_bytes.len()
            )));
        }

        let header = format!(
            "{}\n{width} {height}\n{max_channel_value}\n",
            String::from_utf8_lossy(PPM_MAGIC)
        )
        .into_bytes();

        Ok(Self {
            width,
            height,
            max_channel_value,
            header,
            channel_bytes,
            trailer: Vec::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_channel_value(&self) -> u8 {
        self.max_channel_value
    }

    /// 原样保留的头部字节，从魔数一直到像素数据之前的那个空白字节。
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    pub fn channel_bytes(&self) -> &[u8] {
        &self.channel_bytes
    }

    /// 可变的通道字节切片。切片长度固定，因此无法破坏尺寸不变量。
    pub fn channel_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.channel_bytes
    }

    /// 该图像最多可隐藏的载荷字节数。
    pub fn capacity(&self) -> usize {
        capacity(self.width, self.height)
    }
}

/// 解析二进制 PPM (P6) 字节流。
///
/// # Errors
///
/// 以下任一情况返回 [`StegError::Format`]：
/// * 魔数不是 `P6`，或头部字段缺失、不是十进制数字。
/// * 宽度或高度为零，或像素总数溢出。
/// * 最大通道值不在 `[1, 255]` 范围内。
/// * 字节流比头部加上 `width * height * 3` 更短。
pub fn parse(bytes: &[u8]) -> Result<Raster, StegError> {
    let mut cursor = HeaderCursor::new(bytes);

    cursor.expect_magic()?;
    let width = cursor.read_field("width")?;
    let height = cursor.read_field("height")?;
    let max_value = cursor.read_field("max channel value")?;
    cursor.expect_single_whitespace()?;

    validate_dimensions(width, height)?;
    let max_channel_value = validate_max_value(max_value)?;
    let needed = channel_len(width, height)?;

    let (header, rest) = bytes.split_at(cursor.pos);
    if rest.len() < needed {
        return Err(StegError::Format(format!(
            "pixel data truncated: {width}x{height} needs {needed} bytes, found {}",
            rest.len()
        )));
    }
    let (channel_bytes, trailer) = rest.split_at(needed);

    debug!(
        "Parsed P6 carrier: {width}x{height}, maxval {max_channel_value}, header {} bytes, trailer {} bytes",
        header.len(),
        trailer.len()
    );

    Ok(Raster {
        width,
        height,
        max_channel_value,
        header: header.to_vec(),
        channel_bytes: channel_bytes.to_vec(),
        trailer: trailer.to_vec(),
    })
}

/// 将光栅图像序列化为字节流：头部、通道字节、尾部多余字节依次拼接。
pub fn serialize(raster: &Raster) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        raster.header.len() + raster.channel_bytes.len() + raster.trailer.len(),
    );
    out.extend_from_slice(&raster.header);
    out.extend_from_slice(&raster.channel_bytes);
    out.extend_from_slice(&raster.trailer);
    out
}

fn validate_dimensions(width: usize, height: usize) -> Result<(), StegError> {
    if width == 0 || height == 0 {
        return Err(StegError::Format(format!(
            "image dimensions must be positive, got {width}x{height}"
        )));
    }
    Ok(())
}

fn validate_max_value(max_value: usize) -> Result<u8, StegError> {
    match u8::try_from(max_value) {
        Ok(value) if value > 0 && max_value <= MAX_SUPPORTED_CHANNEL_VALUE => Ok(value),
        _ => Err(StegError::Format(format!(
            "max channel value {max_value} is outside the supported range 1..={MAX_SUPPORTED_CHANNEL_VALUE}"
        ))),
    }
}

fn channel_len(width: usize, height: usize) -> Result<usize, StegError> {
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(CHANNELS_PER_PIXEL))
        .ok_or_else(|| {
            StegError::Format(format!("image dimensions {width}x{height} are too large"))
        })
}

/// netpbm 定义的空白字符。
fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// 头部解析游标。
struct HeaderCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> HeaderCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn expect_magic(&mut self) -> Result<(), StegError> {
        if !self.data.starts_with(PPM_MAGIC) {
            return Err(StegError::Format(
                "missing P6 magic token (only binary RGB PPM is supported)".to_string(),
            ));
        }
        self.pos = PPM_MAGIC.len();
        Ok(())
    }

    /// 跳过空白与 `#` 注释，返回是否至少跳过了一个分隔符。
    fn skip_separators(&mut self) -> bool {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if is_whitespace(byte) {
                self.pos += 1;
            } else if byte == b'#' {
                while let Some(c) = self.peek() {
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
        self.pos > start
    }

    /// 读取一个由分隔符引导的十进制字段。
    fn read_field(&mut self, name: &str) -> Result<usize, StegError> {
        if !self.skip_separators() {
            return Err(StegError::Format(format!(
                "expected whitespace before {name} at byte {}",
                self.pos
            )));
        }

        let start = self.pos;
        let mut value: usize = 0;
        while let Some(byte) = self.peek().filter(u8::is_ascii_digit) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(usize::from(byte - b'0')))
                .ok_or_else(|| StegError::Format(format!("{name} is too large")))?;
            self.pos += 1;
        }

        if self.pos == start {
            return Err(StegError::Format(format!(
                "expected decimal {name} at byte {}",
                self.pos
            )));
        }
        Ok(value)
    }

    /// 最大通道值之后必须恰好有一个空白字节，随后即为像素数据。
    fn expect_single_whitespace(&mut self) -> Result<(), StegError> {
        match self.peek() {
            Some(byte) if is_whitespace(byte) => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(StegError::Format(
                "expected a single whitespace byte after the max channel value".to_string(),
            )),
        }
    }
}
