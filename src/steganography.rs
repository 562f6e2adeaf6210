//! # 隐写核心算法模块
//!
//! 嵌入流的格式：32 位大端序载荷长度，随后是载荷的每个字节，
//! 每个字节都按最高位在前的顺序展开。嵌入流的第 `i` 位写入 `channel_bytes[i]` 的最低有效位，
//! 编码与解码严格使用同一顺序。

use crate::bitmap::Raster;
use crate::capacity::capacity_for_channels;
use crate::constants::{BITS_PER_BYTE, LENGTH_PREFIX_BITS, LSB_MASK, UPPER_BITS_MASK};
use crate::error::StegError;
use log::{debug, trace};

/// 将 `data` 的每一位 (字节内最高位在前) 依次写入从 `offset` 开始的通道字节的最低有效位。
///
/// 每个通道字节只修改最低位，高 7 位保持不变。
///
/// # Errors
///
/// 写入区域超出 `channels` 边界时返回 [`StegError::Capacity`]，此时不会修改任何字节。
pub fn hide_bytes(data: &[u8], channels: &mut [u8], offset: usize) -> Result<(), StegError> {
    let end = region_end(channels.len(), offset, data.len())?;
    trace!("Hiding {} bytes in channel bytes {offset}..{end}", data.len());

    channels[offset..end]
        .chunks_exact_mut(BITS_PER_BYTE)
        .zip(data)
        .for_each(|(chunk, &byte)| {
            for (i, channel) in chunk.iter_mut().enumerate() {
                let bit = (byte >> (BITS_PER_BYTE - 1 - i)) & LSB_MASK;
                *channel = (*channel & UPPER_BITS_MASK) | bit;
            }
        });

    Ok(())
}

/// 从 `offset` 开始读取 `len * 8` 个通道字节的最低有效位，按最高位在前重组为 `len` 个字节。
///
/// # Errors
///
/// 读取区域超出 `channels` 边界时返回 [`StegError::Capacity`]。
pub fn reveal_bytes(channels: &[u8], offset: usize, len: usize) -> Result<Vec<u8>, StegError> {
    let end = region_end(channels.len(), offset, len)?;
    trace!("Revealing {len} bytes from channel bytes {offset}..{end}");

    Ok(channels[offset..end]
        .chunks_exact(BITS_PER_BYTE)
        .map(|chunk| {
            chunk
                .iter()
                .fold(0u8, |acc, &channel| (acc << 1) | (channel & LSB_MASK))
        })
        .collect())
}

/// 将载荷 (带 32 位长度前缀) 隐写进载体图像的副本中。
///
/// 容量检查先于任何写入，失败时不会产生部分修改的图像。
///
/// # Errors
///
/// 载荷长度超过 [`Raster::capacity`] 或无法用 `u32` 表示时返回 [`StegError::Capacity`]。
pub fn encode(raster: &Raster, payload: &[u8]) -> Result<Raster, StegError> {
    let capacity = raster.capacity();
    let length = u32::try_from(payload.len())
        .ok()
        .filter(|&len| (len as usize) <= capacity)
        .ok_or(StegError::Capacity {
            requested: payload.len() as u64,
            capacity,
        })?;

    let mut stego = raster.clone();
    let channels = stego.channel_bytes_mut();
    hide_bytes(&length.to_be_bytes(), channels, 0)?;
    hide_bytes(payload, channels, LENGTH_PREFIX_BITS)?;

    debug!(
        "Embedded {length} payload bytes ({} stream bits) into a {}x{} carrier with capacity {capacity}",
        LENGTH_PREFIX_BITS + payload.len() * BITS_PER_BYTE,
        raster.width(),
        raster.height()
    );

    Ok(stego)
}

/// 从载体图像中提取隐藏的载荷。
///
/// 图像中没有额外的魔数标记：非隐写图像会读出一个由自然噪声构成的长度，
/// 若该长度未超过容量，则返回无意义的字节。
///
/// # Errors
///
/// 长度字段超过该图像的容量 (数据损坏、非隐写图像，或图像小到容纳不下长度前缀) 时返回
/// [`StegError::Capacity`]。
pub fn decode(raster: &Raster) -> Result<Vec<u8>, StegError> {
    let capacity = raster.capacity();
    let channels = raster.channel_bytes();

    let length = reveal_bytes(channels, 0, LENGTH_PREFIX_BITS / BITS_PER_BYTE)?
        .iter()
        .fold(0u64, |acc, &byte| (acc << BITS_PER_BYTE) | u64::from(byte));

    if length > capacity as u64 {
        return Err(StegError::Capacity {
            requested: length,
            capacity,
        });
    }

    debug!("Decoded length prefix {length}, carrier capacity {capacity}");
    reveal_bytes(channels, LENGTH_PREFIX_BITS, length as usize)
}

/// 计算 `offset` 起 `len` 个字节所需区域的结束位置，并检查是否越界。
fn region_end(channels: usize, offset: usize, len: usize) -> Result<usize, StegError> {
    len.checked_mul(BITS_PER_BYTE)
        .and_then(|bits| offset.checked_add(bits))
        .filter(|&end| end <= channels)
        .ok_or_else(|| StegError::Capacity {
            requested: offset
                .saturating_add(len.saturating_mul(BITS_PER_BYTE))
                .saturating_sub(LENGTH_PREFIX_BITS)
                .div_ceil(BITS_PER_BYTE) as u64,
            capacity: capacity_for_channels(channels),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::{parse, serialize};

    fn raster_with(width: usize, height: usize, fill: u8) -> Raster {
        Raster::new(width, height, 255, vec![fill; width * height * 3]).unwrap()
    }

    fn lsbs(channels: &[u8]) -> Vec<u8> {
        channels.iter().map(|b| b & 1).collect()
    }

    #[test]
    fn test_wire_format_is_big_endian_msb_first() {
        let raster = raster_with(16, 1, 0);
        let stego = encode(&raster, &[0xAB]).unwrap();

        let mut expected = vec![0u8; 31];
        expected.push(1); // 长度 = 1
        expected.extend([1, 0, 1, 0, 1, 0, 1, 1]); // 0xAB
        expected.extend([0u8; 8]);
        assert_eq!(lsbs(stego.channel_bytes()), expected);
    }

    #[test]
    fn test_upper_bits_are_preserved() {
        let raster = raster_with(16, 1, 0xFF);
        let stego = encode(&raster, &[0x00, 0x00]).unwrap();

        assert!(stego.channel_bytes().iter().all(|&b| b & 0xFE == 0xFE));
        assert_eq!(decode(&stego).unwrap(), vec![0x00, 0x00]);
    }

    #[test]
    fn test_round_trip_concrete_scenario() {
        let raster = raster_with(16, 1, 0x5A);
        assert_eq!(raster.capacity(), 2);

        let stego = encode(&raster, &[0xAB, 0xCD]).unwrap();
        assert_eq!(decode(&stego).unwrap(), vec![0xAB, 0xCD]);
    }

    #[test]
    fn test_tiny_raster_rejects_non_empty_payload() {
        let raster = raster_with(4, 1, 0);
        assert_eq!(raster.capacity(), 0);

        let err = encode(&raster, &[1]).unwrap_err();
        assert!(matches!(
            err,
            StegError::Capacity {
                requested: 1,
                capacity: 0
            }
        ));
        // 连长度前缀都放不下
        assert!(matches!(
            encode(&raster, &[]),
            Err(StegError::Capacity { .. })
        ));
        assert!(matches!(decode(&raster), Err(StegError::Capacity { .. })));
    }

    #[test]
    fn test_capacity_boundary() {
        let raster = raster_with(20, 20, 0x33);
        let capacity = raster.capacity();

        let payload: Vec<u8> = (0..capacity).map(|i| (i * 7) as u8).collect();
        let stego = encode(&raster, &payload).unwrap();
        assert_eq!(decode(&stego).unwrap(), payload);

        let too_big = vec![0u8; capacity + 1];
        assert!(matches!(
            encode(&raster, &too_big),
            Err(StegError::Capacity { .. })
        ));
    }

    #[test]
    fn test_zero_length_payload() {
        let raster = raster_with(4, 4, 0xFF);
        let stego = encode(&raster, &[]).unwrap();

        assert_eq!(lsbs(&stego.channel_bytes()[..32]), vec![0u8; 32]);
        assert_eq!(&stego.channel_bytes()[32..], &raster.channel_bytes()[32..]);
        assert!(decode(&stego).unwrap().is_empty());
    }

    #[test]
    fn test_bit_isolation() {
        let channel_bytes: Vec<u8> = (0..300).map(|i| (i * 37 % 256) as u8).collect();
        let raster = Raster::new(10, 10, 255, channel_bytes).unwrap();
        let payload = b"hidden";

        let stego = encode(&raster, payload).unwrap();
        let touched = 32 + 8 * payload.len();

        for (i, (&before, &after)) in raster
            .channel_bytes()
            .iter()
            .zip(stego.channel_bytes())
            .enumerate()
        {
            if i < touched {
                assert_eq!(before & 0xFE, after & 0xFE, "upper bits changed at {i}");
            } else {
                assert_eq!(before, after, "byte {i} beyond the stream changed");
            }
        }
    }

    #[test]
    fn test_header_is_preserved() {
        let mut bytes = b"P6\n# comment\n16 2\n200\n".to_vec();
        bytes.extend((0..96).map(|i| i as u8));
        let raster = parse(&bytes).unwrap();

        let stego = encode(&raster, b"ok").unwrap();
        let out = serialize(&stego);
        let reparsed = parse(&out).unwrap();

        assert_eq!(reparsed.header(), raster.header());
        assert_eq!(reparsed.max_channel_value(), 200);
        assert_eq!(&out[..raster.header().len()], raster.header());
        assert_eq!(decode(&reparsed).unwrap(), b"ok");
    }

    #[test]
    fn test_corrupted_length_field() {
        let mut raster = raster_with(16, 1, 0);
        // 长度字段 = 0x8000_0000，远超 2 字节的容量
        raster.channel_bytes_mut()[0] = 1;

        let err = decode(&raster).unwrap_err();
        assert!(matches!(
            err,
            StegError::Capacity {
                requested: 0x8000_0000,
                capacity: 2
            }
        ));
    }

    #[test]
    fn test_region_bounds_are_checked() {
        let mut channels = [0u8; 16];
        assert!(hide_bytes(&[1, 2, 3], &mut channels, 0).is_err());
        assert_eq!(channels, [0u8; 16]);
        assert!(reveal_bytes(&channels, 9, 1).is_err());
        assert!(reveal_bytes(&channels, usize::MAX, 1).is_err());

        hide_bytes(&[0x81, 0x7E], &mut channels, 0).unwrap();
        assert_eq!(reveal_bytes(&channels, 0, 2).unwrap(), vec![0x81, 0x7E]);
    }
}
