//! # 位运算工具
//!
//! 字节内的位序翻转以及通道最低有效位的读写。

/// 翻转 8 位数值的位序：第 0 位与第 7 位互换，以此类推。
///
/// 提取端按 "高位先入" 的方式累加槽位，而嵌入端按 "低位先出" 的方式写入，
/// 翻转一次即可还原原始字节。对任意值执行两次翻转都会得到原值。
pub fn reverse_bits(mut value: u8) -> u8 {
    let mut result = 0u8;
    for _ in 0..8 {
        result = (result << 1) | (value & 1);
        value >>= 1;
    }
    result
}

/// 通道值的最低有效位。
#[inline]
pub fn lsb(value: u8) -> u8 {
    value & 1
}

/// 将通道值向下取偶后加上 `bit`，即替换其最低有效位。
#[inline]
pub fn with_lsb(value: u8, bit: u8) -> u8 {
    (value & 0xFE) | (bit & 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_bits_is_an_involution() {
        for value in 0..=u8::MAX {
            assert_eq!(reverse_bits(reverse_bits(value)), value);
        }
    }

    #[test]
    fn test_reverse_bits_matches_std() {
        for value in 0..=u8::MAX {
            assert_eq!(reverse_bits(value), value.reverse_bits());
        }
        assert_eq!(reverse_bits(0b1000_0010), 0b0100_0001);
    }

    #[test]
    fn test_with_lsb() {
        assert_eq!(with_lsb(200, 1), 201);
        assert_eq!(with_lsb(201, 0), 200);
        assert_eq!(with_lsb(255, 1), 255);
        assert_eq!(with_lsb(0, 0), 0);
        assert_eq!(lsb(101), 1);
        assert_eq!(lsb(100), 0);
    }
}
