use image::{Rgb, RgbImage, Rgba, RgbaImage};
use lsb_codec::{
    Framing, PixelGrid, StegoError,
    address::locate,
    bits::reverse_bits,
    embed, embed_in_place, extract,
};
use rand::Rng;

/// 创建一个带有随机像素的网格
fn random_grid(width: u32, height: u32) -> RgbImage {
    let mut rng = rand::rng();
    RgbImage::from_fn(width, height, |_, _| Rgb(rng.random::<[u8; 3]>()))
}

/// 生成不含零字节的随机载荷
fn random_payload(len: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    (0..len).map(|_| rng.random_range(1..=u8::MAX)).collect()
}

fn channel_at(grid: &RgbImage, slot: usize) -> u8 {
    let width = grid.dimensions().0 as usize;
    let height = grid.dimensions().1 as usize;
    let address = locate(slot, width, height).unwrap();
    grid.get_channels(address.row, address.col).unwrap()[address.channel]
}

#[test]
fn test_round_trip_null_terminated() {
    for (width, height, len) in [(1, 3, 0), (4, 4, 5), (17, 9, 40), (64, 48, 1151)] {
        let grid = random_grid(width, height);
        let payload = random_payload(len);

        let doctored = embed(&payload, &grid, Framing::NullTerminated).unwrap();
        assert_eq!(
            extract(&doctored, Framing::NullTerminated).unwrap(),
            payload,
            "{width}x{height} grid with {len} bytes"
        );
    }
}

#[test]
fn test_round_trip_length_prefixed_with_arbitrary_bytes() {
    let mut rng = rand::rng();
    for (width, height, len) in [(4, 3, 0), (10, 10, 33), (33, 21, 200)] {
        let grid = random_grid(width, height);
        let mut payload = vec![0u8; len];
        rng.fill(&mut payload[..]);

        let doctored = embed(&payload, &grid, Framing::LengthPrefixed).unwrap();
        assert_eq!(extract(&doctored, Framing::LengthPrefixed).unwrap(), payload);
    }
}

#[test]
fn test_empty_payload() {
    // 8 个槽位恰好够放终止符
    let mut grid = random_grid(3, 1);
    embed_in_place(&[], &mut grid, Framing::NullTerminated).unwrap();
    assert!(extract(&grid, Framing::NullTerminated).unwrap().is_empty());

    let mut tiny = random_grid(2, 1);
    assert!(matches!(
        embed_in_place(&[], &mut tiny, Framing::NullTerminated),
        Err(StegoError::CapacityExceeded { required: 8, available: 6 })
    ));
}

#[test]
fn test_capacity_boundary() {
    // 8x1 网格共 24 个槽位
    let grid = random_grid(8, 1);

    // 3 字节载荷恰好占满 24 个槽位，终止符没有空间
    let too_long = random_payload(3);
    let mut target = grid.clone();
    assert!(matches!(
        embed_in_place(&too_long, &mut target, Framing::NullTerminated),
        Err(StegoError::CapacityExceeded { required: 32, available: 24 })
    ));
    assert_eq!(target, grid, "a rejected embed must not touch the grid");

    // 少一个字节即可成功
    let fits = random_payload(2);
    let doctored = embed(&fits, &grid, Framing::NullTerminated).unwrap();
    assert_eq!(extract(&doctored, Framing::NullTerminated).unwrap(), fits);

    // 长度前缀格式：56 个槽位可放 3 字节
    let grid = random_grid(19, 1);
    assert!(embed(&random_payload(3), &grid, Framing::LengthPrefixed).is_ok());
    assert!(matches!(
        embed(&random_payload(4), &grid, Framing::LengthPrefixed),
        Err(StegoError::CapacityExceeded { required: 64, available: 57 })
    ));
}

#[test]
fn test_changes_confined_to_stream_lsbs() {
    for framing in [Framing::NullTerminated, Framing::LengthPrefixed] {
        let grid = random_grid(20, 20);
        let payload = random_payload(50);
        let doctored = embed(&payload, &grid, framing).unwrap();

        let stream_bits = framing.required_bits(payload.len());
        for slot in 0..grid.capacity() {
            let before = channel_at(&grid, slot);
            let after = channel_at(&doctored, slot);
            if slot < stream_bits {
                assert!(before.abs_diff(after) <= 1, "slot {slot} changed by more than 1");
                assert_eq!(before & 0xFE, after & 0xFE);
            } else {
                assert_eq!(before, after, "slot {slot} is outside the stream");
            }
        }
    }
}

#[test]
fn test_reverse_bits_self_consistency() {
    for value in 0..=u8::MAX {
        assert_eq!(reverse_bits(reverse_bits(value)), value);
    }
}

#[test]
fn test_one_by_four_scenario() {
    // 1x4 网格的 12 个槽位装不下 "A" 及其终止符 (共 16 位)
    let mut grid = RgbImage::from_pixel(4, 1, Rgb([200, 200, 200]));
    let result = embed_in_place(&[0x41], &mut grid, Framing::NullTerminated);

    assert!(matches!(
        result,
        Err(StegoError::CapacityExceeded { required: 16, available: 12 })
    ));
    assert!(grid.pixels().all(|pixel| pixel.0 == [200, 200, 200]));
    // 未被修改的全偶数网格，第一个字节组就是零字节
    assert!(matches!(
        extract(&grid, Framing::NullTerminated),
        Ok(bytes) if bytes.is_empty()
    ));
}

#[test]
fn test_alpha_channel_survives_embedding() {
    let grid = RgbaImage::from_fn(12, 12, |x, y| Rgba([x as u8, y as u8, 7, (x * y) as u8]));
    let doctored = embed(b"alpha stays", &grid, Framing::default()).unwrap();

    for (before, after) in grid.pixels().zip(doctored.pixels()) {
        assert_eq!(before.0[3], after.0[3]);
    }
    assert_eq!(extract(&doctored, Framing::default()).unwrap(), b"alpha stays");
}

#[test]
fn test_extraction_is_read_only() {
    let grid = random_grid(16, 16);
    let doctored = embed(b"read only", &grid, Framing::NullTerminated).unwrap();
    let snapshot = doctored.clone();

    let first = extract(&doctored, Framing::NullTerminated).unwrap();
    let second = extract(&doctored, Framing::NullTerminated).unwrap();
    assert_eq!(first, second);
    assert_eq!(doctored, snapshot);
}
