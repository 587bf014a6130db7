/// Unsigned LEB128: low seven bits per byte, continuation bit on every byte
/// except the last.
pub(crate) fn encode_unsigned(mut n: u64) -> Vec<u8> {
    let mut encoded = Vec::new();
    while n > 0x7f {
        encoded.push(0x80 | (n & 0x7f) as u8);
        n >>= 7;
    }
    encoded.push(n as u8);
    encoded
}

/// Prepends the LEB128 length of `data`, the framing used for sections and
/// function bodies alike.
pub(crate) fn prefix_size(data: Vec<u8>) -> Vec<u8> {
    let mut out = encode_unsigned(data.len() as u64);
    out.extend(data);
    out
}

/// Signed LEB128 as the runtime loader expects it. Single-byte fast paths
/// for `[0, 0x40)` and `(-0x40, 0)`; everything else recurses through a
/// division that truncates toward zero. The truncation is load-bearing:
/// values at or below `-0x40` must keep this exact bit pattern, which
/// differs from a sign-extending LEB128 encoder.
pub(crate) fn encode_signed(n: i64) -> Vec<u8> {
    if (0..0x40).contains(&n) {
        vec![n as u8]
    } else if n > -0x40 && n < 0 {
        vec![(n + 0x80) as u8]
    } else {
        let mut encoded = vec![0x80 | (n & 0x7f) as u8];
        encoded.extend(encode_signed(n / 0x80));
        encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_unsigned(bytes: &[u8]) -> u64 {
        let mut value = 0u64;
        for &b in bytes.iter().rev() {
            value = (value << 7) | (b & 0x7f) as u64;
        }
        value
    }

    // Inverts encode_signed on its injective domain: all non-negative
    // values plus single-byte negatives.
    fn decode_signed(bytes: &[u8]) -> i64 {
        match bytes {
            [b] if *b < 0x40 => *b as i64,
            [b] => *b as i64 - 0x80,
            _ => {
                let mut value = 0i64;
                for &b in bytes.iter().rev() {
                    value = value * 0x80 + (b & 0x7f) as i64;
                }
                value
            }
        }
    }

    macro_rules! test_encode {
        ($name:ident, $func:ident, $value:expr, $expected:expr) => {
            #[test]
            fn $name() {
                let encoded = $func($value);
                let expected: &[u8] = $expected;
                assert_eq!(encoded.as_slice(), expected);
            }
        };
    }

    test_encode! {unsigned_0, encode_unsigned, 0, &[0x00]}
    test_encode! {unsigned_1, encode_unsigned, 1, &[0x01]}
    test_encode! {unsigned_127, encode_unsigned, 127, &[0x7f]}
    test_encode! {unsigned_128, encode_unsigned, 128, &[0x80, 0x01]}
    test_encode! {unsigned_255, encode_unsigned, 255, &[0xff, 0x01]}
    test_encode! {unsigned_624485, encode_unsigned, 624485, &[0xe5, 0x8e, 0x26]}
    test_encode! {unsigned_u32_max, encode_unsigned, 4294967295, &[0xff, 0xff, 0xff, 0xff, 0x0f]}
    test_encode! {
        unsigned_u64_max,
        encode_unsigned,
        u64::MAX,
        &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]
    }

    test_encode! {signed_0, encode_signed, 0, &[0x00]}
    test_encode! {signed_1, encode_signed, 1, &[0x01]}
    test_encode! {signed_0x3f, encode_signed, 0x3f, &[0x3f]}
    test_encode! {signed_0x40, encode_signed, 0x40, &[0xc0, 0x00]}
    test_encode! {signed_100, encode_signed, 100, &[0xe4, 0x00]}
    test_encode! {signed_127, encode_signed, 127, &[0xff, 0x00]}
    test_encode! {signed_32767, encode_signed, 32767, &[0xff, 0xff, 0x01]}
    test_encode! {
        signed_i64_max,
        encode_signed,
        i64::MAX,
        &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00]
    }
    test_encode! {signed_neg_1, encode_signed, -1, &[0x7f]}
    test_encode! {signed_neg_0x3f, encode_signed, -0x3f, &[0x41]}
    // At -0x40 the truncating division drops the sign; the reference
    // encoding is kept bit for bit.
    test_encode! {signed_neg_0x40, encode_signed, -0x40, &[0xc0, 0x00]}
    test_encode! {signed_neg_0x41, encode_signed, -0x41, &[0xbf, 0x00]}
    test_encode! {signed_neg_127, encode_signed, -127, &[0x81, 0x00]}
    test_encode! {signed_neg_128, encode_signed, -128, &[0x80, 0x7f]}
    test_encode! {
        signed_i64_min,
        encode_signed,
        i64::MIN,
        &[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x7f]
    }

    #[test]
    fn unsigned_round_trip() {
        for n in [0, 1, 63, 64, 127, 128, 255, 624485, 1 << 32, u64::MAX] {
            assert_eq!(decode_unsigned(&encode_unsigned(n)), n, "value {n}");
        }
    }

    #[test]
    fn signed_round_trip() {
        let values = [
            0,
            1,
            0x3f,
            0x40,
            100,
            127,
            128,
            8191,
            1 << 40,
            i64::MAX,
            -1,
            -2,
            -0x3f,
        ];
        for n in values {
            assert_eq!(decode_signed(&encode_signed(n)), n, "value {n}");
        }
    }
}
