//! x87 80-bit extended precision encoding
//!
//! Layout (little-endian): 64-bit significand with an explicit integer
//! bit, then 15-bit exponent (bias 16383) and the sign bit.

const F64_BIAS: i32 = 1023;
const F80_BIAS: i32 = 16383;
const F80_EXP_MAX: u16 = 0x7FFF;
const INTEGER_BIT: u64 = 1 << 63;

pub(super) fn encode(value: f64) -> [u8; 10] {
    let bits = value.to_bits();
    let sign = (bits >> 63) as u16;
    let exponent = ((bits >> 52) & 0x7FF) as i32;
    let fraction = bits & ((1u64 << 52) - 1);

    let (exp80, mantissa) = match (exponent, fraction) {
        (0, 0) => (0u16, 0u64),
        (0x7FF, _) => (F80_EXP_MAX, INTEGER_BIT | (fraction << 11)),
        (0, _) => {
            // Subnormal: normalize into the explicit integer bit
            let shift = fraction.leading_zeros();
            let unbiased = -1011 - shift as i32;
            ((unbiased + F80_BIAS) as u16, fraction << shift)
        }
        _ => (
            (exponent - F64_BIAS + F80_BIAS) as u16,
            INTEGER_BIT | (fraction << 11),
        ),
    };

    let mut out = [0u8; 10];
    out[..8].copy_from_slice(&mantissa.to_le_bytes());
    out[8..].copy_from_slice(&((sign << 15) | exp80).to_le_bytes());
    out
}

pub(super) fn decode(bytes: [u8; 10]) -> f64 {
    let mut mantissa_bytes = [0u8; 8];
    mantissa_bytes.copy_from_slice(&bytes[..8]);
    let mantissa = u64::from_le_bytes(mantissa_bytes);
    let sign_exp = u16::from_le_bytes([bytes[8], bytes[9]]);
    let negative = sign_exp & 0x8000 != 0;
    let exp80 = sign_exp & F80_EXP_MAX;

    let magnitude = if exp80 == 0 && mantissa == 0 {
        0.0
    } else if exp80 == F80_EXP_MAX {
        if mantissa << 1 == 0 {
            f64::INFINITY
        } else {
            f64::NAN
        }
    } else {
        // Denormals use the minimum exponent without an integer bit
        let unbiased = if exp80 == 0 {
            1 - F80_BIAS
        } else {
            i32::from(exp80) - F80_BIAS
        };
        scale(mantissa as f64 / INTEGER_BIT as f64, unbiased)
    };

    if negative { -magnitude } else { magnitude }
}

/// `value * 2^exp` without intermediate underflow
fn scale(value: f64, exp: i32) -> f64 {
    if exp > F64_BIAS {
        f64::INFINITY
    } else if exp < -1100 {
        0.0
    } else if exp < -1022 {
        value * 2f64.powi(exp + 64) * 2f64.powi(-64)
    } else {
        value * 2f64.powi(exp)
    }
}
