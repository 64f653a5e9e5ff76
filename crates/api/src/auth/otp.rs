//! Numeric one-time codes for password resets.

use rand::Rng;

/// Digits in an issued code.
pub const OTP_DIGITS: u32 = 4;

/// A uniformly random, zero-padded code of [`OTP_DIGITS`] digits.
pub fn generate_otp() -> String {
    let upper = 10u32.pow(OTP_DIGITS);
    let code = rand::rng().random_range(0..upper);
    format!("{code:0width$}", width = OTP_DIGITS as usize)
}
