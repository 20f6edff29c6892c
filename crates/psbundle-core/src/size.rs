//! Human-readable byte counts.

/// Decimal places used when callers do not pick a precision.
pub const DEFAULT_PRECISION: i32 = 2;

/// Scaled values are a 53-bit integer over at most `2^40`, so this many
/// decimals print them exactly.
const EXACT_DECIMALS: usize = 40;
const STEP: u64 = 1024;
const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// [`format_size`] with [`DEFAULT_PRECISION`].
#[must_use]
pub fn format_size_default(bytes: u64) -> String {
    format_size(bytes, DEFAULT_PRECISION)
}

/// Format a byte count using binary steps and the largest unit that keeps the
/// leading number at or above one.
///
/// The value is rounded half up to `precision` decimals (negative precision
/// counts as zero) and trailing zeros are dropped, so `1024` renders as `1 KB`
/// and `2560` at zero decimals as `3 KB`. Counts past the terabyte range stay
/// in `TB`.
#[must_use]
pub fn format_size(bytes: u64, precision: i32) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let (unit, divisor) = unit_for(bytes);
    let decimals = usize::try_from(precision.max(0))
        .unwrap_or_default()
        .min(EXACT_DECIMALS);
    let scaled = bytes_to_f64(bytes) / bytes_to_f64(divisor);
    let exact = format!("{scaled:.places$}", places = EXACT_DECIMALS);
    let rounded = round_half_up(&exact, decimals);
    format!("{} {unit}", trim_fraction(&rounded))
}

/// Round a plain decimal string to `decimals` places, ties away from zero.
fn round_half_up(exact: &str, decimals: usize) -> String {
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact, ""));
    let Some(&next) = fraction.as_bytes().get(decimals) else {
        return exact.to_string();
    };

    let mut digits: Vec<char> = whole.chars().chain(fraction.chars().take(decimals)).collect();
    if next >= b'5' {
        increment(&mut digits);
    }

    let split = digits.len() - decimals;
    let mut rounded: String = digits[..split].iter().collect();
    if decimals > 0 {
        rounded.push('.');
        rounded.extend(&digits[split..]);
    }
    rounded
}

fn increment(digits: &mut Vec<char>) {
    for digit in digits.iter_mut().rev() {
        match digit.to_digit(10) {
            Some(9) => *digit = '0',
            Some(value) => {
                if let Some(next) = char::from_digit(value + 1, 10) {
                    *digit = next;
                }
                return;
            }
            None => return,
        }
    }
    digits.insert(0, '1');
}

fn unit_for(bytes: u64) -> (&'static str, u64) {
    let mut index = 0;
    let mut divisor = 1;
    while index + 1 < UNITS.len() && bytes / divisor >= STEP {
        index += 1;
        divisor *= STEP;
    }
    (UNITS[index], divisor)
}

fn trim_fraction(value: &str) -> &str {
    if value.contains('.') {
        value.trim_end_matches('0').trim_end_matches('.')
    } else {
        value
    }
}

fn bytes_to_f64(value: u64) -> f64 {
    let high = u32::try_from(value >> 32).unwrap_or(u32::MAX);
    let low = u32::try_from(value & 0xFFFF_FFFF).unwrap_or(u32::MAX);
    f64::from(high) * 4_294_967_296.0 + f64::from(low)
}
