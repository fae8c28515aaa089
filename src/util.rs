//! String and allocation helpers shared across the daemon.
use tracing::error;

use crate::error::AllocError;

/// Decimal text of `value`.
pub fn int_to_string(value: i32) -> String {
    value.to_string()
}

/// True when `s` is non-empty and made only of ASCII digits.
pub fn is_numeric_string(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Owned copy of at most `max_len` bytes of `s`, cut back to the nearest
/// char boundary.
pub fn duplicate_string(s: &str, max_len: usize) -> String {
    let mut end = max_len.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}

/// Zero-filled buffer of `size` bytes, or the reason it could not be made.
pub fn try_allocate(size: usize) -> Result<Vec<u8>, AllocError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|_| alloc_error(size))?;
    buf.resize(size, 0);
    Ok(buf)
}

/// Zero-filled buffer of `size` bytes. Aborts the process when memory
/// cannot be obtained.
pub fn allocate(size: usize) -> Vec<u8> {
    try_allocate(size).unwrap_or_else(|err| out_of_memory(err))
}

/// Resizes `buf` to `new_size` bytes, zero-filling any growth. Aborts the
/// process when memory cannot be obtained.
pub fn reallocate(buf: &mut Vec<u8>, new_size: usize) {
    if new_size > buf.len() {
        let additional = new_size - buf.len();
        if buf.try_reserve_exact(additional).is_err() {
            out_of_memory(alloc_error(new_size));
        }
    }
    buf.resize(new_size, 0);
    buf.shrink_to(new_size);
}

/// Drops the value held in `slot` and leaves `None` behind.
pub fn release<T>(slot: &mut Option<T>) {
    drop(slot.take());
}

fn alloc_error(size: usize) -> AllocError {
    if size > isize::MAX as usize {
        AllocError::CapacityOverflow(size)
    } else {
        AllocError::OutOfMemory(size)
    }
}

fn out_of_memory(err: AllocError) -> ! {
    error!("{err}");
    std::process::abort()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_to_string_handles_sign_and_bounds() {
        assert_eq!(int_to_string(0), "0");
        assert_eq!(int_to_string(-42), "-42");
        assert_eq!(int_to_string(i32::MAX), "2147483647");
        assert_eq!(int_to_string(i32::MIN), "-2147483648");
    }

    #[test]
    fn is_numeric_string_accepts_only_digits() {
        assert!(is_numeric_string("0"));
        assert!(is_numeric_string("65534"));
        assert!(!is_numeric_string(""));
        assert!(!is_numeric_string("-1"));
        assert!(!is_numeric_string("12a"));
        assert!(!is_numeric_string(" 12"));
        assert!(!is_numeric_string("nobody"));
    }

    #[test]
    fn duplicate_string_truncates_on_char_boundary() {
        assert_eq!(duplicate_string("shadow", 3), "sha");
        assert_eq!(duplicate_string("shadow", 64), "shadow");
        assert_eq!(duplicate_string("", 4), "");
        // 'é' is two bytes; a cut through it backs off to the previous char.
        assert_eq!(duplicate_string("héllo", 2), "h");
        assert_eq!(duplicate_string("héllo", 3), "hé");
    }

    #[test]
    fn allocate_zero_is_a_usable_empty_buffer() {
        let mut buf = allocate(0);
        assert!(buf.is_empty());
        buf.push(1);
        assert_eq!(buf, [1]);
    }

    #[test]
    fn allocate_returns_zeroed_bytes() {
        let buf = allocate(4096);
        assert_eq!(buf.len(), 4096);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn oversized_request_is_an_error_not_a_buffer() {
        assert_eq!(
            try_allocate(usize::MAX),
            Err(AllocError::CapacityOverflow(usize::MAX))
        );
    }

    #[test]
    fn reallocate_grows_with_zeroes_and_shrinks() {
        let mut buf = allocate(2);
        buf.copy_from_slice(&[7, 8]);

        reallocate(&mut buf, 5);
        assert_eq!(buf, [7, 8, 0, 0, 0]);

        reallocate(&mut buf, 1);
        assert_eq!(buf, [7]);
    }

    #[test]
    fn release_leaves_none() {
        let mut slot = Some(allocate(16));
        release(&mut slot);
        assert!(slot.is_none());

        let mut empty: Option<String> = None;
        release(&mut empty);
        assert!(empty.is_none());
    }
}
