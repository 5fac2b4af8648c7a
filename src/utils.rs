use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};


const QID_CHARSET: &[u8] = b"0123456789abcdef";

pub type ErrorStr = &'static str;
pub type Result<T> = std::result::Result<T, ErrorStr>;
pub type ResultV = Result<()>;


pub fn generate_hex_id(length: u32) -> String {
    let mut rng = rand::thread_rng();

    (0..length).map(
        |_| {
            let idx = rng.gen_range(0..QID_CHARSET.len());
            QID_CHARSET[idx] as char
        }
    ).collect()
}

/// Microseconds since the unix epoch, zero if the clock is set before it
pub fn time_us() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_micros()).unwrap_or(0)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_id_has_requested_length_and_charset() {
        let id = generate_hex_id(8);
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn hex_id_of_zero_length_is_empty() {
        assert!(generate_hex_id(0).is_empty());
    }
}
