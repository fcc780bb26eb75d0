//! Human-readable quote reference numbers.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Generates a display-only quote number such as `Q-20260823-4821`.
///
/// The number is for humans (emails, admin tables) and is not guaranteed
/// unique; the quote's UUID is the identity.
pub fn generate_quote_number(now: DateTime<Utc>) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("Q-{}-{:04}", now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_quote_number_format() {
        let now = Utc.with_ymd_and_hms(2026, 8, 23, 12, 0, 0).unwrap();
        let number = generate_quote_number(now);
        assert!(number.starts_with("Q-20260823-"));
        assert_eq!(number.len(), "Q-20260823-0000".len());
        let suffix = number.rsplit('-').next().unwrap();
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }
}
