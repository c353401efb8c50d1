//! Identifier generation
//!
//! Most entities use human-readable string ids rather than database
//! sequences. Four shapes are in use:
//!
//! - `generate_id("JBTN")` → `JBTN-2025-3fa85`
//! - `short_id("PLKS")` → `PLKS-3fa85f64`
//! - `digit_id("IND-REKIN")` → `IND-REKIN-04821`
//! - `rencana_kinerja_id()` → `REKIN-PEG-2025-04821`

use chrono::Datelike;
use uuid::Uuid;

/// `{base}-{current year}-{5 hex chars}`
pub fn generate_id(base: &str) -> String {
    let year = chrono::Utc::now().year();
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", base, year, &uuid[..5])
}

/// `{prefix}-{8 hex chars}`
pub fn short_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &uuid[..8])
}

/// `{prefix}-{5 decimal digits}`
pub fn digit_id(prefix: &str) -> String {
    format!("{}-{}", prefix, random_digits())
}

pub fn rencana_kinerja_id() -> String {
    let year = chrono::Utc::now().year();
    format!("REKIN-PEG-{}-{}", year, random_digits())
}

fn random_digits() -> String {
    let n = Uuid::new_v4().as_u128() % 100_000;
    format!("{:05}", n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id("JBTN");
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "JBTN");
        assert_eq!(parts[1], chrono::Utc::now().year().to_string());
        assert_eq!(parts[2].len(), 5);
    }

    #[test]
    fn test_short_id_shape() {
        let id = short_id("PLKS");
        assert!(id.starts_with("PLKS-"));
        assert_eq!(id.len(), "PLKS-".len() + 8);
    }

    #[test]
    fn test_digit_ids_are_zero_padded() {
        for _ in 0..50 {
            let id = digit_id("TRGT-IND-REKIN");
            let digits = id.rsplit('-').next().unwrap();
            assert_eq!(digits.len(), 5);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_rencana_kinerja_id_prefix() {
        let id = rencana_kinerja_id();
        assert!(id.starts_with("REKIN-PEG-"));
        assert_eq!(id.rsplit('-').next().unwrap().len(), 5);
    }
}
