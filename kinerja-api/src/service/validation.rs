//! Request validation helpers
//!
//! Validators collect every failing field rule and report them together as a
//! single `ServiceError::Validation`, joined with `"; "`.

use super::error::{Result, ServiceError};

#[derive(Debug, Default)]
pub struct FieldErrors {
    messages: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{field} is required` when the value is blank
    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.messages.push(format!("{} is required", field));
        }
        self
    }

    /// `{field} is required` when the number is zero
    pub fn required_num<T: Default + PartialEq>(&mut self, field: &str, value: T) -> &mut Self {
        if value == T::default() {
            self.messages.push(format!("{} is required", field));
        }
        self
    }

    /// `{field} must contain at least one item`
    pub fn non_empty<T>(&mut self, field: &str, items: &[T]) -> &mut Self {
        if items.is_empty() {
            self.messages
                .push(format!("{} must contain at least one item", field));
        }
        self
    }

    pub fn check(&mut self, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.messages.push(message.into());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn finish(&mut self) -> Result<()> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(std::mem::take(&mut self.messages).join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_every_failure() {
        let err = FieldErrors::new()
            .required("nama_pohon", "")
            .required("tahun", "  ")
            .required("kode_opd", "1.01")
            .finish()
            .unwrap_err();
        match err {
            ServiceError::Validation(msg) => {
                assert_eq!(msg, "nama_pohon is required; tahun is required")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_numeric_and_list_rules() {
        let mut errors = FieldErrors::new();
        errors
            .required_num("tahun_baseline", 0)
            .required_num("id_pohon", 12)
            .non_empty::<i32>("indikator", &[]);
        assert!(!errors.is_empty());
        let msg = errors.finish().unwrap_err().to_string();
        assert!(msg.contains("tahun_baseline is required"));
        assert!(msg.contains("indikator must contain at least one item"));
        assert!(!msg.contains("id_pohon"));
    }

    #[test]
    fn test_passes_when_valid() {
        assert!(
            FieldErrors::new()
                .required("nama_opd", "Dinas")
                .check(true, "never")
                .finish()
                .is_ok()
        );
    }
}
