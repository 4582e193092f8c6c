//! Phone number normalization.

/// Keeps only ASCII digits. `"(21) 99999-9999"` becomes `"21999999999"`.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}
