//! Brazilian taxpayer document helpers (CPF for people, CNPJ for companies).
//!
//! Only the shape is checked: the digit count once punctuation is stripped.

/// Removes the `.`, `/` and `-` punctuation used when typing documents.
#[must_use]
pub fn strip_document(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '.' | '/' | '-'))
        .collect()
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

/// Whether `raw` is an 11-digit CPF, with or without punctuation.
#[must_use]
pub fn is_valid_cpf(raw: &str) -> bool {
    is_digits(&strip_document(raw), 11)
}

/// Whether `raw` is a 14-digit CNPJ, with or without punctuation.
#[must_use]
pub fn is_valid_cnpj(raw: &str) -> bool {
    is_digits(&strip_document(raw), 14)
}

/// Formats a CPF as `XXX.XXX.XXX-XX`; anything else is returned stripped.
#[must_use]
pub fn format_cpf(raw: &str) -> String {
    let digits = strip_document(raw);
    if !is_digits(&digits, 11) {
        return digits;
    }
    format!(
        "{}.{}.{}-{}",
        &digits[..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..]
    )
}

/// Formats a CNPJ as `XX.XXX.XXX/XXXX-XX`; anything else is returned stripped.
#[must_use]
pub fn format_cnpj(raw: &str) -> String {
    let digits = strip_document(raw);
    if !is_digits(&digits, 14) {
        return digits;
    }
    format!(
        "{}.{}.{}/{}-{}",
        &digits[..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..]
    )
}
