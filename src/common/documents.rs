// src/common/documents.rs
//
// Documentos brasileiros chegam formatados ("12.345.678/0001-99"); no banco
// guardamos apenas os dígitos.

pub fn only_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn normalize_cnpj(raw: &str) -> Option<String> {
    let digits = only_digits(raw);
    (digits.len() == 14).then_some(digits)
}

pub fn normalize_cpf(raw: &str) -> Option<String> {
    let digits = only_digits(raw);
    (digits.len() == 11).then_some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_from_cnpj() {
        assert_eq!(
            normalize_cnpj("12.345.678/0001-99").as_deref(),
            Some("12345678000199")
        );
        assert_eq!(normalize_cnpj("123"), None);
    }

    #[test]
    fn cpf_requires_eleven_digits() {
        assert_eq!(normalize_cpf("123.456.789-09").as_deref(), Some("12345678909"));
        assert_eq!(normalize_cpf("123.456.789"), None);
    }
}
