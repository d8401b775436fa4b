//! Display masks for Brazilian document numbers, phones and dates.

use chrono::NaiveDate;

fn digits(raw: &str, limit: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(limit).collect()
}

/// Progressive CPF mask: `12345678901` → `123.456.789-01`.
/// Partial input is masked as far as it goes; non-digits are dropped.
pub fn mask_cpf(raw: &str) -> String {
    let digits = digits(raw, 11);
    let mut masked = String::with_capacity(14);
    for (index, digit) in digits.chars().enumerate() {
        match index {
            3 | 6 => masked.push('.'),
            9 => masked.push('-'),
            _ => {}
        }
        masked.push(digit);
    }
    masked
}

/// CPF check-digit validation. Repeated-digit sequences are rejected.
pub fn is_valid_cpf(raw: &str) -> bool {
    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let check = |len: usize| -> u32 {
        let sum: u32 = digits[..len]
            .iter()
            .zip((2..=len as u32 + 1).rev())
            .map(|(digit, weight)| digit * weight)
            .sum();
        match (sum * 10) % 11 {
            10 => 0,
            value => value,
        }
    };

    check(9) == digits[9] && check(10) == digits[10]
}

/// Phone mask for landlines `(11) 3456-7890` and mobiles `(11) 98765-4321`.
pub fn mask_phone(raw: &str) -> String {
    let digits = digits(raw, 11);
    let len = digits.len();
    if len == 0 {
        return String::new();
    }
    if len <= 2 {
        return format!("({digits}");
    }

    let (area, number) = digits.split_at(2);
    let split = if len == 11 { 5 } else { 4 };
    if number.len() <= split {
        format!("({area}) {number}")
    } else {
        let (head, tail) = number.split_at(split);
        format!("({area}) {head}-{tail}")
    }
}

pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn parse_date_br(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_cpf_progressively() {
        assert_eq!(mask_cpf("12345678901"), "123.456.789-01");
        assert_eq!(mask_cpf("123.456"), "123.456");
        assert_eq!(mask_cpf("1234"), "123.4");
        assert_eq!(mask_cpf("123456789012345"), "123.456.789-01");
        assert_eq!(mask_cpf("abc"), "");
    }

    #[test]
    fn validates_cpf_check_digits() {
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(is_valid_cpf("12345678909"));
        assert!(!is_valid_cpf("529.982.247-26"));
        assert!(!is_valid_cpf("111.111.111-11"));
        assert!(!is_valid_cpf("1234"));
    }

    #[test]
    fn masks_phone_numbers() {
        assert_eq!(mask_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(mask_phone("1134567890"), "(11) 3456-7890");
        assert_eq!(mask_phone("119"), "(11) 9");
        assert_eq!(mask_phone("1"), "(1");
        assert_eq!(mask_phone(""), "");
    }

    #[test]
    fn formats_and_parses_brazilian_dates() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid");
        assert_eq!(format_date_br(date), "07/03/2025");
        assert_eq!(parse_date_br(" 07/03/2025 "), Some(date));
        assert_eq!(parse_date_br("2025-03-07"), None);
    }
}
