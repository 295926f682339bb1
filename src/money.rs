//! 가격 입력 파싱과 엔화 표시 포맷.

/// 입력 문자열에서 숫자만 추려 가격 [円]으로 읽는다. 숫자가 없으면 0(미입력).
///
/// 자릿수가 u64 범위를 넘으면 최댓값에서 멈춘다.
pub fn parse_price(raw: &str) -> u64 {
    raw.chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d)))
}

/// 가격 입력란 표시용: 숫자만 남기고 세 자리마다 쉼표를 넣는다. 숫자가 없으면 빈 문자열.
pub fn format_price_input(raw: &str) -> String {
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return String::new();
    }
    group_thousands(parse_price(raw))
}

/// 세 자리마다 쉼표를 넣는다.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// 금액을 원 단위로 반올림해 `¥1,234` 형태로 만든다.
pub fn format_yen(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}¥{}", group_thousands(rounded.abs() as u64))
}

/// 부호를 항상 붙인 차액 표시 (`+¥1,234`, `±¥0`).
pub fn format_yen_delta(amount: f64) -> String {
    let rounded = amount.round();
    if rounded > 0.0 {
        format!("+{}", format_yen(rounded))
    } else if rounded < 0.0 {
        format_yen(rounded)
    } else {
        "±¥0".to_string()
    }
}

/// 차트 축 눈금용 만 엔 단위 표기 (`¥120万`).
pub fn format_man_yen(amount: f64) -> String {
    format!("¥{}万", (amount / 10_000.0).round() as i64)
}

/// 소수 둘째 자리까지 표시하되 뒤쪽 0은 지운다 (`3`, `2.5`, `31.25`).
pub fn format_plain(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_numbers_drop_trailing_zeros() {
        assert_eq!(format_plain(3.0), "3");
        assert_eq!(format_plain(2.5), "2.5");
        assert_eq!(format_plain(31.256), "31.26");
        assert_eq!(format_plain(0.0), "0");
    }

    #[test]
    fn parse_price_strips_non_digits() {
        assert_eq!(parse_price("128,000"), 128_000);
        assert_eq!(parse_price("¥ 98,800 円"), 98_800);
        assert_eq!(parse_price(""), 0);
        assert_eq!(parse_price("abc"), 0);
        assert_eq!(parse_price("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn input_formatting_groups_digits() {
        assert_eq!(format_price_input("1234567"), "1,234,567");
        assert_eq!(format_price_input("12a3"), "123");
        assert_eq!(format_price_input("x"), "");
        assert_eq!(format_price_input("000"), "0");
    }

    #[test]
    fn yen_formatting_rounds_only_for_display() {
        assert_eq!(format_yen(44_036.6), "¥44,037");
        assert_eq!(format_yen(0.4), "¥0");
        assert_eq!(format_yen(999.5), "¥1,000");
        assert_eq!(format_yen(-1_500.0), "-¥1,500");
        assert_eq!(format_yen_delta(12_345.4), "+¥12,345");
        assert_eq!(format_yen_delta(0.2), "±¥0");
        assert_eq!(format_man_yen(1_234_567.0), "¥123万");
    }
}
