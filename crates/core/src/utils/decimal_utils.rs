//! Parsing of collaborator-supplied amounts and overflow-checked arithmetic.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::{CapTableError, Error, Result, ValidationError};

/// Parses an amount or percentage such as `"100000"`, `"12.5%"`, `"1_000_000"`
/// or `"1e6"`.
pub fn parse_decimal(input: &str) -> Result<Decimal> {
    let cleaned: String = input
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != '_')
        .collect();

    if cleaned.is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "'{}' is not a number",
            input
        ))));
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| {
            Error::Validation(ValidationError::InvalidInput(format!(
                "'{}' is not a number",
                input
            )))
        })
}

/// `a * b / c` with overflow reported as `InvalidInput` and a zero
/// divisor as `DivisionByZero`.
pub fn checked_mul_div(a: Decimal, b: Decimal, c: Decimal) -> Result<Decimal> {
    if c.is_zero() {
        return Err(CapTableError::DivisionByZero(format!("{} * {} / 0", a, b)).into());
    }
    a.checked_mul(b)
        .and_then(|product| product.checked_div(c))
        .ok_or_else(|| out_of_range(format!("{} * {} / {}", a, b, c)))
}

pub fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| out_of_range(format!("{} + {}", a, b)))
}

/// Sums `values`, failing instead of overflowing.
pub fn checked_sum<I>(values: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, checked_add)
}

fn out_of_range(expression: String) -> Error {
    CapTableError::InvalidInput(format!(
        "amount out of range: {} does not fit in a decimal",
        expression
    ))
    .into()
}

/// Parses founders written as `"John:50, Jane:50"`.
pub fn parse_founders(input: &str) -> Result<Vec<(String, Decimal)>> {
    let mut founders = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, equity) = part.split_once(':').ok_or_else(|| {
            Error::Validation(ValidationError::InvalidInput(format!(
                "expected 'name:equity', got '{}'",
                part
            )))
        })?;

        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "founder name".to_string(),
            )));
        }
        founders.push((name.to_string(), parse_decimal(equity)?));
    }

    if founders.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "founders".to_string(),
        )));
    }
    Ok(founders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal_accepts_common_forms() {
        assert_eq!(parse_decimal("100000").unwrap(), dec!(100000));
        assert_eq!(parse_decimal(" 12.5% ").unwrap(), dec!(12.5));
        assert_eq!(parse_decimal("1_000_000").unwrap(), dec!(1000000));
        assert_eq!(parse_decimal("1e6").unwrap(), dec!(1000000));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(parse_decimal("").is_err());
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("%").is_err());
    }

    #[test]
    fn test_checked_mul_div() {
        assert_eq!(checked_mul_div(dec!(60), dec!(100), dec!(120)).unwrap(), dec!(50));

        let err = checked_mul_div(Decimal::MAX, dec!(100), dec!(1)).unwrap_err();
        assert!(matches!(err, Error::CapTable(CapTableError::InvalidInput(_))));

        let err = checked_mul_div(dec!(1), dec!(1), Decimal::ZERO).unwrap_err();
        assert!(matches!(err, Error::CapTable(CapTableError::DivisionByZero(_))));
    }

    #[test]
    fn test_checked_sum_reports_overflow() {
        assert_eq!(checked_sum([dec!(60), dec!(40)]).unwrap(), dec!(100));
        assert_eq!(checked_sum(Vec::new()).unwrap(), Decimal::ZERO);
        assert!(checked_sum([Decimal::MAX, dec!(1)]).is_err());
    }

    #[test]
    fn test_parse_founders() {
        let founders = parse_founders("John:50, Jane:50").unwrap();
        assert_eq!(
            founders,
            vec![
                ("John".to_string(), dec!(50)),
                ("Jane".to_string(), dec!(50)),
            ]
        );
    }

    #[test]
    fn test_parse_founders_rejects_malformed_entries() {
        assert!(parse_founders("John50").is_err());
        assert!(parse_founders(":50").is_err());
        assert!(parse_founders("John:abc").is_err());
        assert!(parse_founders(" , ").is_err());
    }
}
