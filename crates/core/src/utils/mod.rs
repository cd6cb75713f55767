pub mod decimal_utils;

pub use decimal_utils::{checked_add, checked_mul_div, checked_sum, parse_decimal, parse_founders};
