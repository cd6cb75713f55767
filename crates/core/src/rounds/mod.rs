//! Round model - financing instruments and their conversion arithmetic.

pub mod rounds_calculator;
mod rounds_model;

pub use rounds_calculator::{
    convertible_note_weight, mfn_percentage, priced_equity_terms, resolve_mfn_safes,
    safe_percentage, safe_post_money_valuation, validate_discount_rate, PricedEquityTerms,
};
pub use rounds_model::{Round, RoundKind, RoundTerms};
