//! # Algorithms
//!
//! - `token_validation`: type-dispatched token identifier checks
//! - `classification`: logion classification rules, terms validation

pub mod classification;
pub mod token_validation;

pub use classification::{
    is_iso3166_alpha2, parse_terms, validate_classification, validate_element, validate_terms,
};
pub use token_validation::{validate_token, validate_token_id};
