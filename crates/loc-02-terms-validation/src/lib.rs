//! # LOC-02 Terms Validation
//!
//! Structural validation of what a collection item may carry: the external
//! token it is bound to, and its terms-and-conditions elements.
//!
//! **Subsystem ID:** 02  
//! **Architecture:** Hexagonal (domain + algorithms)
//!
//! ## Classification Rules
//!
//! | Rule | Kind |
//! |------|------|
//! | PER-PRIV / PER-PUB | mutually exclusive |
//! | COM-NOMOD / COM-MOD | mutually exclusive |
//! | EX / NOEX | mutually exclusive |
//! | REG / WW | mutually exclusive |
//! | TIME / NOTIME | mutually exclusive |
//! | TIME | iff an expiration date is set |
//! | REG | iff the regional limit is non-empty |
//! | expiration | ISO-8601 date |
//! | regional limit | ISO-3166 alpha-2 codes |
//!
//! ## Module Structure
//!
//! ```text
//! loc-02-terms-validation/
//! ├── domain/          # TokenType, TermsAndConditionsElement, errors
//! └── algorithms/      # Token id checks, classification rules
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;

pub use algorithms::{
    is_iso3166_alpha2, parse_terms, validate_classification, validate_element, validate_terms,
    validate_token, validate_token_id,
};
pub use domain::{
    CreativeCommonsCode, LogionClassificationParams, TermsAndConditionsElement, TermsError,
    TokenError, TokenKind, TokenType, TransferredRight, TC_CREATIVE_COMMONS,
    TC_LOGION_CLASSIFICATION, TC_SPECIFIC_LICENSE,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
