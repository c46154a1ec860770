//! # Domain Layer
//!
//! Token types, terms-and-conditions elements and their errors.

pub mod errors;
pub mod terms;
pub mod token;

pub use errors::{TermsError, TokenError};
pub use terms::{
    CreativeCommonsCode, LogionClassificationParams, TermsAndConditionsElement, TransferredRight,
    EXCLUSIVE_RIGHTS, TC_CREATIVE_COMMONS, TC_LOGION_CLASSIFICATION, TC_SPECIFIC_LICENSE,
};
pub use token::{TokenKind, TokenType};
