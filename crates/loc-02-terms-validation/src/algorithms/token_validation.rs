//! # Token Validation
//!
//! | Kind | Identifier |
//! |------|------------|
//! | NFT | JSON object, non-empty string `contract`, string `id` |
//! | Fungible | JSON object, non-empty string `contract` |
//! | Owner | address of a supported family |
//! | Singular | `block-collection-SYMBOL-NAME-serial` |
//! | ESDT | `TICKER-hex6-nonce` |

use crate::domain::{TokenError, TokenKind, TokenType};
use regex::Regex;
use serde_json::{Map, Value};
use shared_types::{AccountId, ItemToken};
use std::sync::LazyLock;

static SINGULAR_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+-[0-9a-f]+-[A-Z0-9]+-[A-Z0-9_]+-[0-9]{8}$")
        .unwrap_or_else(|_| unreachable!("static regex"))
});

static ESDT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9]{3,10}-[a-f0-9]{6}-[a-f0-9]+$")
        .unwrap_or_else(|_| unreachable!("static regex"))
});

const PSP34_ID_KEYS: [&str; 6] = ["U8", "U16", "U32", "U64", "U128", "Bytes"];

/// Validate a token bound to a collection item.
pub fn validate_token(token: &ItemToken) -> Result<TokenType, TokenError> {
    let token_type: TokenType = token.token_type.parse()?;
    validate_token_id(token_type, &token.id)?;
    if token.issuance < 1 {
        return Err(TokenError::InvalidIssuance(token.issuance));
    }
    Ok(token_type)
}

/// Validate an identifier against its token type.
pub fn validate_token_id(token_type: TokenType, id: &str) -> Result<(), TokenError> {
    let invalid = |reason: &str| TokenError::InvalidId {
        token_type: token_type.to_string(),
        reason: reason.to_string(),
    };
    match token_type.kind() {
        TokenKind::Nft => {
            let object = contract_object(id).map_err(|r| invalid(&r))?;
            let valid_id = match object.get("id") {
                Some(Value::String(_)) => true,
                Some(Value::Object(typed)) if token_type.is_psp34() => {
                    typed.len() == 1 && typed.keys().all(|k| PSP34_ID_KEYS.contains(&k.as_str()))
                }
                _ => false,
            };
            if valid_id {
                Ok(())
            } else {
                Err(invalid("id must be a string"))
            }
        }
        TokenKind::Fungible => contract_object(id).map(|_| ()).map_err(|r| invalid(&r)),
        TokenKind::Owner => AccountId::parse(id)
            .map(|_| ())
            .map_err(|e| invalid(&e.to_string())),
        TokenKind::Singular => {
            if SINGULAR_ID.is_match(id) {
                Ok(())
            } else {
                Err(invalid("not a Singular NFT id"))
            }
        }
        TokenKind::Esdt => {
            if ESDT_ID.is_match(id) {
                Ok(())
            } else {
                Err(invalid("not an ESDT id"))
            }
        }
    }
}

fn contract_object(id: &str) -> Result<Map<String, Value>, String> {
    let value: Value = serde_json::from_str(id).map_err(|e| format!("not JSON: {}", e))?;
    let Value::Object(object) = value else {
        return Err("not a JSON object".to_string());
    };
    match object.get("contract") {
        Some(Value::String(contract)) if !contract.is_empty() => Ok(object),
        Some(Value::String(_)) => Err("contract must not be empty".to_string()),
        _ => Err("contract must be a string".to_string()),
    }
}
