//! # Token Types
//!
//! External tokens a collection item can be bound to.

use super::errors::TokenError;
use std::fmt;
use std::str::FromStr;

/// How the identifier of a token type is shaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// JSON `{"contract": .., "id": ..}`.
    Nft,
    /// JSON `{"contract": ..}`.
    Fungible,
    /// A plain account address.
    Owner,
    /// Singular (Kusama) NFT id.
    Singular,
    /// MultiversX ESDT id.
    Esdt,
}

macro_rules! token_types {
    ($($variant:ident => ($tag:literal, $kind:ident)),+ $(,)?) => {
        /// Supported token types.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum TokenType {
            $(
                #[doc = concat!("`", $tag, "`")]
                $variant,
            )+
        }

        impl TokenType {
            /// Every supported type.
            pub const ALL: &'static [TokenType] = &[$(TokenType::$variant),+];

            /// Wire tag.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(TokenType::$variant => $tag,)+
                }
            }

            /// Identifier shape.
            pub fn kind(&self) -> TokenKind {
                match self {
                    $(TokenType::$variant => TokenKind::$kind,)+
                }
            }
        }

        impl FromStr for TokenType {
            type Err = TokenError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok(TokenType::$variant),)+
                    other => Err(TokenError::UnknownType(other.to_string())),
                }
            }
        }
    };
}

token_types! {
    EthereumErc721 => ("ethereum_erc721", Nft),
    EthereumErc1155 => ("ethereum_erc1155", Nft),
    EthereumErc20 => ("ethereum_erc20", Fungible),
    GoerliErc721 => ("goerli_erc721", Nft),
    GoerliErc1155 => ("goerli_erc1155", Nft),
    GoerliErc20 => ("goerli_erc20", Fungible),
    PolygonErc721 => ("polygon_erc721", Nft),
    PolygonErc1155 => ("polygon_erc1155", Nft),
    PolygonErc20 => ("polygon_erc20", Fungible),
    PolygonMumbaiErc721 => ("polygon_mumbai_erc721", Nft),
    PolygonMumbaiErc1155 => ("polygon_mumbai_erc1155", Nft),
    PolygonMumbaiErc20 => ("polygon_mumbai_erc20", Fungible),
    AstarPsp34 => ("astar_psp34", Nft),
    AstarShidenPsp34 => ("astar_shiden_psp34", Nft),
    AstarShibuyaPsp34 => ("astar_shibuya_psp34", Nft),
    Owner => ("owner", Owner),
    SingularKusama => ("singular_kusama", Singular),
    MultiversxEsdt => ("multiversx_esdt", Esdt),
    MultiversxTestnetEsdt => ("multiversx_testnet_esdt", Esdt),
    MultiversxDevnetEsdt => ("multiversx_devnet_esdt", Esdt),
}

impl TokenType {
    /// PSP34 ids may be typed objects rather than strings.
    pub fn is_psp34(&self) -> bool {
        matches!(
            self,
            TokenType::AstarPsp34 | TokenType::AstarShidenPsp34 | TokenType::AstarShibuyaPsp34
        )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
