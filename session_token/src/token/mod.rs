mod codec;
mod errors;
mod key;
mod types;

#[cfg(test)]
mod token_security_tests;

pub use codec::TokenCodec;
pub use errors::TokenError;
pub use key::{MIN_KEY_LEN, SigningKey};
pub use types::{ClaimValue, Claims, Token};
