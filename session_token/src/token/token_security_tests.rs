//! Property-based security tests for the token codec.
//!
//! These cover the properties every issued token must keep:
//! - Round trip of arbitrary claim sets
//! - Tamper detection on every bit of the signature
//! - Rejection across keys
//! - No panics on arbitrary untrusted input

#[cfg(test)]
mod tests {
    use crate::test_utils::{test_codec, test_key};
    use crate::token::{ClaimValue, Claims, TokenCodec, TokenError};
    use crate::utils::{base64url_decode, base64url_encode};
    use proptest::prelude::*;

    fn claim_value() -> impl Strategy<Value = ClaimValue> {
        prop_oneof![
            any::<bool>().prop_map(ClaimValue::Bool),
            any::<i64>().prop_map(ClaimValue::Integer),
            any::<f64>()
                .prop_filter("finite", |f| f.is_finite())
                .prop_map(ClaimValue::Float),
            "[\\p{L}\\p{N}\\p{P}\\p{Z}]{0,32}".prop_map(ClaimValue::String),
        ]
    }

    fn claims() -> impl Strategy<Value = Claims> {
        (
            "[a-zA-Z0-9_@.-]{1,64}",
            prop::collection::btree_map("[a-z_]{1,12}", claim_value(), 0..8),
        )
            .prop_map(|(subject, extra)| {
                let mut claims = Claims::new(subject);
                for (key, value) in extra {
                    // Registered names have fixed meanings; keep them out of the random set
                    if !["sub", "iat", "exp", "nbf"].contains(&key.as_str()) {
                        claims.insert(key, value);
                    }
                }
                claims
            })
    }

    proptest! {
        /// verify(issue(c)) returns c plus the stamped timestamps
        #[test]
        fn test_round_trip(claims in claims()) {
            let codec = test_codec();
            let token = codec.issue(&claims).unwrap();
            let mut verified = codec.verify(token.as_str()).unwrap();

            prop_assert!(verified.issued_at().is_some());
            prop_assert!(verified.expires_at().is_some());
            verified.remove("iat");
            verified.remove("exp");
            prop_assert_eq!(verified, claims);
        }

        /// Flipping any single bit of the signature is detected
        #[test]
        fn test_signature_bit_flip(claims in claims(), bit in 0usize..256) {
            let codec = test_codec();
            let token = codec.issue(&claims).unwrap();
            let (signing_input, signature) = token.as_str().rsplit_once('.').unwrap();

            let mut raw = base64url_decode(signature).unwrap();
            raw[bit / 8] ^= 1u8 << (bit % 8);
            let tampered = format!("{signing_input}.{}", base64url_encode(&raw));

            prop_assert_eq!(codec.verify(&tampered), Err(TokenError::InvalidSignature));
        }

        /// Changing any character of the signature segment is detected
        #[test]
        fn test_signature_char_substitution(claims in claims(), index in 0usize..43, c in "[A-Za-z0-9_-]") {
            let codec = test_codec();
            let token = codec.issue(&claims).unwrap();
            let (signing_input, signature) = token.as_str().rsplit_once('.').unwrap();

            let mut chars: Vec<char> = signature.chars().collect();
            let replacement = c.chars().next().unwrap();
            prop_assume!(chars[index] != replacement);
            chars[index] = replacement;
            let tampered = format!("{signing_input}.{}", chars.into_iter().collect::<String>());

            prop_assert_eq!(codec.verify(&tampered), Err(TokenError::InvalidSignature));
        }

        /// A token from one key never verifies under another
        #[test]
        fn test_cross_key_rejection(claims in claims(), k1 in 0u8..=255, k2 in 0u8..=255) {
            prop_assume!(k1 != k2);
            let token = TokenCodec::new(test_key(k1)).issue(&claims).unwrap();
            let verifier = TokenCodec::new(test_key(k2));
            prop_assert_eq!(verifier.verify(token.as_str()), Err(TokenError::InvalidSignature));
        }

        /// Arbitrary input yields an error, never a panic or claims
        #[test]
        fn test_arbitrary_input_never_verifies(input in ".{0,256}") {
            let codec = test_codec();
            prop_assert!(codec.verify(&input).is_err());
        }

        /// Inputs shaped like tokens are still rejected
        #[test]
        fn test_token_shaped_input_never_verifies(
            a in "[A-Za-z0-9_-]{0,40}",
            b in "[A-Za-z0-9_-]{0,40}",
            c in "[A-Za-z0-9_-]{0,43}",
        ) {
            let codec = test_codec();
            let input = format!("{a}.{b}.{c}");
            prop_assert!(codec.verify(&input).is_err());
        }
    }
}
