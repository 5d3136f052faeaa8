//! PKCS#1 RSA private keys from PEM text.
//!
//! ```
//! use pemrsa_pkcs::parse_rsa_private_key_from_pem;
//!
//! let err = parse_rsa_private_key_from_pem("not a key").unwrap_err();
//! assert_eq!("invalid RSA private key format", err.to_string());
//! ```

use pemrsa_pem::Label;
use tracing::debug;

use crate::error::{Error, PRIVATE_KEY_DECODE, PRIVATE_KEY_FORMAT, Result};
use crate::pkcs1::RSAPrivateKey;

/// Parse the first PEM block of `text` as a PKCS#1 `RSA PRIVATE KEY`.
///
/// Fails with [`Error::Format`] when no block is found or its label is not `RSA PRIVATE KEY`,
/// and with [`Error::Decode`] when the payload is not a valid RSAPrivateKey.
pub fn parse_rsa_private_key_from_pem(text: &str) -> Result<RSAPrivateKey> {
    let block = match pemrsa_pem::unwrap(text) {
        Ok(block) => block,
        Err(err) => {
            debug!(error = %err, "no usable PEM block for RSA private key");
            return Err(Error::Format(PRIVATE_KEY_FORMAT));
        }
    };
    if block.label() != Label::RSAPrivateKey {
        debug!(label = %block.label(), "unexpected PEM label for RSA private key");
        return Err(Error::Format(PRIVATE_KEY_FORMAT));
    }
    if let Some(proc_type) = block.header("Proc-Type") {
        // legacy OpenSSL encryption: the payload is ciphertext and fails to decode below
        debug!(proc_type, "RSA private key block carries encapsulated headers");
    }

    let key = RSAPrivateKey::from_der(block.payload()).map_err(|source| Error::Decode {
        context: PRIVATE_KEY_DECODE,
        source,
    })?;
    debug!(
        bits = key.key_size(),
        primes = key.primes().len(),
        "parsed RSA private key"
    );
    Ok(key)
}
