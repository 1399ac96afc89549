use super::canonical::{append_signature, ParsedUrl};
use super::error::{Result, SignerError};
use super::mac::MacEngine;
use tracing::{debug, trace};

/// Signs URLs and arbitrary payloads with a shared secret.
///
/// A `Signer` holds nothing but the keyed MAC, so it is cheap to clone and
/// safe to share between threads.
#[derive(Clone, Debug)]
pub struct Signer {
    engine: MacEngine,
}

impl Signer {
    /// Creates a signer from a text or byte secret of any length.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            engine: MacEngine::new(secret),
        }
    }

    /// Signs an arbitrary payload.
    pub fn sign(&self, message: impl AsRef<[u8]>) -> String {
        self.engine.sign(message.as_ref())
    }

    /// Verifies a signature produced by [`Signer::sign`].
    pub fn verify(&self, message: impl AsRef<[u8]>, signature: &str) -> bool {
        self.engine.verify(message.as_ref(), signature)
    }

    /// Returns the string that gets signed for `url`.
    ///
    /// # Errors
    /// Returns `InvalidUrl` if the URL has no scheme or host, or does not parse.
    pub fn canonicalize(&self, url: &str) -> Result<String> {
        Ok(parse(url)?.canonical())
    }

    /// Returns `url` in canonical form with a `signature` parameter appended.
    ///
    /// Scheme, host, path and parameters keep their original text, order and
    /// encoding; only a port of 80 or 443 is dropped. A `signature`
    /// parameter already present in `url` is replaced.
    ///
    /// # Errors
    /// Returns `InvalidUrl` if the URL has no scheme or host, or does not parse.
    pub fn sign_url(&self, url: &str) -> Result<String> {
        let parsed = parse(url)?;
        let canonical = parsed.canonical();
        trace!(
            scheme = parsed.scheme(),
            host = parsed.host(),
            len = canonical.len(),
            "signing url"
        );

        let signature = self.engine.sign(canonical.as_bytes());
        Ok(append_signature(&canonical, &signature))
    }

    /// Checks the `signature` parameter of `url` against the rest of the URL.
    ///
    /// A present but wrong signature is `Ok(false)`.
    ///
    /// # Errors
    /// Returns `MissingSignature` if the URL was never signed, and `InvalidUrl`
    /// if it has no scheme or host, or does not parse.
    pub fn verify_url(&self, url: &str) -> Result<bool> {
        let parsed = parse(url)?;
        let Some(signature) = parsed.signature() else {
            debug!(
                scheme = parsed.scheme(),
                host = parsed.host(),
                "url has no signature parameter"
            );
            return Err(SignerError::MissingSignature);
        };

        let canonical = parsed.canonical();
        let valid = self.engine.verify(canonical.as_bytes(), signature);
        if !valid {
            debug!(
                scheme = parsed.scheme(),
                host = parsed.host(),
                "url signature mismatch"
            );
        }
        Ok(valid)
    }
}

fn parse(url: &str) -> Result<ParsedUrl<'_>> {
    ParsedUrl::parse(url).inspect_err(|err| debug!(error = %err, "rejected url"))
}
