use std::path::Path;

use base64::Engine;
use jwt_simple::prelude::*;

/// Re-export the `RS256KeyPair` type from `jwt_simple` to ease loading
pub use jwt_simple::algorithms::RS256KeyPair;

/// Signs the login token for key pair authentication.
///
/// `account_identifier` and `user` must already be upper case.
pub fn create_token(
    key_pair: &RS256KeyPair,
    account_identifier: &str,
    user: &str,
) -> Result<String, KeyPairError> {
    let public_key_fingerprint = fingerprint(key_pair)?;
    let qualified_username = format!("{account_identifier}.{user}");
    let issuer = format!("{qualified_username}.SHA256:{public_key_fingerprint}");
    let claims = Claims::create(Duration::from_hours(1))
        .with_issuer(issuer)
        .with_subject(qualified_username);
    key_pair.sign(claims).map_err(KeyPairError::Signing)
}

/// `jwt_simple` hands out an unpadded url safe thumbprint, Snowflake wants padded standard base64.
fn fingerprint(key_pair: &RS256KeyPair) -> Result<String, KeyPairError> {
    let thumbprint = key_pair.public_key().sha256_thumbprint();
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(thumbprint)
        .map_err(|e| KeyPairError::FingerprintGeneration(e.into()))?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

pub fn key_pair_from_file<P: AsRef<Path>>(
    private_key_path: P,
) -> Result<RS256KeyPair, KeyPairFromFileError> {
    let private_key = get_private_key(private_key_path)?;
    Ok(RS256KeyPair::from_pem(&private_key).map_err(KeyPairError::KeyPairGeneration)?)
}

fn get_private_key<P: AsRef<Path>>(path: P) -> Result<String, KeyFileReadError> {
    std::fs::read_to_string(&path).map_err(|error| KeyFileReadError {
        error,
        path: path.as_ref().display().to_string(),
    })
}

#[derive(thiserror::Error, Debug)]
pub enum KeyPairFromFileError {
    #[error(transparent)]
    KeyPair(#[from] KeyPairError),
    #[error(transparent)]
    KeyFileRead(#[from] KeyFileReadError),
}

#[derive(thiserror::Error, Debug)]
#[error("failed to read private key at {path}: {error}")]
pub struct KeyFileReadError {
    error: std::io::Error,
    path: String,
}

#[derive(thiserror::Error, Debug)]
pub enum KeyPairError {
    #[error("failed to generate fingerprint from public key: {0}")]
    FingerprintGeneration(anyhow::Error),
    #[error("failed to generate key pair from private key: {0}")]
    KeyPairGeneration(anyhow::Error),
    #[error("failed to sign login token: {0}")]
    Signing(anyhow::Error),
}
