use crate::certificate::CertificateType;
use crate::crypto::rust_crypto;
use crate::crypto::CryptoProvider;
use crate::registry::SignaturePolicy;
use crate::types::{SecurityLevel, SignatureScheme, VerifyFlags};
use crate::Error;

/// CertificateVerify configuration, shared between sessions as `Arc<Config>`.
#[derive(Debug, Clone)]
pub struct Config {
    signature_policy: SignaturePolicy,
    verify_flags: VerifyFlags,
    certificate_type: CertificateType,
    crypto_provider: CryptoProvider,
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            signature_schemes: SignaturePolicy::default_schemes().to_vec(),
            min_security: SecurityLevel::Medium,
            verify_flags: VerifyFlags::NONE,
            certificate_type: CertificateType::X509,
            crypto_provider: None,
        }
    }

    /// Enabled signature schemes, in preference order, and the minimum
    /// security level a selected scheme must have.
    #[inline(always)]
    pub fn signature_policy(&self) -> &SignaturePolicy {
        &self.signature_policy
    }

    /// Flags passed to every signature verification.
    #[inline(always)]
    pub fn verify_flags(&self) -> VerifyFlags {
        self.verify_flags
    }

    /// Credential type used by both peers.
    #[inline(always)]
    pub fn certificate_type(&self) -> CertificateType {
        self.certificate_type
    }

    /// Cryptographic provider.
    ///
    /// Provides hashing, private key loading and signature verification.
    #[inline(always)]
    pub fn crypto_provider(&self) -> &CryptoProvider {
        &self.crypto_provider
    }
}

/// Builder for [`Config`].
pub struct ConfigBuilder {
    signature_schemes: Vec<SignatureScheme>,
    min_security: SecurityLevel,
    verify_flags: VerifyFlags,
    certificate_type: CertificateType,
    crypto_provider: Option<CryptoProvider>,
}

impl ConfigBuilder {
    /// Set the enabled signature schemes in preference order.
    ///
    /// Duplicates are dropped. Defaults to
    /// [`SignaturePolicy::default_schemes`].
    pub fn signature_schemes(mut self, schemes: impl IntoIterator<Item = SignatureScheme>) -> Self {
        self.signature_schemes = schemes.into_iter().collect();
        self
    }

    /// Set the weakest scheme strength that may be selected for signing.
    ///
    /// Defaults to [`SecurityLevel::Medium`].
    pub fn min_security(mut self, level: SecurityLevel) -> Self {
        self.min_security = level;
        self
    }

    /// Set the flags for signature verification.
    ///
    /// Defaults to [`VerifyFlags::NONE`].
    pub fn verify_flags(mut self, flags: VerifyFlags) -> Self {
        self.verify_flags = flags;
        self
    }

    /// Set the credential type.
    ///
    /// Defaults to X.509 certificates.
    pub fn certificate_type(mut self, certificate_type: CertificateType) -> Self {
        self.certificate_type = certificate_type;
        self
    }

    /// Set a custom crypto provider.
    pub fn with_crypto_provider(mut self, provider: CryptoProvider) -> Self {
        self.crypto_provider = Some(provider);
        self
    }

    /// Build the configuration.
    ///
    /// The crypto provider is selected in the following priority order:
    /// 1. Explicit provider set via `with_crypto_provider()`
    /// 2. Default provider installed via `CryptoProvider::install_default()`
    /// 3. The RustCrypto provider
    ///
    /// Returns `Error::ConfigError` if the provider is invalid or no
    /// signature scheme is enabled.
    pub fn build(self) -> Result<Config, Error> {
        let crypto_provider = self
            .crypto_provider
            .or_else(|| CryptoProvider::get_default().cloned())
            .unwrap_or_else(rust_crypto::default_provider);

        crypto_provider.validate()?;

        let signature_policy = SignaturePolicy::new(self.signature_schemes, self.min_security);
        if signature_policy.schemes().is_empty() {
            return Err(Error::ConfigError(
                "No signature scheme enabled".to_string(),
            ));
        }

        Ok(Config {
            signature_policy,
            verify_flags: self.verify_flags,
            certificate_type: self.certificate_type,
            crypto_provider,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        // unwrap: the default provider and scheme list are always valid
        Config::builder().build().unwrap()
    }
}
