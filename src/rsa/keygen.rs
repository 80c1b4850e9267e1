// RSA Key Generation
// Toy-sized key pairs from user-supplied or randomly sampled primes

use log::{debug, warn};
use num_traits::One;
use rand::Rng;

use super::bigint::{from_u64, gcd, is_prime, mod_inverse, primes_descending, random_in_range, sample_prime, RsaBigInt};
use crate::error::{CipherError, Result};

/// Products at or below this cannot hold a whole byte per block
const MIN_PRODUCT: u64 = 255;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq)]
pub struct RsaPublicKey {
    pub n: RsaBigInt, // Modulus
    pub e: RsaBigInt, // Public exponent
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq)]
pub struct RsaPrivateKey {
    pub n: RsaBigInt, // Modulus (same as public)
    pub d: RsaBigInt, // Private exponent
    pub p: RsaBigInt, // First prime factor
    pub q: RsaBigInt, // Second prime factor
}

/// RSA Key Pair (both public and private keys)
///
/// Built once per key generation and never updated in place;
/// regenerating keys yields a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
    pub phi: RsaBigInt, // (p-1)(q-1)
}

/// Settings for random prime sampling
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyGenConfig {
    pub prime_min: u64,
    pub prime_max: u64,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            prime_min: 100,
            prime_max: 1000,
        }
    }
}

impl KeyGenConfig {
    pub fn with_prime_range(mut self, min: u64, max: u64) -> Self {
        self.prime_min = min;
        self.prime_max = max;
        self
    }

    /// Rejects ranges that cannot yield two distinct primes with product > 255
    pub fn validate(&self) -> Result<()> {
        if self.prime_min >= self.prime_max {
            return Err(CipherError::InvalidKey(format!(
                "Prime range [{}, {}) is empty",
                self.prime_min, self.prime_max
            )));
        }

        // The two largest primes give the largest product; stop once both are found
        let mut primes = primes_descending(self.prime_min, self.prime_max);
        let largest_pair = match (primes.next(), primes.next()) {
            (Some(a), Some(b)) => u128::from(a) * u128::from(b),
            _ => 0,
        };
        if largest_pair <= u128::from(MIN_PRODUCT) {
            return Err(CipherError::InvalidKey(format!(
                "Prime range [{}, {}) has no two distinct primes with product > {}",
                self.prime_min, self.prime_max, MIN_PRODUCT
            )));
        }

        Ok(())
    }
}

impl RsaPublicKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Encrypt bytes with this public key; returns Base64 text
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        super::encrypt::encrypt_block(plaintext, &self.e, &self.n)
    }
}

impl RsaPrivateKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Decrypt Base64 ciphertext with this private key
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        super::decrypt::decrypt_block(ciphertext, &self.d, &self.n)
    }
}

impl RsaKeyPair {
    /// Build a key pair from two primes and a random public exponent
    pub fn generate<R: Rng + ?Sized>(p: RsaBigInt, q: RsaBigInt, rng: &mut R) -> Result<Self> {
        generate_keypair(p, q, rng)
    }

    /// Build a key pair with a caller-chosen public exponent
    pub fn with_exponent(p: RsaBigInt, q: RsaBigInt, e: RsaBigInt) -> Result<Self> {
        let (n, phi) = modulus_and_totient(&p, &q)?;

        if e < from_u64(2) || e >= phi {
            return Err(CipherError::InvalidKey(format!(
                "E must satisfy 2 <= E < Phi ({})",
                phi
            )));
        }
        if !gcd(&e, &phi).is_one() {
            return Err(CipherError::InvalidKey(format!("E={} is not coprime with Phi={}", e, phi)));
        }

        assemble(p, q, n, phi, e)
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.public_key.bit_length()
    }

    pub fn n(&self) -> &RsaBigInt {
        &self.public_key.n
    }

    pub fn e(&self) -> &RsaBigInt {
        &self.public_key.e
    }

    pub fn d(&self) -> &RsaBigInt {
        &self.private_key.d
    }
}

/// Check user-supplied primes before generating keys
pub fn validate_user_primes(p: &RsaBigInt, q: &RsaBigInt) -> Result<()> {
    if !is_prime(p) {
        return Err(CipherError::InvalidKey("P must be a prime number.".to_string()));
    }
    if !is_prime(q) {
        return Err(CipherError::InvalidKey("Q must be a prime number.".to_string()));
    }
    if p == q {
        return Err(CipherError::InvalidKey(
            "P and Q must be different prime numbers.".to_string(),
        ));
    }
    if p * q <= from_u64(MIN_PRODUCT) {
        return Err(CipherError::InvalidKey(format!(
            "P × Q must be greater than {}. Please enter larger primes.",
            MIN_PRODUCT
        )));
    }

    Ok(())
}

/// Parse a decimal prime as typed by a user
pub fn parse_prime(label: &str, value: &str) -> Result<RsaBigInt> {
    value
        .trim()
        .parse::<RsaBigInt>()
        .map_err(|_| CipherError::InvalidKey(format!("{} must be a non-negative decimal integer, got {:?}", label, value)))
}

/// Resolve the primes for key generation.
///
/// Both given: parse and validate them. Neither given: sample both from the
/// configured range. Only one given is an error.
pub fn resolve_primes<R: Rng + ?Sized>(
    p: Option<&str>,
    q: Option<&str>,
    config: &KeyGenConfig,
    rng: &mut R,
) -> Result<(RsaBigInt, RsaBigInt)> {
    let p = p.map(str::trim).filter(|s| !s.is_empty());
    let q = q.map(str::trim).filter(|s| !s.is_empty());

    match (p, q) {
        (Some(p), Some(q)) => {
            let p = parse_prime("P", p)?;
            let q = parse_prime("Q", q)?;
            validate_user_primes(&p, &q)?;
            Ok((p, q))
        }
        (None, None) => {
            config.validate()?;
            Ok(random_primes(config, rng))
        }
        _ => Err(CipherError::InvalidKey(
            "Please provide both P and Q values or leave both empty for auto-generation.".to_string(),
        )),
    }
}

/// Sample P and Q until they differ and their product exceeds 255.
/// Both are redrawn together; a narrow range may hold a P with no valid partner.
/// Terminates only for a range that passed `KeyGenConfig::validate`.
fn random_primes<R: Rng + ?Sized>(config: &KeyGenConfig, rng: &mut R) -> (RsaBigInt, RsaBigInt) {
    loop {
        let p = sample_prime(config.prime_min, config.prime_max, rng);
        let q = sample_prime(config.prime_min, config.prime_max, rng);
        if p != q && &p * &q > from_u64(MIN_PRODUCT) {
            debug!("sampled primes p={} q={}", p, q);
            return (p, q);
        }
    }
}

/// Generate an RSA key pair from two primes.
///
/// E is drawn uniformly from [2, Phi) until it is coprime with Phi,
/// then D = E^(-1) mod Phi.
pub fn generate_keypair<R: Rng + ?Sized>(p: RsaBigInt, q: RsaBigInt, rng: &mut R) -> Result<RsaKeyPair> {
    let (n, phi) = modulus_and_totient(&p, &q)?;

    let two = from_u64(2);
    let e = loop {
        let candidate = random_in_range(&two, &phi, rng);
        if gcd(&candidate, &phi).is_one() {
            break candidate;
        }
    };

    assemble(p, q, n, phi, e)
}

/// Random key pair using primes from `config`
pub fn generate_random_keypair<R: Rng + ?Sized>(config: &KeyGenConfig, rng: &mut R) -> Result<RsaKeyPair> {
    config.validate()?;
    let (p, q) = random_primes(config, rng);
    generate_keypair(p, q, rng)
}

fn modulus_and_totient(p: &RsaBigInt, q: &RsaBigInt) -> Result<(RsaBigInt, RsaBigInt)> {
    let n = p * q;
    if n < from_u64(2) {
        return Err(CipherError::DegenerateKey(
            "N is too small. Please use larger prime numbers.".to_string(),
        ));
    }
    if n <= from_u64(MIN_PRODUCT) {
        warn!("N={} is small: only bytes below N will survive encryption", n);
    }

    // n >= 2 means both factors are at least 1
    let phi = (p - 1u8) * (q - 1u8);
    if phi <= from_u64(2) {
        return Err(CipherError::DegenerateKey(format!(
            "Phi={} leaves no public exponent in [2, Phi)",
            phi
        )));
    }

    Ok((n, phi))
}

fn assemble(p: RsaBigInt, q: RsaBigInt, n: RsaBigInt, phi: RsaBigInt, e: RsaBigInt) -> Result<RsaKeyPair> {
    let d = mod_inverse(&e, &phi)
        .ok_or_else(|| CipherError::InvalidKey("Failed to compute modular inverse".to_string()))?;

    debug!("key pair ready: n={} phi={} e={}", n, phi, e);

    Ok(RsaKeyPair {
        public_key: RsaPublicKey { n: n.clone(), e },
        private_key: RsaPrivateKey { n, d, p, q },
        phi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::{Duration, Instant};

    #[test]
    fn test_textbook_key() {
        let keypair = RsaKeyPair::with_exponent(from_u64(61), from_u64(53), from_u64(17)).unwrap();
        assert_eq!(*keypair.n(), from_u64(3233));
        assert_eq!(keypair.phi, from_u64(3120));
        assert_eq!(*keypair.d(), from_u64(2753));
        assert_eq!(keypair.bit_length(), 12);
    }

    #[test]
    fn test_key_properties() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let keypair = generate_random_keypair(&KeyGenConfig::default(), &mut rng).unwrap();
            let key = &keypair.private_key;

            assert_ne!(key.p, key.q);
            assert!(is_prime(&key.p) && is_prime(&key.q));
            assert_eq!(key.n, &key.p * &key.q);
            assert!(key.n > from_u64(255));

            // e in [2, phi), d in [0, phi), e * d ≡ 1 (mod φ(n))
            assert!(*keypair.e() >= from_u64(2) && *keypair.e() < keypair.phi);
            assert!(key.d < keypair.phi);
            assert_eq!((keypair.e() * &key.d) % &keypair.phi, from_u64(1));
        }
    }

    #[test]
    fn test_validate_user_primes() {
        assert!(validate_user_primes(&from_u64(61), &from_u64(53)).is_ok());

        let err = validate_user_primes(&from_u64(4), &from_u64(7)).unwrap_err();
        assert!(err.to_string().contains("P must be a prime"));
        assert!(matches!(validate_user_primes(&from_u64(7), &from_u64(9)), Err(CipherError::InvalidKey(_))));
        assert!(matches!(validate_user_primes(&from_u64(7), &from_u64(7)), Err(CipherError::InvalidKey(_))));
        assert!(matches!(validate_user_primes(&from_u64(2), &from_u64(3)), Err(CipherError::InvalidKey(_))));
    }

    #[test]
    fn test_degenerate_keys() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            generate_keypair(from_u64(1), from_u64(1), &mut rng),
            Err(CipherError::DegenerateKey(_))
        ));
        assert!(matches!(
            generate_keypair(from_u64(0), from_u64(7), &mut rng),
            Err(CipherError::DegenerateKey(_))
        ));
        // phi = 2 leaves [2, 2) empty
        assert!(matches!(
            generate_keypair(from_u64(2), from_u64(3), &mut rng),
            Err(CipherError::DegenerateKey(_))
        ));
    }

    #[test]
    fn test_small_modulus_still_generates() {
        let mut rng = StdRng::seed_from_u64(5);
        let keypair = generate_keypair(from_u64(11), from_u64(13), &mut rng).unwrap();
        assert_eq!(*keypair.n(), from_u64(143));
        assert_eq!((keypair.e() * keypair.d()) % &keypair.phi, from_u64(1));
    }

    #[test]
    fn test_with_exponent_rejects_bad_e() {
        // gcd(3, 3120) = 3
        assert!(RsaKeyPair::with_exponent(from_u64(61), from_u64(53), from_u64(3)).is_err());
        assert!(RsaKeyPair::with_exponent(from_u64(61), from_u64(53), from_u64(1)).is_err());
        assert!(RsaKeyPair::with_exponent(from_u64(61), from_u64(53), from_u64(3120)).is_err());
    }

    #[test]
    fn test_resolve_primes() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = KeyGenConfig::default();

        let (p, q) = resolve_primes(Some("61"), Some(" 53 "), &config, &mut rng).unwrap();
        assert_eq!((p, q), (from_u64(61), from_u64(53)));

        let (p, q) = resolve_primes(None, Some(""), &config, &mut rng).unwrap();
        assert!(p >= from_u64(100) && p < from_u64(1000));
        assert!(q >= from_u64(100) && q < from_u64(1000));
        assert_ne!(p, q);

        assert!(resolve_primes(Some("61"), None, &config, &mut rng).is_err());
        assert!(resolve_primes(Some("sixty-one"), Some("53"), &config, &mut rng).is_err());
        assert!(resolve_primes(Some("4"), Some("53"), &config, &mut rng).is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(KeyGenConfig::default().validate().is_ok());
        assert!(KeyGenConfig::default().with_prime_range(50, 50).validate().is_err());
        // only 2, 3, 5, 7 available: best product is 35
        assert!(KeyGenConfig::default().with_prime_range(2, 10).validate().is_err());
        assert!(KeyGenConfig::default().with_prime_range(2, 30).validate().is_ok());
        // 24..29 holds no prime at all
        assert!(KeyGenConfig::default().with_prime_range(24, 29).validate().is_err());
    }

    #[test]
    fn test_config_validation_wide_range() {
        let start = Instant::now();
        let config = KeyGenConfig::default().with_prime_range(1_000_000, 1_000_000_000);
        assert!(config.validate().is_ok());
        assert!(start.elapsed() < Duration::from_secs(5), "took {:?}", start.elapsed());
    }

    #[test]
    fn test_random_keypair_from_wider_range() {
        let mut rng = StdRng::seed_from_u64(13);
        let config = KeyGenConfig::default().with_prime_range(1_000_000, 3_000_000);
        let keypair = generate_random_keypair(&config, &mut rng).unwrap();
        let key = &keypair.private_key;

        assert!(key.p >= from_u64(1_000_000) && key.p < from_u64(3_000_000));
        assert!(key.q >= from_u64(1_000_000) && key.q < from_u64(3_000_000));
        assert_eq!((keypair.e() * &key.d) % &keypair.phi, from_u64(1));

        let ciphertext = keypair.public_key.encrypt(b"wide keys").unwrap();
        assert_eq!(keypair.private_key.decrypt(&ciphertext).unwrap(), "wide keys");
    }

    #[test]
    fn test_key_encrypt_decrypt() {
        let mut rng = StdRng::seed_from_u64(11);
        let keypair = generate_random_keypair(&KeyGenConfig::default(), &mut rng).unwrap();
        let message = "Hello, RSA!";

        let ciphertext = keypair.public_key.encrypt(message.as_bytes()).unwrap();
        let decrypted = keypair.private_key.decrypt(&ciphertext).unwrap();

        assert_eq!(message, decrypted);
    }
}
