// RSA Big Integer Operations
// Wrapper around num-bigint for the toy RSA arithmetic

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use rand::Rng;

use crate::error::{CipherError, Result};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Convert big integer to bytes (big-endian)
pub fn to_bytes(n: &RsaBigInt) -> Vec<u8> {
    n.to_bytes_be()
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply algorithm
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
///
/// Coefficients are signed, so this works on `BigInt` rather than `RsaBigInt`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if b.is_zero() {
        return (a.clone(), BigInt::one(), BigInt::zero());
    }

    let (gcd, x1, y1) = extended_gcd(b, &(a % b));
    let y = x1 - (a / b) * &y1;

    (gcd, y1, y)
}

/// Compute modular inverse: a^(-1) mod m
/// Returns None if inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let a = BigInt::from(a.clone());
    let m = BigInt::from(m.clone());
    let (gcd, x, _) = extended_gcd(&a, &m);

    if !gcd.is_one() {
        return None;
    }

    // Bézout coefficient may be negative (or exceed m when a > m)
    let mut result = x % &m;
    if result.is_negative() {
        result += &m;
    }

    result.to_biguint()
}

/// Deterministic primality test by trial division.
/// Eliminates 2 and 3, then tries divisors of the form 6k ± 1.
pub fn is_prime(n: &RsaBigInt) -> bool {
    if *n <= RsaBigInt::one() {
        return false;
    }
    if *n == from_u64(2) || *n == from_u64(3) {
        return true;
    }
    if (n % 2u8).is_zero() || (n % 3u8).is_zero() {
        return false;
    }

    let mut i = from_u64(5);
    while &(&i * &i) <= n {
        if (n % &i).is_zero() || (n % (&i + 2u8)).is_zero() {
            return false;
        }
        i += 6u8;
    }

    true
}

/// Primes in [lo, hi), largest first. Lazy: taking the first few stops
/// after a prime gap or two instead of walking the whole range.
pub fn primes_descending(lo: u64, hi: u64) -> impl Iterator<Item = u64> {
    (lo..hi).rev().filter(|&n| is_prime(&from_u64(n)))
}

/// Draw uniformly from [lo, hi) until a prime comes up.
/// Fails if the range is empty or holds no prime.
pub fn generate_prime_in_range<R: Rng + ?Sized>(lo: u64, hi: u64, rng: &mut R) -> Result<RsaBigInt> {
    if lo >= hi {
        return Err(CipherError::InvalidKey(format!("Prime range [{}, {}) is empty", lo, hi)));
    }
    if primes_descending(lo, hi).next().is_none() {
        return Err(CipherError::InvalidKey(format!("Prime range [{}, {}) holds no prime", lo, hi)));
    }

    Ok(sample_prime(lo, hi, rng))
}

/// Resample until prime; the caller has already checked that [lo, hi) holds one
pub(crate) fn sample_prime<R: Rng + ?Sized>(lo: u64, hi: u64, rng: &mut R) -> RsaBigInt {
    loop {
        let candidate = from_u64(rng.gen_range(lo..hi));
        if is_prime(&candidate) {
            return candidate;
        }
    }
}

/// Generate a random big integer in range [lo, hi)
pub fn random_in_range<R: Rng + ?Sized>(lo: &RsaBigInt, hi: &RsaBigInt, rng: &mut R) -> RsaBigInt {
    rng.gen_biguint_range(lo, hi)
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn naive_is_prime(n: u64) -> bool {
        n >= 2 && (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0)
    }

    #[test]
    fn test_mod_pow() {
        // 3^5 mod 7 = 243 mod 7 = 5
        let result = mod_pow(&from_u64(3), &from_u64(5), &from_u64(7));
        assert_eq!(result, from_u64(5));

        // Textbook RSA: 65^17 mod 3233 = 2790
        let result = mod_pow(&from_u64(65), &from_u64(17), &from_u64(3233));
        assert_eq!(result, from_u64(2790));
    }

    #[test]
    fn test_mod_pow_modulus_one() {
        assert_eq!(mod_pow(&from_u64(12), &from_u64(3), &from_u64(1)), from_u64(0));
    }

    #[test]
    fn test_extended_gcd_bezout() {
        let cases = [(17i64, 3120i64), (240, 46), (3120, 17), (35, 64), (12, 18)];
        for (a, b) in cases {
            let (a, b) = (BigInt::from(a), BigInt::from(b));
            let (g, x, y) = extended_gcd(&a, &b);
            assert_eq!(&a * &x + &b * &y, g);
            assert_eq!(g, a.gcd(&b));
        }
    }

    #[test]
    fn test_mod_inverse() {
        // 3 * 5 = 15 ≡ 1 mod 7, so inverse of 3 mod 7 is 5
        let inv = mod_inverse(&from_u64(3), &from_u64(7)).unwrap();
        assert_eq!(inv, from_u64(5));

        // Negative Bézout coefficient is folded into [0, m)
        let d = mod_inverse(&from_u64(17), &from_u64(3120)).unwrap();
        assert_eq!(d, from_u64(2753));
    }

    #[test]
    fn test_mod_inverse_missing() {
        assert!(mod_inverse(&from_u64(6), &from_u64(9)).is_none());
    }

    #[test]
    fn test_is_prime_matches_trial_division() {
        for n in 0..=10_000u64 {
            assert_eq!(is_prime(&from_u64(n)), naive_is_prime(n), "n = {}", n);
        }
    }

    #[test]
    fn test_generate_prime_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let p = generate_prime_in_range(100, 1000, &mut rng).unwrap();
            assert!(is_prime(&p));
            assert!(p >= from_u64(100) && p < from_u64(1000));
        }
    }

    #[test]
    fn test_generate_prime_in_bad_range() {
        let mut rng = StdRng::seed_from_u64(8);
        assert!(matches!(generate_prime_in_range(50, 50, &mut rng), Err(CipherError::InvalidKey(_))));
        assert!(matches!(generate_prime_in_range(60, 10, &mut rng), Err(CipherError::InvalidKey(_))));
        // 24..29 is a prime gap
        assert!(matches!(generate_prime_in_range(24, 29, &mut rng), Err(CipherError::InvalidKey(_))));
        assert_eq!(generate_prime_in_range(24, 30, &mut rng).unwrap(), from_u64(29));
    }

    #[test]
    fn test_primes_descending() {
        let top: Vec<u64> = primes_descending(2, 30).take(3).collect();
        assert_eq!(top, vec![29, 23, 19]);
        assert_eq!(primes_descending(24, 29).count(), 0);

        // wide range: only the top of the range is examined
        let top: Vec<u64> = primes_descending(1_000_000, 1_000_000_000).take(2).collect();
        assert_eq!(top, vec![999_999_937, 999_999_929]);
    }

    #[test]
    fn test_random_in_range_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let (lo, hi) = (from_u64(2), from_u64(10));
        for _ in 0..100 {
            let v = random_in_range(&lo, &hi, &mut rng);
            assert!(v >= lo && v < hi);
        }
    }
}
