//! Number-theory primitives on arbitrary-precision integers.
//!
//! Pure functions apart from the randomness in primality testing and
//! prime generation. Prime search tests candidate batches in parallel
//! with rayon.

use num::bigint::{BigInt, BigUint, RandBigInt};
use num::{Integer, One, Signed, Zero};
use rayon::prelude::*;

/// Miller-Rabin rounds used by default. Error bound 4^-40.
pub const DEFAULT_ROUNDS: usize = 40;

/// Primes used for trial division before Miller-Rabin.
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Candidates generated per parallel search round.
const SEARCH_BATCH: usize = 64;

// ============================================================================
// DIVISIBILITY
// ============================================================================

/// Greatest common divisor, always non-negative. `gcd(a, 0) == |a|`.
pub fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    a.gcd(b)
}

/// Least common multiple, always non-negative. Zero if either input is.
pub fn lcm(a: &BigInt, b: &BigInt) -> BigInt {
    a.lcm(b)
}

/// Extended Euclid: returns `(g, x, y)` with `a*x + b*y == g`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let e = a.extended_gcd(b);
    (e.gcd, e.x, e.y)
}

/// Inverse of `a` modulo `m`, in `[0, m)`. `None` when not coprime.
pub fn mod_inverse(a: &BigInt, m: &BigInt) -> Option<BigInt> {
    if m.is_zero() {
        return None;
    }
    let (g, x, _) = extended_gcd(a, m);
    if !g.is_one() {
        return None;
    }
    Some(x.mod_floor(&m.abs()))
}

// ============================================================================
// PRIMALITY
// ============================================================================

/// Probabilistic primality test: trial division, then Miller-Rabin.
///
/// Never reports a prime as composite. A composite passes with
/// probability at most 4^-rounds.
pub fn is_probable_prime(n: &BigUint, rounds: usize) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    for p in SMALL_PRIMES {
        let p = BigUint::from(p);
        if *n == p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    let n_minus_one = n - 1u32;
    // n is odd and > 97 here, so n - 1 has at least one factor of two.
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    let mut rng = rand::thread_rng();
    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Random prime with exactly `bits` bits (top bit set).
///
/// Returns `None` for `bits < 2`.
pub fn random_prime(bits: u64) -> Option<BigUint> {
    if bits < 2 {
        return None;
    }
    let mut rng = rand::thread_rng();
    loop {
        let batch: Vec<BigUint> = (0..SEARCH_BATCH)
            .map(|_| candidate(&mut rng, bits))
            .collect();
        if let Some(p) = batch
            .into_par_iter()
            .find_any(|c| is_probable_prime(c, DEFAULT_ROUNDS))
        {
            return Some(p);
        }
    }
}

/// Odd random number with the top bit set.
fn candidate<R: RandBigInt>(rng: &mut R, bits: u64) -> BigUint {
    let mut c = rng.gen_biguint(bits);
    c.set_bit(bits - 1, true);
    if bits > 2 {
        c.set_bit(0, true);
    }
    c
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: i64) -> BigInt {
        BigInt::from(n)
    }

    fn ubig(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn gcd_of_known_pairs() {
        assert_eq!(gcd(&big(10), &big(15)), big(5));
        assert_eq!(gcd(&big(3_651), &big(4_635)), big(3));
        assert_eq!(gcd(&big(56), &big(42)), big(14));
        assert_eq!(gcd(&big(24_826_148), &big(45_296_490)), big(526));
    }

    #[test]
    fn gcd_with_zero_is_the_other_operand() {
        assert_eq!(gcd(&big(-12), &big(0)), big(12));
        assert_eq!(gcd(&big(0), &big(7)), big(7));
    }

    #[test]
    fn lcm_of_known_pairs() {
        assert_eq!(lcm(&big(10), &big(15)), big(30));
        assert_eq!(lcm(&big(3_651), &big(4_635)), big(5_640_795));
        assert_eq!(lcm(&big(56), &big(42)), big(168));
        assert_eq!(
            lcm(&big(24_826_148), &big(45_296_490)),
            BigInt::from(2_137_903_735_020u64)
        );
    }

    #[test]
    fn extended_gcd_satisfies_bezout() {
        for (a, b, g) in [
            (10, 15, 5),
            (3_651, 4_635, 3),
            (56, 42, 14),
            (24_826_148, 45_296_490, 526),
        ] {
            let (a, b) = (big(a), big(b));
            let (gg, x, y) = extended_gcd(&a, &b);
            assert_eq!(gg, big(g));
            assert_eq!(&a * &x + &b * &y, gg, "{a}*{x} + {b}*{y}");
        }
    }

    #[test]
    fn mod_inverse_round_trips() {
        let inv = mod_inverse(&big(17), &big(3120)).unwrap();
        assert_eq!(inv, big(2753));
        assert!((big(17) * inv % big(3120)).is_one());
    }

    #[test]
    fn mod_inverse_of_negative_is_normalized() {
        let inv = mod_inverse(&big(-3), &big(7)).unwrap();
        assert_eq!(inv, big(2));
    }

    #[test]
    fn mod_inverse_requires_coprime() {
        assert_eq!(mod_inverse(&big(6), &big(9)), None);
        assert_eq!(mod_inverse(&big(6), &big(0)), None);
    }

    #[test]
    fn small_numbers_classified_correctly() {
        let primes: Vec<u64> = (0..200)
            .filter(|&n| is_probable_prime(&ubig(n), DEFAULT_ROUNDS))
            .collect();
        assert_eq!(primes.len(), 46);
        assert_eq!(&primes[..5], &[2, 3, 5, 7, 11]);
        assert_eq!(*primes.last().unwrap(), 199);
    }

    #[test]
    fn carmichael_numbers_are_composite() {
        for n in [561u64, 1105, 1729, 2465, 2821, 6601, 8911] {
            assert!(!is_probable_prime(&ubig(n), DEFAULT_ROUNDS), "{n}");
        }
    }

    #[test]
    fn large_known_prime_passes() {
        // 2^61 - 1 (Mersenne prime)
        assert!(is_probable_prime(&ubig((1 << 61) - 1), DEFAULT_ROUNDS));
        assert!(!is_probable_prime(&ubig((1 << 61) + 1), DEFAULT_ROUNDS));
    }

    #[test]
    fn random_prime_has_requested_size() {
        for bits in [2u64, 8, 32, 128] {
            let p = random_prime(bits).unwrap();
            assert_eq!(p.bits(), bits);
            assert!(is_probable_prime(&p, DEFAULT_ROUNDS));
        }
    }

    #[test]
    fn random_prime_rejects_tiny_sizes() {
        assert!(random_prime(0).is_none());
        assert!(random_prime(1).is_none());
    }
}
