//! Result formatting for the scripted subcommands.
//!
//! Pure functions: (result, OutputFormat) → String. Big integers are
//! rendered as decimal strings in JSON so no precision is lost.

use num::bigint::{BigInt, BigUint};
use serde::Serialize;

use crate::numtheory::{extended_gcd, gcd, lcm};
use crate::rsa::{KeyPair, PublicKey};
use crate::types::OutputFormat;

// ============================================================================
// REPORT SHAPES
// ============================================================================

/// gcd, lcm and Bezout coefficients of a pair.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct GcdReport {
    pub a: String,
    pub b: String,
    pub gcd: String,
    pub lcm: String,
    /// `a*x + b*y == gcd`
    pub x: String,
    pub y: String,
}

impl GcdReport {
    pub fn compute(a: &BigInt, b: &BigInt) -> Self {
        let (g, x, y) = extended_gcd(a, b);
        debug_assert_eq!(g, gcd(a, b));
        GcdReport {
            a: a.to_string(),
            b: b.to_string(),
            gcd: g.to_string(),
            lcm: lcm(a, b).to_string(),
            x: x.to_string(),
            y: y.to_string(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PrimalityReport {
    pub n: String,
    pub probable_prime: bool,
    pub rounds: usize,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PrimeReport {
    pub bits: u64,
    pub prime: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CiphertextReport {
    pub n: String,
    pub e: String,
    pub message: String,
    pub ciphertext: String,
}

impl CiphertextReport {
    pub fn new(key: &PublicKey, message: &str, ciphertext: &BigUint) -> Self {
        CiphertextReport {
            n: key.n.to_string(),
            e: key.e.to_string(),
            message: message.to_string(),
            ciphertext: ciphertext.to_string(),
        }
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

pub fn format_gcd(report: &GcdReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format!(
            "gcd({a}, {b}) = {g}\n\
             lcm({a}, {b}) = {l}\n\
             {a}*({x}) + {b}*({y}) = {g}\n",
            a = report.a,
            b = report.b,
            g = report.gcd,
            l = report.lcm,
            x = report.x,
            y = report.y,
        ),
        OutputFormat::Json => to_json(report),
    }
}

pub fn format_primality(report: &PrimalityReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => {
            if report.probable_prime {
                format!("{} is prime (Miller-Rabin, {} rounds)\n", report.n, report.rounds)
            } else {
                format!("{} is composite\n", report.n)
            }
        }
        OutputFormat::Json => to_json(report),
    }
}

pub fn format_prime(report: &PrimeReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format!("{}-bit prime:\n{}\n", report.bits, report.prime),
        OutputFormat::Json => to_json(report),
    }
}

pub fn format_keypair(pair: &KeyPair, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format!(
            "=== Public key ===\nn = {}\ne = {}\n\n=== Private key ===\nd = {}\n",
            pair.public.n, pair.public.e, pair.private.d
        ),
        OutputFormat::Json => to_json(pair),
    }
}

pub fn format_ciphertext(report: &CiphertextReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format!("ciphertext:\n{}\n", report.ciphertext),
        OutputFormat::Json => to_json(report),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    let mut out = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        // Report types hold only strings, bools and integers.
        panic!("Failed to serialize report to JSON: {}", e)
    });
    out.push('\n');
    out
}

// ============================================================================
// TESTS
// ============================================================================
