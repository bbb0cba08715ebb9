//! numcrypt CLI
//!
//! Without a subcommand, opens the interactive menu. Subcommands run one
//! computation and print the result.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use num::bigint::{BigInt, BigUint};

use numcrypt::app::{run_app, spinner};
use numcrypt::config::{check_bits, load_config, resolve, Overrides, ResolvedConfig};
use numcrypt::logging;
use numcrypt::numtheory::{is_probable_prime, random_prime, DEFAULT_ROUNDS};
use numcrypt::report::{
    format_ciphertext, format_gcd, format_keypair, format_prime, format_primality,
    CiphertextReport, GcdReport, PrimalityReport, PrimeReport,
};
use numcrypt::rsa::{encrypt_text, KeyPair, PublicKey, MIN_BITS, PUBLIC_EXPONENT};
use numcrypt::types::{OutputFormat, WrapPolicy};

#[derive(Parser)]
#[command(name = "numcrypt")]
#[command(about = "Number theory and textbook RSA in a terminal menu")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/numcrypt/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Cursor behavior past either end of a menu
    #[arg(long, value_enum, global = true)]
    wrap: Option<WrapArg>,

    /// Log file (default: <cache dir>/numcrypt/numcrypt.log)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Greatest common divisor, least common multiple and Bezout coefficients
    Gcd {
        #[arg(allow_negative_numbers = true)]
        a: BigInt,

        #[arg(allow_negative_numbers = true)]
        b: BigInt,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Miller-Rabin primality test
    IsPrime {
        n: BigUint,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Generate a random prime
    Prime {
        /// Size in bits (default: from config)
        #[arg(long)]
        bits: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Generate an RSA key pair
    RsaKeygen {
        /// Modulus size in bits (default: from config)
        #[arg(long)]
        bits: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Encrypt a text message with a public key
    RsaEncrypt {
        /// Modulus
        #[arg(long)]
        n: BigUint,

        /// Public exponent
        #[arg(long, default_value_t = BigUint::from(PUBLIC_EXPONENT))]
        e: BigUint,

        message: String,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum WrapArg {
    Symmetric,
    Reset,
}

impl From<WrapArg> for WrapPolicy {
    fn from(arg: WrapArg) -> Self {
        match arg {
            WrapArg::Symmetric => WrapPolicy::Symmetric,
            WrapArg::Reset => WrapPolicy::ResetOnUnderflow,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = setup(&cli).and_then(|config| match cli.command {
        None => cmd_menu(&config),
        Some(Commands::Gcd { a, b, format }) => cmd_gcd(&a, &b, format.into()),
        Some(Commands::IsPrime { n, format }) => cmd_is_prime(&n, format.into()),
        Some(Commands::Prime { bits, format }) => {
            cmd_prime(bits.unwrap_or(config.prime_bits), format.into())
        }
        Some(Commands::RsaKeygen { bits, format }) => {
            cmd_rsa_keygen(bits.unwrap_or(config.rsa_bits), format.into())
        }
        Some(Commands::RsaEncrypt { n, e, message, format }) => {
            cmd_rsa_encrypt(PublicKey { n, e }, &message, format.into())
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// SETUP
// ============================================================================

/// Load and resolve configuration, then start file logging.
fn setup(cli: &Cli) -> Result<ResolvedConfig, String> {
    let file = load_config(cli.config.as_deref()).map_err(|e| e.to_string())?;
    let overrides = Overrides {
        wrap: cli.wrap.map(WrapPolicy::from),
        log_file: cli.log_file.clone(),
    };
    let config = resolve(file, overrides).map_err(|e| e.to_string())?;

    if let Some(path) = &config.log_file {
        if let Err(e) = logging::init(path, config.log_level) {
            eprintln!("Note: logging disabled ({}: {})", path.display(), e);
        }
    }
    log::debug!("resolved config: {config:?}");
    Ok(config)
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_menu(config: &ResolvedConfig) -> Result<(), String> {
    run_app(config).map_err(|e| e.to_string())
}

fn cmd_gcd(a: &BigInt, b: &BigInt, format: OutputFormat) -> Result<(), String> {
    print!("{}", format_gcd(&GcdReport::compute(a, b), format));
    Ok(())
}

fn cmd_is_prime(n: &BigUint, format: OutputFormat) -> Result<(), String> {
    let report = PrimalityReport {
        n: n.to_string(),
        probable_prime: is_probable_prime(n, DEFAULT_ROUNDS),
        rounds: DEFAULT_ROUNDS,
    };
    print!("{}", format_primality(&report, format));
    Ok(())
}

fn cmd_prime(bits: u64, format: OutputFormat) -> Result<(), String> {
    let bits = check_bits("--bits", 2, bits).map_err(|e| e.to_string())?;

    // Spinner only in human mode so JSON on stdout stays clean.
    let sp = (format == OutputFormat::Human)
        .then(|| spinner(&format!("Searching for a {bits}-bit prime...")));
    let prime = random_prime(bits);
    if let Some(sp) = sp {
        sp.finish_and_clear();
    }

    let prime = prime.ok_or_else(|| format!("no prime has {} bits", bits))?;
    let report = PrimeReport {
        bits,
        prime: prime.to_string(),
    };
    print!("{}", format_prime(&report, format));
    Ok(())
}

fn cmd_rsa_keygen(bits: u64, format: OutputFormat) -> Result<(), String> {
    let bits = check_bits("--bits", MIN_BITS, bits).map_err(|e| e.to_string())?;

    let sp = (format == OutputFormat::Human)
        .then(|| spinner(&format!("Generating a {bits}-bit key pair...")));
    let pair = KeyPair::generate(bits);
    if let Some(sp) = sp {
        sp.finish_and_clear();
    }

    let pair = pair.map_err(|e| e.to_string())?;
    log::info!("generated {bits}-bit key pair");
    print!("{}", format_keypair(&pair, format));
    Ok(())
}

fn cmd_rsa_encrypt(key: PublicKey, message: &str, format: OutputFormat) -> Result<(), String> {
    let c = encrypt_text(message, &key).map_err(|e| e.to_string())?;
    print!("{}", format_ciphertext(&CiphertextReport::new(&key, message, &c), format));
    Ok(())
}
