//! The interactive program: main menu, RSA submenu and the actions bound
//! to their entries.
//!
//! Actions talk to the user through a [`Prompter`] in canonical mode; the
//! menus share one decoder and one console through `RefCell`s so the RSA
//! entry can run a nested menu on the same terminal.

use std::cell::RefCell;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use num::bigint::BigUint;

use crate::config::{ResolvedConfig, MAX_BITS};
use crate::console::{AnsiConsole, Console};
use crate::input::{platform_decoder, KeyDecoder};
use crate::menu::{run, Entry, Menu};
use crate::numtheory::{is_probable_prime, random_prime, DEFAULT_ROUNDS};
use crate::report::{
    format_ciphertext, format_keypair, format_prime, format_primality, CiphertextReport,
    PrimalityReport, PrimeReport,
};
use crate::rsa::{
    decrypt, encrypt_text, int_to_text, KeyPair, PublicKey, RsaError, MIN_BITS, PUBLIC_EXPONENT,
};
use crate::types::{EntryColors, MenuError, OutputFormat, WrapPolicy};

const MAIN_ENTRIES: usize = 5;
const RSA_ENTRIES: usize = 4;

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Run the interactive menus on the process terminal until the user
/// leaves the main menu.
///
/// # Errors
/// Terminal setup and read failures.
pub fn run_app(config: &ResolvedConfig) -> Result<(), MenuError> {
    let decoder = RefCell::new(platform_decoder()?);
    let console = RefCell::new(AnsiConsole::stdout());
    let session = Session::new(Prompter::new(io::stdin().lock(), io::stdout()), config);

    info!("starting interactive menu (wrap: {:?})", config.wrap);
    run_session(&session, &decoder, &console, config.colors, config.wrap)
}

/// Build the main menu over `session` and run it.
///
/// # Errors
/// Decoder failures from the main menu loop.
pub fn run_session<R, W, D, C>(
    session: &Session<R, W>,
    decoder: &RefCell<D>,
    console: &RefCell<C>,
    colors: EntryColors,
    wrap: WrapPolicy,
) -> Result<(), MenuError>
where
    R: BufRead,
    W: Write,
    D: KeyDecoder,
    C: Console,
{
    let rsa = || settle("RSA", rsa_menu(session, decoder, console, colors, wrap));
    let encrypt = || settle("RSA -> encrypt", session.encrypt_with_public_key());
    let primality = || settle("primality test", session.primality_test());
    let generator = || settle("prime generator", session.prime_generator());

    let mut menu = Menu::new(MAIN_ENTRIES, wrap);
    menu.add_entry(Entry::new("RSA", colors, &rsa))?;
    menu.add_entry(Entry::new("RSA -> encrypt", colors, &encrypt))?;
    menu.add_entry(Entry::new("Primality test", colors, &primality))?;
    menu.add_entry(Entry::new("Prime number generator", colors, &generator))?;
    menu.add_entry(Entry::quit("EXIT", colors))?;

    let (mut decoder, mut console) = (decoder, console);
    run(&mut menu, &mut decoder, &mut console)
}

fn rsa_menu<R, W, D, C>(
    session: &Session<R, W>,
    decoder: &RefCell<D>,
    console: &RefCell<C>,
    colors: EntryColors,
    wrap: WrapPolicy,
) -> Result<(), MenuError>
where
    R: BufRead,
    W: Write,
    D: KeyDecoder,
    C: Console,
{
    let generate = || settle("generate key pair", session.generate_key_pair());
    let encrypt = || settle("encrypt", session.encrypt_with_stored_key());
    let decrypt = || settle("decrypt", session.decrypt_with_stored_key());

    let mut menu = Menu::new(RSA_ENTRIES, wrap);
    menu.add_entry(Entry::new("Generate key pair", colors, &generate))?;
    menu.add_entry(Entry::new("Encrypt", colors, &encrypt))?;
    menu.add_entry(Entry::new("Decrypt", colors, &decrypt))?;
    menu.add_entry(Entry::quit("Back", colors))?;

    let (mut decoder, mut console) = (decoder, console);
    run(&mut menu, &mut decoder, &mut console)
}

/// Actions cannot return errors to the menu; log and carry on.
fn settle<E: Display>(what: &str, result: Result<(), E>) {
    if let Err(e) = result {
        error!("{what} failed: {e}");
    }
}

// ============================================================================
// PROMPTER
// ============================================================================

/// Line-oriented dialogue with the user.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()
    }

    /// Print `question` and read one line, trimmed.
    ///
    /// # Errors
    /// End of input is [`io::ErrorKind::UnexpectedEof`].
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        self.say(question)?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    /// Hold the result on screen until Enter.
    pub fn pause(&mut self) -> io::Result<()> {
        self.ask("\nPress Enter to return to the menu...").map(|_| ())
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// State shared by the actions for one run of the program.
pub struct Session<R, W> {
    prompter: RefCell<Prompter<R, W>>,
    keys: RefCell<Option<KeyPair>>,
    prime_bits: u64,
    rsa_bits: u64,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(prompter: Prompter<R, W>, config: &ResolvedConfig) -> Self {
        Session {
            prompter: RefCell::new(prompter),
            keys: RefCell::new(None),
            prime_bits: config.prime_bits,
            rsa_bits: config.rsa_bits,
        }
    }

    /// The key pair from the last successful generation, if any.
    pub fn key_pair(&self) -> Option<KeyPair> {
        self.keys.borrow().clone()
    }

    pub fn set_key_pair(&self, pair: KeyPair) {
        *self.keys.borrow_mut() = Some(pair);
    }

    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter.into_inner()
    }

    pub fn primality_test(&self) -> io::Result<()> {
        let mut p = self.prompter.borrow_mut();
        p.say("=== Primality test ===\n\n")?;
        let answer = p.ask("Number: ")?;
        match parse_biguint(&answer) {
            Ok(n) => {
                let report = PrimalityReport {
                    probable_prime: is_probable_prime(&n, DEFAULT_ROUNDS),
                    n: n.to_string(),
                    rounds: DEFAULT_ROUNDS,
                };
                p.say(&format_primality(&report, OutputFormat::Human))?;
            }
            Err(msg) => p.say(&format!("{msg}\n"))?,
        }
        p.pause()
    }

    pub fn prime_generator(&self) -> io::Result<()> {
        let mut p = self.prompter.borrow_mut();
        p.say("=== Prime number generator ===\n\n")?;
        let answer = p.ask(&format!("Size in bits [{}]: ", self.prime_bits))?;
        match parse_bits(&answer, self.prime_bits, 2) {
            Ok(bits) => {
                let pb = spinner(&format!("Searching for a {bits}-bit prime..."));
                let prime = random_prime(bits);
                pb.finish_and_clear();
                match prime {
                    Some(prime) => {
                        let report = PrimeReport {
                            bits,
                            prime: prime.to_string(),
                        };
                        p.say(&format_prime(&report, OutputFormat::Human))?;
                    }
                    None => p.say("No prime of that size.\n")?,
                }
            }
            Err(msg) => p.say(&format!("{msg}\n"))?,
        }
        p.pause()
    }

    pub fn encrypt_with_public_key(&self) -> io::Result<()> {
        let mut p = self.prompter.borrow_mut();
        p.say("=== RSA encryption ===\n\n")?;
        let n = p.ask("Modulus n: ")?;
        let e = p.ask(&format!("Public exponent e [{PUBLIC_EXPONENT}]: "))?;
        let key = match (parse_biguint(&n), parse_exponent(&e)) {
            (Ok(n), Ok(e)) => PublicKey { n, e },
            (Err(msg), _) | (_, Err(msg)) => {
                p.say(&format!("{msg}\n"))?;
                return p.pause();
            }
        };
        let message = p.ask("Message: ")?;
        match encrypt_text(&message, &key) {
            Ok(c) => {
                let report = CiphertextReport::new(&key, &message, &c);
                p.say(&format_ciphertext(&report, OutputFormat::Human))?;
            }
            Err(e) => p.say(&format!("{e}\n"))?,
        }
        p.pause()
    }

    pub fn generate_key_pair(&self) -> io::Result<()> {
        let mut p = self.prompter.borrow_mut();
        p.say("=== RSA key generation ===\n\n")?;
        let answer = p.ask(&format!("Key size in bits [{}]: ", self.rsa_bits))?;
        match parse_bits(&answer, self.rsa_bits, MIN_BITS) {
            Ok(bits) => {
                let pb = spinner(&format!("Generating a {bits}-bit key pair..."));
                let result = KeyPair::generate(bits);
                pb.finish_and_clear();
                match result {
                    Ok(pair) => {
                        info!("generated {bits}-bit key pair");
                        p.say(&format_keypair(&pair, OutputFormat::Human))?;
                        self.set_key_pair(pair);
                    }
                    Err(e) => p.say(&format!("{e}\n"))?,
                }
            }
            Err(msg) => p.say(&format!("{msg}\n"))?,
        }
        p.pause()
    }

    pub fn encrypt_with_stored_key(&self) -> io::Result<()> {
        let mut p = self.prompter.borrow_mut();
        p.say("=== Encrypt ===\n\n")?;
        let keys = self.keys.borrow();
        let Some(pair) = keys.as_ref() else {
            p.say("No key pair yet. Generate one first.\n")?;
            return p.pause();
        };
        let message = p.ask("Message: ")?;
        match encrypt_text(&message, &pair.public) {
            Ok(c) => {
                let report = CiphertextReport::new(&pair.public, &message, &c);
                p.say(&format_ciphertext(&report, OutputFormat::Human))?;
            }
            Err(e) => p.say(&format!("{e}\n"))?,
        }
        p.pause()
    }

    pub fn decrypt_with_stored_key(&self) -> io::Result<()> {
        let mut p = self.prompter.borrow_mut();
        p.say("=== Decrypt ===\n\n")?;
        let keys = self.keys.borrow();
        let Some(pair) = keys.as_ref() else {
            p.say("No key pair yet. Generate one first.\n")?;
            return p.pause();
        };
        let answer = p.ask("Ciphertext: ")?;
        let c = match parse_biguint(&answer) {
            Ok(c) => c,
            Err(msg) => {
                p.say(&format!("{msg}\n"))?;
                return p.pause();
            }
        };
        match decrypt(&c, &pair.private) {
            Ok(m) => match int_to_text(&m) {
                Ok(text) => p.say(&format!("message:\n{text}\n"))?,
                Err(RsaError::NotText) => {
                    warn!("decrypted value is not UTF-8, showing the integer");
                    p.say(&format!("message (as integer):\n{m}\n"))?;
                }
                Err(e) => p.say(&format!("{e}\n"))?,
            },
            Err(e) => p.say(&format!("{e}\n"))?,
        }
        p.pause()
    }
}

// ============================================================================
// INPUT PARSING
// ============================================================================

/// Parse a non-negative decimal integer typed by the user.
pub fn parse_biguint(text: &str) -> Result<BigUint, String> {
    let digits = text.trim();
    if digits.is_empty() {
        return Err("No number given.".to_string());
    }
    digits
        .parse::<BigUint>()
        .map_err(|_| format!("'{digits}' is not a non-negative integer."))
}

/// Parse a bit size; an empty answer takes `default`.
pub fn parse_bits(text: &str, default: u64, min: u64) -> Result<u64, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(default);
    }
    match text.parse::<u64>() {
        Ok(bits) if (min..=MAX_BITS).contains(&bits) => Ok(bits),
        _ => Err(format!("Size must be a number between {min} and {MAX_BITS}.")),
    }
}

fn parse_exponent(text: &str) -> Result<BigUint, String> {
    if text.trim().is_empty() {
        Ok(BigUint::from(PUBLIC_EXPONENT))
    } else {
        parse_biguint(text)
    }
}

// ============================================================================
// PROGRESS
// ============================================================================

/// Steady spinner on stderr for work of unknown length.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

// ============================================================================
// TESTS
// ============================================================================
