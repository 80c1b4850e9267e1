// Command-line front end
// Parses arguments, reads input text, calls the codecs and writes the result

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use crate::playfair::{self, KeySquare, SquareSize};
use crate::rsa::{self, CiphertextEncoding, KeyGenConfig, RsaBigInt, RsaKeyPair};
use crate::util::file_ops::{TextSink, TextSource, PLAYFAIR_EXPORT_NAME, RSA_EXPORT_NAME};

#[derive(Parser, Debug)]
#[command(name = "cipher-lab")]
#[command(about = "Playfair and toy RSA ciphers for the classroom", long_about = None)]
#[command(version)]
pub struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Playfair cipher over a 5x5 or 6x6 key square
    Playfair {
        #[command(subcommand)]
        command: PlayfairCommand,
    },

    /// Toy RSA with small primes
    Rsa {
        #[command(subcommand)]
        command: RsaCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlayfairCommand {
    /// Print the key square for a key
    Matrix {
        #[command(flatten)]
        square: SquareArgs,
    },

    /// Encrypt text
    Encrypt {
        #[command(flatten)]
        square: SquareArgs,

        #[command(flatten)]
        io: IoArgs,

        /// Print the key square to stderr first
        #[arg(long)]
        show_matrix: bool,
    },

    /// Decrypt text and strip the X padding
    Decrypt {
        #[command(flatten)]
        square: SquareArgs,

        #[command(flatten)]
        io: IoArgs,

        /// Print the key square to stderr first
        #[arg(long)]
        show_matrix: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum RsaCommand {
    /// Generate a key pair from P and Q, or from random primes when both are omitted
    Keygen {
        /// First prime
        #[arg(short, long)]
        p: Option<String>,

        /// Second prime
        #[arg(short, long)]
        q: Option<String>,

        /// Fixed public exponent instead of a random one
        #[arg(short, long, value_parser = parse_number)]
        e: Option<RsaBigInt>,

        /// Lower bound (inclusive) for random primes
        #[arg(long, default_value_t = KeyGenConfig::default().prime_min)]
        prime_min: u64,

        /// Upper bound (exclusive) for random primes
        #[arg(long, default_value_t = KeyGenConfig::default().prime_max)]
        prime_max: u64,
    },

    /// Encrypt text with the public key (N, E)
    Encrypt {
        /// Modulus
        #[arg(short, long, value_parser = parse_number)]
        n: RsaBigInt,

        /// Public exponent
        #[arg(short, long, value_parser = parse_number)]
        e: RsaBigInt,

        #[command(flatten)]
        io: IoArgs,

        /// Ciphertext text form: base64 or hex
        #[arg(long, default_value = "base64")]
        format: CiphertextEncoding,
    },

    /// Decrypt ciphertext with the private key (N, D)
    Decrypt {
        /// Modulus
        #[arg(short, long, value_parser = parse_number)]
        n: RsaBigInt,

        /// Private exponent
        #[arg(short, long, value_parser = parse_number)]
        d: RsaBigInt,

        #[command(flatten)]
        io: IoArgs,

        /// Ciphertext text form: base64 or hex
        #[arg(long, default_value = "base64")]
        format: CiphertextEncoding,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SquareArgs {
    /// Passphrase the square is built from
    #[arg(short, long, default_value = "")]
    pub key: String,

    /// Square size: 5 (I/J merged) or 6 (letters and digits)
    #[arg(short, long, default_value = "5", value_parser = parse_square_size)]
    pub size: SquareSize,
}

impl SquareArgs {
    fn build(&self) -> KeySquare {
        KeySquare::new(&self.key, self.size)
    }
}

#[derive(Args, Debug, Clone)]
pub struct IoArgs {
    /// Input text; read from --input or stdin when omitted
    pub text: Option<String>,

    /// Read input text from a file
    #[arg(short, long, conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the result to the default export file in the current directory
    #[arg(long, conflicts_with = "output")]
    pub export: bool,
}

impl IoArgs {
    fn read(&self) -> Result<String> {
        let source = TextSource::from_args(self.text.clone(), self.input.clone());
        source.read().with_context(|| format!("Failed to read input: {:?}", source))
    }

    fn write(&self, export_name: &str, text: &str) -> Result<()> {
        let path = if self.export {
            Some(PathBuf::from(export_name))
        } else {
            self.output.clone()
        };
        let sink = TextSink::from_arg(path);
        sink.write(text).with_context(|| format!("Failed to write output: {:?}", sink))
    }
}

fn parse_square_size(s: &str) -> std::result::Result<SquareSize, String> {
    let size: usize = s.trim().parse().map_err(|_| format!("not a number: {}", s))?;
    SquareSize::try_from(size).map_err(|e| e.to_string())
}

fn parse_number(s: &str) -> std::result::Result<RsaBigInt, String> {
    s.trim()
        .parse::<RsaBigInt>()
        .map_err(|_| format!("expected a non-negative decimal integer, got {:?}", s))
}

/// Set up env_logger; RUST_LOG takes precedence over -v
pub fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Playfair { command } => cmd_playfair(command),
        Commands::Rsa { command } => cmd_rsa(command),
    }
}

fn cmd_playfair(command: PlayfairCommand) -> Result<()> {
    match command {
        PlayfairCommand::Matrix { square } => {
            println!("{}", square.build());
        }
        PlayfairCommand::Encrypt { square, io, show_matrix } => {
            let square = square.build();
            if show_matrix {
                eprintln!("{}\n", square);
            }

            let text = io.read()?;
            let ciphertext = playfair::encrypt(&text, &square).context("Playfair encryption failed")?;
            io.write(PLAYFAIR_EXPORT_NAME, &ciphertext)?;
        }
        PlayfairCommand::Decrypt { square, io, show_matrix } => {
            let square = square.build();
            if show_matrix {
                eprintln!("{}\n", square);
            }

            let text = io.read()?;
            let plaintext = playfair::decrypt(&text, &square).context("Playfair decryption failed")?;
            io.write(PLAYFAIR_EXPORT_NAME, &plaintext)?;
        }
    }

    Ok(())
}

fn cmd_rsa(command: RsaCommand) -> Result<()> {
    match command {
        RsaCommand::Keygen { p, q, e, prime_min, prime_max } => {
            let config = KeyGenConfig::default().with_prime_range(prime_min, prime_max);
            let mut rng = rand::thread_rng();

            let (p, q) = rsa::resolve_primes(p.as_deref(), q.as_deref(), &config, &mut rng)?;
            let keypair = match e {
                Some(e) => RsaKeyPair::with_exponent(p, q, e)?,
                None => rsa::generate_keypair(p, q, &mut rng)?,
            };

            info!("generated {}-bit key pair", keypair.bit_length());
            print!("{}", describe_keypair(&keypair));
        }
        RsaCommand::Encrypt { n, e, io, format } => {
            let text = io.read()?;
            let plaintext = text.trim();
            if plaintext.is_empty() {
                anyhow::bail!("Please enter text to encrypt.");
            }

            let ciphertext = rsa::encrypt_with(plaintext.as_bytes(), &e, &n, format).context("Encryption failed")?;
            io.write(RSA_EXPORT_NAME, &ciphertext)?;
        }
        RsaCommand::Decrypt { n, d, io, format } => {
            let text = io.read()?;
            let ciphertext = text.trim();
            if ciphertext.is_empty() {
                anyhow::bail!("No data to decrypt!");
            }

            let plaintext = rsa::decrypt_with(ciphertext, &d, &n, format).context("Decryption failed")?;
            io.write(RSA_EXPORT_NAME, &plaintext)?;
        }
    }

    Ok(())
}

/// One `NAME = value` line per key component
pub fn describe_keypair(keypair: &RsaKeyPair) -> String {
    let key = &keypair.private_key;
    format!(
        "P   = {}\nQ   = {}\nN   = {}\nPhi = {}\nE   = {}\nD   = {}\n",
        key.p,
        key.q,
        key.n,
        keypair.phi,
        keypair.e(),
        key.d
    )
}
