use clap::{Arg, ArgAction, ArgMatches, Command}; // Builder API for command-line parsing
use serde_json::Value;
use std::io;
use std::process;

use field_cipher::encryption::generate_random_salt;
use field_cipher::utils::io::{read_passphrase, read_records};
use field_cipher::utils::logging::{initialize_logging, log_cipher_operation, parse_level};
use field_cipher::{search, FieldCipher, FieldCipherError, ProviderOptions};

fn build_cli() -> Command {
    Command::new("field-cipher")
        .about("Deterministic field encryption with a passphrase-derived key")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("key")
                .long("key")
                .help("Passphrase the key is derived from (prompted for when absent)")
                .value_name("PASSPHRASE")
                .global(true),
        )
        .arg(
            Arg::new("salt")
                .long("salt")
                .help("Salt combined with the passphrase")
                .value_name("SALT")
                .global(true),
        )
        .arg(
            Arg::new("iterations")
                .long("iterations")
                .help("PBKDF2 iteration count")
                .value_name("COUNT")
                .value_parser(clap::value_parser!(u32))
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("JSON file with {\"key\", \"salt\", \"iterations\"}")
                .value_name("FILE")
                .global(true),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("Log level (error, warn, info, debug, trace)")
                .value_name("LEVEL")
                .default_value("warn")
                .global(true),
        )
        .subcommand(
            Command::new("encrypt")
                .about("Encrypt a value")
                .arg(Arg::new("value").help("Plaintext to encrypt").required(true))
                .arg(field_arg()),
        )
        .subcommand(
            Command::new("decrypt")
                .about("Decrypt a value")
                .arg(Arg::new("value").help("Base64 ciphertext to decrypt").required(true))
                .arg(field_arg()),
        )
        .subcommand(
            Command::new("search")
                .about("Print records whose field equals the criteria")
                .arg(
                    Arg::new("records")
                        .long("records")
                        .help("JSON array or JSON Lines file of records")
                        .value_name("FILE")
                        .required(true),
                )
                .arg(
                    Arg::new("field")
                        .long("field")
                        .help("Field to compare")
                        .required(true),
                )
                .arg(
                    Arg::new("criteria")
                        .long("criteria")
                        .help("Value to compare against (ciphertext unless --plaintext)")
                        .required(true),
                )
                .arg(
                    Arg::new("plaintext")
                        .long("plaintext")
                        .help("Encrypt the criteria with the derived key before comparing")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("gen-salt").about("Print a random hex salt"))
}

fn field_arg() -> Arg {
    Arg::new("field")
        .long("field")
        .help("Field name used in log lines")
        .default_value("value")
}

/// Collect provider options from flags, then the environment, then the config file
///
/// `prompt` supplies the passphrase when no source has one; it is only asked
/// once a salt is known to be present.
fn provider_options<F, P>(matches: &ArgMatches, lookup: F, prompt: P) -> Result<ProviderOptions, FieldCipherError>
where
    F: Fn(&str) -> Option<String>,
    P: FnOnce() -> io::Result<String>,
{
    let from_flags = ProviderOptions {
        key: matches.get_one::<String>("key").cloned(),
        salt: matches.get_one::<String>("salt").cloned(),
        iterations: matches.get_one::<u32>("iterations").copied(),
    };

    let mut options = from_flags.merge_lookup(lookup)?;
    if let Some(path) = matches.get_one::<String>("config") {
        options = options.merge(ProviderOptions::from_file(path)?);
    }

    if options.key.is_none() {
        if options.salt.as_deref().map_or(true, |salt| salt.trim().is_empty()) {
            return Err(FieldCipherError::MissingSalt);
        }
        options.key = Some(prompt()?);
    }
    Ok(options)
}

fn build_cipher(matches: &ArgMatches) -> Result<FieldCipher, FieldCipherError> {
    let options = provider_options(
        matches,
        |name| std::env::var(name).ok(),
        || read_passphrase("Please enter your passphrase:"),
    )?;
    FieldCipher::new(&options)
}

/// Process exit status for a failed run; configuration problems get their own
fn exit_code(error: &FieldCipherError) -> i32 {
    if error.is_config() {
        2
    } else {
        1
    }
}

fn run(matches: &ArgMatches) -> Result<(), FieldCipherError> {
    match matches.subcommand() {
        Some(("encrypt", sub_matches)) => {
            let value = sub_matches.get_one::<String>("value").map(String::as_str).unwrap_or_default();
            let field = sub_matches.get_one::<String>("field").map(String::as_str).unwrap_or("value");

            let cipher = build_cipher(sub_matches)?;
            println!("{}", cipher.encrypt(value)?);
            log_cipher_operation("encrypt", field, true, None);
        }
        Some(("decrypt", sub_matches)) => {
            let value = sub_matches.get_one::<String>("value").map(String::as_str).unwrap_or_default();
            let field = sub_matches.get_one::<String>("field").map(String::as_str).unwrap_or("value");

            let cipher = build_cipher(sub_matches)?;
            match cipher.decrypt(value) {
                Ok(plaintext) => {
                    println!("{}", plaintext);
                    log_cipher_operation("decrypt", field, true, None);
                }
                Err(e) => {
                    log_cipher_operation("decrypt", field, false, Some(&e.to_string()));
                    return Err(e);
                }
            }
        }
        Some(("search", sub_matches)) => {
            let path = sub_matches.get_one::<String>("records").map(String::as_str).unwrap_or_default();
            let field = sub_matches.get_one::<String>("field").map(String::as_str).unwrap_or_default();
            let criteria = sub_matches.get_one::<String>("criteria").map(String::as_str).unwrap_or_default();

            let records = read_records(path)?;
            let found: Vec<&Value> = if sub_matches.get_flag("plaintext") {
                build_cipher(sub_matches)?.search_plaintext(&records, field, criteria)?
            } else {
                search(&records, field, criteria).collect()
            };

            for record in &found {
                println!("{}", record);
            }
            log_cipher_operation(
                "search",
                field,
                true,
                Some(&format!("{} of {} records matched", found.len(), records.len())),
            );
        }
        Some(("gen-salt", _)) => {
            println!("{}", hex::encode(generate_random_salt()));
        }
        _ => unreachable!("subcommand_required is set"),
    }
    Ok(())
}

fn main() {
    let matches = build_cli().get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .map(|name| parse_level(name))
        .unwrap_or(log::LevelFilter::Warn);
    if let Err(e) = initialize_logging(level) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(&matches) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(exit_code(&e));
    }
}
