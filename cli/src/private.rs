use std::fmt::Write;

use clap::Args;
use pemrsa_pem::ToPem;
use pemrsa_pkcs::{RSAPrivateKey, SubjectPublicKey, parse_rsa_private_key_from_pem};

use crate::error::Result;
use crate::output::{OutputFormat, fail, print_data};
use crate::utils::{format_public_key_text, read_input, warn_if_multiple_blocks};

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the PEM file. If not specified, reads from stdin
    pub(crate) file: Option<String>,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub(crate) output: OutputFormat,

    /// Re-emit the decoded key as PEM
    #[arg(long)]
    pub(crate) pem: bool,

    /// Show the public key derived from the private key
    #[arg(long)]
    pub(crate) show_public: bool,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let text = read_input(config.file.as_deref())?;
    warn_if_multiple_blocks(&text);

    let key = match parse_rsa_private_key_from_pem(&text) {
        Ok(key) => key,
        Err(err) => return fail(config.output, err),
    };

    if config.pem {
        let pem = if config.show_public {
            SubjectPublicKey::Rsa(key.public_key()).to_pem()?
        } else {
            key.to_pem()?
        };
        return match config.output {
            OutputFormat::Text => {
                println!("{}", pem);
                Ok(())
            }
            format => print_data(format, pem.to_string()),
        };
    }

    if config.show_public {
        let public_key = key.public_key();
        return match config.output {
            OutputFormat::Text => {
                println!("RSA Public Key: ({} bit)", public_key.key_size());
                print!("{}", format_public_key_text(&public_key));
                Ok(())
            }
            format => print_data(format, &public_key),
        };
    }

    match config.output {
        OutputFormat::Text => {
            print!("{}", format_private_key_text(&key)?);
            Ok(())
        }
        format => print_data(format, &key),
    }
}

fn format_private_key_text(key: &RSAPrivateKey) -> Result<String> {
    let mut output = String::new();

    writeln!(output, "RSA Private Key (PKCS#1)")?;
    writeln!(output, "Version: {:?}", key.version)?;
    writeln!(output, "Modulus (n): {} bits", key.modulus.bits())?;
    writeln!(
        output,
        "Public Exponent (e): {}",
        key.public_exponent
            .to_u64()
            .map(|v| v.to_string())
            .unwrap_or_else(|| format!("{} bits", key.public_exponent.bits()))
    )?;
    writeln!(
        output,
        "Private Exponent (d): {} bits",
        key.private_exponent.bits()
    )?;
    writeln!(output, "Prime 1 (p): {} bits", key.prime1.bits())?;
    writeln!(output, "Prime 2 (q): {} bits", key.prime2.bits())?;
    writeln!(output, "Exponent 1 (d mod (p-1)): {} bits", key.exponent1.bits())?;
    writeln!(output, "Exponent 2 (d mod (q-1)): {} bits", key.exponent2.bits())?;
    writeln!(output, "Coefficient (q^-1 mod p): {} bits", key.coefficient.bits())?;

    for (i, info) in key.other_prime_infos.iter().enumerate() {
        let n = i + 3;
        writeln!(output, "Prime {} (r): {} bits", n, info.prime.bits())?;
        writeln!(output, "Exponent {} (d mod (r-1)): {} bits", n, info.exponent.bits())?;
        writeln!(output, "Coefficient {} (t): {} bits", n, info.coefficient.bits())?;
    }

    Ok(output)
}
