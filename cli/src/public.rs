use clap::Args;
use pemrsa_pem::ToPem;
use pemrsa_pkcs::{SubjectPublicKey, parse_rsa_public_key_from_pem};

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
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let text = read_input(config.file.as_deref())?;
    warn_if_multiple_blocks(&text);

    let key = match parse_rsa_public_key_from_pem(&text) {
        Ok(key) => key,
        Err(err) => return fail(config.output, err),
    };

    if config.pem {
        let pem = SubjectPublicKey::Rsa(key).to_pem()?;
        return match config.output {
            OutputFormat::Text => {
                println!("{}", pem);
                Ok(())
            }
            format => print_data(format, pem.to_string()),
        };
    }

    match config.output {
        OutputFormat::Text => {
            println!("RSA Public Key: ({} bit)", key.key_size());
            print!("{}", format_public_key_text(&key));
            Ok(())
        }
        format => print_data(format, &key),
    }
}
