use std::fs;
use std::io::{self, Read};

use pemrsa_pkcs::pkcs1::RSAPublicKey;
use tracing::{debug, warn};

use crate::error::Result;

/// Read input from a file or stdin as text.
///
/// If `file` is `Some`, reads from the specified file path.
/// If `file` is `None`, reads from stdin.
pub(crate) fn read_input(file: Option<&str>) -> Result<String> {
    let bytes = match file {
        Some(path) => fs::read(path)?,
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            buffer
        }
    };
    debug!(source = file.unwrap_or("stdin"), len = bytes.len(), "read input");
    Ok(String::from_utf8(bytes)?)
}

/// Only the first block of the input is decoded. Say so when there are more.
pub(crate) fn warn_if_multiple_blocks(text: &str) {
    let blocks = pemrsa_pem::count_blocks(text);
    if blocks > 1 {
        warn!(blocks, "input holds multiple PEM blocks, only the first block is used");
    }
}

/// Format an unsigned big-endian value the way OpenSSL prints key components:
/// colon-separated hex, 15 bytes per line, with a leading `00` when the high bit is set.
pub(crate) fn format_hex_block(bytes: &[u8], indent: usize) -> String {
    const BYTES_PER_LINE: usize = 15;

    let mut padded = Vec::with_capacity(bytes.len() + 1);
    if bytes.first().is_some_and(|b| b & 0x80 != 0) {
        padded.push(0);
    }
    padded.extend_from_slice(bytes);

    let pad = " ".repeat(indent);
    let lines: Vec<String> = padded
        .chunks(BYTES_PER_LINE)
        .map(|chunk| {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
            format!("{}{}", pad, hex.join(":"))
        })
        .collect();
    lines.join(":\n")
}

/// OpenSSL-style description of the public part of an RSA key.
pub(crate) fn format_public_key_text(key: &RSAPublicKey) -> String {
    let exponent = match key.public_exponent.to_u64() {
        Some(e) => format!("{} (0x{:x})", e, e),
        None => format!("{} bits", key.public_exponent.bits()),
    };
    format!(
        "Modulus:\n{}\nExponent: {}\n",
        format_hex_block(&key.modulus.to_unsigned_bytes_be(), 4),
        exponent
    )
}
