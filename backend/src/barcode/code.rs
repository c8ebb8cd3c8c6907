//! Visitor code minting.
//!
//! A code is `VIS` + the calendar day (`YYYYMMDD`) + an 8-character random
//! suffix drawn from the uppercase alphanumeric alphabet. The date keeps
//! codes sortable and groupable by registration day; the suffix carries the
//! entropy. Uniqueness is probed against the identifier store before a
//! candidate is accepted, and enforced again by the store's UNIQUE
//! constraint at insert time.

use rand::Rng;

use super::BarcodeError;

pub const CODE_PREFIX: &str = "VIS";
const SUFFIX_LEN: usize = 8;
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Collisions are astronomically unlikely at this alphabet and length; the
/// cap exists so a broken probe can never spin forever.
pub const MAX_ATTEMPTS: u32 = 20;

fn candidate() -> String {
    let mut rng = rand::rng();
    let day = chrono::Local::now().format("%Y%m%d");
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{}{}{}", CODE_PREFIX, day, suffix)
}

/// Mints a code the identifier store does not contain yet.
///
/// `exists` is the store probe, consulted once per candidate. Fails with
/// `GenerationExhausted` once the retry budget is spent.
pub fn generate<F>(mut exists: F) -> Result<String, BarcodeError>
where
    F: FnMut(&str) -> Result<bool, BarcodeError>,
{
    for _ in 0..MAX_ATTEMPTS {
        let code = candidate();
        if !exists(&code)? {
            return Ok(code);
        }
        log::warn!("visitor code {} already taken, regenerating", code);
    }
    Err(BarcodeError::GenerationExhausted {
        attempts: MAX_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn generated_code_matches_format() {
        let code = generate(|_| Ok(false)).unwrap();
        let re = Regex::new(r"^VIS\d{8}[A-Z0-9]{8}$").unwrap();
        assert!(re.is_match(&code), "unexpected code format: {}", code);
    }

    #[test]
    fn collision_on_first_candidate_yields_fresh_code() {
        let mut seen = Vec::new();
        let code = generate(|candidate| {
            seen.push(candidate.to_string());
            // the first candidate is "already taken"
            Ok(seen.len() == 1)
        })
        .unwrap();
        assert_eq!(seen.len(), 2);
        assert_ne!(seen[0], seen[1]);
        assert_eq!(code, seen[1]);
    }

    #[test]
    fn exhausted_store_fails_with_terminal_error() {
        let mut probes = 0u32;
        let err = generate(|_| {
            probes += 1;
            Ok(true)
        })
        .unwrap_err();
        assert_eq!(probes, MAX_ATTEMPTS);
        assert!(matches!(
            err,
            BarcodeError::GenerationExhausted { attempts } if attempts == MAX_ATTEMPTS
        ));
    }

    #[test]
    fn probe_errors_propagate() {
        let err = generate(|_| Err(BarcodeError::Storage("db down".to_string()))).unwrap_err();
        assert!(matches!(err, BarcodeError::Storage(_)));
    }
}
