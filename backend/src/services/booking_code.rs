//! Booking code generation.
//!
//! Codes are `BK` followed by six independently drawn decimal digits. No
//! uniqueness check is made against stored bookings, so two bookings can end
//! up sharing a code.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const PREFIX: &str = "BK";
const DIGITS: usize = 6;

/// Human-readable booking reference, e.g. `BK042917`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingCode(String);

impl BookingCode {
    /// Draw a new code from the thread-local RNG.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Draw a new code from the given random source.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut code = String::with_capacity(PREFIX.len() + DIGITS);
        code.push_str(PREFIX);
        for _ in 0..DIGITS {
            let digit = rng.gen_range(0..10u32);
            code.push(char::from_digit(digit, 10).unwrap_or('0'));
        }
        BookingCode(code)
    }

    /// Whether `candidate` has the shape of a generated code.
    pub fn is_well_formed(candidate: &str) -> bool {
        candidate.len() == PREFIX.len() + DIGITS
            && candidate.starts_with(PREFIX)
            && candidate[PREFIX.len()..].bytes().all(|b| b.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_codes_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let code = BookingCode::generate_with(&mut rng);
            assert!(
                BookingCode::is_well_formed(code.as_str()),
                "unexpected code {}",
                code
            );
        }
    }

    #[test]
    fn test_thread_rng_codes_are_well_formed() {
        for _ in 0..100 {
            assert!(BookingCode::is_well_formed(BookingCode::generate().as_str()));
        }
    }

    #[test]
    fn test_same_seed_same_code() {
        let a = BookingCode::generate_with(&mut StdRng::seed_from_u64(99));
        let b = BookingCode::generate_with(&mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_is_well_formed_rejects_bad_shapes() {
        assert!(BookingCode::is_well_formed("BK000000"));
        assert!(!BookingCode::is_well_formed("BK00000"));
        assert!(!BookingCode::is_well_formed("BK0000000"));
        assert!(!BookingCode::is_well_formed("bk123456"));
        assert!(!BookingCode::is_well_formed("BK12a456"));
        assert!(!BookingCode::is_well_formed("XX123456"));
        assert!(!BookingCode::is_well_formed("BK１２３４５６"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let code = BookingCode::generate_with(&mut StdRng::seed_from_u64(1));
        let json = serde_json::to_value(&code).unwrap();
        assert_eq!(json.as_str(), Some(code.as_str()));
    }
}
