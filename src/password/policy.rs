//! Random password generation from a length and a complexity setting.
//!
//! Complexity has three independent axes:
//!
//! | axis    | values                                   |
//! |---------|------------------------------------------|
//! | letters | 0 none, 1 lowercase, 2 uppercase, 3 both |
//! | digits  | 0 none, 1 `0-9`                          |
//! | symbols | 0 none, 1 [`SYMBOLS`]                    |
//!
//! and is written as a three-digit code, e.g. `311` for the strongest mix.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";

/// Symbol set used when symbols are enabled.
pub const SYMBOLS: &str = "!@#$%^&*()-_=+[{}];:|,./<>?";

/// Which letters a generated password may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LetterMode {
    None,
    Lower,
    Upper,
    #[default]
    Mixed,
}

impl LetterMode {
    fn chars(self) -> &'static [&'static str] {
        match self {
            LetterMode::None => &[],
            LetterMode::Lower => &[LOWERCASE],
            LetterMode::Upper => &[UPPERCASE],
            LetterMode::Mixed => &[LOWERCASE, UPPERCASE],
        }
    }

    fn code(self) -> char {
        match self {
            LetterMode::None => '0',
            LetterMode::Lower => '1',
            LetterMode::Upper => '2',
            LetterMode::Mixed => '3',
        }
    }
}

/// The three-axis character-class selection for a generated password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Complexity {
    pub letters: LetterMode,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for Complexity {
    /// Every class enabled (`311`).
    fn default() -> Self {
        Self {
            letters: LetterMode::Mixed,
            digits: true,
            symbols: true,
        }
    }
}

impl Complexity {
    /// The union of the selected character classes, in a fixed order.
    pub fn charset(&self) -> Vec<char> {
        let mut set: Vec<char> = self
            .letters
            .chars()
            .iter()
            .flat_map(|s| s.chars())
            .collect();
        if self.digits {
            set.extend(DIGITS.chars());
        }
        if self.symbols {
            set.extend(SYMBOLS.chars());
        }
        set
    }
}

impl FromStr for Complexity {
    type Err = VaultError;

    fn from_str(code: &str) -> Result<Self> {
        let invalid = || VaultError::InvalidComplexity(code.to_string());

        let digits: Vec<char> = code.trim().chars().collect();
        let [letters, digit, symbol] = digits.as_slice() else {
            return Err(invalid());
        };

        let letters = match letters {
            '0' => LetterMode::None,
            '1' => LetterMode::Lower,
            '2' => LetterMode::Upper,
            '3' => LetterMode::Mixed,
            _ => return Err(invalid()),
        };
        let flag = |c: &char| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(invalid()),
        };

        Ok(Self {
            letters,
            digits: flag(digit)?,
            symbols: flag(symbol)?,
        })
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.letters.code(),
            u8::from(self.digits),
            u8::from(self.symbols)
        )
    }
}

/// Generate a password of `length` characters drawn uniformly from the
/// character set selected by `complexity`.
///
/// Uses the thread-local CSPRNG since the output is a real credential.
/// Fails with `EmptyCharset` when no class is enabled.
pub fn generate(length: usize, complexity: &Complexity) -> Result<Zeroizing<String>> {
    let charset = complexity.charset();
    if charset.is_empty() {
        return Err(VaultError::EmptyCharset);
    }

    let mut rng = rand::rng();
    let password: String = (0..length)
        .map(|_| charset[rng.random_range(0..charset.len())])
        .collect();

    Ok(Zeroizing::new(password))
}
