//! "Ask until valid" prompts.
//!
//! Every interactive input goes through [`ask`] (or its hidden-input and
//! numeric variants): the user is re-prompted until the predicate holds.

use std::ops::RangeInclusive;

use dialoguer::{Input, Password};
use zeroize::Zeroizing;

use crate::cli::output;
use crate::errors::{Result, VaultError};

/// Run `predicate` and turn a rejection into the message shown to the user.
fn check(input: &str, predicate: impl Fn(&str) -> bool, err_text: &str) -> std::result::Result<(), String> {
    if predicate(input) {
        Ok(())
    } else {
        Err(err_text.to_string())
    }
}

/// Prompt until `predicate` accepts the input, then return it.
pub fn ask(prompt: &str, predicate: impl Fn(&str) -> bool, err_text: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(|input: &String| check(input, &predicate, err_text))
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))
}

/// Hidden-input variant of [`ask`], optionally asking twice.
///
/// Returns `Zeroizing<String>` so the input is wiped from memory on drop.
pub fn ask_secret(
    prompt: &str,
    confirmation: Option<&str>,
    predicate: impl Fn(&str) -> bool,
    err_text: &str,
) -> Result<Zeroizing<String>> {
    loop {
        let mut password = Password::new().with_prompt(prompt);
        if let Some(confirm) = confirmation {
            password = password.with_confirmation(confirm, "Inputs do not match, try again");
        }
        let value = Zeroizing::new(
            password
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        match check(&value, &predicate, err_text) {
            Ok(()) => return Ok(value),
            Err(msg) => output::warning(&msg),
        }
    }
}

/// Prompt for an integer inside `range`.
pub fn ask_number(prompt: &str, range: RangeInclusive<usize>) -> Result<usize> {
    let err_text = format!("Enter a number from {} to {}.", range.start(), range.end());
    let answer = ask(prompt, |s| parse_in_range(s, &range).is_some(), &err_text)?;
    parse_in_range(&answer, &range)
        .ok_or_else(|| VaultError::CommandFailed(format!("'{answer}' is not a valid choice")))
}

fn parse_in_range(input: &str, range: &RangeInclusive<usize>) -> Option<usize> {
    input.trim().parse().ok().filter(|n| range.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_reports_error_text() {
        let non_empty = |s: &str| !s.is_empty();
        assert_eq!(check("x", non_empty, "empty"), Ok(()));
        assert_eq!(check("", non_empty, "empty"), Err("empty".to_string()));
    }

    #[test]
    fn parse_in_range_bounds() {
        let range = 0..=5;
        assert_eq!(parse_in_range("0", &range), Some(0));
        assert_eq!(parse_in_range(" 5 ", &range), Some(5));
        assert_eq!(parse_in_range("6", &range), None);
        assert_eq!(parse_in_range("-1", &range), None);
        assert_eq!(parse_in_range("two", &range), None);
        assert_eq!(parse_in_range("", &range), None);
    }
}
