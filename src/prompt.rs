//! Validated line-oriented input for the interactive shell.
//!
//! Every `read_*` loop re-prompts until it gets an acceptable value. The
//! `read_optional_*` variants treat a blank line as "keep the current
//! value". End of input is reported as [`Error::InputClosed`] rather than
//! looping forever.

use std::fmt::Display;
use std::io::{BufRead, Write};

use crate::date::DateRules;
use crate::error::{Error, Result};
use crate::record::{TextLimit, sanitize_text};

/// Parse a whole line as an integer. No surrounding text is allowed.
pub fn parse_int(text: &str) -> Option<i64> {
    text.parse().ok()
}

/// Parse a whole line as a finite real number.
pub fn parse_float(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Prompts written to `W`, answers read from `R`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Write one line of output.
    pub fn say(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Show `prompt` and read one line without its terminator.
    pub fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    pub fn read_int(&mut self, prompt: &str, min: Option<i64>) -> Result<i64> {
        loop {
            let line = self.read_line(prompt)?;
            match (parse_int(&line), min) {
                (Some(v), Some(min)) if v >= min => return Ok(v),
                (Some(v), None) => return Ok(v),
                (_, Some(min)) => {
                    self.say(format!("Invalid input. Please enter an integer >= {min}."))?
                }
                (_, None) => self.say("Invalid input. Please enter an integer.")?,
            }
        }
    }

    pub fn read_float(&mut self, prompt: &str, min: Option<f64>) -> Result<f64> {
        loop {
            let line = self.read_line(prompt)?;
            match (parse_float(&line), min) {
                (Some(v), Some(min)) if v >= min => return Ok(v),
                (Some(v), None) => return Ok(v),
                (_, Some(min)) => {
                    self.say(format!("Invalid input. Please enter a number >= {min:.2}."))?
                }
                (_, None) => self.say("Invalid input. Please enter a number.")?,
            }
        }
    }

    /// Read non-empty text with delimiters replaced and `limit` applied.
    pub fn read_text(&mut self, prompt: &str, limit: TextLimit) -> Result<String> {
        loop {
            let line = self.read_line(prompt)?;
            match sanitize_text(&line, limit) {
                Some(text) => return Ok(text),
                None => self.say("Input cannot be empty.")?,
            }
        }
    }

    pub fn read_date(&mut self, prompt: &str, rules: &DateRules) -> Result<String> {
        loop {
            let line = self.read_line(prompt)?;
            if rules.is_valid(&line) {
                return Ok(line.trim().to_string());
            }
            self.say(format!(
                "Invalid date. Use {} with a real calendar date between {} and {}.",
                rules.format.pattern(),
                rules.min_year,
                rules.max_year
            ))?;
        }
    }

    /// Blank keeps; anything else is returned as typed.
    pub fn read_optional_text(&mut self, prompt: &str) -> Result<Option<String>> {
        let line = self.read_line(prompt)?;
        Ok(if line.is_empty() { None } else { Some(line) })
    }

    pub fn read_optional_int(&mut self, prompt: &str) -> Result<Option<i64>> {
        let Some(line) = self.read_optional_text(prompt)? else {
            return Ok(None);
        };
        let value = parse_int(&line);
        if value.is_none() {
            self.say("Not a valid integer. Keeping old value.")?;
        }
        Ok(value)
    }

    pub fn read_optional_float(&mut self, prompt: &str) -> Result<Option<f64>> {
        let Some(line) = self.read_optional_text(prompt)? else {
            return Ok(None);
        };
        let value = parse_float(&line);
        if value.is_none() {
            self.say("Not a valid number. Keeping old value.")?;
        }
        Ok(value)
    }

    /// Read a menu choice in `min..=max`.
    pub fn read_choice(&mut self, prompt: &str, min: i64, max: i64) -> Result<i64> {
        loop {
            let line = self.read_line(prompt)?;
            match parse_int(&line) {
                Some(c) if (min..=max).contains(&c) => return Ok(c),
                _ => self.say(format!("Please enter a number between {min} and {max}."))?,
            }
        }
    }

    /// Yes iff the answer starts with `Y` or `y`.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let line = self.read_line(prompt)?;
        Ok(line.starts_with(['Y', 'y']))
    }
}
