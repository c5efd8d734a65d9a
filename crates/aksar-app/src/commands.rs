// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shell command parsing.

use std::path::PathBuf;

use aksar_core::types::LanguageMode;

pub const HELP: &str = "\
Commands:
  open <path> [mode]   load a JPEG, PNG, BMP or PDF (mode: khm, eng, khm+eng)
  next, n              go to the next page
  prev, p              go to the previous page
  retry, r             run the current page again
  toggle, t            switch between original and translated text
  show, s              print the current page again
  help, ?              show this list
  quit, q              leave";

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Open {
        path: PathBuf,
        mode: Option<LanguageMode>,
    },
    Next,
    Prev,
    Retry,
    Toggle,
    Show,
    Help,
    Quit,
    /// Blank line.
    Nothing,
}

/// Parse one input line. The error is a message for the user.
pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "" => ShellCommand::Nothing,
        "open" | "o" => parse_open(rest)?,
        "next" | "n" => ShellCommand::Next,
        "prev" | "p" => ShellCommand::Prev,
        "retry" | "r" => ShellCommand::Retry,
        "toggle" | "t" => ShellCommand::Toggle,
        "show" | "s" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "q" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}' (type 'help')")),
    };
    Ok(command)
}

/// `open <path> [mode]`. Paths may contain spaces; a trailing word that
/// names a language mode is taken as the mode.
fn parse_open(rest: &str) -> Result<ShellCommand, String> {
    if rest.is_empty() {
        return Err("usage: open <path> [mode]".into());
    }

    if let Some((path, last)) = rest.rsplit_once(char::is_whitespace) {
        if let Ok(mode) = last.parse::<LanguageMode>() {
            return Ok(ShellCommand::Open {
                path: PathBuf::from(unquote(path.trim_end())),
                mode: Some(mode),
            });
        }
    }

    Ok(ShellCommand::Open {
        path: PathBuf::from(unquote(rest)),
        mode: None,
    })
}

fn unquote(path: &str) -> &str {
    path.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(path: &str, mode: Option<LanguageMode>) -> ShellCommand {
        ShellCommand::Open {
            path: PathBuf::from(path),
            mode,
        }
    }

    #[test]
    fn simple_verbs() {
        assert_eq!(parse_command("next"), Ok(ShellCommand::Next));
        assert_eq!(parse_command("  P "), Ok(ShellCommand::Prev));
        assert_eq!(parse_command("retry"), Ok(ShellCommand::Retry));
        assert_eq!(parse_command("t"), Ok(ShellCommand::Toggle));
        assert_eq!(parse_command("show"), Ok(ShellCommand::Show));
        assert_eq!(parse_command("?"), Ok(ShellCommand::Help));
        assert_eq!(parse_command("exit"), Ok(ShellCommand::Quit));
        assert_eq!(parse_command("   "), Ok(ShellCommand::Nothing));
    }

    #[test]
    fn open_with_and_without_mode() {
        assert_eq!(parse_command("open book.pdf"), Ok(open("book.pdf", None)));
        assert_eq!(
            parse_command("open book.pdf eng"),
            Ok(open("book.pdf", Some(LanguageMode::English)))
        );
        assert_eq!(
            parse_command("open scan.png khm+eng"),
            Ok(open("scan.png", Some(LanguageMode::KhmerAndEnglish)))
        );
    }

    #[test]
    fn open_path_with_spaces() {
        assert_eq!(
            parse_command("open my scans/page one.png khmer"),
            Ok(open("my scans/page one.png", Some(LanguageMode::Khmer)))
        );
        assert_eq!(
            parse_command("open my scans/page one.png"),
            Ok(open("my scans/page one.png", None))
        );
        assert_eq!(
            parse_command("open \"old ledger.pdf\" en"),
            Ok(open("old ledger.pdf", Some(LanguageMode::English)))
        );
    }

    #[test]
    fn open_needs_a_path() {
        assert!(parse_command("open").is_err());
        assert!(parse_command("open   ").is_err());
    }

    #[test]
    fn unknown_verb_is_reported() {
        let err = parse_command("print page").unwrap_err();
        assert!(err.contains("print"));
    }
}
