//! Destructive-command confirmation

use std::io::{self, BufRead, Write};

/// Ask `prompt [y/N]` on the terminal; `assume_yes` bypasses the prompt.
pub fn confirm(prompt: &str, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let mut stdout = io::stdout();
    write!(stdout, "{prompt} [y/N] ")?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative("Y\n"));
        assert!(is_affirmative("  yes \n"));
        assert!(is_affirmative("YES"));
    }

    #[test]
    fn test_everything_else_declines() {
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("n\n"));
        assert!(!is_affirmative("yep\n"));
        assert!(!is_affirmative("no\n"));
    }

    #[test]
    fn test_assume_yes_skips_the_prompt() {
        assert!(confirm("Delete everything?", true).unwrap());
    }
}
