use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::service::install::is_affirmative;

/// Asks the operator on the terminal whether the unit shown above is right.
pub fn prompt_confirmation(_unit: &str) -> bool {
    let stdin = io::stdin();
    confirm_from(&mut stdin.lock(), &mut io::stdout())
}

pub fn confirm_from<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> bool {
    let asked = write!(
        output,
        "Is this correct (in particular the username, working directory, exec path)? (y/n):"
    )
    .and_then(|_| output.flush());
    if let Err(e) = asked {
        warn!("Failed to show prompt: {}", e);
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => is_affirmative(&answer),
        Err(e) => {
            warn!("Failed to read answer: {}", e);
            false
        }
    }
}
