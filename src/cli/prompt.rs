use std::io::{BufRead, Write};

const TOKEN_REQUIRED: &str = "Logfire read token is required to proceed.";

/// Ask for a logfire read token until a non-empty one is given or the user
/// declines to retry.
pub fn prompt_for_read_token<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> anyhow::Result<String> {
    writeln!(output, "Please enter your logfire read token:")?;

    loop {
        write!(output, "Token: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!(TOKEN_REQUIRED);
        }

        let token = line.trim();
        if !token.is_empty() {
            writeln!(output, "✓ Token received!")?;
            return Ok(token.to_string());
        }

        writeln!(output, "⚠ Token cannot be empty.")?;
        write!(output, "Try again? (y/n): ")?;
        output.flush()?;

        let mut retry = String::new();
        input.read_line(&mut retry)?;
        if !retry.trim().eq_ignore_ascii_case("y") {
            anyhow::bail!(TOKEN_REQUIRED);
        }
    }
}
