use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

/// Blocking read-validate-retry loop. Non-integer input re-prompts forever;
/// the first integer is returned as-is, range checking is the caller's job.
pub(crate) fn read_index(input: &mut dyn BufRead) -> Result<usize> {
    loop {
        print!(" > ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("failed to read selection")?;
        if read == 0 {
            bail!("input closed before a selection was made");
        }

        if let Ok(choice) = line.trim().parse::<usize>() {
            return Ok(choice);
        }
    }
}
