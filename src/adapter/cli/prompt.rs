use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stdout; an empty answer picks `default`
pub fn prompt_confirm(prompt: &str, default: bool) -> io::Result<bool> {
    let stdin = io::stdin();
    confirm_from(prompt, default, &mut stdin.lock(), &mut io::stdout())
}

fn confirm_from(
    prompt: &str,
    default: bool,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<bool> {
    let mut line = String::new();

    loop {
        line.clear();
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        write!(output, "{} {}: ", prompt, hint)?;
        output.flush()?;

        // EOF counts as the default answer
        if input.read_line(&mut line)? == 0 {
            return Ok(default);
        }

        match line.trim().to_uppercase().as_str() {
            "Y" | "YES" => return Ok(true),
            "N" | "NO" => return Ok(false),
            "" => return Ok(default),
            _ => continue,
        }
    }
}
