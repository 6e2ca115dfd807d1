use anyhow::{Result, bail};
use std::io::{self, IsTerminal};
use zeroize::Zeroizing;

pub const PASSWORD_ENV: &str = "SCRYPTO_PASSWORD";

pub fn read_password() -> Result<Zeroizing<String>> {
    //  Environment Variable
    //  SCRYPTO_PASSWORD="supersecret" scrypto decrypt notes.enc
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    //  stdin (Pipeline)
    //  printf "%s" "$SCRYPTO_PASSWORD" | scrypto decrypt notes.enc
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(buf);
        }
    }

    //  Interactive (TTY)
    if io::stdin().is_terminal() {
        let pw = Zeroizing::new(rpassword::prompt_password("Password: ")?);
        if !pw.is_empty() {
            return Ok(pw);
        }
    }

    bail!("No password provided")
}

/// Password for encryption. Asked twice when prompting on a terminal.
pub fn read_new_password_with_confirmation() -> Result<Zeroizing<String>> {
    if password_from_env().is_some() || !io::stdin().is_terminal() {
        return read_password();
    }

    let pw1 = Zeroizing::new(rpassword::prompt_password("New password: ")?);
    let pw2 = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);

    if pw1.is_empty() {
        bail!("password cannot be empty");
    }

    if *pw1 != *pw2 {
        bail!("passwords do not match");
    }

    Ok(pw1)
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
