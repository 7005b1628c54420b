//! Obtain a long-lived OAuth 1.0a access token pair for an already
//! registered application.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use hypernav::oauth;

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn main() -> Result<()> {
    let api_url = prompt("API endpoint")?;
    let identity = prompt("Username")?;
    let credential = prompt("Password")?;
    let app_key = prompt("Api Key")?;
    let app_secret = prompt("Api Secret")?;

    let (token, token_secret) =
        oauth::get_access_token(&api_url, &identity, &credential, &app_key, &app_secret)
            .context("OAuth token issuance failed")?;

    println!("Access token: {}", token);
    println!("Access token secret: {}", token_secret);
    Ok(())
}
