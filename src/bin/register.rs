//! Register a new application through the service's hypermedia API, then
//! run the OAuth handshake for it in one go.

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
    let app_name = prompt("Application name")?;

    let (app_key, app_secret) = oauth::register_app(&api_url, &identity, &credential, &app_name)
        .context("application registration failed")?;
    let (token, token_secret) =
        oauth::get_access_token(&api_url, &identity, &credential, &app_key, &app_secret)
            .context("OAuth token issuance failed")?;

    println!("App key: {}", app_key);
    println!("App secret: {}", app_secret);
    println!("Access token: {}", token);
    println!("Access token secret: {}", token_secret);
    Ok(())
}
