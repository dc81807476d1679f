use anyhow::{Result, anyhow, bail};
use dialoguer::{Confirm, Password};

use profiles_types::Account;

use crate::Context;

pub fn create_user(ctx: &Context, email: &str, name: &str, password: Option<&str>) -> Result<()> {
    let account = ctx.directory.create_user(email, name, password)?;
    println!("Created {} ({})", account, account.id);
    if password.is_none() {
        println!("No password set; this account cannot log in yet.");
    }
    Ok(())
}

pub fn create_superuser(
    ctx: &Context,
    email: &str,
    name: &str,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Password (again)", "Passwords do not match")
            .allow_empty_password(true)
            .interact()?,
    };

    let account = ctx.directory.create_superuser(email, name, &password)?;
    println!("Created superuser {} ({})", account, account.id);
    Ok(())
}

pub fn authenticate(ctx: &Context, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()?,
    };

    match ctx.directory.authenticate(email, &password)? {
        Some(account) => {
            println!("Authenticated as {}", account);
            Ok(())
        }
        None => bail!("Invalid credentials for {}", email),
    }
}

pub fn post(ctx: &Context, email: &str, text: &str) -> Result<()> {
    let owner = require_account(ctx, email)?;
    let entry = ctx.feed.post(&owner, text)?;
    println!("Posted {} at {}", entry.id, entry.created_on.to_rfc3339());
    Ok(())
}

pub fn feed(ctx: &Context, email: &str, json: bool) -> Result<()> {
    let owner = require_account(ctx, email)?;
    let entries = ctx.feed.entries_for(&owner)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{} has not posted anything", owner);
    }
    for entry in &entries {
        println!("{}  {}", entry.created_on.format("%Y-%m-%d %H:%M:%S"), entry);
    }
    Ok(())
}

pub fn show(ctx: &Context, email: &str, json: bool) -> Result<()> {
    let account = require_account(ctx, email)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&account)?);
        return Ok(());
    }

    println!("{}", account);
    println!("  id:         {}", account.id);
    println!("  name:       {}", account.full_name());
    println!("  active:     {}", account.is_active);
    println!("  staff:      {}", account.is_staff);
    println!("  superuser:  {}", account.is_superuser);
    println!("  password:   {}", if account.credential.is_usable() { "set" } else { "unusable" });
    match account.last_login {
        Some(ts) => println!("  last login: {}", ts.to_rfc3339()),
        None => println!("  last login: never"),
    }
    Ok(())
}

pub fn delete(ctx: &Context, email: &str, force: bool) -> Result<()> {
    let account = require_account(ctx, email)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {} and all of its status updates?", account))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }
    }

    ctx.directory.delete_account(account.id)?;
    println!("Deleted {}", account);
    Ok(())
}

fn require_account(ctx: &Context, email: &str) -> Result<Account> {
    ctx.directory
        .get_by_email(email)?
        .ok_or_else(|| anyhow!("No account with email {}", email))
}
