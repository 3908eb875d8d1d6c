//! Session and account management.

use anyhow::{bail, Result};
use dialoguer::{Input, Password};
use shelf_commerce::account::{delete_account, User, DELETE_CONFIRMATION};

use super::{AccountArgs, AccountCommand};
use crate::context::{Backend, Context};

/// Run the account command.
pub async fn run(args: AccountArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AccountCommand::Login {
            email,
            password,
            admin,
        } => login(&email, password, admin, ctx).await,
        AccountCommand::Logout => logout(ctx).await,
        AccountCommand::Whoami => whoami(ctx).await,
        AccountCommand::Delete { confirm } => delete(confirm, ctx).await,
    }
}

async fn login(email: &str, password: Option<String>, admin: bool, ctx: &Context) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        bail!("Email is required");
    }

    let user = match &ctx.backend {
        Backend::Memory(memory) => {
            let user = User::new(email, Some(email));
            memory.sign_in(user.clone())?;
            if admin {
                memory.set_admin(&user.id, true)?;
            }
            user
        }
        Backend::Rest(rest) => {
            if admin {
                bail!("Roles are managed by the hosted service; --admin only works offline");
            }
            let password = match password {
                Some(password) => password,
                None if ctx.output.is_json() => bail!("--password is required with --json"),
                None => Password::new().with_prompt("Password").interact()?,
            };
            let spinner = ctx.output.spinner("Signing in...");
            let session = rest.sign_in_with_password(email, &password).await;
            spinner.finish_and_clear();
            let session = session?;
            ctx.store_session(Some(&session.access_token))?;
            session.user
        }
    };

    if ctx.output.is_json() {
        ctx.output.json(&user);
        return Ok(());
    }
    ctx.output.success(&format!(
        "Signed in as {}",
        user.email.as_deref().unwrap_or(user.id.as_str())
    ));
    if admin {
        ctx.output.info("Admin role granted.");
    }
    Ok(())
}

async fn logout(ctx: &Context) -> Result<()> {
    match &ctx.backend {
        Backend::Memory(memory) => memory.sign_out()?,
        Backend::Rest(rest) => {
            if let Err(e) = rest.sign_out().await {
                ctx.output
                    .warn(&format!("Server sign-out failed: {}. Forgetting the session anyway.", e));
            }
            ctx.store_session(None)?;
        }
    }
    ctx.output.success("Signed out");
    Ok(())
}

async fn whoami(ctx: &Context) -> Result<()> {
    let service = ctx.service();
    let Some(user) = service.current_user().await? else {
        if ctx.output.is_json() {
            ctx.output.json(&serde_json::Value::Null);
        } else {
            ctx.output.info("Not signed in. Run `shelf account login <email>`.");
        }
        return Ok(());
    };
    let is_admin = service.is_admin(&user.id).await.unwrap_or(false);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "id": user.id,
            "email": user.email,
            "admin": is_admin,
            "offline": ctx.backend.is_offline(),
        }));
        return Ok(());
    }

    ctx.output.header("Account");
    ctx.output.kv("ID", user.id.as_str());
    ctx.output.kv("Email", user.email.as_deref().unwrap_or("-"));
    ctx.output.kv("Admin", if is_admin { "yes" } else { "no" });
    ctx.output
        .kv("Backend", if ctx.backend.is_offline() { "offline" } else { "hosted" });
    Ok(())
}

async fn delete(confirm: Option<String>, ctx: &Context) -> Result<()> {
    let confirmation = match confirm {
        Some(text) => text,
        None if ctx.output.is_json() => {
            bail!("--confirm {} is required with --json", DELETE_CONFIRMATION)
        }
        None => {
            ctx.output.warn("This permanently deletes your account and your listings.");
            Input::<String>::new()
                .with_prompt(format!("Type {} to confirm", DELETE_CONFIRMATION))
                .allow_empty(true)
                .interact_text()?
        }
    };

    delete_account(ctx.service(), &confirmation).await?;
    if let Backend::Rest(_) = ctx.backend {
        ctx.store_session(None)?;
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "deleted": true }));
        return Ok(());
    }
    ctx.output.success("Your account has been deleted");
    Ok(())
}
