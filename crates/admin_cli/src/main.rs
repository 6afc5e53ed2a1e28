use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{BasisPoints, Engine, EngineError, FundNew, check_password};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "fundbook_admin")]
#[command(about = "Admin utilities for fundbook (bootstrap users/funds)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./fundbook.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Fund(Fund),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct Fund {
    #[command(subcommand)]
    command: FundCommand,
}

#[derive(Subcommand, Debug)]
enum FundCommand {
    Create(FundCreateArgs),
}

#[derive(Args, Debug)]
struct FundCreateArgs {
    #[arg(long)]
    name: String,
    /// Share of each receipt, e.g. `60` or `12.5%`.
    #[arg(long, value_parser = parse_percentage)]
    percentage: BasisPoints,
    /// Create the fund inactive.
    #[arg(long)]
    inactive: bool,
    #[arg(long)]
    description: Option<String>,
}

fn parse_percentage(raw: &str) -> Result<BasisPoints, String> {
    raw.parse::<BasisPoints>().map_err(|err| err.to_string())
}

/// Keeps the terminal in raw mode while a secret is typed.
struct RawTerminal;

impl RawTerminal {
    fn enable() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Keystroke {
    Typed,
    Erased,
    Submitted,
    Interrupted,
    Ignored,
}

/// Apply one key press to the secret being typed.
fn apply_key(secret: &mut String, key: KeyEvent) -> Keystroke {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Keystroke::Submitted,
        KeyCode::Char('c') if control => Keystroke::Interrupted,
        KeyCode::Char(ch) if !control => {
            secret.push(ch);
            Keystroke::Typed
        }
        KeyCode::Backspace if secret.pop().is_some() => Keystroke::Erased,
        _ => Keystroke::Ignored,
    }
}

fn notice(message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    execute!(
        std::io::stderr(),
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    Ok(())
}

fn read_secret(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawTerminal::enable()?;
    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;

    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match apply_key(&mut secret, key) {
            Keystroke::Typed => execute!(out, Print("*"))?,
            Keystroke::Erased => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?
            }
            Keystroke::Submitted => {
                execute!(out, Print("\r\n"))?;
                return Ok(secret);
            }
            Keystroke::Interrupted => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            Keystroke::Ignored => {}
        }
        out.flush()?;
    }
}

/// Ask for a password until it is accepted by the engine and confirmed.
fn new_password() -> Result<String, Box<dyn Error + Send + Sync>> {
    for _ in 0..3 {
        let password = read_secret("Password: ")?;
        if let Err(err) = check_password(&password) {
            notice(&err.to_string())?;
            continue;
        }
        if read_secret("Confirm password: ")? == password {
            return Ok(password);
        }
        notice("Passwords do not match. Try again.")?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = new_password()?;

            match engine.create_user(&args.username, &password).await {
                Ok(user) => println!("created user: {}", user.username),
                Err(EngineError::ExistingKey(_)) => {
                    eprintln!("user already exists: {}", args.username);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Fund(Fund {
            command: FundCommand::Create(args),
        }) => {
            let mut cmd = FundNew::new(&args.name, args.percentage.value());
            if args.inactive {
                cmd = cmd.inactive();
            }
            if let Some(description) = args.description {
                cmd = cmd.description(description);
            }

            let fund = engine.create_fund(cmd).await?;
            println!(
                "created fund: {} ({}, {})",
                fund.name,
                BasisPoints::new(fund.percentage_bp),
                fund.id
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keys_build_the_secret() {
        let mut secret = String::new();
        for ch in "pass".chars() {
            assert_eq!(apply_key(&mut secret, key(KeyCode::Char(ch))), Keystroke::Typed);
        }
        assert_eq!(apply_key(&mut secret, key(KeyCode::Backspace)), Keystroke::Erased);
        assert_eq!(apply_key(&mut secret, key(KeyCode::Left)), Keystroke::Ignored);
        assert_eq!(apply_key(&mut secret, key(KeyCode::Enter)), Keystroke::Submitted);
        assert_eq!(secret, "pas");
    }

    #[test]
    fn backspace_on_empty_secret_is_ignored() {
        let mut secret = String::new();
        assert_eq!(apply_key(&mut secret, key(KeyCode::Backspace)), Keystroke::Ignored);
    }

    #[test]
    fn ctrl_c_interrupts() {
        let mut secret = String::from("abc");
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(apply_key(&mut secret, ctrl_c), Keystroke::Interrupted);
        assert_eq!(secret, "abc");
    }

    #[test]
    fn percentage_flag_accepts_percent_sign() {
        assert_eq!(parse_percentage("12.5%"), Ok(BasisPoints::new(1250)));
        assert!(parse_percentage("abc").is_err());
    }
}
