//! Line-oriented front end
//!
//! Plays the part of the login page and the users table: every line is one
//! command, every command is one call on the [`Desk`], and the result is
//! rendered from what the desk returns.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use userdesk_core::seed::{ADMIN_EMAIL, ADMIN_PASSWORD};
use userdesk_core::{Desk, Error, KeyValueStore, Result, Seed, User, UserDraft};

const HELP: &str = "\
Commands:
  login <email> <password>
  logout
  whoami
  list
  search [query]
  create <email> <password> <name...>
  edit <id> <email> <password> <name...>
  delete <id>
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: String, password: String },
    Logout,
    Whoami,
    List,
    Search(String),
    Create(UserDraft),
    Edit { id: u64, patch: UserDraft },
    Delete(u64),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match verb.to_lowercase().as_str() {
            "login" => {
                let (email, password) = split_word(rest, "login <email> <password>")?;
                Ok(Command::Login {
                    email: email.to_string(),
                    password: password.to_string(),
                })
            }
            "logout" | "signout" => Ok(Command::Logout),
            "whoami" => Ok(Command::Whoami),
            "list" | "ls" => Ok(Command::List),
            "search" | "find" => Ok(Command::Search(rest.to_string())),
            "create" | "add" => Ok(Command::Create(parse_draft(
                rest,
                "create <email> <password> <name...>",
            )?)),
            "edit" => {
                const USAGE: &str = "edit <id> <email> <password> <name...>";
                let (id, rest) = split_word(rest, USAGE)?;
                Ok(Command::Edit {
                    id: parse_id(id)?,
                    patch: parse_draft(rest, USAGE)?,
                })
            }
            "delete" | "rm" => Ok(Command::Delete(parse_id(rest)?)),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "" => Err(Error::Validation("Empty command".into())),
            other => Err(Error::Validation(format!(
                "Unknown command '{other}', try 'help'"
            ))),
        }
    }
}

/// Split off the first whitespace-delimited word; both halves must be non-empty
fn split_word<'a>(s: &'a str, usage: &str) -> Result<(&'a str, &'a str)> {
    match s.split_once(char::is_whitespace) {
        Some((head, tail)) if !tail.trim().is_empty() => Ok((head, tail.trim_start())),
        _ => Err(Error::Validation(format!("Usage: {usage}"))),
    }
}

fn parse_draft(s: &str, usage: &str) -> Result<UserDraft> {
    let (email, rest) = split_word(s, usage)?;
    let (password, name) = split_word(rest, usage)?;
    Ok(UserDraft::new(name, email, password))
}

fn parse_id(s: &str) -> Result<u64> {
    s.trim()
        .parse()
        .map_err(|_| Error::Validation(format!("'{}' is not a user id", s.trim())))
}

/// Whether the loop keeps reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Greet the user the way the landing route does: straight to the table when
/// a session is active, otherwise to the login prompt.
pub fn start<S: KeyValueStore, W: Write>(desk: &mut Desk<S>, out: &mut W) -> io::Result<()> {
    match desk.enter_users_view() {
        Ok(session) => {
            writeln!(out, "Welcome back, {}.", session.name)?;
            render_table(out, desk.directory().list().iter())
        }
        Err(Error::NotAuthenticated) => {
            writeln!(out, "Sign in with: login <email> <password>")?;
            if *desk.directory().seed() == Seed::builtin() {
                writeln!(out, "Try {ADMIN_EMAIL} / {ADMIN_PASSWORD}")?;
            }
            Ok(())
        }
        Err(e) => writeln!(out, "error: {e}"),
    }
}

/// Read commands until `quit` or end of input
pub fn run<S, R, W>(desk: &mut Desk<S>, input: R, out: &mut W) -> io::Result<()>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    start(desk, out)?;
    prompt(desk, out)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            prompt(desk, out)?;
            continue;
        }

        let flow = match line.parse::<Command>() {
            Ok(command) => execute(desk, command, out)?,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                Flow::Continue
            }
        };
        if flow == Flow::Quit {
            break;
        }
        prompt(desk, out)?;
    }

    Ok(())
}

/// Run one command. Desk errors are printed, never propagated.
pub fn execute<S: KeyValueStore, W: Write>(
    desk: &mut Desk<S>,
    command: Command,
    out: &mut W,
) -> io::Result<Flow> {
    let result = match command {
        Command::Login { email, password } => desk.login(&email, &password).map(|session| {
            format!("Login successful. Signed in as {} <{}>.", session.name, session.email)
        }),
        Command::Logout => desk.logout().map(|()| "Signed out.".to_string()),
        Command::Whoami => Ok(match desk.current_session() {
            Some(session) => format!("Signed in as {} <{}>", session.name, session.email),
            None => "Not signed in".to_string(),
        }),
        Command::List => match desk.list() {
            Ok(users) => {
                render_table(out, users.iter())?;
                return Ok(Flow::Continue);
            }
            Err(e) => Err(e),
        },
        Command::Search(query) => match desk.search(&query) {
            Ok(users) => {
                render_table(out, users.into_iter())?;
                return Ok(Flow::Continue);
            }
            Err(e) => Err(e),
        },
        Command::Create(draft) => desk
            .create(draft)
            .map(|user| format!("Created {} (ID: {}).", user.name, user.id)),
        Command::Edit { id, patch } => desk
            .update(id, patch)
            .map(|user| format!("Saved {} (ID: {}).", user.name, user.id)),
        Command::Delete(id) => desk
            .remove(id)
            .map(|user| format!("Deleted {} (ID: {}).", user.name, user.id)),
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => return Ok(Flow::Quit),
    };

    match result {
        Ok(message) => writeln!(out, "{message}")?,
        Err(e) => writeln!(out, "error: {e}")?,
    }
    Ok(Flow::Continue)
}

fn prompt<S: KeyValueStore, W: Write>(desk: &Desk<S>, out: &mut W) -> io::Result<()> {
    match desk.current_session() {
        Some(session) => write!(out, "{}> ", session.email)?,
        None => write!(out, "> ")?,
    }
    out.flush()
}

fn render_table<'a, W: Write>(
    out: &mut W,
    users: impl ExactSizeIterator<Item = &'a User>,
) -> io::Result<()> {
    if users.len() == 0 {
        return writeln!(out, "No users match your search");
    }

    writeln!(out, "{:>4}  {:<24} {:<6} Email", "ID", "Name", "Role")?;
    for user in users {
        let name = format!("[{}] {}", user.initial(), user.name);
        writeln!(
            out,
            "{:>4}  {:<24} {:<6} {}",
            user.id,
            name,
            user.role().to_string(),
            user.email
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdesk_core::{MemoryStore, SessionConfig};

    fn desk() -> Desk<MemoryStore> {
        Desk::open(MemoryStore::new(), Seed::builtin(), SessionConfig::default()).unwrap()
    }

    fn run_script(desk: &mut Desk<MemoryStore>, script: &str) -> String {
        let mut out = Vec::new();
        run(desk, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "login admin@example.com pass123".parse::<Command>().unwrap(),
            Command::Login {
                email: "admin@example.com".into(),
                password: "pass123".into()
            }
        );
        assert_eq!(
            "create bob@x.com hunter2 Bob  Builder".parse::<Command>().unwrap(),
            Command::Create(UserDraft::new("Bob  Builder", "bob@x.com", "hunter2"))
        );
        assert_eq!(
            "edit 3 c@x.com pw Carol".parse::<Command>().unwrap(),
            Command::Edit {
                id: 3,
                patch: UserDraft::new("Carol", "c@x.com", "pw")
            }
        );
        assert_eq!("search".parse::<Command>().unwrap(), Command::Search(String::new()));
        assert_eq!(" DELETE 7 ".parse::<Command>().unwrap(), Command::Delete(7));
        assert_eq!("quit".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!("login admin@example.com".parse::<Command>().is_err());
        assert!("create bob@x.com hunter2".parse::<Command>().is_err());
        assert!("delete seven".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }

    #[test]
    fn test_signed_out_start_shows_hint() {
        let mut desk = desk();
        let output = run_script(&mut desk, "list\n");
        assert!(output.contains("Try admin@example.com / pass123"));
        assert!(output.contains("error: Not signed in"));
    }

    #[test]
    fn test_full_session() {
        let mut desk = desk();
        let output = run_script(
            &mut desk,
            "login admin@example.com wrong\n\
             login admin@example.com pass123\n\
             create bob@x.com hunter2 Bob\n\
             create BOB@x.com other Bobby\n\
             search bo\n\
             delete 9\n\
             quit\n\
             whoami\n",
        );

        assert!(output.contains("error: Invalid email or password"));
        assert!(output.contains("Login successful. Signed in as Admin <admin@example.com>."));
        assert!(output.contains("Created Bob (ID: 2)."));
        assert!(output.contains("error: A user with email BOB@x.com already exists"));
        assert!(output.contains("[B] Bob"));
        assert!(!output.contains("[A] Admin"));
        assert!(output.contains("error: User #9 not found"));
        // Nothing after quit runs
        assert!(!output.contains("Signed in as Admin <admin@example.com>\n"));
        assert_eq!(desk.directory().len(), 2);
    }

    #[test]
    fn test_logout_resets_directory() {
        let mut desk = desk();
        let output = run_script(
            &mut desk,
            "login admin@example.com pass123\n\
             add carol@x.com pw12 Carol\n\
             logout\n\
             whoami\n",
        );

        assert!(output.contains("Signed out."));
        assert!(output.contains("Not signed in"));
        assert_eq!(desk.directory().list(), Seed::builtin().users());
    }

    #[test]
    fn test_empty_search_renders_placeholder() {
        let mut desk = desk();
        let output = run_script(
            &mut desk,
            "login admin@example.com pass123\nsearch nobody-here\n",
        );
        assert!(output.contains("No users match your search"));
    }
}
