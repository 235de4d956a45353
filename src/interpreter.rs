use crate::command::CommandKind;
use crate::ops;
use crate::session::Session;
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use tracing::debug;

/// Width of the folder-name column in the `help folder` listing.
const FOLDER_COLUMN_WIDTH: usize = 11;

/// The interactive command interpreter.
///
/// One input line is processed to completion before the next is read. Every
/// user-facing message goes through the `out` writer so that tests can
/// capture it; the REPL passes stdout.
///
/// Example
/// ```
/// use vidsort::{Config, Interpreter, Session};
/// let session = Session::new(Config::builtin().unwrap());
/// let mut shell = Interpreter::new(session);
/// let mut out = Vec::new();
/// shell.read_command("help", &mut out).unwrap();
/// assert!(!out.is_empty());
/// ```
pub struct Interpreter {
    session: Session,
}

impl Interpreter {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// The session the interpreter operates on.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Parse and execute one input line.
    ///
    /// Parse errors and filesystem errors are reported on `out` and recovered;
    /// the returned error only signals a broken output stream.
    pub fn read_command(&mut self, line: &str, out: &mut dyn Write) -> Result<()> {
        let mut tokens = line.split_whitespace();
        let Some(instruction) = tokens.next() else {
            // Empty line, nothing to do.
            return Ok(());
        };
        let args: Vec<&str> = tokens.collect();

        match CommandKind::lookup(instruction) {
            Some(CommandKind::ChangeDir) => self.process_change_dir(&args, out),
            Some(CommandKind::Folder) => self.process_folder(out),
            Some(CommandKind::Trash) => self.process_trash(&args, out),
            Some(CommandKind::Date) => self.process_date(out),
            Some(CommandKind::Help) => self.process_help(&args, out),
            Some(CommandKind::Exit) => self.process_exit(out),
            None => {
                writeln!(
                    out,
                    "The input command {line} could not be parsed, because the tool did \
                     not understand the term '{instruction}'. Use:\n'>> help'\nto list \
                     the available instructions and their use cases."
                )?;
                Ok(())
            }
        }
    }

    /// Read lines from the terminal until `exit`, end of input or interrupt.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        loop {
            println!();
            println!("{}", self.session.current_dir.display());
            match rl.readline(">> ") {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    self.read_command(&line, &mut std::io::stdout())?;
                    if self.session.should_exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    // Same path as the exit instruction, keeps the output tidy.
                    println!("exit");
                    self.process_exit(&mut std::io::stdout())?;
                    break;
                }
                Err(err) => {
                    println!("Error: {err:?}");
                    break;
                }
            }
        }

        Ok(())
    }

    fn process_change_dir(&mut self, args: &[&str], out: &mut dyn Write) -> Result<()> {
        if args.is_empty() {
            writeln!(out, "Where do you want to go?")?;
            writeln!(out, "The syntax to change directory is:\n'>> cd <directory>'")?;
            return Ok(());
        }

        // A path may contain spaces; the remaining tokens are one target.
        let target = args.join(" ");
        match self.session.change_dir(&target) {
            Ok(()) => debug!(dir = %self.session.current_dir.display(), "changed directory"),
            Err(_) => {
                writeln!(
                    out,
                    "Cannot find the {target} directory. The correct syntax to change \
                     the directory is:\n'>> cd <directory>'"
                )?;
            }
        }
        Ok(())
    }

    fn process_folder(&mut self, out: &mut dyn Write) -> Result<()> {
        let map = &self.session.config.extensions;
        if let Err(e) = ops::folder_sort(&self.session.current_dir, map, out) {
            writeln!(out, "Could not sort {}: {}", self.session.current_dir.display(), e)?;
        }
        Ok(())
    }

    fn process_trash(&mut self, args: &[&str], out: &mut dyn Write) -> Result<()> {
        let Some(raw) = args.first() else {
            writeln!(out, "What time limit do you want to impose?")?;
            writeln!(
                out,
                "The syntax to choose the time limit is:\n'>> trash <time limit>'\n\
                 The time limit has to be a positive integer number of days."
            )?;
            return Ok(());
        };

        match raw.parse::<i64>() {
            Ok(days) if days > 0 => {
                let map = &self.session.config.extensions;
                if let Err(e) = ops::trash_videos(days as u64, &self.session.current_dir, map, out)
                {
                    writeln!(out, "Could not clean {}: {}", self.session.current_dir.display(), e)?;
                }
            }
            Ok(_) => {
                writeln!(
                    out,
                    "You asked the tool to take {raw} as a time limit, but negative \
                     values (zero included) are not valid here. Please input a \
                     positive integer."
                )?;
            }
            Err(_) => {
                writeln!(
                    out,
                    "Could not parse {raw} as a positive integer. The correct syntax to \
                     choose the time limit is:\n'>> trash <time limit>'"
                )?;
            }
        }
        Ok(())
    }

    fn process_date(&mut self, out: &mut dyn Write) -> Result<()> {
        if let Err(e) = ops::sort_by_date(&self.session.current_dir, out) {
            writeln!(out, "Could not sort {}: {}", self.session.current_dir.display(), e)?;
        }
        Ok(())
    }

    fn process_help(&mut self, args: &[&str], out: &mut dyn Write) -> Result<()> {
        let config = &self.session.config;
        let Some(topic) = args.first() else {
            writeln!(out, "{}", config.help_text("help"))?;
            return Ok(());
        };

        match CommandKind::lookup(topic) {
            Some(CommandKind::Folder) => {
                writeln!(out, "{}", config.help_text("folder"))?;
                for (folder, exts) in config.extensions.entries() {
                    let label = format!("{folder}:");
                    writeln!(out, "{label:<FOLDER_COLUMN_WIDTH$}{}", exts.join(", "))?;
                }
                writeln!(out, "{}", config.help_text("folder-creation"))?;
            }
            Some(kind) => writeln!(out, "{}", config.help_text(kind.help_topic()))?,
            None => writeln!(out, "{}", config.help_text("other"))?,
        }
        Ok(())
    }

    fn process_exit(&mut self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Leaving the tool...")?;
        self.session.should_exit = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::env as stdenv;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_unique_temp_dir() -> PathBuf {
        let mut p = stdenv::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("vidsort_test_interp_{}_{}", std::process::id(), nanos));
        fs::create_dir_all(&p).unwrap();
        p
    }

    fn test_interpreter() -> (Interpreter, PathBuf) {
        let dir = make_unique_temp_dir();
        let config: Config = serde_json::from_str(
            r#"{
                "EXTENSIONS": {"videos": ["mp4"]},
                "HELP": {
                    "help": "full listing",
                    "help-twice": "help about help",
                    "exit": "exit topic",
                    "change": "change topic",
                    "folder": "folder topic",
                    "folder-creation": "folders are created on demand",
                    "trash": "trash topic",
                    "date": "date topic",
                    "other": "no such topic"
                },
                "HEADER": ["banner"]
            }"#,
        )
        .unwrap();
        let session = Session::with_dir(config, fs::canonicalize(&dir).unwrap());
        (Interpreter::new(session), dir)
    }

    fn run(shell: &mut Interpreter, line: &str) -> String {
        let mut out = Vec::new();
        shell.read_command(line, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_line_is_a_no_op() {
        let (mut shell, dir) = test_interpreter();
        assert_eq!(run(&mut shell, ""), "");
        assert_eq!(run(&mut shell, "   \t  "), "");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unknown_token_is_reported_literally() {
        let (mut shell, dir) = test_interpreter();
        let s = run(&mut shell, "foobar something");
        assert!(s.contains("'foobar'"), "output was: {s}");
        // the whole command is echoed back, not just the leading token
        assert!(s.contains("foobar something"), "output was: {s}");
        assert!(s.contains(">> help"), "output was: {s}");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_cd_without_argument_prints_usage_and_keeps_dir() {
        let (mut shell, dir) = test_interpreter();
        let before = shell.session().current_dir.clone();
        let s = run(&mut shell, "cd");
        assert!(s.contains("Where do you want to go?"), "output was: {s}");
        assert_eq!(shell.session().current_dir, before);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_cd_to_missing_directory_prints_named_error() {
        let (mut shell, dir) = test_interpreter();
        let before = shell.session().current_dir.clone();
        let s = run(&mut shell, "cd no such dir");
        assert!(s.contains("Cannot find the no such dir directory"), "output was: {s}");
        assert_eq!(shell.session().current_dir, before);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_cd_synonyms_change_directory() {
        let (mut shell, dir) = test_interpreter();
        fs::create_dir(dir.join("sub")).unwrap();
        for token in ["cd", "C", "go"] {
            let s = run(&mut shell, &format!("{token} sub"));
            assert_eq!(s, "", "unexpected output for {token}: {s}");
            assert!(shell.session().current_dir.ends_with("sub"));
            run(&mut shell, "cd ..");
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_trash_rejects_bad_thresholds_without_touching_files() {
        let (mut shell, dir) = test_interpreter();
        fs::write(dir.join("old.mp4"), b"x").unwrap();

        let s = run(&mut shell, "trash abc");
        assert!(s.contains("Could not parse abc"), "output was: {s}");
        let s = run(&mut shell, "trash 0");
        assert!(s.contains("not valid"), "output was: {s}");
        let s = run(&mut shell, "trash -5");
        assert!(s.contains("not valid"), "output was: {s}");
        let s = run(&mut shell, "trash");
        assert!(s.contains("What time limit"), "output was: {s}");

        // no rejection path may reach the engine
        assert!(dir.join("old.mp4").is_file());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_trash_with_valid_threshold_reaches_the_engine() {
        let (mut shell, dir) = test_interpreter();
        let s = run(&mut shell, "trash 30");
        assert!(s.contains("older than 30 day(s)"), "output was: {s}");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_folder_moves_mapped_file() {
        let (mut shell, dir) = test_interpreter();
        fs::write(dir.join("a.mp4"), b"x").unwrap();
        fs::write(dir.join("b.txt"), b"x").unwrap();

        run(&mut shell, "folder");

        assert!(dir.join("videos").join("a.mp4").is_file());
        assert!(dir.join("b.txt").is_file());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_help_without_argument_prints_full_listing() {
        let (mut shell, dir) = test_interpreter();
        assert_eq!(run(&mut shell, "help"), "full listing\n");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_help_with_topic_prints_topic_text() {
        let (mut shell, dir) = test_interpreter();
        assert_eq!(run(&mut shell, "help trash"), "trash topic\n");
        assert_eq!(run(&mut shell, "help t"), "trash topic\n");
        assert_eq!(run(&mut shell, "help cd"), "change topic\n");
        assert_eq!(run(&mut shell, "help exit"), "exit topic\n");
        assert_eq!(run(&mut shell, "help date"), "date topic\n");
        assert_eq!(run(&mut shell, "help help"), "help about help\n");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_help_folder_enumerates_the_extension_map() {
        let (mut shell, dir) = test_interpreter();
        let s = run(&mut shell, "help folder");
        assert!(s.starts_with("folder topic\n"), "output was: {s}");
        assert!(s.contains("videos:    mp4"), "output was: {s}");
        assert!(s.ends_with("folders are created on demand\n"), "output was: {s}");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_help_with_bogus_topic_falls_back() {
        let (mut shell, dir) = test_interpreter();
        assert_eq!(run(&mut shell, "help bogus"), "no such topic\n");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_exit_synonyms_mark_the_session_finished() {
        for token in ["exit", "e", "leave", "l", "QUIT", "q"] {
            let (mut shell, dir) = test_interpreter();
            let s = run(&mut shell, token);
            assert!(s.contains("Leaving the tool"), "output was: {s}");
            assert!(shell.session().should_exit, "token {token}");
            let _ = fs::remove_dir_all(&dir);
        }
    }
}
