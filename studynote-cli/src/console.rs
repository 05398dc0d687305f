//! Interactive console over a single study session.

use std::path::{Path, PathBuf};

use anyhow::Context;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use studynote_rag::{QuizItem, RagOrchestrator, Session};

const HELP: &str = "\
Type a question to ask about the loaded document, or a command:
  :load <path>   load a new document (replaces the current one)
  :summary       show the document summary
  :quiz [n]      generate a multiple-choice quiz
  :reset         discard the current document
  :help          show this help
  :quit          exit";

#[derive(Debug, PartialEq)]
enum Command {
    Ask(String),
    Load(PathBuf),
    Summary,
    Quiz(Option<usize>),
    Reset,
    Help,
    Quit,
    Nothing,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(if line.is_empty() { Command::Nothing } else { Command::Ask(line.to_string()) });
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "load" | "l" if !arg.is_empty() => Ok(Command::Load(PathBuf::from(arg))),
        "load" | "l" => Err("usage: :load <path>".to_string()),
        "summary" | "s" => Ok(Command::Summary),
        "quiz" | "q" if arg.is_empty() => Ok(Command::Quiz(None)),
        "quiz" | "q" => arg
            .parse::<usize>()
            .map(|n| Command::Quiz(Some(n)))
            .map_err(|_| format!("not a number of questions: {arg}")),
        "reset" => Ok(Command::Reset),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command :{other} (try :help)")),
    }
}

async fn load(orchestrator: &RagOrchestrator, session: &mut Session, path: &Path) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let display_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    println!("Indexing {display_name}...");
    let summary = orchestrator.index_and_summarize(session, &text, &display_name).await?;
    println!("\n{summary}\n");
    Ok(())
}

fn print_quiz(items: &[QuizItem]) {
    if items.is_empty() {
        println!("The model did not return any usable questions. Try again.");
        return;
    }
    for item in items {
        println!("{}", item.question);
        for choice in &item.choices {
            println!("  {choice}");
        }
        println!("  Correct answer: {}\n", item.correct);
    }
}

/// Run the read-eval-print loop until `:quit` or end of input.
///
/// If `initial` is given it is loaded before the first prompt; a failure to
/// load it is reported and the console keeps running.
pub async fn run_console(
    orchestrator: &RagOrchestrator,
    initial: Option<PathBuf>,
    default_questions: usize,
) -> anyhow::Result<()> {
    let mut session = Session::new();
    if let Some(path) = initial {
        if let Err(e) = load(orchestrator, &mut session, &path).await {
            eprintln!("error: {e:#}");
        }
    }

    let mut rl = DefaultEditor::new()?;
    println!("{HELP}\n");

    loop {
        let line = match rl.readline("studynote> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if !line.trim().is_empty() {
            let _ = rl.add_history_entry(line.as_str());
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        let result: anyhow::Result<()> = match command {
            Command::Nothing => Ok(()),
            Command::Help => {
                println!("{HELP}");
                Ok(())
            }
            Command::Quit => break,
            Command::Load(path) => load(orchestrator, &mut session, &path).await,
            Command::Summary => orchestrator
                .summarize(&mut session)
                .await
                .map(|summary| println!("\n{summary}\n"))
                .map_err(Into::into),
            Command::Ask(question) => orchestrator
                .ask(&session, &question)
                .await
                .map(|answer| println!("\n{answer}\n"))
                .map_err(Into::into),
            Command::Quiz(n) => orchestrator
                .generate_quiz(&session, n.unwrap_or(default_questions))
                .await
                .map(|items| print_quiz(&items))
                .map_err(Into::into),
            Command::Reset => {
                orchestrator.reset_workspace(&mut session);
                println!("Document discarded.");
                Ok(())
            }
        };

        if let Err(e) = result {
            eprintln!("error: {e:#}");
        }
    }

    orchestrator.reset_workspace(&mut session);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_questions() {
        assert_eq!(parse_command("  What is osmosis? "), Ok(Command::Ask("What is osmosis?".into())));
        assert_eq!(parse_command("   "), Ok(Command::Nothing));
    }

    #[test]
    fn commands_parse_with_arguments() {
        assert_eq!(parse_command(":quiz"), Ok(Command::Quiz(None)));
        assert_eq!(parse_command(":quiz 7"), Ok(Command::Quiz(Some(7))));
        assert_eq!(parse_command(":load notes/ch 1.txt"), Ok(Command::Load("notes/ch 1.txt".into())));
        assert_eq!(parse_command(":reset"), Ok(Command::Reset));
        assert_eq!(parse_command(":quit"), Ok(Command::Quit));
    }

    #[test]
    fn malformed_commands_are_rejected() {
        assert!(parse_command(":quiz many").is_err());
        assert!(parse_command(":load").is_err());
        assert!(parse_command(":frobnicate").is_err());
    }
}
