//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::chat::clarify::ClarificationPrompt;
use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use swarm_application::{DocumentSource, TurnController, TurnOutcome};
use swarm_domain::{DocumentId, OutputFormat};

const HISTORY_CAPACITY: usize = 1000;

/// Run `turn`, cancelling the controller's current turn on Ctrl+C and
/// waiting for the turn to wind down.
async fn with_interrupt<T>(controller: &TurnController, turn: impl Future<Output = T>) -> T {
    tokio::pin!(turn);
    tokio::select! {
        out = &mut turn => out,
        Ok(()) = tokio::signal::ctrl_c() => {
            controller.cancel_current_turn();
            turn.await
        }
    }
}

/// Submit `query` and answer any clarification questions through
/// `read_line`. Aborting the questions leaves the turn stopped.
pub async fn run_turn_interactive<F>(
    controller: &TurnController,
    query: &str,
    read_line: F,
) -> TurnOutcome
where
    F: FnMut(&str) -> Option<String>,
{
    let mut prompt = ClarificationPrompt::new(read_line);
    let mut outcome = with_interrupt(controller, controller.submit_query(query)).await;

    while let TurnOutcome::Clarification(request) = &outcome {
        let Some(answers) = prompt.collect(request) else {
            return TurnOutcome::Stopped;
        };
        match with_interrupt(controller, controller.submit_clarification_answers(&answers)).await
        {
            Ok(next) => outcome = next,
            Err(e) => println!("{} {}", "!".yellow(), e),
        }
    }
    outcome
}

fn read_with(editor: &mut Reedline, label: &str) -> Option<String> {
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(label.to_string()),
        DefaultPromptSegment::Empty,
    );
    match editor.read_line(&prompt) {
        Ok(Signal::Success(line)) => Some(line),
        _ => None,
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    controller: Arc<TurnController>,
    documents: Arc<dyn DocumentSource>,
    formatter: ConsoleFormatter,
    format: OutputFormat,
    history_file: Option<PathBuf>,
}

impl ChatRepl {
    pub fn new(controller: Arc<TurnController>, documents: Arc<dyn DocumentSource>) -> Self {
        Self {
            controller,
            documents,
            formatter: ConsoleFormatter::new(),
            format: OutputFormat::Report,
            history_file: dirs::data_dir().map(|p| p.join("doc-swarm").join("history.txt")),
        }
    }

    pub fn with_formatter(mut self, formatter: ConsoleFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    fn editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = &self.history_file else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(_) => editor,
        }
    }

    /// Run the interactive REPL
    pub async fn run(&self) {
        let mut editor = self.editor();
        self.print_welcome().await;

        loop {
            let Some(line) = read_with(&mut editor, "doc-swarm") else {
                println!("Bye!");
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('/') {
                if self.handle_command(line).await {
                    break;
                }
                continue;
            }

            self.process_question(&mut editor, line).await;
        }
    }

    async fn print_welcome(&self) {
        println!();
        println!("{}", "doc-swarm - Chat Mode".bold());
        println!();
        self.print_agents().await;
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /brief <path>    - Brief an agent on a document");
        println!("  /remove <name>   - Remove a document's agent");
        println!("  /agents          - List briefed documents");
        println!("  /clear           - Forget the conversation so far");
        println!("  /help, /h, /?    - Show this help");
        println!("  /quit, /exit, /q - Exit chat");
        println!();
        println!("Press Ctrl+C while a turn runs to stop it.");
        println!();
    }

    async fn print_agents(&self) {
        let agents = self.controller.list_active_agents().await;
        if agents.is_empty() {
            println!("No documents briefed. Use /brief <path> to add one.");
        } else {
            println!("Documents:");
            for id in agents {
                println!("  - {}", id);
            }
        }
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&self, line: &str) -> bool {
        let (cmd, arg) = match line.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (line, ""),
        };

        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                return true;
            }
            "/help" | "/h" | "/?" => Self::print_help(),
            "/agents" => self.print_agents().await,
            "/clear" => {
                self.controller.clear_history();
                println!("Conversation cleared.");
            }
            "/brief" if !arg.is_empty() => self.brief(Path::new(arg)).await,
            "/remove" if !arg.is_empty() => {
                if self.controller.remove_document(&DocumentId::from(arg)).await {
                    println!("Removed {}", arg);
                } else {
                    println!("No agent for {}", arg);
                }
            }
            "/brief" | "/remove" => println!("Usage: {} <argument>", cmd),
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn brief(&self, path: &Path) {
        let document = match self.documents.load(path) {
            Ok(document) => document,
            Err(e) => {
                println!("{} {}", "Error:".red().bold(), e);
                return;
            }
        };
        let briefing = with_interrupt(&self.controller, self.controller.brief_document(&document));
        if let Err(e) = briefing.await {
            println!("{} {}", "Error:".red().bold(), e);
        }
    }

    async fn process_question(&self, editor: &mut Reedline, question: &str) {
        println!();
        let outcome =
            run_turn_interactive(&self.controller, question, |label| read_with(editor, label))
                .await;
        println!("{}", self.formatter.render_outcome(&outcome, self.format));
        println!();
    }
}
