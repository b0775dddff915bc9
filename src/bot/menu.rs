//! Menu commands and reply keyboard layout.

use crate::bot::roles::Role;
use crate::bot::selection::{SelectionList, normalize_label};

/// A command offered as a menu button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Back,
    // Operator
    NewPrompt,
    StopPrompt,
    ViewComments,
    ViewQuestions,
    AddInfo,
    Delete,
    // Shared
    ViewAnswers,
    // Participant
    Answer,
    Comment,
    AskQuestion,
    Info,
    CurrentPrompt,
    PastPrompts,
}

impl Command {
    pub fn label(self) -> &'static str {
        match self {
            Command::Back => "◀️ Back",
            Command::NewPrompt => "🖋 New prompt",
            Command::StopPrompt => "⏹ Stop prompt",
            Command::ViewComments => "📖 View comments",
            Command::ViewQuestions => "❓ View questions",
            Command::AddInfo => "ℹ️ Add info",
            Command::Delete => "🗑️ Delete",
            Command::ViewAnswers => "✍️ View answers",
            Command::Answer => "✍️ Answer",
            Command::Comment => "📖 Comment",
            Command::AskQuestion => "❓ Ask a question",
            Command::Info => "ℹ️ Info",
            Command::CurrentPrompt => "❓ Current prompt",
            Command::PastPrompts => "❓ Past prompts",
        }
    }
}

pub const OPERATOR_HOME: &[Command] = &[
    Command::NewPrompt,
    Command::StopPrompt,
    Command::ViewAnswers,
    Command::ViewComments,
    Command::ViewQuestions,
    Command::AddInfo,
    Command::Delete,
];

pub const PARTICIPANT_HOME: &[Command] = &[
    Command::Answer,
    Command::Comment,
    Command::AskQuestion,
    Command::Info,
    Command::CurrentPrompt,
    Command::PastPrompts,
    Command::ViewAnswers,
];

/// Typed alternative to pressing the back button.
const START_COMMAND: &str = "/start";

pub fn home_commands(role: Role) -> &'static [Command] {
    match role {
        Role::Operator => OPERATOR_HOME,
        Role::Participant => PARTICIPANT_HOME,
    }
}

/// Whether `text` is the universal back command.
pub fn is_back(text: &str) -> bool {
    let text = normalize_label(text);
    text == normalize_label(Command::Back.label()) || text == START_COMMAND
}

/// The command among `commands` whose label matches `text`.
pub fn parse_command(commands: &[Command], text: &str) -> Option<Command> {
    let wanted = normalize_label(text);
    commands
        .iter()
        .copied()
        .find(|c| normalize_label(c.label()) == wanted)
}

/// Button rows of a reply keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub rows: Vec<Vec<String>>,
}

impl Menu {
    /// Lay labels out in rows. Blank labels are dropped. Widths of 2 or 3
    /// apply only to menus with more than three buttons; otherwise each
    /// button gets its own row.
    pub fn layout<I, S>(labels: I, width: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels
            .into_iter()
            .map(Into::into)
            .filter(|l| !l.trim().is_empty())
            .collect();

        let rows = if (2..=3).contains(&width) && labels.len() > 3 {
            labels.chunks(width).map(|row| row.to_vec()).collect()
        } else {
            labels.into_iter().map(|l| vec![l]).collect()
        };
        Self { rows }
    }

    pub fn home(role: Role) -> Self {
        let width = match role {
            Role::Operator => 3,
            Role::Participant => 2,
        };
        Self::layout(home_commands(role).iter().map(|c| c.label()), width)
    }

    pub fn back() -> Self {
        Self::layout([Command::Back.label()], 1)
    }

    /// One row per entry, then back.
    pub fn selection(list: &SelectionList) -> Self {
        Self::layout(list.labels().chain([Command::Back.label()]), 1)
    }

    #[cfg(test)]
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }
}
