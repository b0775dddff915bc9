//! Participant mode handler.

use tracing::info;

use crate::bot::copy;
use crate::bot::menu::{self, Command, Menu, PARTICIPANT_HOME};
use crate::bot::message::Outbox;
use crate::bot::records::{InfoNote, SubmissionKind};
use crate::bot::roles::Role;
use crate::bot::router::Turn;
use crate::bot::selection::{self, SelectionKey};
use crate::bot::session::{Mode, Session};
use crate::bot::store::{Collection, Filter, StoreError, StoreExt};
use crate::bot::views;

pub fn handle(turn: &Turn<'_>, session: Session, out: &mut Outbox) -> Result<Session, StoreError> {
    if let Some(SelectionKey::ViewAnswers { prompt_id }) = selection::resolve(&session, turn.text()) {
        return views::show_answers(turn, &prompt_id, out);
    }

    if let Some(command) = menu::parse_command(PARTICIPANT_HOME, turn.text()) {
        return run_command(turn, command, session, out);
    }

    match session.mode {
        Mode::Answer => {
            let Some(current) = turn.prompts().current()? else {
                out.reply(copy::NO_PROMPT_OPEN, Menu::back());
                return Ok(session);
            };
            save(turn, SubmissionKind::Answer, Some(current.id), copy::ANSWER_SAVED, out)
        }
        Mode::Comment => save(turn, SubmissionKind::Comment, None, copy::COMMENT_SAVED, out),
        Mode::FreeQuestion => save(turn, SubmissionKind::FreeQuestion, None, copy::QUESTION_SAVED, out),
        Mode::SelectAnswers => {
            views::invalid_option(&session, out);
            Ok(session)
        }
        _ => {
            out.reply(copy::PARTICIPANT_GREETING, Menu::home(Role::Participant));
            Ok(Session::home())
        }
    }
}

fn run_command(
    turn: &Turn<'_>,
    command: Command,
    session: Session,
    out: &mut Outbox,
) -> Result<Session, StoreError> {
    match command {
        Command::Answer => open_answer(turn, copy::NO_PROMPT_OPEN, session, out),
        Command::CurrentPrompt => open_answer(turn, copy::NO_CURRENT_PROMPT, session, out),
        Command::Comment => {
            out.reply(copy::ASK_COMMENT, Menu::back());
            Ok(Session::enter(Mode::Comment))
        }
        Command::AskQuestion => {
            out.reply(copy::ASK_QUESTION, Menu::back());
            Ok(Session::enter(Mode::FreeQuestion))
        }
        Command::Info => {
            let notes = turn
                .store
                .find_all_as::<InfoNote>(Collection::InfoNotes, &Filter::All)?;
            if notes.is_empty() {
                out.reply(copy::NO_INFO, views::listing_menu(&session));
            } else {
                for note in notes {
                    out.say(note.record.text);
                }
                out.reply(copy::INFO_END, views::listing_menu(&session));
            }
            Ok(session)
        }
        Command::PastPrompts => {
            let archived = turn.prompts().archived()?;
            if archived.is_empty() {
                out.reply(copy::NO_PAST_PROMPTS, views::listing_menu(&session));
            } else {
                for prompt in &archived {
                    out.say(copy::past_prompt(prompt));
                }
                out.reply(copy::PAST_PROMPTS_END, views::listing_menu(&session));
            }
            Ok(session)
        }
        Command::ViewAnswers => views::offer_answers(turn, session, out),
        // Not on the participant menu
        _ => {
            out.reply(copy::PARTICIPANT_GREETING, Menu::home(Role::Participant));
            Ok(Session::home())
        }
    }
}

/// Show the current prompt and wait for an answer. With no current
/// prompt, reply `empty_text` and keep the session.
fn open_answer(
    turn: &Turn<'_>,
    empty_text: &str,
    session: Session,
    out: &mut Outbox,
) -> Result<Session, StoreError> {
    let Some(current) = turn.prompts().current()? else {
        out.reply(empty_text, views::kept_menu(&session, Role::Participant));
        return Ok(session);
    };

    out.say(copy::current_prompt(&current));
    out.reply(copy::ASK_ANSWER, Menu::back());
    Ok(Session::enter(Mode::Answer))
}

fn save(
    turn: &Turn<'_>,
    kind: SubmissionKind,
    prompt_id: Option<String>,
    saved_text: &str,
    out: &mut Outbox,
) -> Result<Session, StoreError> {
    let submission = turn.submission(prompt_id);
    turn.store.insert_record(kind.collection(), &submission)?;
    info!(
        "📥 {} from {} ({})",
        kind.title(),
        submission.author(),
        submission.author_id
    );
    out.reply(saved_text, Menu::home(Role::Participant));
    Ok(Session::home())
}
