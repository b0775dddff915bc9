//! Operator mode handler.

use tracing::info;

use crate::bot::copy;
use crate::bot::menu::{self, Command, Menu, OPERATOR_HOME};
use crate::bot::message::Outbox;
use crate::bot::prompts::StopOutcome;
use crate::bot::records::{InfoNote, Submission, SubmissionKind, format_timestamp};
use crate::bot::roles::Role;
use crate::bot::router::Turn;
use crate::bot::selection::{self, SelectionKey, SelectionList};
use crate::bot::session::{Mode, Session};
use crate::bot::store::{Collection, Filter, StoreError, StoreExt};
use crate::bot::views;

pub fn handle(turn: &Turn<'_>, session: Session, out: &mut Outbox) -> Result<Session, StoreError> {
    if let Some(key) = selection::resolve(&session, turn.text()) {
        return complete_selection(turn, key, out);
    }

    if let Some(command) = menu::parse_command(OPERATOR_HOME, turn.text()) {
        return run_command(turn, command, session, out);
    }

    match session.mode {
        Mode::NewPrompt => {
            turn.prompts().submit_new(turn.text())?;
            out.reply(copy::PROMPT_SAVED, Menu::home(Role::Operator));
            Ok(Session::home())
        }
        Mode::AddInfo => {
            let note = InfoNote { text: turn.text().to_string() };
            turn.store.insert_record(Collection::InfoNotes, &note)?;
            info!("ℹ️ Info note added by {}", turn.msg.author_id);
            out.reply(copy::INFO_SAVED, Menu::home(Role::Operator));
            Ok(Session::home())
        }
        Mode::SelectAnswers | Mode::SelectDelete => {
            views::invalid_option(&session, out);
            Ok(session)
        }
        _ => {
            out.reply(copy::OPERATOR_GREETING, Menu::home(Role::Operator));
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
        Command::NewPrompt => {
            out.reply(copy::ASK_NEW_PROMPT, Menu::back());
            Ok(Session::enter(Mode::NewPrompt))
        }
        Command::StopPrompt => match turn.prompts().stop()? {
            StopOutcome::Archived(prompt) => {
                out.reply(copy::prompt_stopped(&prompt), Menu::home(Role::Operator));
                Ok(Session::home())
            }
            StopOutcome::NothingToStop => {
                out.reply(copy::NOTHING_TO_STOP, views::kept_menu(&session, Role::Operator));
                Ok(session)
            }
        },
        Command::AddInfo => {
            out.reply(copy::ASK_INFO, Menu::back());
            Ok(Session::enter(Mode::AddInfo))
        }
        Command::ViewAnswers => views::offer_answers(turn, session, out),
        Command::ViewComments => {
            views::list_submissions(turn, &session, SubmissionKind::Comment, copy::NO_COMMENTS, copy::COMMENTS_END, out)?;
            Ok(session)
        }
        Command::ViewQuestions => {
            views::list_submissions(turn, &session, SubmissionKind::FreeQuestion, copy::NO_QUESTIONS, copy::QUESTIONS_END, out)?;
            Ok(session)
        }
        Command::Delete => offer_deletions(turn, session, out),
        // Not on the operator menu
        _ => {
            out.reply(copy::OPERATOR_GREETING, Menu::home(Role::Operator));
            Ok(Session::home())
        }
    }
}

/// Every answer, free question, and prompt, each keyed by its record id.
fn deletion_list(turn: &Turn<'_>) -> Result<SelectionList, StoreError> {
    let mut list = SelectionList::new();

    let answers = turn
        .store
        .find_all_as::<Submission>(Collection::Answers, &Filter::All)?;
    for (i, a) in answers.iter().enumerate() {
        list.push(
            submission_label(SubmissionKind::Answer, i + 1, &a.record),
            SelectionKey::DeleteAnswer { doc_id: a.doc_id },
        );
    }

    let questions = turn
        .store
        .find_all_as::<Submission>(Collection::FreeQuestions, &Filter::All)?;
    for (i, q) in questions.iter().enumerate() {
        list.push(
            submission_label(SubmissionKind::FreeQuestion, i + 1, &q.record),
            SelectionKey::DeleteFreeQuestion { doc_id: q.doc_id },
        );
    }

    let prompts = turn.prompts();
    if let Some(current) = prompts.current()? {
        list.push(
            views::current_label(&current),
            SelectionKey::DeleteCurrentPrompt { prompt_id: current.id },
        );
    }
    for (i, p) in prompts.archived()?.into_iter().enumerate() {
        list.push(
            views::archived_label(i + 1, &p),
            SelectionKey::DeleteArchivedPrompt { prompt_id: p.id },
        );
    }

    Ok(list)
}

fn submission_label(kind: SubmissionKind, index: usize, s: &Submission) -> String {
    format!(
        "{} {}: {} (by {}, {})",
        kind.title(),
        index,
        s.text,
        s.author(),
        format_timestamp(&s.timestamp)
    )
}

fn offer_deletions(turn: &Turn<'_>, session: Session, out: &mut Outbox) -> Result<Session, StoreError> {
    let list = deletion_list(turn)?;
    if list.is_empty() {
        out.reply(copy::NOTHING_TO_DELETE, views::listing_menu(&session));
        return Ok(session);
    }

    out.reply(copy::CHOOSE_DELETE, Menu::selection(&list));
    Ok(Session::selecting(Mode::SelectDelete, list))
}

fn complete_selection(turn: &Turn<'_>, key: SelectionKey, out: &mut Outbox) -> Result<Session, StoreError> {
    let deleted = match &key {
        SelectionKey::ViewAnswers { prompt_id } => return views::show_answers(turn, prompt_id, out),
        SelectionKey::DeleteAnswer { doc_id } => turn
            .store
            .delete_one(Collection::Answers, &Filter::DocId(*doc_id))?,
        SelectionKey::DeleteFreeQuestion { doc_id } => turn
            .store
            .delete_one(Collection::FreeQuestions, &Filter::DocId(*doc_id))?,
        SelectionKey::DeleteCurrentPrompt { prompt_id } => turn.prompts().delete_by_id(prompt_id)?,
        SelectionKey::DeleteArchivedPrompt { prompt_id } => turn.prompts().delete_archived(prompt_id)?,
    };

    if deleted {
        info!("🗑️ {} by {}", key, turn.msg.author_id);
        out.reply(copy::DELETED, Menu::home(Role::Operator));
    } else {
        info!("{} already gone", key);
        out.reply(copy::ALREADY_GONE, Menu::home(Role::Operator));
    }
    Ok(Session::home())
}
