//! Listings shared by both roles.

use crate::bot::copy;
use crate::bot::menu::Menu;
use crate::bot::message::Outbox;
use crate::bot::records::{Prompt, Submission, SubmissionKind};
use crate::bot::roles::Role;
use crate::bot::router::Turn;
use crate::bot::selection::{SelectionKey, SelectionList};
use crate::bot::session::{Mode, Session};
use crate::bot::store::{Collection, Filter, StoreError, StoreExt};

pub fn current_label(prompt: &Prompt) -> String {
    format!("Current: {} (open)", prompt.text)
}

/// `index` counts from 1.
pub fn archived_label(index: usize, prompt: &Prompt) -> String {
    format!("Archived {}: {} ({})", index, prompt.text, prompt.period())
}

/// Keyboard for a reply that leaves `session` as it is: the live selection
/// list if there is one, otherwise a back button.
pub fn listing_menu(session: &Session) -> Menu {
    session
        .selection
        .as_ref()
        .map(Menu::selection)
        .unwrap_or_else(Menu::back)
}

/// Like [`listing_menu`], but an idle session gets the role's home menu.
pub fn kept_menu(session: &Session, role: Role) -> Menu {
    if session.is_home() {
        Menu::home(role)
    } else {
        listing_menu(session)
    }
}

/// Current prompt first, then the archive.
pub fn answers_selection(turn: &Turn<'_>) -> Result<SelectionList, StoreError> {
    let prompts = turn.prompts();
    let mut list = SelectionList::new();

    if let Some(current) = prompts.current()? {
        list.push(current_label(&current), SelectionKey::ViewAnswers { prompt_id: current.id });
    }
    for (i, prompt) in prompts.archived()?.into_iter().enumerate() {
        list.push(archived_label(i + 1, &prompt), SelectionKey::ViewAnswers { prompt_id: prompt.id });
    }
    Ok(list)
}

/// Offer the prompts whose answers can be viewed.
pub fn offer_answers(turn: &Turn<'_>, session: Session, out: &mut Outbox) -> Result<Session, StoreError> {
    let list = answers_selection(turn)?;
    if list.is_empty() {
        out.reply(copy::NO_PROMPTS, listing_menu(&session));
        return Ok(session);
    }

    out.reply(copy::CHOOSE_PROMPT, Menu::selection(&list));
    Ok(Session::selecting(Mode::SelectAnswers, list))
}

/// Forward every answer bound to `prompt_id`. Completes the selection.
pub fn show_answers(turn: &Turn<'_>, prompt_id: &str, out: &mut Outbox) -> Result<Session, StoreError> {
    let prompt_text = turn
        .prompts()
        .find(prompt_id)?
        .map(|p| p.text)
        .unwrap_or_else(|| prompt_id.to_string());

    let answers = turn
        .store
        .find_all_as::<Submission>(Collection::Answers, &Filter::eq("promptId", prompt_id))?;

    if answers.is_empty() {
        out.reply(copy::no_answers(&prompt_text), Menu::back());
        return Ok(Session::home());
    }

    for answer in &answers {
        forward_with_details(SubmissionKind::Answer, &answer.record, out);
    }
    out.reply(copy::answers_end(&prompt_text), Menu::back());
    Ok(Session::home())
}

/// Forward every submission of `kind`, each followed by its details.
pub fn list_submissions(
    turn: &Turn<'_>,
    session: &Session,
    kind: SubmissionKind,
    empty_text: &str,
    end_text: &str,
    out: &mut Outbox,
) -> Result<(), StoreError> {
    let submissions = turn
        .store
        .find_all_as::<Submission>(kind.collection(), &Filter::All)?;

    if submissions.is_empty() {
        out.reply(empty_text, listing_menu(session));
        return Ok(());
    }

    for s in &submissions {
        forward_with_details(kind, &s.record, out);
    }
    out.reply(end_text, listing_menu(session));
    Ok(())
}

/// Reply to a choice that matched nothing. The session is not touched.
pub fn invalid_option(session: &Session, out: &mut Outbox) {
    out.reply(copy::INVALID_OPTION, listing_menu(session));
}

fn forward_with_details(kind: SubmissionKind, s: &Submission, out: &mut Outbox) {
    out.forward(s.source_conversation(), s.source_message_id);
    out.say(copy::submission_details(kind, s));
}
