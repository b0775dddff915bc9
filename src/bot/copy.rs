//! User-facing reply text.

use crate::bot::records::{Prompt, Submission, SubmissionKind, format_timestamp};

pub const OPERATOR_GREETING: &str = "Welcome back, operator.";
pub const PARTICIPANT_GREETING: &str = "Welcome to the prompt desk. Pick an option below.";
pub const INVALID_OPTION: &str = "Please pick one of the listed options.";

pub const ASK_NEW_PROMPT: &str = "Send the new prompt here.";
pub const PROMPT_SAVED: &str = "The new prompt is live.";
pub const NOTHING_TO_STOP: &str = "There is no current prompt to stop.";
pub const ASK_INFO: &str = "Send the new info note here.";
pub const INFO_SAVED: &str = "The info note was saved.";

pub const NO_PROMPTS: &str = "There are no prompts yet.";
pub const CHOOSE_PROMPT: &str = "Choose a prompt to see its answers:";
pub const NO_COMMENTS: &str = "There are no comments yet.";
pub const COMMENTS_END: &str = "Those are all the comments so far.";
pub const NO_QUESTIONS: &str = "Nobody has asked a question yet.";
pub const QUESTIONS_END: &str = "Those are the questions sent by participants.";

pub const NOTHING_TO_DELETE: &str = "There are no prompts or submissions to delete.";
pub const CHOOSE_DELETE: &str = "Choose what to delete:";
pub const DELETED: &str = "Deleted.";
pub const ALREADY_GONE: &str = "That item no longer exists.";

pub const NO_PROMPT_OPEN: &str = "No prompt is open right now. Check back later.";
pub const NO_CURRENT_PROMPT: &str = "There is no current prompt.";
pub const ASK_ANSWER: &str = "Send your answer here.";
pub const ANSWER_SAVED: &str = "Your answer was received. Thank you!";
pub const ASK_COMMENT: &str = "Send your comment here.";
pub const COMMENT_SAVED: &str = "Your comment was received. Thank you!";
pub const ASK_QUESTION: &str = "Send your question here.";
pub const QUESTION_SAVED: &str = "Your question was received. Thank you!";

pub const NO_INFO: &str = "There is no info yet.";
pub const INFO_END: &str = "That is the latest info from the organizers.";
pub const NO_PAST_PROMPTS: &str = "There are no past prompts.";
pub const PAST_PROMPTS_END: &str = "Those are the past prompts.";

pub fn prompt_stopped(prompt: &Prompt) -> String {
    format!("Stopped the prompt \"{}\".", prompt.text)
}

pub fn current_prompt(prompt: &Prompt) -> String {
    format!("Current prompt:\n{}", prompt.text)
}

pub fn past_prompt(prompt: &Prompt) -> String {
    format!("Prompt: {}\nTime: {}", prompt.text, prompt.period())
}

pub fn no_answers(prompt_text: &str) -> String {
    format!("There are no answers to \"{}\".", prompt_text)
}

pub fn answers_end(prompt_text: &str) -> String {
    format!("Those are the answers to \"{}\".", prompt_text)
}

/// Details sent after a forwarded submission.
pub fn submission_details(kind: SubmissionKind, s: &Submission) -> String {
    format!(
        "{}: {}\nFrom: {}\nTime: {}",
        kind.title(),
        s.text,
        s.author(),
        format_timestamp(&s.timestamp)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_submission_details() {
        let s = Submission {
            author_id: 1,
            author_display_name: Some("alice".to_string()),
            conversation_id: Some(1),
            source_message_id: 5,
            text: "42".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap(),
            prompt_id: Some("u1".to_string()),
        };
        assert_eq!(
            submission_details(SubmissionKind::Answer, &s),
            "Answer: 42\nFrom: alice\nTime: 2024-03-01 09:05:07"
        );
    }
}
