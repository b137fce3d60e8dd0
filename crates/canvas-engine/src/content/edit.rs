//! Edit commands for card content
//!
//! Each field of a payload has its own command with its own validation,
//! instead of patching fields by name.

use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use super::{ChannelId, ContentPayload};

const MAX_TITLE_CHARS: usize = 200;
const MAX_SUBJECT_CHARS: usize = 150;
const MAX_BODY_CHARS: usize = 100_000;

/// A single user edit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "camelCase")]
pub enum EditCommand {
    SetTitle(String),
    SetSubject(Option<String>),
    SetBody(String),
    SetChannels(Vec<ChannelId>),
    SetRichFormat(bool),
}

/// Where an applied edit landed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditOutcome {
    /// The lane's live payload was replaced
    BaseReplaced,
    /// A history entry was being viewed; the edit forked a new entry
    Forked { history_index: usize },
}

impl EditCommand {
    /// Check the command's value without applying it
    pub fn validate(&self) -> Result<(), ContentError> {
        match self {
            EditCommand::SetTitle(title) => {
                if title.trim().is_empty() {
                    return Err(invalid("title must not be empty"));
                }
                if title.chars().count() > MAX_TITLE_CHARS {
                    return Err(invalid(format!("title longer than {MAX_TITLE_CHARS} characters")));
                }
            }
            EditCommand::SetSubject(Some(subject)) => {
                if subject.chars().count() > MAX_SUBJECT_CHARS {
                    return Err(invalid(format!("subject longer than {MAX_SUBJECT_CHARS} characters")));
                }
            }
            EditCommand::SetSubject(None) | EditCommand::SetRichFormat(_) => {}
            EditCommand::SetBody(body) => {
                if body.chars().count() > MAX_BODY_CHARS {
                    return Err(invalid(format!("body longer than {MAX_BODY_CHARS} characters")));
                }
            }
            EditCommand::SetChannels(channels) => {
                if channels.is_empty() {
                    return Err(invalid("at least one channel is required"));
                }
                if channels.iter().any(|c| c.trim().is_empty()) {
                    return Err(invalid("channel ids must not be empty"));
                }
                let mut seen = channels.clone();
                seen.sort();
                seen.dedup();
                if seen.len() != channels.len() {
                    return Err(invalid("duplicate channel"));
                }
            }
        }
        Ok(())
    }

    /// Build the edited payload, leaving `payload` untouched
    pub fn apply(&self, payload: &ContentPayload) -> Result<ContentPayload, ContentError> {
        self.validate()?;
        let mut next = payload.clone();
        match self {
            EditCommand::SetTitle(title) => next.title = title.trim().to_string(),
            EditCommand::SetSubject(subject) => next.subject = subject.clone(),
            EditCommand::SetBody(body) => next.body = body.clone(),
            EditCommand::SetChannels(channels) => next.channels = channels.clone(),
            EditCommand::SetRichFormat(rich) => next.is_rich_format = *rich,
        }
        Ok(next)
    }
}

fn invalid(reason: impl Into<String>) -> ContentError {
    ContentError::InvalidEdit(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContentPayload {
        ContentPayload::plain("Spring sale", "Save 20% this week.", "sms")
    }

    #[test]
    fn test_apply_builds_new_payload() {
        let original = sample();
        let edited = EditCommand::SetTitle("  Summer sale ".to_string()).apply(&original).unwrap();
        assert_eq!(edited.title, "Summer sale");
        assert_eq!(original.title, "Spring sale");
        assert_eq!(edited.body, original.body);
    }

    #[test]
    fn test_rejects_blank_title() {
        let err = EditCommand::SetTitle("   ".to_string()).apply(&sample()).unwrap_err();
        assert!(matches!(err, ContentError::InvalidEdit(_)));
    }

    #[test]
    fn test_rejects_long_subject() {
        let cmd = EditCommand::SetSubject(Some("x".repeat(151)));
        assert!(cmd.validate().is_err());
        assert!(EditCommand::SetSubject(None).validate().is_ok());
    }

    #[test]
    fn test_channel_validation() {
        assert!(EditCommand::SetChannels(vec![]).validate().is_err());
        assert!(EditCommand::SetChannels(vec!["email".into(), "email".into()]).validate().is_err());
        assert!(EditCommand::SetChannels(vec!["email".into(), "sms".into()]).validate().is_ok());
    }

    #[test]
    fn test_command_json_shape() {
        let cmd: EditCommand = serde_json::from_str(r#"{"command":"setBody","value":"Hello"}"#).unwrap();
        assert_eq!(cmd, EditCommand::SetBody("Hello".to_string()));
    }
}
