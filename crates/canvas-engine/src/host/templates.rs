//! Template catalog

use serde::{Deserialize, Serialize};
use crate::content::{ChannelId, ContentPayload};

/// Fixed content the pipeline fills in
///
/// `{topic}` in the title, subject or body is replaced by the request's
/// input text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    /// Channel the template was written for, if any
    pub channel_affinity: Option<ChannelId>,
    pub payload: ContentPayload,
}

impl Template {
    /// Instantiate for a topic
    pub fn render(&self, topic: &str) -> ContentPayload {
        let topic = topic.trim();
        let topic = if topic.is_empty() { "our latest launch" } else { topic };
        let fill = |s: &str| s.replace("{topic}", topic);
        ContentPayload {
            title: fill(&self.payload.title),
            subject: self.payload.subject.as_deref().map(fill),
            body: fill(&self.payload.body),
            channels: self.payload.channels.clone(),
            is_rich_format: self.payload.is_rich_format,
        }
    }
}

/// Static template lookup
pub trait TemplateCatalog {
    fn find(&self, id: &str) -> Option<&Template>;

    /// Template used when nothing more specific exists
    fn default_template(&self) -> &Template;
}

/// Templates compiled into the crate
///
/// Ids follow `{channel}-v{n}`; `generic-v{n}` covers channels without
/// their own copy. The first template is the default.
#[derive(Clone, Debug)]
pub struct BuiltinCatalog {
    templates: Vec<Template>,
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinCatalog {
    pub fn new() -> Self {
        Self::from_templates(builtin_templates())
    }

    /// Catalog from explicit templates. The list must not be empty.
    pub fn from_templates(templates: Vec<Template>) -> Self {
        assert!(!templates.is_empty(), "template catalog needs a default template");
        Self { templates }
    }

    /// All templates in catalog order
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }
}

impl TemplateCatalog for BuiltinCatalog {
    fn find(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    fn default_template(&self) -> &Template {
        &self.templates[0]
    }
}

fn plain(id: &str, channel: Option<&str>, title: &str, body: &str) -> Template {
    Template {
        id: id.to_string(),
        channel_affinity: channel.map(str::to_string),
        payload: ContentPayload::plain(title, body, channel.unwrap_or_default()),
    }
}

fn rich(id: &str, channel: &str, title: &str, subject: &str, body: &str) -> Template {
    Template {
        id: id.to_string(),
        channel_affinity: Some(channel.to_string()),
        payload: ContentPayload::rich(title, body, channel).with_subject(subject),
    }
}

fn builtin_templates() -> Vec<Template> {
    vec![
        plain(
            "generic-v1",
            None,
            "Announcing {topic}",
            "Big news: {topic} is here. Discover what's new and see how it helps you work smarter.",
        ),
        plain(
            "generic-v2",
            None,
            "Meet {topic}",
            "Say hello to {topic}. Built around your feedback and ready for you today.",
        ),
        rich(
            "email-v1",
            "email",
            "Launch email",
            "Introducing {topic}",
            "<h1>Introducing {topic}</h1>\n\
             <p>Hi there,</p>\n\
             <p>We've been working on something new, and today it's ready.</p>\n\
             <p>{topic} brings everything you need into one place.</p>\n\
             <ul>\n\
             <li>Faster setup</li>\n\
             <li>Clearer insights</li>\n\
             <li>Support when you need it</li>\n\
             </ul>\n\
             <p><a href=\"#\">Get started</a></p>\n\
             <p>Cheers,<br>The team</p>",
        ),
        rich(
            "email-v2",
            "email",
            "Story email",
            "{topic}: made for you",
            "<h1>{topic}, made for you</h1>\n\
             <p>Hello,</p>\n\
             <p>Last year our customers told us what slowed them down.</p>\n\
             <p>{topic} is our answer.</p>\n\
             <p>Read how teams are already saving hours every week.</p>\n\
             <p><a href=\"#\">See the stories</a></p>\n\
             <p>Best regards,<br>The team</p>",
        ),
        plain(
            "sms-v1",
            Some("sms"),
            "SMS blast",
            "{topic} is live! Tap to learn more. Reply STOP to opt out.",
        ),
        plain(
            "sms-v2",
            Some("sms"),
            "SMS reminder",
            "Don't miss {topic}. Limited-time offer inside. Reply STOP to opt out.",
        ),
        plain(
            "linkedin-v1",
            Some("linkedin"),
            "LinkedIn post",
            "We're proud to announce {topic}.\nIt's the result of months of work with our customers.\n#launch #product",
        ),
        plain(
            "linkedin-v2",
            Some("linkedin"),
            "LinkedIn thought piece",
            "What does great work look like in 2025?\nFor us, it starts with {topic}.\nHere's what we learned building it.",
        ),
        plain(
            "twitter-v1",
            Some("twitter"),
            "Post",
            "{topic} just dropped. Faster, simpler, yours. 🚀",
        ),
        plain(
            "twitter-v2",
            Some("twitter"),
            "Thread opener",
            "We rebuilt our product from the ground up. Meet {topic} 🧵",
        ),
        plain(
            "facebook-v1",
            Some("facebook"),
            "Facebook post",
            "Exciting news! {topic} is now available. Tell us what you think in the comments.",
        ),
        plain(
            "facebook-v2",
            Some("facebook"),
            "Facebook event",
            "Join us live this Friday as we walk through {topic} step by step.",
        ),
        plain(
            "instagram-v1",
            Some("instagram"),
            "Instagram caption",
            "New drop: {topic} ✨ Link in bio.",
        ),
        plain(
            "instagram-v2",
            Some("instagram"),
            "Instagram carousel",
            "Swipe to see 5 ways {topic} changes your day →",
        ),
        plain(
            "whatsapp-v1",
            Some("whatsapp"),
            "WhatsApp broadcast",
            "Hi! {topic} is here. Reply YES to get early access.",
        ),
        plain(
            "whatsapp-v2",
            Some("whatsapp"),
            "WhatsApp follow-up",
            "Quick reminder: early access to {topic} closes soon.",
        ),
    ]
}
