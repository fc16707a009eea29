use mathwhiz_core::{ResponseIntent, SkillContent, SkillError};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    PlainText { text: String },
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::PlainText { text } => text,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Card {
    Simple { title: String, content: String },
}

impl Card {
    pub fn simple(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Simple { title: title.into(), content: content.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

/// Outbound JSON envelope returned to the voice platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub version: String,
    pub response: ResponseBody,
}

impl ResponseEnvelope {
    fn with_body(response: ResponseBody) -> Self {
        Self { version: "1.0".to_owned(), response }
    }

    pub fn speech_text(&self) -> Option<&str> {
        self.response.output_speech.as_ref().map(OutputSpeech::text)
    }

    pub fn reprompt_text(&self) -> Option<&str> {
        self.response.reprompt.as_ref().map(|reprompt| reprompt.output_speech.text())
    }
}

/// Shapes spoken text into "ask" and "tell" envelopes. Every envelope carries a
/// simple card titled with the skill name and mirroring the speech.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseBuilder {
    card_title: String,
    reprompt_prefix: String,
}

impl ResponseBuilder {
    pub fn new(card_title: impl Into<String>, reprompt_prefix: impl Into<String>) -> Self {
        Self { card_title: card_title.into(), reprompt_prefix: reprompt_prefix.into() }
    }

    pub fn from_content(content: &SkillContent) -> Self {
        Self::new(&content.skill_name, &content.reprompt_prefix)
    }

    pub fn ask(&self, speech_text: &str, reprompt_text: &str) -> ResponseEnvelope {
        ResponseEnvelope::with_body(ResponseBody {
            output_speech: Some(OutputSpeech::plain(speech_text)),
            card: Some(Card::simple(&self.card_title, speech_text)),
            reprompt: Some(Reprompt {
                output_speech: OutputSpeech::plain(format!(
                    "{}{reprompt_text}",
                    self.reprompt_prefix
                )),
            }),
            should_end_session: Some(false),
        })
    }

    pub fn tell(&self, speech_text: &str, end_session: bool) -> ResponseEnvelope {
        ResponseEnvelope::with_body(ResponseBody {
            output_speech: Some(OutputSpeech::plain(speech_text)),
            card: Some(Card::simple(&self.card_title, speech_text)),
            reprompt: None,
            should_end_session: Some(end_session),
        })
    }

    pub fn render(&self, intent: &ResponseIntent) -> ResponseEnvelope {
        let mut envelope = match &intent.reprompt_text {
            Some(reprompt_text) => self.ask(&intent.speech_text, reprompt_text),
            None => self.tell(&intent.speech_text, intent.end_session),
        };
        envelope.response.card = Some(Card::simple(&intent.card_title, &intent.card_text));
        envelope
    }

    /// Reply for a session end: nothing to say.
    pub fn acknowledgement(&self) -> ResponseEnvelope {
        ResponseEnvelope::with_body(ResponseBody::default())
    }

    /// Spoken fallback for a failed request. The session stays open so the user can retry.
    pub fn failure(&self, error: &SkillError) -> ResponseEnvelope {
        self.tell(error.user_message(), false)
    }
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::from_content(&SkillContent::default())
    }
}
