#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseKind {
    Ask,
    Tell,
}

/// Platform-neutral description of what to say back for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseIntent {
    pub speech_text: String,
    pub card_title: String,
    pub card_text: String,
    pub end_session: bool,
    pub reprompt_text: Option<String>,
}

impl ResponseIntent {
    /// Keeps the session open and re-prompts on silence.
    pub fn ask(
        card_title: impl Into<String>,
        speech_text: impl Into<String>,
        reprompt_text: impl Into<String>,
    ) -> Self {
        let speech_text = speech_text.into();
        Self {
            card_text: speech_text.clone(),
            speech_text,
            card_title: card_title.into(),
            end_session: false,
            reprompt_text: Some(reprompt_text.into()),
        }
    }

    pub fn tell(
        card_title: impl Into<String>,
        speech_text: impl Into<String>,
        end_session: bool,
    ) -> Self {
        let speech_text = speech_text.into();
        Self {
            card_text: speech_text.clone(),
            speech_text,
            card_title: card_title.into(),
            end_session,
            reprompt_text: None,
        }
    }

    pub fn kind(&self) -> ResponseKind {
        if self.reprompt_text.is_some() {
            ResponseKind::Ask
        } else {
            ResponseKind::Tell
        }
    }
}
