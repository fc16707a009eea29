use std::collections::HashMap;
use std::fmt;

pub type Slots = HashMap<String, String>;

/// A single normalized platform request. Carries nothing across calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkillRequest {
    Launch,
    Intent { name: String, slots: Slots },
    SessionEnded,
}

impl SkillRequest {
    pub fn intent(name: impl Into<String>) -> Self {
        Self::Intent { name: name.into(), slots: Slots::new() }
    }

    pub fn intent_with_slots<I, K, V>(name: impl Into<String>, slots: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Intent {
            name: name.into(),
            slots: slots.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Launch => "launch",
            Self::Intent { .. } => "intent",
            Self::SessionEnded => "session_ended",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntentName {
    GetFact,
    DoMath,
    Help,
}

impl IntentName {
    pub const ALL: [IntentName; 3] = [Self::GetFact, Self::DoMath, Self::Help];

    /// Name registered in the platform interaction model.
    pub fn platform_name(self) -> &'static str {
        match self {
            Self::GetFact => "GetFactIntent",
            Self::DoMath => "DoMathIntent",
            Self::Help => "AMAZON.HelpIntent",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Self::GetFact => "GetFact",
            Self::DoMath => "DoMath",
            Self::Help => "Help",
        }
    }

    /// Accepts either the short or the platform spelling; anything else is unknown.
    pub fn resolve(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|intent| intent.platform_name() == name || intent.short_name() == name)
    }
}

impl fmt::Display for IntentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.platform_name())
    }
}
