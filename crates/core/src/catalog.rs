use crate::{facts::FactSet, math::OperatorTable};

pub const SKILL_NAME: &str = "Math Whiz";
pub const WELCOME: &str = "Welcome to Math Whiz. ";
pub const INSTRUCTIONS: &str = "You can say 'tell me a fact' or 'what is 1 plus 1'";
pub const REPROMPT_PREFIX: &str = "Sorry, I didn't get that. ";

/// Fixed prompts spoken by the skill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillContent {
    pub skill_name: String,
    pub welcome: String,
    pub instructions: String,
    pub reprompt_prefix: String,
}

impl SkillContent {
    pub fn greeting(&self) -> String {
        format!("{}{}", self.welcome, self.instructions)
    }
}

impl Default for SkillContent {
    fn default() -> Self {
        Self {
            skill_name: SKILL_NAME.to_owned(),
            welcome: WELCOME.to_owned(),
            instructions: INSTRUCTIONS.to_owned(),
            reprompt_prefix: REPROMPT_PREFIX.to_owned(),
        }
    }
}

/// Everything the router reads while serving requests. Built once at startup and
/// shared behind an `Arc`; nothing in it is mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillCatalog {
    pub content: SkillContent,
    pub facts: FactSet,
    pub operators: OperatorTable,
}

impl SkillCatalog {
    pub fn new(content: SkillContent, facts: FactSet, operators: OperatorTable) -> Self {
        Self { content, facts, operators }
    }
}
