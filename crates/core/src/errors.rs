use thiserror::Error;

use crate::math::Operator;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("cannot divide {dividend} by zero")]
    DivisionByZero { dividend: i64 },
    #[error("`{first} {operator} {second}` overflows a 64-bit integer")]
    Overflow { first: i64, operator: Operator, second: i64 },
    #[error("`{literal}` in slot `{slot}` does not fit in a 64-bit integer")]
    OperandOutOfRange { slot: String, literal: String },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SkillError {
    #[error("unrecognized intent `{0}`")]
    UnrecognizedIntent(String),
    #[error("invalid argument in slot `{slot}`: {reason}")]
    InvalidArgument { slot: String, reason: String },
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

impl SkillError {
    /// Stable label for logs and structured command output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::UnrecognizedIntent(_) => "unrecognized_intent",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::Arithmetic(_) => "arithmetic",
        }
    }

    /// Speech that is safe to play back to the user in place of a normal answer.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnrecognizedIntent(_) => {
                "Sorry, I can't help with that. You can ask me for a fact or a math problem."
            }
            Self::InvalidArgument { .. } => {
                "Sorry, I didn't catch the numbers. Try asking something like 'what is 1 plus 1'."
            }
            Self::Arithmetic(ArithmeticError::DivisionByZero { .. }) => {
                "Dividing by zero is undefined, so there is no answer to that one."
            }
            Self::Arithmetic(ArithmeticError::Overflow { .. }) => {
                "That answer is too big for me to work out."
            }
            Self::Arithmetic(ArithmeticError::OperandOutOfRange { .. }) => {
                "That number is too big for me to work with."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ArithmeticError, SkillError};
    use crate::math::Operator;

    #[test]
    fn each_kind_has_a_distinct_error_class() {
        let classes = [
            SkillError::UnrecognizedIntent("PlayMusic".to_owned()).error_class(),
            SkillError::InvalidArgument { slot: "Operator".to_owned(), reason: "x".to_owned() }
                .error_class(),
            SkillError::from(ArithmeticError::DivisionByZero { dividend: 1 }).error_class(),
        ];

        assert_eq!(classes, ["unrecognized_intent", "invalid_argument", "arithmetic"]);
    }

    #[test]
    fn arithmetic_messages_distinguish_division_by_zero_from_overflow() {
        let zero = SkillError::from(ArithmeticError::DivisionByZero { dividend: 4 });
        let overflow = SkillError::from(ArithmeticError::Overflow {
            first: i64::MAX,
            operator: Operator::Plus,
            second: 1,
        });

        assert!(zero.user_message().contains("zero"));
        assert_ne!(zero.user_message(), overflow.user_message());
    }

    #[test]
    fn overflow_display_names_the_expression() {
        let error =
            ArithmeticError::Overflow { first: 2, operator: Operator::DividedBy, second: 3 };

        assert_eq!(error.to_string(), "`2 divided by 3` overflows a 64-bit integer");
    }

    #[test]
    fn out_of_range_operand_is_an_arithmetic_error_with_its_own_message() {
        let error = SkillError::from(ArithmeticError::OperandOutOfRange {
            slot: "FirstNumber".to_owned(),
            literal: "99999999999999999999".to_owned(),
        });
        let overflow = SkillError::from(ArithmeticError::Overflow {
            first: i64::MAX,
            operator: Operator::Times,
            second: 2,
        });

        assert_eq!(error.error_class(), "arithmetic");
        assert_ne!(error.user_message(), overflow.user_message());
        assert_eq!(
            error.to_string(),
            "`99999999999999999999` in slot `FirstNumber` does not fit in a 64-bit integer"
        );
    }
}
