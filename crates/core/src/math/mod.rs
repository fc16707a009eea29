use std::collections::HashMap;
use std::fmt;
use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};

use crate::errors::{ArithmeticError, SkillError};

pub const FIRST_NUMBER_SLOT: &str = "FirstNumber";
pub const OPERATOR_SLOT: &str = "Operator";
pub const SECOND_NUMBER_SLOT: &str = "SecondNumber";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Plus,
    Minus,
    Times,
    DividedBy,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Self::Plus, Self::Minus, Self::Times, Self::DividedBy];

    /// The spoken keyword the interaction model delivers in the `Operator` slot.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Times => "times",
            Self::DividedBy => "divided by",
        }
    }

    /// Applies the operator to `(first, second)` in that order.
    ///
    /// Division truncates toward zero. Overflow and a zero divisor are reported
    /// instead of wrapping or panicking.
    pub fn apply(self, first: i64, second: i64) -> Result<i64, ArithmeticError> {
        let result = match self {
            Self::Plus => first.checked_add(second),
            Self::Minus => first.checked_sub(second),
            Self::Times => first.checked_mul(second),
            Self::DividedBy => {
                if second == 0 {
                    return Err(ArithmeticError::DivisionByZero { dividend: first });
                }
                first.checked_div(second)
            }
        };

        result.ok_or(ArithmeticError::Overflow { first, operator: self, second })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Keyword lookup for the math intent. Built once and shared read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorTable {
    keywords: HashMap<String, Operator>,
}

impl OperatorTable {
    pub fn empty() -> Self {
        Self { keywords: HashMap::new() }
    }

    pub fn standard() -> Self {
        Operator::ALL.into_iter().fold(Self::empty(), |table, operator| {
            table.with_keyword(operator.keyword(), operator)
        })
    }

    pub fn with_keyword(mut self, keyword: impl AsRef<str>, operator: Operator) -> Self {
        self.keywords.insert(normalize_keyword(keyword.as_ref()), operator);
        self
    }

    pub fn lookup(&self, keyword: &str) -> Option<Operator> {
        self.keywords.get(&normalize_keyword(keyword)).copied()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalize_keyword(keyword: &str) -> String {
    keyword.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_lowercase()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MathQuestion {
    pub first: i64,
    pub operator: Operator,
    pub second: i64,
}

impl MathQuestion {
    /// Reads the three math slots. Every failure names the offending slot.
    pub fn from_slots(
        slots: &HashMap<String, String>,
        operators: &OperatorTable,
    ) -> Result<Self, SkillError> {
        let first = parse_number_slot(slots, FIRST_NUMBER_SLOT)?;
        let keyword = required_slot(slots, OPERATOR_SLOT)?;
        let operator = operators.lookup(keyword).ok_or_else(|| SkillError::InvalidArgument {
            slot: OPERATOR_SLOT.to_owned(),
            reason: format!("unknown operator keyword `{keyword}`"),
        })?;
        let second = parse_number_slot(slots, SECOND_NUMBER_SLOT)?;

        Ok(Self { first, operator, second })
    }

    pub fn answer(&self) -> Result<i64, ArithmeticError> {
        self.operator.apply(self.first, self.second)
    }
}

fn required_slot<'a>(
    slots: &'a HashMap<String, String>,
    slot: &str,
) -> Result<&'a str, SkillError> {
    slots.get(slot).map(String::as_str).filter(|value| !value.trim().is_empty()).ok_or_else(
        || SkillError::InvalidArgument {
            slot: slot.to_owned(),
            reason: "slot has no value".to_owned(),
        },
    )
}

/// An integer literal too wide for i64 is an arithmetic overflow, not a malformed argument.
fn parse_number_slot(slots: &HashMap<String, String>, slot: &str) -> Result<i64, SkillError> {
    let raw = required_slot(slots, slot)?;
    let literal = raw.trim();
    literal.parse::<i64>().map_err(|error| match error.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            SkillError::Arithmetic(ArithmeticError::OperandOutOfRange {
                slot: slot.to_owned(),
                literal: literal.to_owned(),
            })
        }
        _ => SkillError::InvalidArgument {
            slot: slot.to_owned(),
            reason: format!("`{raw}` is not an integer"),
        },
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{MathQuestion, Operator, OperatorTable};
    use crate::errors::{ArithmeticError, SkillError};

    fn slots(first: &str, operator: &str, second: &str) -> HashMap<String, String> {
        HashMap::from([
            ("FirstNumber".to_owned(), first.to_owned()),
            ("Operator".to_owned(), operator.to_owned()),
            ("SecondNumber".to_owned(), second.to_owned()),
        ])
    }

    fn read_question(slots: &HashMap<String, String>) -> Result<MathQuestion, SkillError> {
        MathQuestion::from_slots(slots, &OperatorTable::standard())
    }

    #[test]
    fn operators_preserve_operand_order() {
        assert_eq!(Operator::Plus.apply(7, 3), Ok(10));
        assert_eq!(Operator::Minus.apply(7, 3), Ok(4));
        assert_eq!(Operator::Minus.apply(3, 7), Ok(-4));
        assert_eq!(Operator::Times.apply(-7, 3), Ok(-21));
        assert_eq!(Operator::DividedBy.apply(12, 4), Ok(3));
        assert_eq!(Operator::DividedBy.apply(4, 12), Ok(0));
    }

    #[test]
    fn division_truncates_toward_zero() {
        assert_eq!(Operator::DividedBy.apply(7, 2), Ok(3));
        assert_eq!(Operator::DividedBy.apply(-7, 2), Ok(-3));
        assert_eq!(Operator::DividedBy.apply(7, -2), Ok(-3));
        assert_eq!(Operator::DividedBy.apply(-7, -2), Ok(3));
    }

    #[test]
    fn division_by_zero_is_reported() {
        assert_eq!(
            Operator::DividedBy.apply(5, 0),
            Err(ArithmeticError::DivisionByZero { dividend: 5 })
        );
        assert_eq!(
            Operator::DividedBy.apply(0, 0),
            Err(ArithmeticError::DivisionByZero { dividend: 0 })
        );
    }

    #[test]
    fn overflow_is_reported_for_every_operator() {
        assert!(matches!(
            Operator::Plus.apply(i64::MAX, 1),
            Err(ArithmeticError::Overflow { operator: Operator::Plus, .. })
        ));
        assert!(matches!(
            Operator::Minus.apply(i64::MIN, 1),
            Err(ArithmeticError::Overflow { operator: Operator::Minus, .. })
        ));
        assert!(matches!(
            Operator::Times.apply(i64::MAX, 2),
            Err(ArithmeticError::Overflow { operator: Operator::Times, .. })
        ));
        assert!(matches!(
            Operator::DividedBy.apply(i64::MIN, -1),
            Err(ArithmeticError::Overflow { operator: Operator::DividedBy, .. })
        ));
    }

    #[test]
    fn standard_table_knows_the_four_keywords() {
        let table = OperatorTable::standard();

        assert_eq!(table.len(), 4);
        assert_eq!(table.lookup("plus"), Some(Operator::Plus));
        assert_eq!(table.lookup("minus"), Some(Operator::Minus));
        assert_eq!(table.lookup("times"), Some(Operator::Times));
        assert_eq!(table.lookup("divided by"), Some(Operator::DividedBy));
        assert_eq!(table.lookup("modulo"), None);
    }

    #[test]
    fn lookup_ignores_case_and_spacing() {
        let table = OperatorTable::standard();

        assert_eq!(table.lookup("  Divided   BY "), Some(Operator::DividedBy));
        assert_eq!(table.lookup("PLUS"), Some(Operator::Plus));
    }

    #[test]
    fn aliases_extend_a_table_without_touching_the_standard_one() {
        let table = OperatorTable::standard().with_keyword("multiplied by", Operator::Times);

        assert_eq!(table.lookup("multiplied by"), Some(Operator::Times));
        assert_eq!(OperatorTable::standard().lookup("multiplied by"), None);
    }

    #[test]
    fn question_reads_slots_in_order() {
        let question = read_question(&slots("9", "minus", "4")).expect("valid slots");

        assert_eq!(question, MathQuestion { first: 9, operator: Operator::Minus, second: 4 });
        assert_eq!(question.answer(), Ok(5));
    }

    #[test]
    fn question_accepts_signed_and_padded_numbers() {
        let question = read_question(&slots(" -12 ", "plus", "+3")).expect("valid slots");

        assert_eq!(question.answer(), Ok(-9));
    }

    #[test]
    fn non_numeric_slot_is_an_invalid_argument() {
        let error = read_question(&slots("notanumber", "plus", "2")).expect_err("non numeric");

        assert!(matches!(
            error,
            SkillError::InvalidArgument { ref slot, ref reason }
                if slot == "FirstNumber" && reason == "`notanumber` is not an integer"
        ));
    }

    #[test]
    fn out_of_range_literal_is_an_arithmetic_error() {
        let error =
            read_question(&slots("99999999999999999999", "plus", "1")).expect_err("too wide");

        assert_eq!(
            error,
            SkillError::Arithmetic(ArithmeticError::OperandOutOfRange {
                slot: "FirstNumber".to_owned(),
                literal: "99999999999999999999".to_owned(),
            })
        );
    }

    #[test]
    fn negative_out_of_range_literal_is_an_arithmetic_error() {
        let error = read_question(&slots("4", "minus", " -9223372036854775809 "))
            .expect_err("too wide");

        assert!(matches!(
            error,
            SkillError::Arithmetic(ArithmeticError::OperandOutOfRange { ref slot, ref literal })
                if slot == "SecondNumber" && literal == "-9223372036854775809"
        ));
    }

    #[test]
    fn i64_bounds_parse_as_operands() {
        let question = read_question(&slots("-9223372036854775808", "plus", "9223372036854775807"))
            .expect("fits");

        assert_eq!(question.answer(), Ok(-1));
    }

    #[test]
    fn unrecognized_number_placeholder_is_an_invalid_argument() {
        let error = read_question(&slots("3", "plus", "?")).expect_err("placeholder second number");

        assert!(matches!(
            error,
            SkillError::InvalidArgument { ref slot, .. } if slot == "SecondNumber"
        ));
    }

    #[test]
    fn unknown_operator_is_an_invalid_argument() {
        let error =
            read_question(&slots("3", "to the power of", "2")).expect_err("unknown operator");

        assert!(matches!(
            error,
            SkillError::InvalidArgument { ref slot, .. } if slot == "Operator"
        ));
    }

    #[test]
    fn missing_slot_is_an_invalid_argument() {
        let mut partial = slots("3", "plus", "2");
        partial.remove("SecondNumber");

        let error = read_question(&partial).expect_err("missing second number");

        assert!(matches!(
            error,
            SkillError::InvalidArgument { ref slot, ref reason }
                if slot == "SecondNumber" && reason == "slot has no value"
        ));
    }
}
