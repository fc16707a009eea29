use std::sync::Arc;

use crate::{
    catalog::SkillCatalog,
    domain::{
        request::{IntentName, SkillRequest, Slots},
        response::ResponseIntent,
    },
    errors::SkillError,
    facts::{FactSelector, ThreadRngSelector},
    math::MathQuestion,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    Respond(ResponseIntent),
    /// Session end: nothing is spoken.
    Acknowledged,
}

impl RouteOutcome {
    pub fn response(&self) -> Option<&ResponseIntent> {
        match self {
            Self::Respond(response) => Some(response),
            Self::Acknowledged => None,
        }
    }
}

/// Maps one request to one response. Holds only read-only shared data, so a single
/// router can serve concurrent requests.
pub struct IntentRouter<S = ThreadRngSelector> {
    catalog: Arc<SkillCatalog>,
    selector: S,
}

impl IntentRouter<ThreadRngSelector> {
    pub fn new(catalog: Arc<SkillCatalog>) -> Self {
        Self::with_selector(catalog, ThreadRngSelector)
    }
}

impl Default for IntentRouter<ThreadRngSelector> {
    fn default() -> Self {
        Self::new(Arc::new(SkillCatalog::default()))
    }
}

impl<S> IntentRouter<S>
where
    S: FactSelector,
{
    pub fn with_selector(catalog: Arc<SkillCatalog>, selector: S) -> Self {
        Self { catalog, selector }
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    pub fn handle(&self, request: &SkillRequest) -> Result<RouteOutcome, SkillError> {
        match request {
            SkillRequest::Launch => Ok(RouteOutcome::Respond(self.greeting())),
            SkillRequest::Intent { name, slots } => {
                let intent = IntentName::resolve(name)
                    .ok_or_else(|| SkillError::UnrecognizedIntent(name.clone()))?;
                self.handle_intent(intent, slots).map(RouteOutcome::Respond)
            }
            SkillRequest::SessionEnded => Ok(RouteOutcome::Acknowledged),
        }
    }

    fn handle_intent(
        &self,
        intent: IntentName,
        slots: &Slots,
    ) -> Result<ResponseIntent, SkillError> {
        match intent {
            IntentName::GetFact => Ok(self.fact()),
            IntentName::DoMath => self.math(slots),
            IntentName::Help => Ok(self.greeting()),
        }
    }

    fn greeting(&self) -> ResponseIntent {
        let content = &self.catalog.content;
        ResponseIntent::ask(&content.skill_name, content.greeting(), &content.instructions)
    }

    fn fact(&self) -> ResponseIntent {
        let fact = self.catalog.facts.pick(&self.selector);
        ResponseIntent::tell(&self.catalog.content.skill_name, fact, false)
    }

    fn math(&self, slots: &Slots) -> Result<ResponseIntent, SkillError> {
        let question = MathQuestion::from_slots(slots, &self.catalog.operators)?;
        let answer = question.answer()?;
        Ok(ResponseIntent::tell(
            &self.catalog.content.skill_name,
            format!("The answer is {answer}"),
            false,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::{IntentRouter, RouteOutcome};
    use crate::{
        catalog::SkillCatalog,
        domain::{request::SkillRequest, response::ResponseKind},
        errors::{ArithmeticError, SkillError},
        facts::{FactSelector, FactSet, FixedSelector, SeededSelector},
        math::{Operator, OperatorTable},
    };

    fn math(first: &str, operator: &str, second: &str) -> SkillRequest {
        SkillRequest::intent_with_slots(
            "DoMathIntent",
            [("FirstNumber", first), ("Operator", operator), ("SecondNumber", second)],
        )
    }

    fn speech(router: &IntentRouter<impl FactSelector>, request: &SkillRequest) -> String {
        match router.handle(request).expect("request should route") {
            RouteOutcome::Respond(response) => response.speech_text,
            RouteOutcome::Acknowledged => panic!("expected a spoken response"),
        }
    }

    #[test]
    fn launch_asks_with_welcome_and_instructions() {
        let router = IntentRouter::default();

        let outcome = router.handle(&SkillRequest::Launch).expect("launch");
        let response = outcome.response().expect("launch speaks");

        assert_eq!(response.kind(), ResponseKind::Ask);
        assert_eq!(
            response.speech_text,
            "Welcome to Math Whiz. You can say 'tell me a fact' or 'what is 1 plus 1'"
        );
        assert_eq!(
            response.reprompt_text.as_deref(),
            Some("You can say 'tell me a fact' or 'what is 1 plus 1'")
        );
        assert_eq!(response.card_title, "Math Whiz");
        assert!(!response.end_session);
    }

    #[test]
    fn help_matches_launch_exactly() {
        let router = IntentRouter::default();

        let launch = router.handle(&SkillRequest::Launch).expect("launch");
        let help = router.handle(&SkillRequest::intent("AMAZON.HelpIntent")).expect("help");
        let short_help = router.handle(&SkillRequest::intent("Help")).expect("help");

        assert_eq!(launch, help);
        assert_eq!(launch, short_help);
    }

    #[test]
    fn math_answers_every_operator_in_slot_order() {
        let router = IntentRouter::default();
        let pairs = [(7_i64, 3_i64), (3, 7), (-12, 5), (0, 9), (100, -8), (-6, -4)];

        for operator in Operator::ALL {
            for (a, b) in pairs {
                let expected = match operator {
                    Operator::Plus => a + b,
                    Operator::Minus => a - b,
                    Operator::Times => a * b,
                    Operator::DividedBy => a / b,
                };
                let request = math(&a.to_string(), operator.keyword(), &b.to_string());
                let text = speech(&router, &request);

                assert_eq!(text, format!("The answer is {expected}"), "{a} {operator} {b}");
            }
        }
    }

    #[test]
    fn math_is_a_tell_that_keeps_the_session_open() {
        let router = IntentRouter::default();

        let outcome = router.handle(&math("1", "plus", "1")).expect("math");
        let response = outcome.response().expect("math speaks");

        assert_eq!(response.kind(), ResponseKind::Tell);
        assert!(!response.end_session);
        assert_eq!(response.card_text, "The answer is 2");
    }

    #[test]
    fn division_by_zero_is_an_arithmetic_error() {
        let router = IntentRouter::default();

        for _ in 0..3 {
            let error = router.handle(&math("8", "divided by", "0")).expect_err("zero divisor");
            assert_eq!(
                error,
                SkillError::Arithmetic(ArithmeticError::DivisionByZero { dividend: 8 })
            );
        }
    }

    #[test]
    fn overflowing_math_is_an_arithmetic_error() {
        let router = IntentRouter::default();

        let error = router
            .handle(&math(&i64::MAX.to_string(), "times", "2"))
            .expect_err("overflow");

        assert!(matches!(error, SkillError::Arithmetic(ArithmeticError::Overflow { .. })));
    }

    #[test]
    fn operand_wider_than_i64_is_an_arithmetic_error() {
        let router = IntentRouter::default();

        let error = router
            .handle(&math("99999999999999999999", "plus", "1"))
            .expect_err("operand out of range");

        assert_eq!(error.error_class(), "arithmetic");
        assert!(matches!(
            error,
            SkillError::Arithmetic(ArithmeticError::OperandOutOfRange { ref slot, .. })
                if slot == "FirstNumber"
        ));
    }

    #[test]
    fn malformed_number_is_an_invalid_argument() {
        let router = IntentRouter::default();

        let error = router.handle(&math("notanumber", "plus", "2")).expect_err("bad number");

        assert!(matches!(error, SkillError::InvalidArgument { .. }));
    }

    #[test]
    fn unknown_intent_is_unrecognized() {
        let router = IntentRouter::default();

        let error = router.handle(&SkillRequest::intent("unknown")).expect_err("unknown intent");

        assert_eq!(error, SkillError::UnrecognizedIntent("unknown".to_owned()));
    }

    #[test]
    fn session_end_is_acknowledged_without_speech() {
        let router = IntentRouter::default();

        let outcome = router.handle(&SkillRequest::SessionEnded).expect("session end");

        assert_eq!(outcome, RouteOutcome::Acknowledged);
        assert!(outcome.response().is_none());
    }

    #[test]
    fn math_is_idempotent() {
        let router = IntentRouter::default();
        let request = math("144", "divided by", "12");

        let first = router.handle(&request).expect("math");
        for _ in 0..10 {
            assert_eq!(router.handle(&request).expect("math"), first);
        }
    }

    #[test]
    fn fact_is_a_verbatim_entry_and_keeps_the_session_open() {
        let router = IntentRouter::default();
        let facts = FactSet::standard();

        for _ in 0..50 {
            let outcome = router.handle(&SkillRequest::intent("GetFactIntent")).expect("fact");
            let response = outcome.response().expect("fact speaks");

            let text = &response.speech_text;
            assert!(facts.contains(text), "unexpected fact {text}");
            assert_eq!(response.kind(), ResponseKind::Tell);
            assert!(!response.end_session);
        }
    }

    fn assert_uniform_facts(
        router: &IntentRouter<impl FactSelector>,
        draws: usize,
        tolerance: f64,
    ) {
        let mut counts: HashMap<String, usize> = HashMap::new();

        for _ in 0..draws {
            let text = speech(router, &SkillRequest::intent("GetFact"));
            *counts.entry(text).or_default() += 1;
        }

        let expected = draws / FactSet::standard().len();
        assert_eq!(counts.len(), 3, "every fact should be drawn");
        for (fact, count) in counts {
            let deviation = count.abs_diff(expected) as f64 / expected as f64;
            assert!(
                deviation < tolerance,
                "fact `{fact}` drawn {count} times, expected ~{expected}"
            );
        }
    }

    #[test]
    fn fact_selection_is_uniform() {
        let router = IntentRouter::with_selector(
            Arc::new(SkillCatalog::default()),
            SeededSelector::new(2024),
        );

        assert_uniform_facts(&router, 30_000, 0.05);
    }

    #[test]
    fn default_router_draws_facts_uniformly() {
        // Unseeded, so the tolerance is wide: ten standard deviations at 9000 draws.
        assert_uniform_facts(&IntentRouter::default(), 9_000, 0.15);
    }

    #[test]
    fn fact_bound_follows_the_configured_set() {
        let catalog = SkillCatalog::new(
            Default::default(),
            FactSet::new(["a", "b", "c", "d", "e"]).expect("facts"),
            OperatorTable::standard(),
        );
        let router = IntentRouter::with_selector(Arc::new(catalog), FixedSelector(4));

        assert_eq!(speech(&router, &SkillRequest::intent("GetFact")), "e");
    }

    #[test]
    fn substituted_operator_table_is_honored() {
        let catalog = SkillCatalog::new(
            Default::default(),
            FactSet::standard(),
            OperatorTable::empty().with_keyword("add", Operator::Plus),
        );
        let router = IntentRouter::new(Arc::new(catalog));

        assert_eq!(speech(&router, &math("2", "add", "2")), "The answer is 4");
        assert!(matches!(
            router.handle(&math("2", "plus", "2")),
            Err(SkillError::InvalidArgument { .. })
        ));
    }
}
