use calc::{
    env::UnboundPolicy,
    eval::{EvalError, SyntaxError},
    lex::LexError,
    session::{Session, SessionConfig, Step},
};
use pretty_assertions::assert_eq;

fn run(source: &str) -> Vec<Step> {
    run_with(source, SessionConfig::default())
}

fn run_with(source: &str, config: SessionConfig) -> Vec<Step> {
    let mut session = Session::with_config(source.chars(), config);
    let mut steps = Vec::new();
    session
        .run(|step| steps.push(step.clone()))
        .expect("no fatal errors");
    steps
}

#[test]
fn a_short_session() {
    let script = "
        r = 2;
        area = pi * r * r;
        area / pi;
        n = 17; n % 5;
        q
    ";

    assert_eq!(
        run(script),
        vec![
            Step::Value(2.0),
            Step::Value(std::f64::consts::PI * 2.0 * 2.0),
            Step::Value(4.0),
            Step::Value(17.0),
            Step::Value(2.0),
            Step::Quit,
        ]
    );
}

#[test]
fn every_kind_of_error_recovers() {
    let script = "
        1 $ 2;
        3..;
        (1 + 2;
        * 4;
        8 / 0;
        8 % 0;
        8.5 % 2;
        unknown;
        42;
    ";

    assert_eq!(
        run(script),
        vec![
            Step::Failed(LexError::BadToken('$').into()),
            // `3.` is a number, the second dot is not
            Step::Failed(LexError::MalformedNumber(".".to_string()).into()),
            Step::Failed(SyntaxError::ExpectedRightParen.into()),
            Step::Failed(SyntaxError::ExpectedPrimary.into()),
            Step::Failed(EvalError::DivideByZero),
            Step::Failed(EvalError::DivideByZero),
            Step::Failed(EvalError::NonIntegralModulus),
            Step::Failed(EvalError::UndefinedVariable("unknown".to_string())),
            Step::Value(42.0),
            Step::EndOfInput,
        ]
    );
}

#[test]
fn assignments_before_a_failure_stick() {
    let mut session = Session::new("(a = 3) + (b = 4) / 0; a + b;".chars());
    assert_eq!(session.step(), Ok(Step::Failed(EvalError::DivideByZero)));
    assert_eq!(session.step(), Ok(Step::Value(7.0)));
}

#[test]
fn constants_can_be_overwritten() {
    assert_eq!(
        run("pi = 3; pi * 2;"),
        vec![Step::Value(3.0), Step::Value(6.0), Step::EndOfInput]
    );
}

#[test]
fn lenient_sessions_bind_unknown_names() {
    let config = SessionConfig {
        unbound: UnboundPolicy::Zero,
        ..SessionConfig::default()
    };

    assert_eq!(
        run_with("count + 1; count = count + 1; count;", config),
        vec![
            Step::Value(1.0),
            Step::Value(1.0),
            Step::Value(1.0),
            Step::EndOfInput
        ]
    );
}

#[test]
fn statements_may_span_lines() {
    assert_eq!(
        run("1 +\n2\n*\n3\n;"),
        vec![Step::Value(7.0), Step::EndOfInput]
    );
}

#[test]
fn the_default_config_matches_the_classic_prompt() {
    let config = SessionConfig::default();
    assert_eq!(config.prompt, "> ");
    assert_eq!(config.result_prefix, "= ");
    assert_eq!(config.unbound, UnboundPolicy::Error);
}

#[test]
fn overly_deep_nesting_is_a_recoverable_failure() {
    let script = format!("{}1{}; 5 % 3;", "(".repeat(1000), ")".repeat(1000));

    assert_eq!(
        run(&script),
        vec![
            Step::Failed(SyntaxError::TooDeep.into()),
            Step::Value(2.0),
            Step::EndOfInput
        ]
    );
}
