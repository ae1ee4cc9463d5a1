use alloc::{
    string::{String, ToString},
    vec,
    vec::Vec,
};

use crate::{CallContext, Error, FunctionRegistry, TokenKind, bind_object};

#[derive(Default, Debug, PartialEq)]
struct SetPosition {
    x: i32,
    y: i32,
}
bind_object!(SetPosition { x, y });

#[derive(Default)]
struct Robot {
    position: (i32, i32),
    greetings: Vec<String>,
    resets: usize,
}

fn registry<'buf>() -> FunctionRegistry<'buf, Robot> {
    let mut registry = FunctionRegistry::new();
    registry.register("set_position", |robot: &mut Robot, args: SetPosition| {
        robot.position = (args.x, args.y);
    });
    registry.register("greet", |robot: &mut Robot, name: String| {
        robot.greetings.push(name);
    });
    registry.register("reset", |robot: &mut Robot, _: Option<bool>| {
        robot.resets += 1;
    });
    registry
}

#[test]
fn each_member_invokes_its_function_once() {
    let mut registry = registry();
    let mut robot = Robot::default();
    let mut ctx =
        CallContext::from_str(r#"{"set_position":{"x":3,"y":-4},"greet":"hello","reset":null}"#);
    ctx.call_functions(&mut registry, &mut robot).unwrap();
    assert_eq!(robot.position, (3, -4));
    assert_eq!(robot.greetings, vec!["hello".to_string()]);
    assert_eq!(robot.resets, 1);
    assert!(ctx.failures().is_empty());
}

#[test]
fn unmatched_members_are_skipped() {
    let mut registry = registry();
    let mut robot = Robot::default();
    let mut ctx = CallContext::from_str(
        r#"{"unknown":{"deep":[1,2,{"deeper":null}]},"greet":"hi","also_unknown":4}"#,
    );
    ctx.call_functions(&mut registry, &mut robot).unwrap();
    assert_eq!(robot.greetings, vec!["hi".to_string()]);
}

#[test]
fn failing_argument_does_not_stop_the_walk() {
    let mut registry = registry();
    let mut robot = Robot::default();
    let mut ctx = CallContext::from_str(
        r#"{"set_position":{"x":"bad","y":2},"greet":"still called","reset":null}"#,
    );
    let error = ctx.call_functions(&mut registry, &mut robot).unwrap_err();
    assert_eq!(
        error,
        Error::TypeMismatch {
            expected: TokenKind::Number,
            found: TokenKind::String,
        }
    );
    // Later members still ran.
    assert_eq!(robot.greetings, vec!["still called".to_string()]);
    assert_eq!(robot.resets, 1);

    let failures = ctx.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].function, "set_position");
    assert_eq!(failures[0].error, error);
}

#[test]
fn first_of_several_failures_is_returned() {
    let mut registry = registry();
    let mut robot = Robot::default();
    let mut ctx = CallContext::from_str(r#"{"greet":45,"set_position":"nope"}"#);
    let error = ctx.call_functions(&mut registry, &mut robot).unwrap_err();
    assert_eq!(ctx.failures().len(), 2);
    assert_eq!(ctx.failures()[0].function, "greet");
    assert_eq!(ctx.failures()[0].error, error);
}

#[test]
fn structural_error_aborts_the_walk() {
    let mut registry = registry();
    let mut robot = Robot::default();
    let mut ctx = CallContext::from_str(r#"["not","an","object"]"#);
    let error = ctx.call_functions(&mut registry, &mut robot).unwrap_err();
    assert_eq!(
        error,
        Error::TypeMismatch {
            expected: TokenKind::ObjectStart,
            found: TokenKind::ArrayStart,
        }
    );
}

#[test]
fn state_accumulates_across_repeated_dispatch() {
    let mut registry = registry();
    let mut robot = Robot::default();
    for doc in [r#"{"greet":"a"}"#, r#"{"greet":"b","reset":null}"#] {
        let mut ctx = CallContext::from_str(doc);
        ctx.call_functions(&mut registry, &mut robot).unwrap();
    }
    assert_eq!(robot.greetings, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(robot.resets, 1);
}
