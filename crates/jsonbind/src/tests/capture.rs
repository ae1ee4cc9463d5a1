use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use crate::{
    Error, ParseContext, RawText, RawTokens, Token, TokenKind, Tokenizer, bind_object,
    to_json_string,
};

#[derive(Default, Debug, PartialEq)]
struct Child {
    some_more: String,
    another_int: i32,
}
bind_object!(Child { some_more, another_int });

#[derive(Default)]
struct TextCarrier {
    property: String,
    child: RawText,
    another_prop: bool,
}
bind_object!(TextCarrier {
    property,
    child,
    another_prop
});

#[derive(Default)]
struct TokenCarrier<'buf> {
    property: String,
    child: RawTokens<'buf>,
    another_prop: bool,
}
bind_object!(TokenCarrier<'buf> {
    property,
    child,
    another_prop
});

const FIXTURE: &str =
    r#"{"property":"value","child":{"some_more":"world","another_int":495},"another_prop":true}"#;

#[test]
fn raw_text_captures_scalar() {
    #[derive(Default)]
    struct Pricing {
        price: RawText,
    }
    bind_object!(Pricing { price });

    let mut pricing = Pricing::default();
    let mut ctx = ParseContext::from_str(r#"{"price":10.5}"#);
    ctx.parse_to(&mut pricing).unwrap();
    assert_eq!(pricing.price.0, "10.5");

    // Quoting survives for string scalars.
    let mut pricing = Pricing::default();
    let mut ctx = ParseContext::from_str(r#"{"price":"negotiable"}"#);
    ctx.parse_to(&mut pricing).unwrap();
    assert_eq!(pricing.price.0, r#""negotiable""#);
}

#[test]
fn raw_text_captures_subtree_and_stream_continues() {
    let mut carrier = TextCarrier::default();
    let mut ctx = ParseContext::from_str(FIXTURE);
    ctx.parse_to(&mut carrier).unwrap();
    assert_eq!(carrier.property, "value");
    assert_eq!(carrier.child.0, r#"{"some_more":"world","another_int":495}"#);
    // The member after the captured subtree still binds.
    assert!(carrier.another_prop);

    // The captured text parses into the typed struct it stands for.
    let mut child = Child::default();
    let mut child_ctx = ParseContext::from_str(&carrier.child.0);
    child_ctx.parse_to(&mut child).unwrap();
    assert_eq!(child.some_more, "world");
    assert_eq!(child.another_int, 495);
}

#[test]
fn raw_text_emits_verbatim() {
    let mut carrier = TextCarrier::default();
    let mut ctx = ParseContext::from_str(FIXTURE);
    ctx.parse_to(&mut carrier).unwrap();
    let json = to_json_string(&carrier).unwrap();
    assert_eq!(json, FIXTURE);
}

#[test]
fn raw_tokens_capture_child_subtree() {
    let mut carrier = TokenCarrier::default();
    let mut ctx = ParseContext::from_str(FIXTURE);
    ctx.parse_to(&mut carrier).unwrap();

    // Start, two members, end.
    assert_eq!(carrier.child.tokens.len(), 4);
    assert_eq!(carrier.child.tokens[0].kind, TokenKind::ObjectStart);
    assert_eq!(carrier.child.tokens[0].name_str(), Some("child"));
    assert_eq!(carrier.child.tokens[1].name_str(), Some("some_more"));
    assert_eq!(carrier.child.tokens[2].name_str(), Some("another_int"));
    assert_eq!(carrier.child.tokens[3].kind, TokenKind::ObjectEnd);
    assert!(carrier.another_prop);

    // Replaying the captured tokens binds the typed struct.
    let mut child = Child::default();
    let mut child_ctx = ParseContext::from_tokens(&carrier.child.tokens);
    child_ctx.parse_to(&mut child).unwrap();
    assert_eq!(child.some_more, "world");
    assert_eq!(child.another_int, 495);
}

#[test]
fn raw_tokens_capture_scalar_as_single_token() {
    #[derive(Default)]
    struct Holder<'buf> {
        value: RawTokens<'buf>,
    }
    bind_object!(Holder<'buf> { value });

    let mut holder = Holder::default();
    let mut ctx = ParseContext::from_str(r#"{"value":45}"#);
    ctx.parse_to(&mut holder).unwrap();
    assert_eq!(holder.value.tokens.len(), 1);
    assert_eq!(holder.value.tokens[0].kind, TokenKind::Number);
    assert_eq!(holder.value.tokens[0].value_str(), "45");
}

#[test]
fn raw_tokens_emit_reconstructs_subtree() {
    let mut carrier = TokenCarrier::default();
    let mut ctx = ParseContext::from_str(FIXTURE);
    ctx.parse_to(&mut carrier).unwrap();
    let json = to_json_string(&carrier).unwrap();
    assert_eq!(json, FIXTURE);
}

#[test]
fn whole_stream_replays_from_captured_tokens() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.add_data(FIXTURE.as_bytes());
    let mut tokens = Vec::new();
    loop {
        match tokenizer.next_token() {
            Ok(token) => tokens.push(token),
            Err(Error::NeedMoreData) => break,
            Err(error) => panic!("unexpected error: {error}"),
        }
    }

    let mut carrier = TextCarrier::default();
    let mut ctx = ParseContext::from_tokens(&tokens);
    ctx.parse_to(&mut carrier).unwrap();
    assert_eq!(carrier.property, "value");
    assert_eq!(carrier.child.0.to_string(), r#"{"some_more":"world","another_int":495}"#);
}

#[test]
fn captured_tokens_outlive_the_context() {
    let tokens: Vec<Token<'_>> = {
        let mut carrier = TokenCarrier::default();
        let mut ctx = ParseContext::from_str(FIXTURE);
        ctx.parse_to(&mut carrier).unwrap();
        carrier.child.tokens
    };
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[1].value_str(), "world");
}
