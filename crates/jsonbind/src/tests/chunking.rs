use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use quickcheck::QuickCheck;
use quickcheck_macros::quickcheck;

use crate::{Error, ParseContext, Token, Tokenizer, bind_object};

fn drain<'a>(tokenizer: &mut Tokenizer<'a>) -> Result<Vec<Token<'a>>, Error> {
    let mut tokens = Vec::new();
    loop {
        match tokenizer.next_token() {
            Ok(token) => tokens.push(token),
            Err(Error::NeedMoreData) => return Ok(tokens),
            Err(error) => return Err(error),
        }
    }
}

/// Cuts `bytes` into chunks whose sizes are derived from `splits` and feeds
/// them all to a fresh tokenizer.
fn tokenizer_fed_in_chunks<'a>(bytes: &'a [u8], splits: &[usize]) -> Tokenizer<'a> {
    let mut tokenizer = Tokenizer::new();
    let mut idx = 0;
    let mut remaining = bytes.len();
    for split in splits {
        if remaining == 0 {
            break;
        }
        let size = 1 + (split % remaining);
        tokenizer.add_data(&bytes[idx..idx + size]);
        idx += size;
        remaining -= size;
    }
    if remaining > 0 {
        tokenizer.add_data(&bytes[idx..]);
    }
    tokenizer
}

/// Property: the token stream is identical no matter how the input bytes are
/// partitioned into segments, including cuts inside escapes and multi-byte
/// characters.
#[test]
fn partition_invariance_quickcheck() {
    fn prop(pairs: Vec<(String, i64)>, splits: Vec<usize>) -> bool {
        let mut map = serde_json::Map::new();
        for (key, value) in &pairs {
            map.insert(key.clone(), serde_json::Value::from(*value));
        }
        let src = serde_json::Value::Object(map).to_string();
        let bytes = src.as_bytes();

        let mut whole = Tokenizer::new();
        whole.add_data(bytes);
        let Ok(expected) = drain(&mut whole) else {
            return false;
        };

        let mut chunked = tokenizer_fed_in_chunks(bytes, &splits);
        drain(&mut chunked) == Ok(expected)
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Vec<(String, i64)>, Vec<usize>) -> bool);
}

#[derive(Default, Debug, PartialEq)]
struct Record {
    id: u64,
    label: String,
    weights: Vec<f64>,
    active: bool,
}
bind_object!(Record {
    id,
    label,
    weights,
    active
});

const RECORD_DOC: &str =
    r#"{"id":42,"label":"résumé \"x\"","weights":[0.5,-1.25,2e2],"active":true}"#;

/// Property: binding through arbitrarily chunked input produces the same
/// struct as binding the whole document at once.
#[quickcheck]
fn chunked_binding_matches_whole(splits: Vec<usize>) -> bool {
    let mut expected = Record::default();
    let mut ctx = ParseContext::from_str(RECORD_DOC);
    ctx.parse_to(&mut expected).unwrap();

    let tokenizer = tokenizer_fed_in_chunks(RECORD_DOC.as_bytes(), &splits);
    let mut actual = Record::default();
    let mut ctx = ParseContext::with_tokenizer(tokenizer);
    ctx.parse_to(&mut actual).is_ok() && actual == expected
}

/// Refill-driven parse over two-byte chunks, exercising resumption inside
/// strings, numbers, and literals.
#[test]
fn refill_driven_binding() {
    static DOC: &[u8] =
        br#"{"id":7,"label":"chunk by chunk","weights":[1.5,2.5],"active":false}"#;
    let mut tokenizer = Tokenizer::new();
    let mut rest = DOC;
    tokenizer.set_refill(move |chain| {
        if !rest.is_empty() {
            let (chunk, tail) = rest.split_at(2.min(rest.len()));
            chain.add_data(chunk);
            rest = tail;
        }
    });

    let mut record = Record::default();
    let mut ctx = ParseContext::with_tokenizer(tokenizer);
    ctx.parse_to(&mut record).unwrap();
    assert_eq!(record.id, 7);
    assert_eq!(record.label, "chunk by chunk");
    assert_eq!(record.weights, alloc::vec![1.5, 2.5]);
    assert!(!record.active);
}
