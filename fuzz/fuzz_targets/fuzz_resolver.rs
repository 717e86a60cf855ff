#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonresolve::{Resolver, ResolverOptions, split_at_offsets};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 5; // 1 flag byte + 4-byte split seed

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[
    b" ",
    b"\t",
    b"\n",
    b"\r",
    "\u{2003}".as_bytes(),
    "\u{3000}".as_bytes(),
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Mostly feeds well-formed documents, which are what a model emits.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x01);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut end = HEADER;
        end += append_whitespace(&mut data[end..], max_size - end);
        end += append_value(&mut data[end..], size, max_size - end);
        end += append_whitespace(&mut data[end..], max_size - end);
        end
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }
        let mut written = 0;
        for _ in 0..rng.random_range(0..=limit.min(4)) {
            let w = WS_TABLE[rng.random_range(0..WS_TABLE.len())];
            if written + w.len() > limit {
                break;
            }
            buf[written..written + w.len()].copy_from_slice(w);
            written += w.len();
        }
        written
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let len = with_rng(|rng| rng.random_range(size / 2..=size * 2).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..len).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };
    let serialized = serde_json::to_vec(&value.0).expect("serializable value");
    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(21)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            _ => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
        };
        Ok(ArbitraryValue(value))
    }
}

/// Cut points derived from a seed, one every 1..=16 bytes.
fn offsets(len: usize, seed: u64) -> Vec<usize> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut at = 0;
    let mut out = Vec::new();
    while at < len {
        at += rng.random_range(1..=16);
        out.push(at);
    }
    out
}

fn resolve(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let seed = u64::from(u32::from_le_bytes([data[1], data[2], data[3], data[4]]));
    let text = String::from_utf8_lossy(&data[HEADER..]).into_owned();

    let options = ResolverOptions {
        allow_unicode_whitespace: flags & 1 != 0,
        ..ResolverOptions::default()
    };

    let mut whole = Resolver::with_options(None, options);
    whole.parse_chunk(&text);
    let mut streamed = Resolver::with_options(None, options);
    for chunk in split_at_offsets(&text, &offsets(text.len(), seed)) {
        streamed.parse_chunk(chunk);
    }
    assert_eq!(whole.value(), streamed.value());
    assert_eq!(whole.parser_state(), streamed.parser_state());

    whole.finish();
    streamed.finish();
    assert_eq!(whole.value(), streamed.value());
    assert_eq!(whole.parser_state(), streamed.parser_state());

    // Whatever serde_json accepts must resolve to the same document.
    if let Ok(expected) = serde_json::from_str::<Value>(&text) {
        assert!(whole.error().is_none(), "{:?}", whole.error());
        let rendered = whole.value().map(ToString::to_string).unwrap_or_default();
        let actual: Value = serde_json::from_str(&rendered).expect("rendered value is JSON");
        assert_eq!(as_floats(actual), as_floats(expected));
    }
}

/// Integers and floats compare as `f64`, which is how the resolver stores them.
fn as_floats(value: Value) -> Value {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number),
        Value::Array(items) => Value::Array(items.into_iter().map(as_floats).collect()),
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, as_floats(v))).collect()),
        other => other,
    }
}

fuzz_target!(|data: &[u8]| resolve(data));
