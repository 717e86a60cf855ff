use alloc::{string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};

use crate::{Map, Value};

#[derive(Clone, Debug)]
struct JsonNumber(f64);

impl Arbitrary for JsonNumber {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }
        Self(value)
    }
}

fn scalar(g: &mut Gen) -> Value {
    match usize::arbitrary(g) % 4 {
        0 => Value::Null,
        1 => Value::Boolean(bool::arbitrary(g)),
        2 => Value::Number(JsonNumber::arbitrary(g).0),
        _ => Value::String(String::arbitrary(g)),
    }
}

fn gen_value(g: &mut Gen, depth: usize) -> Value {
    if depth == 0 {
        return scalar(g);
    }
    let width = usize::arbitrary(g) % 4;
    match usize::arbitrary(g) % 6 {
        4 => Value::array((0..width).map(|_| gen_value(g, depth - 1)).collect::<Vec<_>>()),
        5 => Value::object(
            (0..width)
                .map(|_| (String::arbitrary(g), gen_value(g, depth - 1)))
                .collect::<Map>(),
        ),
        _ => scalar(g),
    }
}

/// Complete JSON values only; [`Value::Pending`] is never generated.
impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        gen_value(g, 3)
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = Self>> {
        match self {
            Value::Array(items) => {
                let items: Vec<Value> = items.iter().cloned().collect();
                alloc::boxed::Box::new(items.shrink().map(Value::from))
            }
            Value::Object(map) => {
                let children: Vec<Value> = map.values().cloned().collect();
                alloc::boxed::Box::new(children.into_iter())
            }
            Value::String(s) => alloc::boxed::Box::new(s.shrink().map(Value::String)),
            _ => quickcheck::empty_shrinker(),
        }
    }
}
