/// The three JSON keyword literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Literal {
    Null,
    True,
    False,
}

/// What happened after feeding one more byte into the literal matcher?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Byte matched, but the literal is not finished yet.
    NeedMore,
    /// Byte matched *and* it was the last byte of the literal.
    Done,
    /// Byte did **not** match the expected byte.
    Reject,
}

/// Tracks the bytes a literal still expects after its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExpectedLiteral {
    rest: &'static [u8],
    kind: Literal,
}

impl ExpectedLiteral {
    /// Start matching after the *first* byte (`n`, `t`, or `f`).
    pub fn new(first: u8) -> Option<Self> {
        let (rest, kind): (&'static [u8], _) = match first {
            b'n' => (b"ull", Literal::Null),
            b't' => (b"rue", Literal::True),
            b'f' => (b"alse", Literal::False),
            _ => return None,
        };
        Some(Self { rest, kind })
    }

    /// The literal this prefix can still extend to.
    pub fn kind(&self) -> Literal {
        self.kind
    }

    /// Give the matcher the next input byte and learn what to do next.
    pub fn step(&mut self, b: u8) -> Step {
        match self.rest.split_first() {
            Some((expected, rest)) if *expected == b => {
                self.rest = rest;
                if rest.is_empty() {
                    Step::Done
                } else {
                    Step::NeedMore
                }
            }
            _ => Step::Reject,
        }
    }
}
