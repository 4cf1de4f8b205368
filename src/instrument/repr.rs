//! Textual forms of recorded arguments.
//!
//! Rendering follows Rust `Debug` (`("foo",)`, `b"raw"`), not Python `repr`.

/// Debug-style rendering of a single argument for call history.
pub trait Repr {
    fn repr(&self) -> String;
}

impl Repr for str {
    fn repr(&self) -> String {
        format!("{:?}", self)
    }
}

impl Repr for String {
    fn repr(&self) -> String {
        self.as_str().repr()
    }
}

impl Repr for [u8] {
    fn repr(&self) -> String {
        let escaped: String = self
            .iter()
            .flat_map(|byte| std::ascii::escape_default(*byte))
            .map(char::from)
            .collect();
        format!("b\"{}\"", escaped)
    }
}

impl Repr for Vec<u8> {
    fn repr(&self) -> String {
        self.as_slice().repr()
    }
}

impl Repr for i64 {
    fn repr(&self) -> String {
        self.to_string()
    }
}

impl Repr for f64 {
    fn repr(&self) -> String {
        // Debug keeps the fractional part on whole numbers (`1.0`)
        format!("{:?}", self)
    }
}

impl<T: Repr + ?Sized> Repr for &T {
    fn repr(&self) -> String {
        (**self).repr()
    }
}

/// Rendering of a positional argument tuple, e.g. `("foo",)` or `(1, 2)`.
pub trait CallArgs {
    fn render(&self) -> String;
}

impl CallArgs for () {
    fn render(&self) -> String {
        "()".to_string()
    }
}

impl<A: Repr> CallArgs for (A,) {
    fn render(&self) -> String {
        format!("({},)", self.0.repr())
    }
}

impl<A: Repr, B: Repr> CallArgs for (A, B) {
    fn render(&self) -> String {
        format!("({}, {})", self.0.repr(), self.1.repr())
    }
}

impl<A: Repr, B: Repr, C: Repr> CallArgs for (A, B, C) {
    fn render(&self) -> String {
        format!("({}, {}, {})", self.0.repr(), self.1.repr(), self.2.repr())
    }
}
