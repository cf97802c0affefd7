use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use crate::mod_arith::{self, MODULUS};

/// Final register pair left behind by one complete evaluation.
///
/// Every exit path of the routine finishes with `a = b + 1 (mod 32768)`,
/// so `b` always trails `a` by one in the modular domain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub a: u16,
    pub b: u16,
}

/// A register value outside [0, 32768), rejected at the public boundary.
/// Wraparound of in-range arithmetic is defined behaviour, never an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainError {
    pub register: &'static str,
    pub value: u32,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "register {} out of domain: {} (must be below {})",
            self.register, self.value, MODULUS
        )
    }
}

impl Error for DomainError {}

pub(crate) fn check_register(register: &'static str, value: u16) -> Result<u16, DomainError> {
    if u32::from(value) < MODULUS {
        Ok(value)
    } else {
        Err(DomainError { register, value: u32::from(value) })
    }
}

/// One pending continuation of the recursive definition.
enum Frame {
    /// The inner `evaluate(a, b - 1)` is still running; feed its result
    /// through `evaluate(a - 1, _)`, then record the total under `(a, b)`.
    Combine(u16, u16),
    /// A tail call is running on behalf of `(a, b)`; record its result.
    Store(u16, u16),
}

/// Per-evaluation context: the fixed third register and the memo table
/// keyed on it. Nothing survives across top-level calls.
struct Eval {
    c: u16,
    memo: HashMap<(u16, u16), u16>,
}

impl Eval {
    fn new(c: u16) -> Self {
        Eval { c, memo: HashMap::new() }
    }

    /// Closed forms for the three smallest first registers. These collapse
    /// the recursion to O(1); without them the `a >= 3` levels would feed
    /// exponentially many calls into the lower levels.
    fn shortcut(&self, a: u16, b: u16) -> Option<u16> {
        match a {
            0 => Some(mod_arith::add(b, 1)),
            // the routine leaves b + c in the second register
            1 => Some(mod_arith::add(mod_arith::add(b, self.c), 1)),
            // and b + (b + 2) * c here
            2 => {
                let last = mod_arith::add(b, mod_arith::mul(mod_arith::add(b, 2), self.c));
                Some(mod_arith::add(last, 1))
            }
            _ => None,
        }
    }

    /// Runs the recursion on an explicit frame stack. The natural recursive
    /// definition nests up to b frames per `a` level, far past what the
    /// native call stack holds for the full domain.
    fn run(&mut self, a0: u16, b0: u16) -> u16 {
        let mut frames: Vec<Frame> = Vec::new();
        let (mut a, mut b) = (a0, b0);
        'call: loop {
            // descend until some call bottoms out
            let value = loop {
                if let Some(v) = self.shortcut(a, b) {
                    break v;
                }
                if let Some(&v) = self.memo.get(&(a, b)) {
                    break v;
                }
                if b == 0 {
                    frames.push(Frame::Store(a, b));
                    a -= 1;
                    b = self.c;
                } else {
                    frames.push(Frame::Combine(a, b));
                    b -= 1;
                }
            };
            // unwind finished frames until one starts another call
            loop {
                match frames.pop() {
                    None => return value,
                    Some(Frame::Store(ka, kb)) => {
                        self.memo.insert((ka, kb), value);
                    }
                    Some(Frame::Combine(ka, kb)) => {
                        frames.push(Frame::Store(ka, kb));
                        a = ka - 1;
                        b = value;
                        continue 'call;
                    }
                }
            }
        }
    }
}

/// Evaluates the confirmation routine for one register triple:
///
/// - `evaluate(0, b, c) = (b + 1) mod 32768`
/// - `evaluate(a, 0, c) = evaluate(a - 1, c, c)`
/// - `evaluate(a, b, c) = evaluate(a - 1, evaluate(a, b - 1, c), c)`
///
/// All inputs must lie in [0, 32768). The evaluation is total on that
/// domain: closed forms cover `a <= 2` and results for `a >= 3` are
/// memoized on `(a, b)`, bounding the distinct work per level to 32768
/// entries.
pub fn evaluate(a: u16, b: u16, c: u16) -> Result<Outcome, DomainError> {
    let a = check_register("a", a)?;
    let b = check_register("b", b)?;
    let c = check_register("c", c)?;
    let result = Eval::new(c).run(a, b);
    Ok(Outcome { a: result, b: mod_arith::dec(result) })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct transcription of the recursive definition. Only usable for
    /// small inputs; the evaluator under test must agree with it wherever
    /// it is feasible to run.
    fn brute(a: u16, b: u16, c: u16) -> u16 {
        if a == 0 {
            (b + 1) % 32768
        } else if b == 0 {
            brute(a - 1, c, c)
        } else {
            brute(a - 1, brute(a, b - 1, c), c)
        }
    }

    fn eval(a: u16, b: u16, c: u16) -> Outcome {
        evaluate(a, b, c).unwrap()
    }

    #[test]
    fn base_case_increments_b() {
        assert_eq!(eval(0, 41, 7), Outcome { a: 42, b: 41 });
        assert_eq!(eval(0, 0, 0), Outcome { a: 1, b: 0 });
    }

    #[test]
    fn base_case_wraps_to_zero() {
        // b + 1 hits exactly 32768
        assert_eq!(eval(0, 32767, 5), Outcome { a: 0, b: 32767 });
    }

    #[test]
    fn linear_level_adds_c() {
        // final second register is b + c, the result one above it
        assert_eq!(eval(1, 3, 5), Outcome { a: 9, b: 8 });
        assert_eq!(eval(1, 0, 0), Outcome { a: 1, b: 0 });
        // b + c lands exactly on the modulus
        assert_eq!(eval(1, 32767, 1), Outcome { a: 1, b: 0 });
    }

    #[test]
    fn quadratic_level_matches_linear_at_b_zero() {
        for c in &[0u16, 1, 2, 7, 50, 32767] {
            let lhs = eval(2, 0, *c);
            assert_eq!(lhs, eval(1, *c, *c));
            assert_eq!(u32::from(lhs.b), (2 * u32::from(*c)) % 32768);
        }
    }

    #[test]
    fn agrees_with_brute_recursion_on_low_levels() {
        for a in 0..=2 {
            for b in (0..=50).step_by(7) {
                for c in (0..=50).step_by(11) {
                    assert_eq!(
                        eval(a, b, c).a,
                        brute(a, b, c),
                        "mismatch at ({}, {}, {})",
                        a, b, c
                    );
                }
            }
        }
    }

    #[test]
    fn agrees_with_brute_recursion_at_level_three() {
        for b in 0..=3 {
            for c in 0..=3 {
                assert_eq!(eval(3, b, c).a, brute(3, b, c));
            }
        }
    }

    #[test]
    fn repeated_evaluation_is_pure() {
        assert_eq!(eval(4, 1, 17), eval(4, 1, 17));
        assert_eq!(eval(3, 200, 3000), eval(3, 200, 3000));
    }

    #[test]
    fn total_at_domain_corners() {
        // worst-case chains for the memoized levels; must return promptly
        assert!(u32::from(eval(4, 1, 32767).a) < MODULUS);
        assert!(u32::from(eval(4, 32767, 32767).a) < MODULUS);
        assert!(u32::from(eval(4, 1, 0).a) < MODULUS);
    }

    #[test]
    fn rejects_out_of_domain_registers() {
        let err = evaluate(32768, 0, 0).unwrap_err();
        assert_eq!(err.register, "a");
        assert_eq!(err.value, 32768);
        assert_eq!(evaluate(0, 40000, 0).unwrap_err().register, "b");
        assert_eq!(evaluate(0, 0, 65535).unwrap_err().register, "c");
    }
}
