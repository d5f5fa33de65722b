//! Hand-rolled fuzzing of the equation parser: junk in, errors out, no
//! panics.

use std::collections::HashSet;

use noether::parser::parse_equation;

fn sets() -> (HashSet<String>, HashSet<String>) {
    let constants: HashSet<String> = ["e".to_string()].into_iter().collect();
    let ops: HashSet<String> = ["mul", "inv", "e"].iter().map(|s| s.to_string()).collect();
    (constants, ops)
}

#[test]
fn junk_inputs_error_cleanly() {
    let (constants, ops) = sets();
    let junk = [
        "",
        "=",
        "x =",
        "= x",
        "x = = y",
        "((((",
        "))))",
        "(x mul y",
        "x mul y)",
        "mul(x, = y",
        "mul(,) = x",
        "x, y = z",
        "(x mul y) = (y mul",
        "inv() = x",
        "mul(x y) = z",
        "(x  y) = z",
        "🦀 = x",
        "x = 🦀",
        "a\u{0} = b",
    ];
    for src in junk {
        let result = parse_equation(src, &constants, &ops);
        assert!(result.is_err(), "accepted junk input: {:?}", src);
    }
}

#[test]
fn deeply_nested_input_parses() {
    let (constants, ops) = sets();
    let mut term = "x".to_string();
    for _ in 0..200 {
        term = format!("inv({})", term);
    }
    let src = format!("{} = x", term);
    let eq = parse_equation(&src, &constants, &ops).unwrap();
    assert_eq!(eq.rhs.to_string(), "x");
    assert_eq!(eq.lhs.size(), 201);
}

#[test]
fn whitespace_is_insignificant() {
    let (constants, ops) = sets();
    let a = parse_equation("(x mul y)=(y mul x)", &constants, &ops).unwrap();
    let b = parse_equation("  ( x   mul y ) =  ( y mul x )  ", &constants, &ops).unwrap();
    assert_eq!(a, b);
}
