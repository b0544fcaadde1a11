use microbasic::lang::{Error, ErrorCode, Int, Lexer};
use microbasic::mach::{eval, Var};
use quickcheck::{QuickCheck, TestResult};

fn eval_str(src: &str) -> Result<Int, Error> {
    let mut lex = Lexer::new(src).unwrap();
    eval::relation(&mut lex, &Var::new())
}

#[test]
fn test_precedence() {
    assert_eq!(eval_str("2+3*4").unwrap(), 14);
    assert_eq!(eval_str("(2+3)*4").unwrap(), 20);
    assert_eq!(eval_str("10-2-3").unwrap(), 5);
    assert_eq!(eval_str("100/5/2").unwrap(), 10);
}

#[test]
fn test_truncating_division() {
    assert_eq!(eval_str("7/2").unwrap(), 3);
    assert_eq!(eval_str("(0-7)/2").unwrap(), -3);
    assert_eq!(eval_str("7%3").unwrap(), 1);
}

#[test]
fn test_division_by_zero() {
    assert_eq!(eval_str("1/0").unwrap_err().code(), ErrorCode::DivisionByZero);
    assert_eq!(eval_str("1%0").unwrap_err().code(), ErrorCode::DivisionByZero);
}

#[test]
fn test_bitwise() {
    assert_eq!(eval_str("12&10").unwrap(), 8);
    assert_eq!(eval_str("12|10").unwrap(), 14);
    // & and | sit at the same tier as + and -
    assert_eq!(eval_str("1|2*3").unwrap(), 7);
}

#[test]
fn test_relations_produce_zero_or_one() {
    assert_eq!(eval_str("1<2").unwrap(), 1);
    assert_eq!(eval_str("2<1").unwrap(), 0);
    assert_eq!(eval_str("2>1").unwrap(), 1);
    assert_eq!(eval_str("3=3").unwrap(), 1);
    assert_eq!(eval_str("3=4").unwrap(), 0);
    // left fold over relations: (1<2)=1
    assert_eq!(eval_str("1<2=1").unwrap(), 1);
}

#[test]
fn test_relation_nests_through_parens() {
    assert_eq!(eval_str("(1<2)+5").unwrap(), 6);
    assert_eq!(eval_str("2*(1=1)").unwrap(), 2);
}

#[test]
fn test_wraparound() {
    assert_eq!(eval_str("32767+1").unwrap(), -32768);
    assert_eq!(eval_str("0-32767-2").unwrap(), 32767);
}

#[test]
fn test_variables() {
    let mut vars = Var::new();
    vars.store('A', 6);
    vars.store('B', 7);
    let mut lex = Lexer::new("A*B").unwrap();
    assert_eq!(eval::expr(&mut lex, &vars).unwrap(), 42);
}

#[test]
fn test_missing_operand() {
    assert_eq!(eval_str("1+").unwrap_err().code(), ErrorCode::SyntaxError);
    assert_eq!(eval_str("(1").unwrap_err().code(), ErrorCode::SyntaxError);
}

#[test]
fn test_div_mod_identity() {
    // (a/b)*b + a%b == a for truncating division, wraparound included
    fn property(a: Int, b: Int) -> TestResult {
        if b == 0 {
            return TestResult::discard();
        }
        let mut vars = Var::new();
        vars.store('A', a);
        vars.store('B', b);
        let mut lex = Lexer::new("A/B*B+A%B").unwrap();
        let r = eval::expr(&mut lex, &vars).unwrap();
        TestResult::from_bool(r == a)
    }
    let mut qc = QuickCheck::new();
    qc.quickcheck(property as fn(Int, Int) -> TestResult);
}
