mod common;
use common::*;

#[test]
fn test_dim_with_bounds() {
    let src = "dim a(1 to 3)\nfor i = 1 to 3: a(i) = i * i: next\nprint a(1); a(2); a(3)";
    assert_eq!(run(src), "149\n");
    assert_eq!(run("dim a(1 to 3)\na(0) = 1"), "SUBSCRIPT OUT OF RANGE at line 2\n");
}

#[test]
fn test_multiple_dimensions() {
    let src = "dim m(1, 2) as integer\nm(1, 2) = 7: m(0, 1) = 3\nprint m(1, 2); m(0, 1); m(0, 0)";
    assert_eq!(run(src), "730\n");
}

#[test]
fn test_initializer_list() {
    assert_eq!(run("dim c(2) = {10, 20, 30}: print c(0); c(1); c(2)"), "102030\n");
    assert_eq!(
        run("dim g(1, 1) = {1, 2, 3}: print g(0, 0); g(1, 0); g(0, 1); g(1, 1)"),
        "1230\n"
    );
}

#[test]
fn test_implicit_array() {
    assert_eq!(run("b(10) = 5: print b(10); b(0)"), "50\n");
    assert_eq!(run("b(11) = 1"), "SUBSCRIPT OUT OF RANGE at line 1\n");
}

#[test]
fn test_option_base() {
    let src = "option base 1\ndim z(3)\nz(1) = 1: z(3) = 3\nprint z(1) + z(3)\nz(0) = 1";
    assert_eq!(run(src), "4\nSUBSCRIPT OUT OF RANGE at line 5\n");
}

#[test]
fn test_dim_runs_once() {
    let src = "for i = 1 to 2\ndim q(3) = {9}\nq(i) = i\nnext\nprint q(0); q(1); q(2)";
    assert_eq!(run(src), "912\n");
}

#[test]
fn test_string_arrays() {
    assert_eq!(run("dim s$(2): s$(1) = \"x\": print s$(1) + s$(0) + \"!\""), "x!\n");
    assert_eq!(run("dim as string names(1): names(0) = \"ann\": print names(0)"), "ann\n");
}

#[test]
fn test_swap() {
    assert_eq!(run("a = 1: b = 2: swap a, b: print a; b"), "21\n");
    assert_eq!(run("dim t(2): t(0) = 5: t(2) = 9: swap t(0), t(2): print t(0); t(2)"), "95\n");
    assert_eq!(run("a = 1: b$ = \"x\": swap a, b$"), "TYPE MISMATCH at line 1\n");
}

#[test]
fn test_const() {
    assert_eq!(run("const pi = 3.5, name = \"x\": print pi; name"), "3.5x\n");
}

#[test]
fn test_scalar_dim_initializer() {
    assert_eq!(run("dim as integer k = 5, j: print k; j"), "50\n");
    assert_eq!(run("dim d = 2.5 as double: print d"), "2.5\n");
}
