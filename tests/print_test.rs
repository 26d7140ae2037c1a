mod common;
use common::*;

#[test]
fn test_print_separators() {
    assert_eq!(run("PRINT 1; 2, 3"), "12   3\n");
    assert_eq!(run("print 1,: print 2"), "1   2\n");
    assert_eq!(run("print"), "\n");
    assert_eq!(run("? \"x\""), "x\n");
}

#[test]
fn test_print_using_ignores_format() {
    assert_eq!(run("print using \"##.#\"; 5"), "5\n");
}

#[test]
fn test_arithmetic() {
    assert_eq!(run("print \"a\" + \"b\"; 7 \\ 2; 7 mod 3; 2 ^ 3; -2 ^ 2"), "ab318-4\n");
    assert_eq!(run("print 7 / 2; 2 ^ 3 ^ 2; 1 + 2 * 3"), "3.5647\n");
    assert_eq!(run("print \"a\" & \"b\""), "ab\n");
    assert_eq!(run("print &hff; 1e3"), "2551000\n");
}

#[test]
fn test_logic() {
    assert_eq!(run("print not 0; 1 = 1 and 2 > 1; 3 < 2 or 0"), "-1-10\n");
    assert_eq!(run("print 6 and 3; 6 or 3; \"a\" < \"b\""), "27-1\n");
}

#[test]
fn test_functions() {
    assert_eq!(
        run("print ucase$(\"abc\"); lcase$(\"DeF\"); chr$(65); asc(\"a\"); str$(12)"),
        "ABCdefA9712\n"
    );
    assert_eq!(run("print int(-2.5); abs(-3); sqr(16)"), "-334\n");
    assert_eq!(run("print atan2(0, 1); cos(0)"), "01\n");
}

#[test]
fn test_machine_state_functions() {
    assert_eq!(run("x = rnd: if x >= 0 and x < 1 then print \"ok\""), "ok\n");
    assert_eq!(run("x = rnd(1): if x < 1 then print \"ok\""), "ok\n");
    assert_eq!(run("t# = timer: if t# > 0 then print \"ok\""), "ok\n");
}

#[test]
fn test_storage_classes() {
    assert_eq!(run("a% = 3.7: b& = -3.7: print a%; b&"), "3-3\n");
    assert_eq!(run("a% = 40000: print a%"), "-25536\n");
    assert_eq!(run("defint a-c: defstr s: a = 2.9: s = \"t\": print a; s"), "2t\n");
    assert_eq!(run("dim as byte b: b = 257: print b"), "1\n");
}

#[test]
fn test_type_mismatch() {
    assert_eq!(run("a = \"x\""), "TYPE MISMATCH at line 1\n");
    assert_eq!(run("print 1\nprint \"a\" - 1"), "1\nTYPE MISMATCH at line 2\n");
}

#[test]
fn test_division_by_zero() {
    assert_eq!(run("print 1 / 0"), "DIVISION BY ZERO at line 1\n");
}

#[test]
fn test_continuation_and_comments() {
    let src = "print 1 + _ ' more below\n  2 ' sum\nrem print 9\nprint 3";
    assert_eq!(run(src), "3\n3\n");
}
