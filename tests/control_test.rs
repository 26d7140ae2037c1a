mod common;
use common::*;

#[test]
fn test_block_if() {
    let src = r#"
for i = 1 to 3
  if i = 1 then
    print "one"
  elseif i = 2 then
    print "two"
  else
    print "many"
  end if
next
"#;
    assert_eq!(run(src), "one\ntwo\nmany\n");
}

#[test]
fn test_single_line_if() {
    assert_eq!(run("if 0 then print \"a\" else print \"b\": print \"c\""), "b\nc\n");
    assert_eq!(run("if 1 then print \"a\": print \"b\" else print \"c\""), "a\nb\n");
    assert_eq!(run("x = 5: if x > 1 then if x > 9 then print \"big\" else print \"mid\""), "mid\n");
}

#[test]
fn test_block_else_with_statement() {
    let src = "if 0 then\nprint 1\nelse print 2\nend if";
    assert_eq!(run(src), "2\n");
}

#[test]
fn test_for_counts() {
    assert_eq!(run("for i = 3 to 1 step -1: print i;: next"), "321\n");
    assert_eq!(run("for i = 5 to 1: print i: next: print \"done\""), "done\n");
    assert_eq!(run("for i = 1 to 3: next: print i"), "4\n");
    assert_eq!(run("for i = 0 to 1 step 0.5: print i;: next"), "00.51\n");
}

#[test]
fn test_for_limit_evaluated_once() {
    assert_eq!(run("n = 3\nfor i = 1 to n\nn = 10\nprint i;\nnext"), "123\n");
}

#[test]
fn test_next_closes_several_loops() {
    let src = "for i = 1 to 2: for j = 1 to 2: print i * 10 + j;: next j, i";
    assert_eq!(run(src), "11122122\n");
}

#[test]
fn test_do_loops() {
    let src = r#"
i = 0
do while i < 3
  i += 1
loop
print i
do
  i -= 1
loop until i = 0
print i
do until i >= 2: i = i + 1: loop
print i
do
  i = i * 3
loop while i < 50
print i
"#;
    assert_eq!(run(src), "3\n0\n2\n54\n");
}

#[test]
fn test_while_wend() {
    assert_eq!(run("n = 1: while n < 100: n = n * 2: wend: print n"), "128\n");
}

#[test]
fn test_select_case() {
    let src = r#"
for x = 1 to 10 step 3
  select case x
  case 1
    print "one"
  case 2 to 4, 6
    print "small"
  case else
    print "big"
  end select
next
"#;
    assert_eq!(run(src), "one\nsmall\nbig\nbig\n");
}

#[test]
fn test_select_without_match() {
    let src = "x$ = \"c\"\nselect case x$\ncase \"a\": print 1\ncase \"b\": print 2\nend select\nprint \"end\"";
    assert_eq!(run(src), "end\n");
    assert_eq!(run("select case as const 2\ncase 2\nprint \"two\"\nend select"), "two\n");
}

#[test]
fn test_goto_and_gosub() {
    let src = r#"
gosub greet
gosub greet
goto finish
print "skipped"
greet:
  print "hi"
  return
finish:
print "bye"
"#;
    assert_eq!(run(src), "hi\nhi\nbye\n");
}

#[test]
fn test_numeric_labels() {
    assert_eq!(run("10 i = i + 1\n20 if i < 3 then 10\n30 print i"), "3\n");
}

#[test]
fn test_recursive_gosub() {
    let src = r#"
n = 5: r = 1
gosub fact
print r
end
fact:
if n > 1 then r = r * n: n = n - 1: gosub fact
return
"#;
    assert_eq!(run(src), "120\n");
}

#[test]
fn test_end_finishes_line() {
    assert_eq!(run("print \"a\";: end: print \"b\""), "a\n");
}
