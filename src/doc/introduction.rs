/*!
# Getting Started

`qbasic` runs one program from start to finish. Give it a file name
or an `http://` or `https://` address.

<pre><code>&nbsp;  $ qbasic hello.bas
&nbsp;  Hello World
</code></pre>

Stop a running program with CTRL-C. Keys typed while it runs are
delivered to `INKEY$`, one character at a time.

## Options

`--list` prints the compiled program before running it. Each row is
an address, the source line it came from and the op.

<pre><code>&nbsp;  $ qbasic --list hello.bas
&nbsp;       0     1  STRING("Hello World")
&nbsp;       1     1  PRINT
&nbsp;       2     1  PRINTNEWLINE
&nbsp;       3     1  END
&nbsp;  Hello World
</code></pre>

`--markup` undoes `&amp;lt;`, `&amp;gt;` and `&amp;amp;` before
compiling, for programs copied out of a web page.

`--slice N` sets how many ops run between checks for CTRL-C.
The default is 100000.

Set `RUST_LOG=debug` to see compile and halt events on stderr.

## Programs

Lines may start with a label, either a number or a name and a colon.
Several statements can share a line when separated by `:`.
A line ending in `_` continues on the next.

```text
OPTION EXPLICIT
DIM i AS INTEGER, total AS DOUBLE
FOR i = 1 TO 10
  total += i
NEXT i
PRINT "Sum:"; total
```

Keywords and names are not case sensitive. Variables need no
declaration unless `OPTION EXPLICIT` is given. A suffix picks the
type: `$` string, `%` 16-bit integer, `&` 32-bit integer, `!` single,
`#` double. Names without a suffix are single precision unless a
`DEFINT`-style statement covers their first letter.

Arrays used without `DIM` get subscripts from the `OPTION BASE` to 10.

## Errors

Errors are reported with the line they happened on.

<pre><code>&nbsp;  $ qbasic broken.bas
&nbsp;  <b>NEXT WITHOUT FOR; NEXT i INSIDE FOR j at line 7</b>
</code></pre>

*/
