/*!
# Statements

## CONST
`CONST name = expr [, name = expr]` binds a value that cannot be
assigned again. The type comes from the suffix or else from the value.

## DEFINT DEFLNG DEFSNG DEFDBL DEFSTR
`DEFINT a-c, x` sets the type of names without a suffix by first letter.

## DIM
`DIM [SHARED] [AS type] name[(bounds)] [= value] [AS type]`

Bounds are `upper` or `lower TO upper`, separated by commas for more
dimensions. An array can be given initial values with `= {1, 2, 3}`,
filled in element order with the first subscript changing fastest.
Types are `BYTE`, `INTEGER`, `LONG`, `SINGLE`, `DOUBLE` and `STRING`.
Running a `DIM` again leaves an existing array alone.

## DO LOOP
`DO [WHILE c | UNTIL c]` ... `LOOP [WHILE c | UNTIL c]`

## END
Stops the program. `END IF` and `END SELECT` close blocks.

## FOR NEXT
`FOR v = start TO end [STEP s]` ... `NEXT [v [, w]]`

The end and step are evaluated once. The body is skipped when the start
is already past the end.

## GOSUB RETURN
`GOSUB label` calls a subroutine that ends with `RETURN`.
A `RETURN` with no `GOSUB` pending is an error.

## GOTO
`GOTO label` where the label is a name or a line number.

## IF
```text
IF c THEN statements [ELSE statements]
IF c THEN
  ...
ELSEIF c THEN
  ...
ELSE
  ...
END IF
```
Blocks such as `FOR` may not open inside the single line form.

## LET
`[LET] target = expr`. The operators `+= -= *= /= \= ^= &=` update
the target in place.

## OPTION
`OPTION EXPLICIT` requires every variable to be declared first.
`OPTION BASE 0` or `OPTION BASE 1` sets the default lower bound.

## PRINT
`PRINT [USING fmt;] items`. A `;` between items prints nothing,
a `,` prints three spaces. A trailing `;` or `,` keeps the line open.
`?` is short for `PRINT`. The `USING` format is accepted and ignored.

## SELECT CASE
```text
SELECT CASE expr
CASE 1, 3 TO 5
  ...
CASE ELSE
  ...
END SELECT
```

## SLEEP
`SLEEP [ms]` pauses and lets the terminal catch up.

## SWAP
`SWAP a, b` exchanges two variables or elements of the same kind.

## WHILE WEND
`WHILE c` ... `WEND`

# Graphics and Input

The terminal has no pixel surface, so these statements are accepted
and reported in the debug log.

`SCREEN mode [, ...]`, `COLOR c`, `LOCATE row, col`,
`PSET (x, y) [, c]`, `LINE (x1, y1)-(x2, y2) [, [c] [, B | BF]]`,
`CIRCLE (x, y), r [, c [, start [, end [, aspect [, F]]]]]`.

`GETMOUSE x, y [, wheel [, buttons [, clip]]]` reads the mouse.

# Functions

`ABS ASC ATAN2(y, x) CHR$ COS EXP INKEY$ INT LCASE$ LOG RND SIN SQR
STR$ TAN TIMER UCASE$`

`INT` rounds down. `RND` is between 0 and 1. `TIMER` counts seconds.
`INKEY$` returns the next key typed, or an empty string.

*/
