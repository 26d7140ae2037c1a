mod common;
use basic::mach::{Event, InputQueue, Mouse};
use common::*;
use std::time::Duration;

fn draw(source: &str) -> Vec<String> {
    let (mut runtime, capture) = runtime(source, InputQueue::new());
    exec(&mut runtime, &capture);
    let calls = capture.draw.borrow().clone();
    calls
}

#[test]
fn test_graphics_calls() {
    assert_eq!(
        draw("screen 12: color 4: pset (1, 2): pset (3, 4), 5"),
        [
            "screen [Some(12.0)]",
            "color 4",
            "pset 1 2 None",
            "pset 3 4 Some(5)"
        ]
    );
    assert_eq!(
        draw("line (0, 0)-(10, 5): line (0, 0)-(10, 5), , b: line (1, 1)-(2, 2), 3, bf"),
        [
            "line (0.0, 0.0) (10.0, 5.0) None",
            "rect (0.0, 0.0) (10.0, 5.0) None false",
            "rect (1.0, 1.0) (2.0, 2.0) Some(3) true"
        ]
    );
    assert_eq!(
        draw("circle (5, 6), 7: circle (1, 2), 3, 9, , , 0.5, f"),
        ["circle 5 6 7 false None", "circle 1 2 3 true Some(9)"]
    );
}

#[test]
fn test_screen_blank_arguments() {
    assert_eq!(draw("screen 13, , 1"), ["screen [Some(13.0), None, Some(1.0)]"]);
    assert_eq!(draw("screen , 2"), ["screen [None, Some(2.0)]"]);
    assert_eq!(
        draw("screen 1, , , 4"),
        ["screen [Some(1.0), None, None, Some(4.0)]"]
    );
}

#[test]
fn test_locate_moves_cursor() {
    let (mut runtime, capture) = runtime("print \"ab\";: locate 3, 7: print \"c\"", InputQueue::new());
    assert_eq!(exec(&mut runtime, &capture), "abc\n");
    assert_eq!(*capture.draw.borrow(), ["locate 3 7"]);
}

#[test]
fn test_getmouse() {
    let input = InputQueue::new();
    input.set_mouse(Mouse {
        x: 12.0,
        y: 34.0,
        wheel: 1,
        buttons: 2,
        clip: 0,
    });
    let (mut runtime, capture) = runtime("getmouse mx, my, , b\nprint mx; my; b", input);
    assert!(matches!(runtime.execute(100), Event::Yield));
    assert_eq!(exec(&mut runtime, &capture), "12342\n");
}

#[test]
fn test_inkey_yields_each_poll() {
    let input = InputQueue::new();
    let (mut runtime, capture) = runtime(
        "do: k$ = inkey$: loop until k$ <> \"\"\nprint k$",
        input.clone(),
    );
    assert!(matches!(runtime.execute(100), Event::Yield));
    assert!(matches!(runtime.execute(100), Event::Yield));
    input.push_key("q");
    assert_eq!(exec(&mut runtime, &capture), "q\n");
}

#[test]
fn test_sleep_event() {
    let (mut runtime, _capture) = runtime("sleep 250: sleep", InputQueue::new());
    assert!(matches!(runtime.execute(100), Event::Sleep(d) if d == Duration::from_millis(250)));
    assert!(matches!(runtime.execute(100), Event::Sleep(d) if d == Duration::from_millis(0)));
    assert!(matches!(runtime.execute(100), Event::Stopped));
}

#[test]
fn test_slices_resume_where_they_left_off() {
    let (mut runtime, capture) = runtime("for i = 1 to 5: print i;: next", InputQueue::new());
    let mut slices = 0;
    while let Event::Running = runtime.execute(3) {
        slices += 1;
    }
    assert!(slices > 5);
    assert_eq!(*capture.text.borrow(), "12345\n");
}

#[test]
fn test_interrupt() {
    let (mut runtime, capture) = runtime("do: print \"x\";: loop", InputQueue::new());
    assert!(matches!(runtime.execute(10), Event::Running));
    runtime.interrupt();
    assert!(matches!(runtime.execute(10), Event::Stopped));
    assert!(capture.text.borrow().starts_with('x'));
}
