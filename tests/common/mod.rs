use microbasic::lang::Error;
use microbasic::mach::Runtime;

/// Feeds lines to a runtime, collecting everything it prints. Stops at
/// the first error, handing it back alongside the output so far.
pub fn exec(runtime: &mut Runtime, lines: &[&str]) -> (String, Option<Error>) {
    let mut output = String::new();
    for line in lines {
        if let Err(error) = runtime.enter(line, &mut output) {
            return (output, Some(error));
        }
    }
    (output, None)
}

/// As `exec`, on a fresh runtime, asserting nothing went wrong.
pub fn exec_ok(lines: &[&str]) -> String {
    let mut runtime = Runtime::default();
    let (output, error) = exec(&mut runtime, lines);
    assert!(error.is_none(), "unexpected error: {:?}", error);
    output
}
