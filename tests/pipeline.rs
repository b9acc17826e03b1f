//! End-to-end launcher tests: real forks, real pipes, real files.
//!
//! Everything lives in one test function: the foreground pipeline path
//! reaps every outstanding child, so concurrent spawning tests would
//! steal each other's exits.

use std::fs;
use std::path::PathBuf;

use marsh::ast::{Command, Pipeline};
use marsh::executor::{ChildSignals, run_pipeline, run_single};

fn cmd(argv: &[&str]) -> Command {
    Command {
        argv: argv.iter().map(|s| s.to_string()).collect(),
        ..Command::default()
    }
}

fn scratch(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    let _ = fs::remove_file(&path);
    path
}

fn open_fd_count() -> usize {
    fs::read_dir("/dev/fd").map(|dir| dir.count()).unwrap_or(0)
}

#[test]
fn test_launcher_end_to_end() {
    let fds_before = open_fd_count();

    // A single foreground command with stdout redirected: the wait
    // must have completed before the file is read.
    let out = scratch("marsh-it-single.txt");
    let mut echo = cmd(&["echo", "hello"]);
    echo.stdout_target = Some(out.to_string_lossy().into_owned());
    run_single(&echo, ChildSignals::DefaultInterrupt).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "hello\n");

    // Appending keeps the first line.
    let mut again = cmd(&["echo", "again"]);
    again.stdout_target = Some(out.to_string_lossy().into_owned());
    again.append = true;
    run_single(&again, ChildSignals::DefaultInterrupt).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "hello\nagain\n");
    let _ = fs::remove_file(&out);

    // A three-stage foreground pipeline: data crosses two pipes and the
    // call does not return until the last stage has written everything.
    let out = scratch("marsh-it-pipeline.txt");
    let mut last = cmd(&["cat"]);
    last.stdout_target = Some(out.to_string_lossy().into_owned());
    let pipeline = Pipeline {
        commands: vec![cmd(&["echo", "through the pipes"]), cmd(&["cat"]), last],
    };
    run_pipeline(&pipeline, ChildSignals::DefaultInterrupt).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "through the pipes\n");
    let _ = fs::remove_file(&out);

    // Stdin redirection on the head stage feeds the whole chain.
    let input = scratch("marsh-it-stdin.txt");
    fs::write(&input, "from a file\n").unwrap();
    let out = scratch("marsh-it-stdin-out.txt");
    let mut head = cmd(&["cat"]);
    head.stdin_source = Some(input.to_string_lossy().into_owned());
    let mut tail = cmd(&["cat"]);
    tail.stdout_target = Some(out.to_string_lossy().into_owned());
    let pipeline = Pipeline {
        commands: vec![head, tail],
    };
    run_pipeline(&pipeline, ChildSignals::DefaultInterrupt).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "from a file\n");
    let _ = fs::remove_file(&input);
    let _ = fs::remove_file(&out);

    // An explicit stdin redirection on a later stage overrides the pipe
    // wiring for that stage.
    let input = scratch("marsh-it-override.txt");
    fs::write(&input, "overridden\n").unwrap();
    let out = scratch("marsh-it-override-out.txt");
    let mut tail = cmd(&["cat"]);
    tail.stdin_source = Some(input.to_string_lossy().into_owned());
    tail.stdout_target = Some(out.to_string_lossy().into_owned());
    let pipeline = Pipeline {
        commands: vec![cmd(&["echo", "ignored"]), tail],
    };
    run_pipeline(&pipeline, ChildSignals::DefaultInterrupt).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), "overridden\n");
    let _ = fs::remove_file(&input);
    let _ = fs::remove_file(&out);

    // Both streams folded into one file via the merge flag. `sh -c`
    // writes one line to each stream.
    let out = scratch("marsh-it-merge.txt");
    let mut merged = cmd(&["sh", "-c", "echo out; echo err 1>&2"]);
    merged.stdout_target = Some(out.to_string_lossy().into_owned());
    merged.merge_stderr = true;
    run_single(&merged, ChildSignals::DefaultInterrupt).unwrap();
    let contents = fs::read_to_string(&out).unwrap();
    assert!(contents.contains("out"), "stdout line missing: {contents:?}");
    assert!(contents.contains("err"), "stderr line missing: {contents:?}");
    let _ = fs::remove_file(&out);

    // An unresolvable program fails in the child; the shell side just
    // returns after the wait.
    run_single(
        &cmd(&["marsh-no-such-command-xyzzy"]),
        ChildSignals::DefaultInterrupt,
    )
    .unwrap();

    // A signal-inheriting spawn is also fine for a trivial child.
    run_single(&cmd(&["true"]), ChildSignals::Inherit).unwrap();

    // No pipe or redirection descriptor may have leaked into the shell.
    assert_eq!(open_fd_count(), fds_before);
}
