#![cfg(unix)]

use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_ctrl_c_while_waiting_for_input() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_evalpool"))
        .args(["--engine", "/nonexistent/stockfish"])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // Stdin stays open, so the binary is blocked reading positions.
    thread::sleep(Duration::from_millis(300));
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let deadline = Instant::now() + Duration::from_secs(5);
    let exited = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break Some(status);
        }
        if Instant::now() > deadline {
            break None;
        }
        thread::sleep(Duration::from_millis(20));
    };

    if exited.is_none() {
        child.kill().unwrap();
        child.wait().unwrap();
    }
    let exited = exited.expect("evalpool kept waiting for input after Ctrl-C");
    assert!(!exited.success());
}
