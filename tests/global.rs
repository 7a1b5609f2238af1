use std::time::{Duration, Instant};

use fixlog::{glog, GlobalLogger};

// The process-wide engine is constructed once, so everything it guarantees is
// exercised in a single test.
#[test]
fn global_engine_logs_to_the_configured_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("global.log");

    // configure before first use
    GlobalLogger::set_path(&path);

    assert!(glog!("engine start {}", 42));
    assert!(GlobalLogger::log("second line"));
    {
        use std::fmt::Write;
        let mut line = GlobalLogger::handle().stream();
        write!(line, "third {}", "line").unwrap();
    }
    GlobalLogger::flush();

    // the path is fixed after construction; this call has no effect
    GlobalLogger::set_path(dir.path().join("ignored.log"));
    assert!(glog!("fourth line"));

    let deadline = Instant::now() + Duration::from_secs(2);
    while GlobalLogger::handle().sequence() < 4 {
        assert!(Instant::now() < deadline, "records were not drained in time");
        std::thread::sleep(Duration::from_millis(5));
    }
    GlobalLogger::stop();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(!dir.path().join("ignored.log").exists());

    // default flags: timestamp, sequence number, thread code
    assert!(lines[0].ends_with("engine start 42"));
    assert!(lines[0].contains(" 0000001 "));
    assert!(lines[1].contains(" 0000002 "));
    assert!(lines[3].ends_with("fourth line"));

    // every line carries the same single-character code for this thread
    let code = |line: &str| line.split(' ').nth(2).map(str::to_string);
    assert_eq!(code(lines[0]).unwrap().len(), 1);
    assert_eq!(code(lines[0]), code(lines[1]));
    assert_eq!(code(lines[0]), code(lines[3]));
}
