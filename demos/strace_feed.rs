//! Strace Feed: synthetic traffic for exercising the display.
//!
//! Prints a mix of system-call traces, access-log lines and SQL statements
//! to stdout at a steady rate. Pipe it into the binary:
//!
//! ```text
//! cargo run --release --example strace_feed | cargo run --release
//! ```
//!
//! Usage: `strace_feed [LINES_PER_SECOND] [TOTAL_LINES]` (defaults 400 and
//! unbounded).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{self, BufWriter, Write};
use std::time::{Duration, Instant};

const SYSCALLS: &[&str] = &["read", "write", "writev", "stat", "lstat", "openat", "close", "futex"];
const PATHS: &[&str] = &[
    "/data/code/app/views.py",
    "/data/code/app/models.py",
    "/usr/lib/python3/json/decoder.py",
    "/etc/hosts",
];
const ROUTES: &[&str] = &["/", "/login", "/api/v1/items", "/static/app.js"];
const TABLES: &[&str] = &["users", "orders", "portal_user_session_log", "items"];

fn syscall(rng: &mut StdRng) -> String {
    let name = SYSCALLS[rng.random_range(0..SYSCALLS.len())];
    let fd = rng.random_range(0..12);
    match name {
        "stat" | "lstat" | "openat" => {
            let path = PATHS[rng.random_range(0..PATHS.len())];
            let ret = if rng.random_bool(0.8) { "0".to_string() } else { "-1 ENOENT".to_string() };
            format!("{name}(\"{path}\", {{st_mode=S_IFREG|0644}}) = {ret}")
        }
        "futex" => format!("futex(0x7f{:06x}, FUTEX_WAKE_PRIVATE, 1) = 1", rng.random_range(0..0xff_ffff)),
        _ => {
            let len = rng.random_range(1..4096);
            format!("{name}({fd}, \"...\", {len}) = {len}")
        }
    }
}

fn access_log(rng: &mut StdRng) -> String {
    let route = ROUTES[rng.random_range(0..ROUTES.len())];
    let status = [200, 200, 200, 304, 404, 500][rng.random_range(0..6)];
    format!(
        "10.0.0.{} - - \"GET {route} HTTP/1.1\" {status} {}",
        rng.random_range(1..255),
        rng.random_range(100..20_000)
    )
}

fn query(rng: &mut StdRng) -> String {
    let table = TABLES[rng.random_range(0..TABLES.len())];
    format!("SELECT * FROM {table} WHERE id = {}", rng.random_range(1..10_000))
}

fn main() -> io::Result<()> {
    let mut args = std::env::args().skip(1);
    let rate: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(400).max(1);
    let total: Option<u64> = args.next().and_then(|s| s.parse().ok());

    let mut rng = StdRng::seed_from_u64(0x1a7e);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let interval = Duration::from_secs(1) / u32::try_from(rate).unwrap_or(u32::MAX);
    let start = Instant::now();

    let mut sent = 0u64;
    while total.map_or(true, |total| sent < total) {
        let line = match rng.random_range(0..10) {
            0..=5 => syscall(&mut rng),
            6..=8 => access_log(&mut rng),
            _ => query(&mut rng),
        };
        if writeln!(out, "{line}").is_err() {
            // Reader went away.
            return Ok(());
        }
        sent += 1;

        let due = start + interval * u32::try_from(sent).unwrap_or(u32::MAX);
        let now = Instant::now();
        if due > now {
            out.flush()?;
            std::thread::sleep(due - now);
        }
    }
    out.flush()
}
