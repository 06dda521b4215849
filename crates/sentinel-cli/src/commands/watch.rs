//! `sentinel watch` — repeatedly injects a sample scent and reprints status.
//!
//! Sentinel has no server process or persistence to tail (spec §1
//! Non-goals), so `watch` drives the same seeded in-process [`Agent`] used
//! by `status`/`inspect`, feeding it one synthetic scent per tick so the
//! view visibly changes. Runs until interrupted (Ctrl+C).

use std::thread;
use std::time::Duration;

use sentinel_core::Agent;

use crate::demo;
use crate::style::{print_spacer, spinner};

pub fn run(agent: &Agent, refresh_ms: u64) {
    let pb = spinner::create_spinner("watching agent traffic — press Ctrl+C to stop");
    let mut tick: u64 = 0;
    loop {
        demo::inject_one(agent, tick);
        tick += 1;

        pb.suspend(|| {
            print!("\x1B[2J\x1B[1;1H");
            super::status::run(agent);
            print_spacer();
        });

        thread::sleep(Duration::from_millis(refresh_ms));
    }
}
