//! `sentinel inspect` — lists or looks up quarantined-evidence metadata.
//!
//! Never surfaces the underlying evidence bytes (spec §4.8): only the
//! signature, severity, capture time, size, and compression flag.

use sentinel_core::Agent;
use sentinel_types::Signature;

use crate::style::{print_error, print_evidence_table, print_mini_banner, print_spacer};

pub fn run(agent: &Agent, signature: Option<&str>, limit: usize, json: bool) {
    if let Some(raw) = signature {
        let sig = match Signature::parse(raw) {
            Ok(sig) => sig,
            Err(err) => {
                print_error(&format!("invalid signature: {err}"));
                return;
            }
        };
        match agent.quarantine_entry(&sig) {
            Some(entry) => print_entries(&[entry], json),
            None => {
                if json {
                    println!("null");
                } else {
                    print_error(&format!("no quarantined entry for {}", sig.as_str()));
                }
            }
        }
        return;
    }

    let mut entries = agent.quarantine_entries();
    entries.truncate(limit);

    if !json {
        print_mini_banner();
        print_spacer();
    }
    print_entries(&entries, json);
}

fn print_entries(entries: &[sentinel_core::EvidenceSummary], json: bool) {
    if json {
        match serde_json::to_string_pretty(entries) {
            Ok(text) => println!("{text}"),
            Err(err) => print_error(&format!("failed to serialize entries: {err}")),
        }
    } else {
        print_evidence_table(entries);
    }
}
