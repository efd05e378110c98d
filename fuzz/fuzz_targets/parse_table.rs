#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate blastfilt;

use blastfilt::{
    best_matches, compute_derived, load_table, parse_table_reader, remove_self_matches, Column,
    ReaderOptions, DEFAULT_FULL_LENGTH_PCT,
};

const HEADER: &[u8] = b"qseqid\tsseqid\tpident\tnident\tevalue\tbitscore\tlength\tqlen\tslen\n";

fuzz_target!(|data: &[u8]| {
    let input = [HEADER, data].concat();
    let reader = match parse_table_reader(&input[..], ReaderOptions::default()) {
        Ok(r) => r,
        Err(_) => return,
    };
    if let Ok((table, _)) = load_table(reader) {
        let (all, _) = compute_derived(&remove_self_matches(&table), DEFAULT_FULL_LENGTH_PCT);
        assert!(all.iter().all(|r| r.length_pct.is_finite()));
        let _ = best_matches(&all, Column::QuerySeqId, Column::PercentIdentity);
    }
});
