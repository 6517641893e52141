use std::env;
use std::process;

use mutfreq::error::Result;
use mutfreq::io::bulk::{BulkLoader, TsvLoader};
use mutfreq::io::cosmic;
use mutfreq::store::{CosmicStore, COSMIC_TABLE};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        println!("usage: mutfreq <cosmic_tsv> <out_db>");
        process::exit(1);
    }

    match run(&args[1], &args[2]) {
        Err(why) => {
            eprintln!("error: {}", why);
            process::exit(1);
        }
        Ok((read, skipped, loaded)) => {
            println!("records read: {}", read);
            println!("records skipped: {}", skipped);
            println!("records loaded: {}", loaded);
        }
    }
}

/// Bulk-load a curated COSMIC export, returning read, skipped, and
/// committed row counts.
fn run(tsv_fn: &str, db_fn: &str) -> Result<(u64, u64, u64)> {
    let mut reader = cosmic::Reader::from_file(tsv_fn)?;

    let mut store = CosmicStore::open(db_fn)?;
    let loader = TsvLoader::new(db_fn);
    store.begin_bulk(loader.open(COSMIC_TABLE)?)?;

    let mut read: u64 = 0;
    let mut skipped: u64 = 0;
    for r in reader.records() {
        match r {
            Ok(record) => {
                store.add_record(&record)?;
                read += 1;
            }
            Err(why) => {
                // tolerate malformed rows; report them in the summary
                println!("skipping malformed record: {:?}", why);
                skipped += 1;
            }
        }
    }

    let loaded = store.end_bulk()?;
    Ok((read, skipped, loaded))
}
