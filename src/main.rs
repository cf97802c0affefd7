use std::env;
use std::error::Error;
use std::process::exit;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use itertools::Itertools;
use log::info;

use confirm_search::search::{search, SearchParams};

const USAGE: &str = "usage: confirm-search [--a0 N] [--b0 N] [--target N] [--bound N]";

fn parse_args() -> Result<SearchParams, String> {
    let mut params = SearchParams::default();
    let mut args = env::args().skip(1);
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "-h" | "--help" => {
                println!("{}", USAGE);
                exit(0);
            }
            "--a0" | "--b0" | "--target" | "--bound" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("{} needs a value", flag))?;
                let value = value
                    .parse::<u32>()
                    .map_err(|_| format!("bad value for {}: {}", flag, value))?;
                match flag.as_str() {
                    "--a0" => params.a0 = register(&flag, value)?,
                    "--b0" => params.b0 = register(&flag, value)?,
                    "--target" => params.target = register(&flag, value)?,
                    _ => params.upper_bound = value,
                }
            }
            other => return Err(format!("unknown flag: {}", other)),
        }
    }
    Ok(params)
}

// flags must fit a register word; the search checks the 32768 domain bound
fn register(flag: &str, value: u32) -> Result<u16, String> {
    if value <= u32::from(u16::max_value()) {
        Ok(value as u16)
    } else {
        Err(format!("bad value for {}: {}", flag, value))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let params = match parse_args() {
        Ok(params) => params,
        Err(msg) => {
            eprintln!("{}", msg);
            eprintln!("{}", USAGE);
            exit(2);
        }
    };

    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = Arc::clone(&cancelled);
        ctrlc::set_handler(move || cancelled.store(true, Ordering::Relaxed))?;
    }

    info!(
        "searching c in 1..{} for ({}, {}, c) -> {}",
        params.upper_bound, params.a0, params.b0, params.target
    );
    let matches = search(&params, &cancelled, |m| {
        println!(
            "({}, {}, {}) -> a: {}  b: {}",
            params.a0, params.b0, m.c, m.outcome.a, m.outcome.b
        );
    })?;

    if cancelled.load(Ordering::Relaxed) {
        println!("interrupted; {} match(es) found so far", matches.len());
    } else if matches.is_empty() {
        println!("no match in 1..{}", params.upper_bound);
    } else {
        println!("match(es): {}", matches.iter().map(|m| m.c).join(", "));
    }
    Ok(())
}
