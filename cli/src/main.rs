use std::time::{Duration, Instant};

use clap::Parser;
use log::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

use vpnset::{
	fetch::Fetcher,
	utils::read_lines,
	vpnset::{Indexes, VpnSet},
};

mod args;
use args::*;

#[tokio::main(flavor = "current_thread")]
async fn main() {
	let args = CliArgs::parse();

	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	match args.cmd {
		Cmd::Check(args) => check(args),
		Cmd::Fetch(args) => fetch(args).await,
		Cmd::Bench(args) => bench(args),
	}
}

fn load_files(files: &[String]) -> Indexes {
	let mut lines: Vec<String> = Vec::new();
	for f in files {
		lines.extend(read_lines(f).unwrap());
	}
	Indexes::build(lines)
}

fn check(args: CheckArgs) {
	let idx = load_files(&args.list);
	for a in &args.addrs {
		println!("{} {}", a, idx.contains(a));
	}
}

async fn fetch(args: FetchArgs) {
	let fetcher = Fetcher::new(Duration::from_secs(args.timeout));
	let mut lines: Vec<String> = Vec::new();
	for url in &args.urls {
		let t0 = Instant::now();
		let l = fetcher.fetch(url).await.unwrap();
		info!(
			"fetched {} lines from {} in {:.0} ms",
			l.len(),
			url,
			t0.elapsed().as_secs_f32() * 1000.0
		);
		lines.extend(l);
	}
	let set = VpnSet::new();
	set.publish(Indexes::build(lines));
	for a in &args.addr {
		println!("{} {}", a, set.is_vpn(a));
	}
}

fn bench(args: BenchArgs) {
	let set = VpnSet::new();
	set.publish(load_files(&args.list));

	// half v4, half v6, through the full text hot path
	let mut rng = StdRng::seed_from_u64(0x2a);
	let addrs: Vec<String> = (0..args.count)
		.map(|i| {
			if i % 2 == 0 {
				let a: u32 = rng.random();
				format!(
					"{}.{}.{}.{}",
					a >> 24,
					a >> 16 & 0xff,
					a >> 8 & 0xff,
					a & 0xff
				)
			} else {
				let w: [u32; 4] = rng.random();
				format!(
					"{:x}:{:x}:{:x}:{:x}:{:x}:{:x}:{:x}:{:x}",
					w[0] >> 16,
					w[0] & 0xffff,
					w[1] >> 16,
					w[1] & 0xffff,
					w[2] >> 16,
					w[2] & 0xffff,
					w[3] >> 16,
					w[3] & 0xffff
				)
			}
		})
		.collect();

	let mut hits = 0usize;
	let t0 = Instant::now();
	for a in &addrs {
		if set.is_vpn(a) {
			hits += 1;
		}
	}
	let cost = t0.elapsed().as_secs_f32();
	info!(
		"{} lookups ({} hits) in {:.3} ms, {:.0} per second",
		addrs.len(),
		hits,
		cost * 1000.0,
		addrs.len() as f32 / cost
	);
}
