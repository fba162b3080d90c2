use std::time::Duration;

use log::*;
use tokio::{
	io::{stdin, AsyncBufReadExt, BufReader},
	select,
	signal::ctrl_c,
	time::interval,
};

use vpnset::{
	conf::{Conf, VpnSetConf},
	fetch::{refresh, Fetcher},
	vpnset::VpnSet,
};

// reads addresses line by line on stdin, answers "<input> true|false",
// refreshes the lists on the configured interval

#[tokio::main(flavor = "current_thread")]
async fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let conf_fn = if std::env::args().len() < 2 {
		"vpnset.conf".to_string()
	} else {
		std::env::args().nth(1).unwrap()
	};

	info!("read config from {}", &conf_fn);
	let conf = VpnSetConf::from_file(&conf_fn).unwrap();

	let set = VpnSet::new();
	let fetcher = Fetcher::new(Duration::from_secs(conf.global.timeout));

	let mut lines = BufReader::new(stdin()).lines();
	// first tick fires at once, that is the initial load
	let mut intv = interval(Duration::from_secs(conf.global.interval));

	loop {
		select! {
			_ = intv.tick() => {
				if !refresh(&fetcher, &conf, &set).await {
					warn!("refresh failed, keeping previous index");
				}
			}
			l = lines.next_line() => {
				match l {
					Ok(Some(l)) => {
						let l = l.trim_ascii();
						if !l.is_empty() {
							println!("{} {}", l, set.is_vpn(l));
						}
					}
					Ok(None) => {
						info!("stdin closed, exiting");
						break;
					}
					Err(e) => {
						error!("stdin read error: {}", e);
						break;
					}
				}
			}
			_ = ctrl_c() => {
				info!("ctrl-c received, exiting");
				break;
			}
		}
	}
}
