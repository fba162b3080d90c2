// list retrieval over HTTPS, based on reqwest
// a refresh is all or nothing: any failed source leaves the active pair alone

use std::time::Duration;

use log::*;
use reqwest::{tls::Version, Client};

use crate::{
	conf::VpnSetConf,
	utils::read_lines,
	vpnset::{Indexes, VpnSet},
};

pub struct Fetcher {
	client: Client,
}

impl Fetcher {
	pub fn new(timeout: Duration) -> Self {
		Self {
			client: Client::builder()
				.timeout(timeout)
				.min_tls_version(Version::TLS_1_2)
				.build()
				.unwrap(),
		}
	}

	pub async fn fetch(&self, url: &str) -> reqwest::Result<Vec<String>> {
		let res = self.client.get(url).send().await?.error_for_status()?;
		let body = res.text().await?;
		Ok(body.lines().map(|l| l.to_string()).collect())
	}
}

// gather every configured source, then build and publish in one go
pub async fn refresh(fetcher: &Fetcher, conf: &VpnSetConf, set: &VpnSet) -> bool {
	let mut lines: Vec<String> = Vec::new();
	for list in &conf.lists {
		for f in &list.files {
			match read_lines(f) {
				Some(it) => lines.extend(it),
				None => {
					warn!("list {}: abort refresh", list.name);
					return false;
				}
			}
		}
		for url in &list.urls {
			match fetcher.fetch(url).await {
				Ok(l) => {
					info!("list {}: fetched {} lines from {}", list.name, l.len(), url);
					lines.extend(l);
				}
				Err(e) => {
					warn!("list {}: fetch {} failed: {}", list.name, url, e);
					return false;
				}
			}
		}
	}
	set.publish(Indexes::build(lines));
	true
}
