// small ini-style conf reader, same shape as the list files themselves:
// plain lines, sections in brackets, k = v inside
// unknown keys warn instead of failing so old confs keep working

#[cfg(debug_assertions)]
use std::fmt::Debug;
use std::path::Path;

use log::warn;

use crate::utils::read_lines;

// the generic part

pub trait Section {
	fn set(&mut self, k: &str, v: &str);
}

pub trait Conf: Sized {
	fn new() -> Self;
	fn sec_mut(&mut self, name: &str) -> &mut dyn Section;

	fn from(conf: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
		let mut ret = Self::new();
		let mut sec = None;
		for l in conf {
			let l = l.as_ref().trim_ascii();
			if l.is_empty() || l.starts_with('#') {
				// empty line or comment
			} else if l.starts_with("[") && l.ends_with("]") {
				// section name
				let name = l[1..l.len() - 1].trim_ascii();
				sec = Some(ret.sec_mut(name));
				continue;
			} else if let Some(sec) = sec.as_mut() {
				// k = v
				match l.split_once('=') {
					None => panic!("invalid line: {}", l),
					Some((k, v)) => {
						sec.set(k.trim_ascii_end(), v.trim_ascii_start());
					}
				}
			} else {
				warn!("invalid line, not in a section: {}", l);
			}
		}
		ret
	}

	fn from_file(conf: impl AsRef<Path>) -> Option<Self> {
		Some(Self::from(read_lines(conf)?))
	}
}

// the part specific to vpnset

#[cfg_attr(debug_assertions, derive(Debug))]
pub struct VpnSetConf {
	pub global: GlobalSec,
	pub lists: Vec<ListSec>,
}

impl Conf for VpnSetConf {
	fn new() -> Self {
		Self {
			global: GlobalSec::new(),
			lists: Vec::new(),
		}
	}
	fn sec_mut(&mut self, name: &str) -> &mut dyn Section {
		if name.to_ascii_lowercase().as_str() == "global" {
			&mut self.global
		} else {
			self.lists.push(ListSec::new(name));
			let len = self.lists.len();
			&mut self.lists[len - 1]
		}
	}
}

#[cfg_attr(debug_assertions, derive(Debug))]
pub struct GlobalSec {
	// seconds
	pub interval: u64,
	pub timeout: u64,
}

impl GlobalSec {
	fn new() -> Self {
		Self {
			interval: 3600,
			timeout: 10,
		}
	}
}

impl Section for GlobalSec {
	fn set(&mut self, k: &str, v: &str) {
		match k.to_ascii_lowercase().as_str() {
			"interval" => self.interval = v.parse().unwrap(),
			"timeout" => self.timeout = v.parse().unwrap(),
			_ => warn!("unknown key: {}", k),
		}
	}
}

#[cfg_attr(debug_assertions, derive(Debug))]
pub struct ListSec {
	pub name: String,
	pub urls: Vec<String>,
	pub files: Vec<String>,
}

impl ListSec {
	fn new(name: &str) -> Self {
		Self {
			name: name.to_string(),
			urls: Vec::new(),
			files: Vec::new(),
		}
	}
}

impl Section for ListSec {
	fn set(&mut self, k: &str, v: &str) {
		match k.to_ascii_lowercase().as_str() {
			"urls" => self.urls = v.split_ascii_whitespace().map(|s| s.to_string()).collect(),
			"files" => self.files = v.split_ascii_whitespace().map(|s| s.to_string()).collect(),
			_ => warn!("unknown key: \"{}\"", k),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test() {
		let conf = [
			"# refresh every 10 minutes",
			"[global]",
			"interval = 600",
			"timeout = 5",
			"",
			"[vpn v4]",
			"urls = https://example.com/vpn-ipv4.txt",
			"files = /var/lib/vpnset/vpn-ipv4.txt",
			"",
			"[vpn v6]",
			"urls = https://example.com/vpn-ipv6.txt",
		];
		let c = <VpnSetConf as Conf>::from(conf);
		assert_eq!(c.global.interval, 600);
		assert_eq!(c.global.timeout, 5);
		assert_eq!(c.lists.len(), 2);
		assert_eq!(c.lists[0].name, "vpn v4");
		assert_eq!(c.lists[0].urls.len(), 1);
		assert_eq!(c.lists[0].files.len(), 1);
		assert_eq!(c.lists[1].name, "vpn v6");
		assert!(c.lists[1].files.is_empty());
	}

	#[test]
	fn test_defaults() {
		let c = <VpnSetConf as Conf>::from([] as [&str; 0]);
		assert_eq!(c.global.interval, 3600);
		assert_eq!(c.global.timeout, 10);
		assert!(c.lists.is_empty());
	}
}
