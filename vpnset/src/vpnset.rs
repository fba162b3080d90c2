use std::sync::Arc;

use arc_swap::ArcSwap;
use log::*;

use crate::{
	addr::{self, Addr, Family},
	index4::Ipv4Index,
	index6::Ipv6Index,
	range::{self, merge, Range4, Range6},
};

// one refresh cycle's output, built off to the side and swapped in whole
pub struct Indexes {
	v4: Ipv4Index,
	v6: Ipv6Index,
}

impl Indexes {
	pub fn empty() -> Self {
		Self {
			v4: Ipv4Index::empty(),
			v6: Ipv6Index::empty(),
		}
	}

	pub fn build(lines: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
		let mut lists = Lists::new();
		let c = lists.append_from(lines);
		let idx = lists.index();
		info!("indexed {} entries", c);
		idx
	}

	pub fn contains(&self, a: &str) -> bool {
		match addr::parse(a) {
			Some(Addr::V4(a)) => self.v4.contains(a),
			Some(Addr::V6(a)) => self.v6.contains(a),
			None => false,
		}
	}
}

// CIDR lines collected per family, then merged and indexed
pub struct Lists {
	v4: Vec<Range4>,
	v6: Vec<Range6>,
}

impl Lists {
	#[allow(clippy::new_without_default)]
	pub fn new() -> Self {
		Self {
			v4: Vec::new(),
			v6: Vec::new(),
		}
	}

	pub fn append_line(&mut self, l: &str) -> Option<()> {
		match addr::family(l)? {
			Family::V4 => self.v4.push(range::v4_cidr(l)?),
			Family::V6 => self.v6.push(range::v6_cidr(l)?),
		}
		Some(())
	}

	// one bad line must not spoil the load, skip it and move on
	pub fn append_from(&mut self, lst: impl IntoIterator<Item = impl AsRef<str>>) -> usize {
		let mut c = 0;
		for l in lst {
			let l = l.as_ref();
			let l = l.trim_ascii();
			if l.is_empty() || l.starts_with('#') {
				continue;
			}
			if self.append_line(l).is_some() {
				c += 1;
			} else {
				warn!("invalid line: {}", l);
			}
		}
		c
	}

	pub fn index(mut self) -> Indexes {
		merge(&mut self.v4);
		merge(&mut self.v6);
		debug!("{} v4 + {} v6 ranges after merge", self.v4.len(), self.v6.len());
		Indexes {
			v4: Ipv4Index::build(&self.v4),
			v6: Ipv6Index::build(&self.v6),
		}
	}
}

// the active pair; queries read it lock free, a refresh swaps both
// indexes as one unit and the old pair drops with its last reader
pub struct VpnSet {
	active: ArcSwap<Indexes>,
}

impl VpnSet {
	#[allow(clippy::new_without_default)]
	pub fn new() -> Self {
		Self {
			active: ArcSwap::from_pointee(Indexes::empty()),
		}
	}

	pub fn publish(&self, idx: Indexes) {
		self.active.store(Arc::new(idx));
	}

	pub fn is_vpn(&self, a: &str) -> bool {
		self.active.load().contains(a)
	}
}
