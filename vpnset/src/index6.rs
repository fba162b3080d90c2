// 128 bit index: ranges crossing a top word boundary stay whole as super
// ranges, the rest bucket by their top word through the meta table down to
// packed 96 bit sub-ranges, one array per word

use std::collections::{BTreeMap, BTreeSet};

use crate::meta::{Desc, MetaTable};
use crate::range::{merge, Range, Range6};

pub struct Ipv6Index {
	supers: Vec<Range6>,
	meta: MetaTable,
	start_hi: Vec<u32>,
	start_mid: Vec<u32>,
	start_lo: Vec<u32>,
	end_hi: Vec<u32>,
	end_mid: Vec<u32>,
	end_lo: Vec<u32>,
}

impl Ipv6Index {
	pub fn empty() -> Self {
		Self::build(&[])
	}

	// ranges must be merged already, so per bucket lists arrive sorted
	// and a super range never overlaps bucketed content
	pub fn build(ranges: &[Range6]) -> Self {
		let mut supers = Vec::new();
		let mut full: BTreeSet<u32> = BTreeSet::new();
		let mut pending: BTreeMap<u32, Vec<Range<[u32; 3]>>> = BTreeMap::new();
		for r in ranges {
			if r.start[0] != r.end[0] {
				supers.push(*r);
				continue;
			}
			let key = r.start[0];
			if full.contains(&key) {
				continue;
			}
			let lo0 = [r.start[1], r.start[2], r.start[3]];
			let lo1 = [r.end[1], r.end[2], r.end[3]];
			if lo0 == [0; 3] && lo1 == [u32::MAX; 3] {
				full.insert(key);
				pending.remove(&key);
			} else {
				pending
					.entry(key)
					.or_default()
					.push(Range { start: lo0, end: lo1 });
			}
		}

		let mut total = 0;
		for (key, list) in pending.iter_mut() {
			merge(list);
			if list.len() == 1 && list[0].start == [0; 3] && list[0].end == [u32::MAX; 3] {
				full.insert(*key);
				list.clear();
			} else {
				total += list.len();
			}
		}
		pending.retain(|_, list| !list.is_empty());

		supers.sort_by_key(|r| r.start);

		let mut meta = MetaTable::with_capacity(full.len() + pending.len());
		for key in full {
			meta.insert(key, Desc::Full);
		}
		let mut idx = Self {
			supers,
			meta,
			start_hi: Vec::with_capacity(total),
			start_mid: Vec::with_capacity(total),
			start_lo: Vec::with_capacity(total),
			end_hi: Vec::with_capacity(total),
			end_mid: Vec::with_capacity(total),
			end_lo: Vec::with_capacity(total),
		};
		for (key, list) in pending {
			idx.meta.insert(
				key,
				Desc::Partial {
					off: idx.start_hi.len() as u32,
					len: list.len() as u32,
				},
			);
			for r in list {
				idx.start_hi.push(r.start[0]);
				idx.start_mid.push(r.start[1]);
				idx.start_lo.push(r.start[2]);
				idx.end_hi.push(r.end[0]);
				idx.end_mid.push(r.end[1]);
				idx.end_lo.push(r.end[2]);
			}
		}
		idx
	}

	pub fn contains(&self, a: [u32; 4]) -> bool {
		// wide ranges first, a covering super range settles it
		let i = self.supers.partition_point(|r| r.start <= a);
		if i > 0 && a <= self.supers[i - 1].end {
			return true;
		}
		match self.meta.get(a[0]) {
			None => false,
			Some(Desc::Full) => true,
			Some(Desc::Partial { off, len }) => {
				self.search96(off as usize, len as usize, [a[1], a[2], a[3]])
			}
		}
	}

	// greatest sub-range start <= q, then check q against its end,
	// comparing hi, mid, lo words in order
	fn search96(&self, off: usize, len: usize, q: [u32; 3]) -> bool {
		let (mut lo, mut hi) = (0, len);
		while lo < hi {
			let mid = (lo + hi) / 2;
			let s = [
				self.start_hi[off + mid],
				self.start_mid[off + mid],
				self.start_lo[off + mid],
			];
			if s <= q {
				lo = mid + 1;
			} else {
				hi = mid;
			}
		}
		if lo == 0 {
			return false;
		}
		let e = [
			self.end_hi[off + lo - 1],
			self.end_mid[off + lo - 1],
			self.end_lo[off + lo - 1],
		];
		q <= e
	}
}
