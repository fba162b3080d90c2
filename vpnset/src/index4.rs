// 32 bit index: one descriptor per high 16 bit bucket,
// partial buckets share two packed arrays of low 16 bit bounds

use std::collections::BTreeMap;

use crate::range::{merge, Range, Range4};

const BUCKETS: usize = 1 << 16;

#[derive(Clone, Copy)]
enum Bucket {
	Empty,
	Full,
	Partial { off: u32, len: u32 },
}

pub struct Ipv4Index {
	buckets: Vec<Bucket>,
	starts: Vec<u16>,
	ends: Vec<u16>,
}

impl Ipv4Index {
	pub fn empty() -> Self {
		Self {
			buckets: vec![Bucket::Empty; BUCKETS],
			starts: Vec::new(),
			ends: Vec::new(),
		}
	}

	// ranges must be merged already
	pub fn build(ranges: &[Range4]) -> Self {
		let mut buckets = vec![Bucket::Empty; BUCKETS];
		let mut pending: BTreeMap<u16, Vec<Range<u16>>> = BTreeMap::new();
		for r in ranges {
			let h0 = (r.start >> 16) as u16;
			let h1 = (r.end >> 16) as u16;
			for h in h0..=h1 {
				if matches!(buckets[h as usize], Bucket::Full) {
					continue;
				}
				let lo0 = if h == h0 { r.start as u16 } else { 0 };
				let lo1 = if h == h1 { r.end as u16 } else { u16::MAX };
				if lo0 == 0 && lo1 == u16::MAX {
					buckets[h as usize] = Bucket::Full;
					pending.remove(&h);
				} else {
					pending
						.entry(h)
						.or_default()
						.push(Range { start: lo0, end: lo1 });
				}
			}
		}

		// merge each bucket's list, promote any that turned out full
		let mut total = 0;
		for (h, list) in pending.iter_mut() {
			merge(list);
			if list.len() == 1 && list[0].start == 0 && list[0].end == u16::MAX {
				buckets[*h as usize] = Bucket::Full;
				list.clear();
			} else {
				total += list.len();
			}
		}

		// flatten into the two packed arrays, sized up front
		let mut starts = Vec::with_capacity(total);
		let mut ends = Vec::with_capacity(total);
		for (h, list) in pending {
			if list.is_empty() {
				continue;
			}
			buckets[h as usize] = Bucket::Partial {
				off: starts.len() as u32,
				len: list.len() as u32,
			};
			for r in list {
				starts.push(r.start);
				ends.push(r.end);
			}
		}
		Self {
			buckets,
			starts,
			ends,
		}
	}

	pub fn contains(&self, a: u32) -> bool {
		match self.buckets[(a >> 16) as usize] {
			Bucket::Empty => false,
			Bucket::Full => true,
			Bucket::Partial { off, len } => {
				let lo = a as u16;
				let (off, len) = (off as usize, len as usize);
				// greatest start <= lo
				let i = self.starts[off..off + len].partition_point(|&s| s <= lo);
				i > 0 && lo <= self.ends[off + i - 1]
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::addr;
	use crate::range::v4_cidr;

	fn build(cidrs: &[&str]) -> (Ipv4Index, Vec<Range4>) {
		let mut v: Vec<Range4> = cidrs.iter().map(|c| v4_cidr(c).unwrap()).collect();
		merge(&mut v);
		(Ipv4Index::build(&v), v)
	}

	fn has(idx: &Ipv4Index, a: &str) -> bool {
		idx.contains(addr::v4(a).unwrap())
	}

	#[test]
	fn test() {
		let (idx, _) = build(&["10.0.0.0/8", "192.168.1.128/25", "1.2.3.4/32"]);
		for (a, e) in [
			// /8 spans 256 full buckets, both ends inclusive
			("9.255.255.255", false),
			("10.0.0.0", true),
			("10.1.2.3", true),
			("10.255.255.255", true),
			("11.0.0.0", false),
			// partial bucket
			("192.168.1.127", false),
			("192.168.1.128", true),
			("192.168.1.255", true),
			("192.168.2.0", false),
			// single address
			("1.2.3.3", false),
			("1.2.3.4", true),
			("1.2.3.5", false),
		] {
			assert_eq!(has(&idx, a), e, "{}", a);
		}
	}

	#[test]
	fn test_multiple_subranges_per_bucket() {
		let (idx, _) = build(&["192.168.1.0/30", "192.168.1.8/30", "192.168.1.16/30"]);
		for (a, e) in [
			("192.168.1.0", true),
			("192.168.1.3", true),
			("192.168.1.4", false),
			("192.168.1.7", false),
			("192.168.1.8", true),
			("192.168.1.11", true),
			("192.168.1.12", false),
			("192.168.1.16", true),
			("192.168.1.19", true),
			("192.168.1.20", false),
		] {
			assert_eq!(has(&idx, a), e, "{}", a);
		}
	}

	#[test]
	fn test_adjacent_halves_become_full() {
		// two /17s cover a whole bucket once merged
		let (idx, v) = build(&["5.5.0.0/17", "5.5.128.0/17"]);
		assert_eq!(v.len(), 1);
		assert!(has(&idx, "5.5.0.0"));
		assert!(has(&idx, "5.5.127.255"));
		assert!(has(&idx, "5.5.128.0"));
		assert!(has(&idx, "5.5.255.255"));
		assert!(!has(&idx, "5.4.255.255"));
		assert!(!has(&idx, "5.6.0.0"));
	}

	#[test]
	fn test_empty() {
		let idx = Ipv4Index::empty();
		assert!(!idx.contains(0));
		assert!(!idx.contains(u32::MAX));
		let built = Ipv4Index::build(&[]);
		assert!(!built.contains(0x0a000001));
	}

	#[test]
	fn test_random_against_model() {
		use rand::{rngs::StdRng, Rng, SeedableRng};
		let (idx, merged) = build(&[
			"10.0.0.0/8",
			"172.16.0.0/12",
			"192.168.0.0/16",
			"8.8.8.0/24",
			"1.0.0.0/24",
			"1.0.2.0/23",
			"203.0.113.7/32",
		]);
		let model = |a: u32| merged.iter().any(|r| r.start <= a && a <= r.end);
		let mut rng = StdRng::seed_from_u64(0x2a);
		for _ in 0..10000 {
			let a: u32 = rng.random();
			assert_eq!(idx.contains(a), model(a), "{:#010x}", a);
		}
		// and the boundaries themselves
		for r in &merged {
			assert!(idx.contains(r.start));
			assert!(idx.contains(r.end));
			if let Some(e) = r.end.checked_add(1) {
				assert_eq!(idx.contains(e), model(e));
			}
			if let Some(s) = r.start.checked_sub(1) {
				assert_eq!(idx.contains(s), model(s));
			}
		}
	}
}
