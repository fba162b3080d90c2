// open addressing hash table from a top 32 bit word to its bucket descriptor
// never deleted from, rebuilt wholesale on refresh, so lookups always terminate

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Desc {
	Full,
	Partial { off: u32, len: u32 },
}

pub struct MetaTable {
	// 1-based indexes into keys/descs, 0 is an empty slot
	slots: Vec<u32>,
	keys: Vec<u32>,
	descs: Vec<Desc>,
	mask: u32,
}

impl MetaTable {
	pub fn with_capacity(entries: usize) -> Self {
		// power of two, at least 1.3x the entry count, so probing always hits a hole
		let need = (entries as f64 * 1.3).ceil() as usize;
		let cap = need.max(4).next_power_of_two();
		Self {
			slots: vec![0; cap],
			keys: Vec::with_capacity(entries),
			descs: Vec::with_capacity(entries),
			mask: (cap - 1) as u32,
		}
	}

	pub fn insert(&mut self, key: u32, desc: Desc) {
		self.keys.push(key);
		self.descs.push(desc);
		let mut i = hash(key) & self.mask;
		while self.slots[i as usize] != 0 {
			i = (i + 1) & self.mask;
		}
		self.slots[i as usize] = self.keys.len() as u32;
	}

	pub fn get(&self, key: u32) -> Option<Desc> {
		let mut i = hash(key) & self.mask;
		loop {
			let s = self.slots[i as usize];
			if s == 0 {
				return None;
			}
			let e = (s - 1) as usize;
			if self.keys[e] == key {
				return Some(self.descs[e]);
			}
			i = (i + 1) & self.mask;
		}
	}

	pub fn len(&self) -> usize {
		self.keys.len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}
}

fn hash(key: u32) -> u32 {
	key.wrapping_mul(2654435761)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test() {
		let keys = [
			0u32,
			1,
			2,
			0x20010db8,
			0x20010db9,
			0xdeadbeef,
			u32::MAX,
			// same low bits to force probing
			0x00010000,
			0x00020000,
			0x00030000,
		];
		let mut t = MetaTable::with_capacity(keys.len());
		for (i, k) in keys.iter().enumerate() {
			t.insert(
				*k,
				Desc::Partial {
					off: i as u32,
					len: 1,
				},
			);
		}
		assert_eq!(t.len(), keys.len());
		for (i, k) in keys.iter().enumerate() {
			assert_eq!(
				t.get(*k),
				Some(Desc::Partial {
					off: i as u32,
					len: 1,
				}),
				"key {:#x}",
				k
			);
		}
		for k in [3u32, 0x20010dba, 0x12345678] {
			assert_eq!(t.get(k), None, "key {:#x}", k);
		}
	}

	#[test]
	fn test_empty() {
		let t = MetaTable::with_capacity(0);
		assert!(t.is_empty());
		assert_eq!(t.get(0), None);
		assert_eq!(t.get(u32::MAX), None);
	}

	#[test]
	fn test_full_desc() {
		let mut t = MetaTable::with_capacity(1);
		t.insert(7, Desc::Full);
		assert_eq!(t.get(7), Some(Desc::Full));
		assert_eq!(t.get(8), None);
	}
}
