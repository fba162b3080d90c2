use std::{
	fs::File,
	io::{BufRead, BufReader},
	path::Path,
};

use log::*;

pub fn read_lines(f: impl AsRef<Path>) -> Option<impl Iterator<Item = String>> {
	let f = f.as_ref();
	match File::open(f) {
		Err(e) => {
			warn!("failed to open {}: {:?}", f.display(), e);
			None
		}
		Ok(f) => Some(BufReader::new(f).lines().map_while(Result::ok)),
	}
}
