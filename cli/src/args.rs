use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
pub struct CliArgs {
	#[command(subcommand)]
	pub cmd: Cmd,
}

#[derive(Args)]
pub struct CheckArgs {
	// CIDR list files, one address/prefix per line
	#[arg(short, long)]
	pub list: Vec<String>,

	pub addrs: Vec<String>,
}

#[derive(Args)]
pub struct FetchArgs {
	#[arg(long, default_value_t = 10)]
	pub timeout: u64,

	pub urls: Vec<String>,

	#[arg(short, long)]
	pub addr: Vec<String>,
}

#[derive(Args)]
pub struct BenchArgs {
	#[arg(short, long)]
	pub list: Vec<String>,

	#[arg(long, default_value_t = 100_000)]
	pub count: usize,
}

#[derive(Subcommand)]
pub enum Cmd {
	Check(CheckArgs),
	Fetch(FetchArgs),
	Bench(BenchArgs),
}
