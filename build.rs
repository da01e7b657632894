use std::{env, fs, fs::File, io::Write, path::Path};

use quote::quote;

const CONFIG_FILE: &str = "config.rs";

fn main() {
	println!("cargo:rerun-if-changed=static/index.html");

	let mut file = File::create(
		Path::new(&env::var("OUT_DIR").unwrap()).join(CONFIG_FILE),
	)
	.unwrap();

	let index_html = fs::read_to_string("static/index.html").unwrap();

	let bind = "127.0.0.1:8080";
	let engine = "myers";
	// LCS table size; roughly 2000 x 2000 chars of differing middle.
	let max_cells: i64 = 4_000_000;
	let timeout_ms: i64 = 1_000;

	let config = quote! {
		const DEFAULT_BIND: &str = #bind;
		const DEFAULT_ENGINE: &str = #engine;
		const DEFAULT_MAX_CELLS: i64 = #max_cells;
		const DEFAULT_TIMEOUT_MS: i64 = #timeout_ms;

		const INDEX_HTML: &str = #index_html;
	};

	writeln!(file, "{config}").unwrap();
}
