use std::{collections::HashMap, net::SocketAddr, time::Duration};

use config::{Config, Environment};
use serde::Deserialize;

use crate::{
	diff::{Granularity, LcsEngine, MyersEngine},
	errors::RdError,
	BoxedEngine, DEFAULT_BIND, DEFAULT_ENGINE, DEFAULT_MAX_CELLS,
	DEFAULT_TIMEOUT_MS,
};

const ENV_PREFIX: &str = "REVDIFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
	Myers,
	Words,
	Lcs,
}

/// Runtime settings. Defaults come from the build, `REVDIFF_*` environment
/// variables override them.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
	pub bind: String,
	pub engine: EngineKind,
	pub max_cells: usize,
	/// Zero disables the deadline.
	pub timeout_ms: u64,
}

impl Settings {
	pub fn load() -> Result<Self, RdError> {
		Self::from_vars(None)
	}

	fn from_vars(
		vars: Option<HashMap<String, String>>,
	) -> Result<Self, RdError> {
		let settings = Config::builder()
			.set_default("bind", DEFAULT_BIND)?
			.set_default("engine", DEFAULT_ENGINE)?
			.set_default("max_cells", DEFAULT_MAX_CELLS)?
			.set_default("timeout_ms", DEFAULT_TIMEOUT_MS)?
			.add_source(
				Environment::with_prefix(ENV_PREFIX)
					.try_parsing(true)
					.source(vars),
			)
			.build()?;

		Ok(settings.try_deserialize()?)
	}

	pub fn addr(&self) -> Result<SocketAddr, RdError> {
		self.bind.parse().map_err(|_| {
			RdError::InvalidArgument(format!("bind address `{}`", self.bind))
		})
	}

	pub fn timeout(&self) -> Option<Duration> {
		(self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
	}

	pub fn engine(&self) -> BoxedEngine {
		match self.engine {
			EngineKind::Myers => {
				Box::new(MyersEngine::new(Granularity::Chars, self.timeout()))
			}
			EngineKind::Words => {
				Box::new(MyersEngine::new(Granularity::Words, self.timeout()))
			}
			EngineKind::Lcs => Box::new(LcsEngine::new(self.max_cells)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::diff::{EditOp, Engine};

	fn vars(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
		Some(
			pairs
				.iter()
				.map(|(k, v)| (k.to_string(), v.to_string()))
				.collect(),
		)
	}

	#[test]
	fn defaults() {
		let settings = Settings::from_vars(vars(&[])).unwrap();

		assert_eq!(settings.bind, "127.0.0.1:8080");
		assert_eq!(settings.engine, EngineKind::Myers);
		assert_eq!(settings.max_cells, 4_000_000);
		assert_eq!(settings.timeout(), Some(Duration::from_secs(1)));
		assert_eq!(settings.addr().unwrap().port(), 8080);
	}

	#[test]
	fn environment_overrides() {
		let settings = Settings::from_vars(vars(&[
			("REVDIFF_BIND", "0.0.0.0:9000"),
			("REVDIFF_ENGINE", "lcs"),
			("REVDIFF_MAX_CELLS", "100"),
			("REVDIFF_TIMEOUT_MS", "0"),
		]))
		.unwrap();

		assert_eq!(settings.addr().unwrap().port(), 9000);
		assert_eq!(settings.engine, EngineKind::Lcs);
		assert_eq!(settings.max_cells, 100);
		assert_eq!(settings.timeout(), None);
	}

	#[test]
	fn unknown_engine() {
		let result = Settings::from_vars(vars(&[("REVDIFF_ENGINE", "patience")]));
		assert!(matches!(result, Err(RdError::Config(_))));
	}

	#[test]
	fn bad_bind_address() {
		let settings =
			Settings::from_vars(vars(&[("REVDIFF_BIND", "localhost")])).unwrap();
		assert!(matches!(settings.addr(), Err(RdError::InvalidArgument(_))));
	}

	#[test]
	fn engine_from_settings() {
		let settings =
			Settings::from_vars(vars(&[("REVDIFF_ENGINE", "words")])).unwrap();
		let engine = settings.engine();

		assert_eq!(
			engine.edits("a b", "a c"),
			vec![
				EditOp::Equal("a ".into()),
				EditOp::Delete("b".into()),
				EditOp::Insert("c".into()),
			]
		);
	}
}
