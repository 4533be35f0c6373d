//! Error types for dataset loading and configuration.

use thiserror::Error;

use super::types::NodeId;

/// Result alias for engine operations that touch external data.
pub type Result<T> = std::result::Result<T, DataError>;

/// Failure while fetching or decoding one of the two datasets.
///
/// `Clone` because a single in-flight summary load is shared by every caller
/// awaiting it, and each of them receives the same outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
	/// The request was rejected or answered with a non-success status.
	#[error("failed to fetch {url}: {reason}")]
	Transport {
		/// Requested location.
		url: String,
		/// Status line or rejection message.
		reason: String,
	},

	/// The payload was not valid JSON or did not have the expected shape.
	#[error("malformed payload: {0}")]
	Malformed(String),

	/// A link references a node id that is not in the dataset.
	#[error("link {from} -> {to} references a missing node")]
	DanglingLink {
		/// Link source id.
		from: NodeId,
		/// Link target id.
		to: NodeId,
	},
}

impl From<serde_json::Error> for DataError {
	fn from(err: serde_json::Error) -> Self {
		DataError::Malformed(err.to_string())
	}
}

/// Invalid explorer configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
	/// The inline configuration block could not be decoded.
	#[error("invalid configuration JSON: {0}")]
	Parse(String),

	/// A field holds a value outside its allowed range.
	#[error("invalid value for `{field}`: {message}")]
	InvalidValue {
		/// Offending field name.
		field: &'static str,
		/// What is wrong with it.
		message: String,
	},
}
