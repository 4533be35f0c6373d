//! Lazily fetched long-form summaries keyed by canonical link.
//!
//! The summary file is fetched at most once per cache. Concurrent callers
//! share the same in-flight load; later callers read the in-memory index.
//! Entries are never evicted: the dataset is small and static.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use log::{info, warn};
use url::Url;

use super::error::{DataError, Result};
use super::store::DataSource;
use super::types::{Summary, SummaryFile};

/// Strips the fragment and query string so link variants share one key.
pub fn canonical_url(raw: &str) -> String {
	let raw = raw.trim();
	if let Ok(mut url) = Url::parse(raw) {
		if url.has_host() {
			url.set_fragment(None);
			url.set_query(None);
			return url.into();
		}
	}
	let end = raw.find(['?', '#']).unwrap_or(raw.len());
	raw[..end].to_owned()
}

/// Summaries indexed by canonical primary key and by canonical link.
#[derive(Debug, Default)]
pub struct SummaryIndex {
	by_key: HashMap<String, Rc<Summary>>,
}

impl SummaryIndex {
	pub fn from_file(file: SummaryFile) -> Self {
		let mut by_key = HashMap::with_capacity(file.summaries.len() * 2);
		for (key, summary) in file.summaries {
			let summary = Rc::new(summary);
			if let Some(link) = summary.link.as_deref().filter(|l| !l.trim().is_empty()) {
				by_key
					.entry(canonical_url(link))
					.or_insert_with(|| summary.clone());
			}
			by_key.insert(canonical_url(&key), summary);
		}
		Self { by_key }
	}

	pub fn parse(json: &str) -> Result<Self> {
		let file: SummaryFile = serde_json::from_str(json)?;
		Ok(Self::from_file(file))
	}

	pub fn get(&self, key: &str) -> Option<Rc<Summary>> {
		self.by_key.get(&canonical_url(key)).cloned()
	}

	pub fn len(&self) -> usize {
		self.by_key.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_key.is_empty()
	}
}

type SharedLoad = Shared<LocalBoxFuture<'static, std::result::Result<Rc<SummaryIndex>, DataError>>>;

enum CacheState {
	Empty,
	Loading(SharedLoad),
	Ready(Rc<SummaryIndex>),
	Failed(DataError),
}

/// Single-flight, memoized access to the summary dataset.
///
/// Construct one per application and hand it to the views that need it. It
/// lives as long as its owner; tests create a fresh one per case.
pub struct SummaryCache<S> {
	source: Rc<S>,
	state: RefCell<CacheState>,
}

impl<S: DataSource + 'static> SummaryCache<S> {
	pub fn new(source: S) -> Self {
		Self {
			source: Rc::new(source),
			state: RefCell::new(CacheState::Empty),
		}
	}

	/// Summary for `url` (or a primary key), `Ok(None)` when the file has no
	/// such entry. A failed load is terminal and returned to every caller.
	pub async fn get_summary(&self, url: &str) -> Result<Option<Rc<Summary>>> {
		let index = self.index().await?;
		Ok(index.get(url))
	}

	/// Whether the summary file has been loaded.
	pub fn is_ready(&self) -> bool {
		matches!(*self.state.borrow(), CacheState::Ready(_))
	}

	async fn index(&self) -> Result<Rc<SummaryIndex>> {
		let pending = {
			let mut state = self.state.borrow_mut();
			let in_flight = match &*state {
				CacheState::Ready(index) => return Ok(index.clone()),
				CacheState::Failed(err) => return Err(err.clone()),
				CacheState::Loading(load) => Some(load.clone()),
				CacheState::Empty => None,
			};
			match in_flight {
				Some(load) => load,
				None => {
					let load = Self::start_load(self.source.clone());
					*state = CacheState::Loading(load.clone());
					load
				}
			}
		};

		let outcome = pending.await;
		let mut state = self.state.borrow_mut();
		if matches!(*state, CacheState::Loading(_)) {
			*state = match &outcome {
				Ok(index) => CacheState::Ready(index.clone()),
				Err(err) => CacheState::Failed(err.clone()),
			};
		}
		outcome
	}

	fn start_load(source: Rc<S>) -> SharedLoad {
		async move {
			info!("fetching summaries from {}", source.location());
			let body = source.fetch_text().await;
			let index = body.and_then(|body| SummaryIndex::parse(&body));
			match &index {
				Ok(index) => info!("summaries loaded: {} keys", index.len()),
				Err(err) => warn!("summary load failed: {err}"),
			}
			index.map(Rc::new)
		}
		.boxed_local()
		.shared()
	}
}
