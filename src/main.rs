use leptos::prelude::*;
use log::warn;
use paper_graph_explorer::{App, host, init_logging};

fn main() {
	let (config, rejected) = host::load_config();
	init_logging(config.log_level());
	if let Some(err) = rejected {
		warn!("ignoring #{}: {err}", host::CONFIG_SCRIPT_ID);
	}

	mount_to_body(move || {
		view! { <App config=config /> }
	})
}
