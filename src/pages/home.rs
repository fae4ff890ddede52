use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;

use crate::api::{self, AbortHandle};
use crate::components::activity_feed::ActivityFeed;
use crate::components::discovery_question::DiscoveryQuestion;
use crate::components::discovery_result::DiscoveryResultCard;
use crate::components::force_graph::HighlightPath;
use crate::components::graph_view::GraphView;
use crate::components::publication_upload::PublicationUpload;
use crate::config::{AppConfig, DISCOVER_STREAM_PATH};
use crate::discovery::{CancelSlot, SessionController, SessionOutcome, SessionStatus, drive};

/// Discovery page. Owns the session; every stream update goes through its ticket check.
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let session = RwSignal::new(SessionController::new());
	let abort = StoredValue::new_local(CancelSlot::<AbortHandle>::default());
	let stream_url = config.endpoint(DISCOVER_STREAM_PATH);

	let on_discover = Callback::new(move |question: String| {
		let Some(started) = session.try_update(|s| s.begin(&question)) else {
			return;
		};
		let ticket = match started {
			Ok(ticket) => ticket,
			Err(e) => {
				debug!("discovery not started: {}", e);
				return;
			}
		};
		// Armed before the request goes out so stop also cancels a pending fetch.
		let handle = match AbortHandle::new() {
			Ok(handle) => handle,
			Err(e) => {
				session.update(|s| s.finish(&ticket, SessionOutcome::Failed(e)));
				return;
			}
		};
		abort.update_value(|slot| slot.arm(&ticket, handle.clone()));

		let url = stream_url.clone();
		spawn_local(async move {
			let outcome = match api::open_discovery_stream(&url, ticket.question(), &handle).await {
				Ok(mut source) => {
					drive(
						&mut source,
						|| {
							session
								.try_with_untracked(|s| s.is_current(&ticket))
								.unwrap_or(false)
						},
						js_sys::Date::now,
						|event| session.try_update(|s| s.record(&ticket, event)).unwrap_or(false),
					)
					.await
				}
				Err(e) => SessionOutcome::Failed(e),
			};
			session.try_update(|s| s.finish(&ticket, outcome));
			abort.try_update_value(|slot| slot.release(&ticket));
		});
	});

	let on_stop = Callback::new(move |_: ()| {
		session.update(|s| s.cancel());
		if let Some(handle) = abort.try_update_value(|slot| slot.take()).flatten() {
			handle.abort();
		}
	});

	let on_close = Callback::new(move |_: ()| session.update(|s| s.dismiss()));

	let loading = Signal::derive(move || session.with(|s| s.is_running()));
	let entries = Signal::derive(move || session.with(|s| s.log().to_vec()));
	let result = Memo::new(move |_| session.with(|s| s.result().cloned()));
	let highlight = Memo::new(move |_| {
		result.with(|r| r.as_ref().map(|r| HighlightPath::from_top_path(&r.top_path)))
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div class="page">
				<header class="page-header">
					<h1>"Drug Repurposing Discovery Platform"</h1>
					<p class="subtitle">"AI-Powered Knowledge Graph for Pharma R&D"</p>
				</header>
				<div class="columns">
					<div class="column">
						<DiscoveryQuestion on_discover=on_discover on_stop=on_stop loading=loading />
						{move || {
							session
								.with(|s| match s.status() {
									SessionStatus::Failed(msg) => Some(("banner banner-error", msg.clone())),
									SessionStatus::Cancelled => {
										Some(("banner banner-info", "Discovery stopped.".to_string()))
									}
									_ => None,
								})
								.map(|(class, msg)| view! { <div class=class>{msg}</div> })
						}}
						<ActivityFeed entries=entries active=loading />
						<PublicationUpload />
					</div>
					<div class="column column-wide">
						{move || {
							result
								.get()
								.map(|result| {
									view! { <DiscoveryResultCard result=result on_close=on_close /> }
								})
						}}
						<GraphView highlight=highlight />
					</div>
				</div>
			</div>
		</ErrorBoundary>
	}
}
