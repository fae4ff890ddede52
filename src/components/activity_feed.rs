//! Timestamped progress log of the running session.

use leptos::prelude::*;

use crate::discovery::ProgressEvent;

/// `HH:MM:SS` in local time for an epoch-millisecond timestamp.
fn clock_time(timestamp: f64) -> String {
	let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
	format_hms(date.get_hours(), date.get_minutes(), date.get_seconds())
}

fn format_hms(hours: u32, minutes: u32, seconds: u32) -> String {
	format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Width of the progress bar, in percent.
fn bar_width(progress: f64) -> f64 {
	if progress.is_finite() { progress.clamp(0.0, 100.0) } else { 0.0 }
}

/// Agent activity log of the current session.
#[component]
pub fn ActivityFeed(
	/// Events in arrival order.
	#[prop(into)]
	entries: Signal<Vec<ProgressEvent>>,
	/// A session is streaming.
	#[prop(into)]
	active: Signal<bool>,
) -> impl IntoView {
	let progress = Signal::derive(move || {
		entries.with(|e| e.last().map(|ev| bar_width(ev.progress)).unwrap_or(0.0))
	});

	view! {
		<Show when=move || active.get() || entries.with(|e| !e.is_empty())>
			<div class="panel activity-feed">
				<h3>
					<Show when=move || active.get()>
						<span class="spinner"></span>
					</Show>
					"Agent Activity"
				</h3>
				<ol class="activity-entries">
					{move || {
						entries
							.get()
							.into_iter()
							.map(|event| {
								view! {
									<li class="activity-entry">
										<span class="activity-time">{clock_time(event.timestamp)}</span>
										<span class="activity-message">{event.message}</span>
									</li>
								}
							})
							.collect_view()
					}}
				</ol>
				<Show when=move || active.get()>
					<div class="progress-track">
						<div
							class="progress-bar"
							style=move || format!("width: {}%;", progress.get())
						></div>
					</div>
				</Show>
			</div>
		</Show>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pads_clock_fields() {
		assert_eq!(format_hms(9, 5, 3), "09:05:03");
		assert_eq!(format_hms(23, 59, 59), "23:59:59");
	}

	#[test]
	fn bar_width_is_bounded() {
		assert_eq!(bar_width(42.0), 42.0);
		assert_eq!(bar_width(180.0), 100.0);
		assert_eq!(bar_width(f64::NAN), 0.0);
	}
}
