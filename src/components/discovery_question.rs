//! Question form with example prompts.

use leptos::prelude::*;

/// Prompts offered under the input.
pub const EXAMPLE_QUESTIONS: &[&str] = &[
	"Could semaglutide treat obesity?",
	"What drugs might help with Alzheimer's disease?",
	"Are there connections between metformin and longevity?",
];

/// Whether the form may submit `question` right now.
pub fn can_submit(question: &str, loading: bool) -> bool {
	!loading && !question.trim().is_empty()
}

/// Question form. `on_discover` receives the trimmed question.
#[component]
pub fn DiscoveryQuestion(
	/// Called with the trimmed question on submit.
	on_discover: Callback<String>,
	/// Called when the user stops a running session.
	on_stop: Callback<()>,
	/// A session is running; submit is disabled and stop is shown.
	#[prop(into)]
	loading: Signal<bool>,
) -> impl IntoView {
	let (question, set_question) = signal(String::new());

	let submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let q = question.get_untracked();
		if can_submit(&q, loading.get_untracked()) {
			on_discover.run(q.trim().to_string());
		}
	};

	view! {
		<div class="panel discovery-question">
			<h2>"Discovery Question"</h2>
			<p class="subtitle">
				"Ask a drug repurposing question and let AI agents explore the knowledge graph"
			</p>
			<form on:submit=submit>
				<textarea
					rows="3"
					placeholder="e.g., Could semaglutide treat obesity?"
					prop:value=move || question.get()
					on:input=move |ev| set_question.set(event_target_value(&ev))
					disabled=move || loading.get()
				></textarea>
				<div class="examples">
					<span>"Examples:"</span>
					{EXAMPLE_QUESTIONS
						.iter()
						.map(|example| {
							view! {
								<button
									type="button"
									class="example"
									disabled=move || loading.get()
									on:click=move |_| set_question.set(example.to_string())
								>
									{*example}
								</button>
							}
						})
						.collect_view()}
				</div>
				<Show
					when=move || loading.get()
					fallback=move || {
						view! {
							<button
								type="submit"
								class="primary"
								disabled=move || !can_submit(&question.get(), loading.get())
							>
								"Discover Hidden Connections"
							</button>
						}
					}
				>
					<button type="button" class="secondary" on:click=move |_| on_stop.run(())>
						"Discovering... (stop)"
					</button>
				</Show>
			</form>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_or_loading_cannot_submit() {
		assert!(!can_submit("", false));
		assert!(!can_submit("   \n", false));
		assert!(!can_submit("Could metformin extend lifespan?", true));
		assert!(can_submit("  Could metformin extend lifespan?  ", false));
	}
}
