//! Card presenting a completed discovery.

use leptos::prelude::*;

use crate::discovery::DiscoveryResult;
use crate::discovery::report::{self, PathStats, SectionTone};

fn tone_class(tone: SectionTone) -> &'static str {
	match tone {
		SectionTone::Plain => "section",
		SectionTone::Success => "section section-success",
		SectionTone::Highlight => "section section-highlight",
		SectionTone::Warning => "section section-warning",
	}
}

/// Hypothesis, path statistics, narrative sections and next steps.
#[component]
pub fn DiscoveryResultCard(
	/// Result of the finished session.
	result: DiscoveryResult,
	/// Dismisses the card.
	on_close: Callback<()>,
) -> impl IntoView {
	let stats = PathStats::from(&result);
	let sections = report::sections(&result);
	let next_steps = report::next_steps(&result);
	let mechanism = result.top_path.mechanism.clone();

	view! {
		<div class="panel discovery-result">
			<header>
				<div>
					<h2>"Discovery Result"</h2>
					<p class="pair">
						<span class="drug">{result.drug.clone()}</span>
						" → "
						<span class="disease">{result.disease.clone()}</span>
					</p>
				</div>
				<button class="close" on:click=move |_| on_close.run(())>
					"×"
				</button>
			</header>

			{sections
				.into_iter()
				.map(|section| {
					view! {
						<div class=tone_class(section.tone)>
							<h3>{section.title}</h3>
							<p>{section.body}</p>
						</div>
					}
				})
				.collect_view()}

			<div class="stat-tiles">
				<div class="tile">
					<strong>{stats.hops}</strong>
					<span>"hops"</span>
				</div>
				<div class="tile">
					<strong>{format!("{}%", stats.confidence_pct)}</strong>
					<span>"confidence"</span>
				</div>
				<div class="tile">
					<strong>{stats.hidden_links}</strong>
					<span>"hidden links"</span>
				</div>
			</div>

			{(!next_steps.is_empty())
				.then(|| {
					view! {
						<div class="section">
							<h3>"Recommended Next Steps"</h3>
							<ol>
								{next_steps.into_iter().map(|step| view! { <li>{step}</li> }).collect_view()}
							</ol>
						</div>
					}
				})}

			{(!mechanism.trim().is_empty())
				.then(|| {
					view! {
						<details class="pathway">
							<summary>"View Detailed Pathway →"</summary>
							<pre>{mechanism}</pre>
						</details>
					}
				})}

			<div class="overall-score">
				<span>"Repurposing Opportunity Score:"</span>
				<strong>{format!("{}/100", stats.overall_score_pct)}</strong>
			</div>
		</div>
	}
}
