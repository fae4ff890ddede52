//! Publication upload panel.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;
use web_sys::HtmlInputElement;

use super::force_graph::{ColorBy, Palette};
use crate::api::{self, UploadResult};
use crate::config::{AppConfig, UPLOAD_PUBLICATION_PATH};

const PREVIEW_CHARS: usize = 500;

/// Upload a publication and show what the backend extracted from it.
#[component]
pub fn PublicationUpload() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let endpoint = config.endpoint(UPLOAD_PUBLICATION_PATH);
	let (uploading, set_uploading) = signal(false);
	let (result, set_result) = signal(None::<UploadResult>);

	let on_change = move |ev: leptos::ev::Event| {
		let input: HtmlInputElement = event_target(&ev);
		let Some(file) = input.files().and_then(|files| files.get(0)) else {
			return;
		};
		set_uploading.set(true);
		set_result.set(None);
		let endpoint = endpoint.clone();
		spawn_local(async move {
			let outcome = match api::upload_publication(&endpoint, &file).await {
				Ok(result) => result,
				Err(e) => {
					warn!("upload of {} failed: {}", file.name(), e);
					UploadResult::failed(file.name(), e.to_string())
				}
			};
			set_result.set(Some(outcome));
			set_uploading.set(false);
		});
	};

	let palette = Palette::for_taxonomy(ColorBy::EntityType);

	view! {
		<div class="panel publication-upload">
			<h2>"Upload Publication"</h2>
			<label>
				"Select a scientific publication (TXT or PDF)"
				<input
					type="file"
					accept=".txt,.pdf"
					on:change=on_change
					disabled=move || uploading.get()
				/>
			</label>
			<Show when=move || uploading.get()>
				<p class="graph-status">"Uploading and extracting..."</p>
			</Show>
			{move || {
				result
					.get()
					.map(|res| {
						if res.success {
							let count = res.triplet_count.unwrap_or(res.triplets().len());
							let preview = res.preview(PREVIEW_CHARS);
							let triplets = res
								.triplets()
								.iter()
								.map(|t| {
									view! {
										<li class="triplet">
											<span
												class="chip"
												style=format!("background: {};", palette.color(&t.subject_type))
											>
												{t.subject.clone()}
											</span>
											<em>{t.predicate.clone()}</em>
											<span
												class="chip"
												style=format!("background: {};", palette.color(&t.object_type))
											>
												{t.object.clone()}
											</span>
										</li>
									}
								})
								.collect_view();
							view! {
								<div class="banner banner-success">
									<p>{format!("Uploaded {}", res.filename)}</p>
									<pre class="preview">{preview}</pre>
									<h3>{format!("Extracted relationships ({})", count)}</h3>
									<ul class="triplets">{triplets}</ul>
								</div>
							}
								.into_any()
						} else {
							let message = res.error.unwrap_or_else(|| "Upload failed".to_string());
							view! { <div class="banner banner-error">"Error: " {message}</div> }.into_any()
						}
					})
			}}
		</div>
	}
}
