//! Knowledge graph panel: snapshot fetch, legend and the canvas.

use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use super::force_graph::palette::category_label;
use super::force_graph::{
	ColorBy, ForceGraphCanvas, GraphData, HighlightPath, Palette, SurfaceSize,
};
use crate::api;
use crate::config::{AppConfig, GRAPH_DATA_PATH};

/// Lifecycle of the one snapshot fetch a mounted view makes.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphLoad {
	/// Fetch in flight.
	Loading,
	/// Fetch failed, with the message shown in place of the graph.
	Failed(String),
	/// Snapshot ready to draw.
	Ready(GraphData),
}

/// Knowledge graph panel: fetches the snapshot once and hands it to the canvas.
///
/// A failed fetch stays failed until the view is mounted again.
#[component]
pub fn GraphView(
	/// Path to emphasise, `None` for the plain graph.
	#[prop(into)]
	highlight: Signal<Option<HighlightPath>>,
) -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let (load, set_load) = signal(GraphLoad::Loading);
	let surface = RwSignal::new(SurfaceSize::new(config.graph_height));
	let container_ref = NodeRef::<leptos::html::Div>::new();

	let endpoint = config.endpoint(GRAPH_DATA_PATH);
	Effect::new(move |_| {
		let endpoint = endpoint.clone();
		spawn_local(async move {
			match api::fetch_graph(&endpoint).await {
				Ok(data) => set_load.set(GraphLoad::Ready(data)),
				Err(e) => {
					warn!("graph snapshot fetch failed: {}", e);
					set_load.set(GraphLoad::Failed(e.to_string()));
				}
			}
		});
	});

	let measure = move || {
		if let Some(el) = container_ref.get_untracked() {
			let width = el.client_width() as f64;
			surface.update(|s| {
				s.observe_width(width);
			});
		}
	};
	Effect::new(move |_| {
		if container_ref.get().is_some() {
			measure();
		}
	});
	let resize_handle = window_event_listener(ev::resize, move |_| measure());
	on_cleanup(move || resize_handle.remove());

	let width = Signal::derive(move || surface.get().width());
	let height = config.graph_height;
	let color_by = config.color_by;
	let label_zoom_threshold = config.label_zoom_threshold;

	view! {
		<div class="panel graph-panel">
			<h2>"Knowledge Graph"</h2>
			<div node_ref=container_ref class="graph-surface" style=format!("min-height: {}px;", height)>
				{move || match load.get() {
					GraphLoad::Loading => {
						view! { <div class="graph-status">"Loading knowledge graph..."</div> }
							.into_any()
					}
					GraphLoad::Failed(message) => {
						view! { <div class="banner banner-error">"Error: " {message}</div> }
							.into_any()
					}
					GraphLoad::Ready(data) => {
						let legend = legend_entries(&data, color_by);
						let totals = format!(
							"{} entities • {} relationships",
							data.nodes.len(),
							data.links.len(),
						);
						view! {
							<ForceGraphCanvas
								data=data
								highlight=highlight
								width=width
								height=height
								color_by=color_by
								label_zoom_threshold=label_zoom_threshold
							/>
							<ul class="graph-legend">
								{legend
									.into_iter()
									.map(|(label, color, count)| {
										view! {
											<li>
												<span class="swatch" style=format!("background: {};", color)></span>
												{format!("{} ({})", label, count)}
											</li>
										}
									})
									.collect_view()}
							</ul>
							<p class="graph-footer">
								{totals}
								<br />
								<small>"Drag nodes to rearrange • Scroll to zoom • Drag background to pan"</small>
							</p>
						}
							.into_any()
					}
				}}
			</div>
		</div>
	}
}

/// `(label, color, count)` per category present in the snapshot.
fn legend_entries(data: &GraphData, color_by: ColorBy) -> Vec<(String, &'static str, usize)> {
	let palette = Palette::for_taxonomy(color_by);
	data.category_counts(color_by)
		.into_iter()
		.map(|(category, count)| (category_label(&category), palette.color(&category), count))
		.collect()
}
