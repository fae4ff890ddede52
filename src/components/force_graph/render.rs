use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use web_sys::CanvasRenderingContext2d;

use super::highlight::{HighlightPath, NODE_RADIUS, link_paint, node_paint, overlay_active};
use super::state::{ForceGraphState, LinkInfo};

const BACKGROUND: &str = "#F9FAFB";
const NODE_LABEL_COLOR: &str = "#1F2937";
const LINK_LABEL_COLOR: &str = "#6B7280";

pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	highlight: Option<&HighlightPath>,
	label_zoom_threshold: f64,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let positions = state.positions();
	let active = overlay_active(highlight);
	let on_path = |link: &LinkInfo| {
		highlight.is_some_and(|h| h.contains_link(&link.source_id, &link.target_id))
	};

	// Path edges are painted last so they sit on top of the dimmed rest.
	for emphasised in [false, true] {
		for link in state.links.iter().filter(|l| on_path(*l) == emphasised) {
			draw_link(state, ctx, &positions, link, emphasised, active, label_zoom_threshold);
		}
	}
	draw_nodes(state, ctx, highlight, active);
	ctx.restore();
}

fn draw_link(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
	link: &LinkInfo,
	highlighted: bool,
	active: bool,
	label_zoom_threshold: f64,
) {
	let (Some(&(x1, y1)), Some(&(x2, y2))) =
		(positions.get(&link.source), positions.get(&link.target))
	else {
		return;
	};
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}

	let k = state.transform.k;
	let paint = link_paint(highlighted, active, k, label_zoom_threshold);
	let (width, arrow_size) = (paint.width / k, paint.arrow_size / k);
	let target_radius = if highlighted { NODE_RADIUS * 1.6 } else { NODE_RADIUS };

	ctx.set_global_alpha(paint.alpha);
	ctx.set_stroke_style_str(paint.color);
	ctx.set_line_width(width);
	let (ux, uy) = (dx / dist, dy / dist);
	ctx.begin_path();
	ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
	ctx.line_to(
		x2 - ux * (target_radius + arrow_size),
		y2 - uy * (target_radius + arrow_size),
	);
	ctx.stroke();

	ctx.set_fill_style_str(paint.color);
	let (tip_x, tip_y) = (x2 - ux * target_radius, y2 - uy * target_radius);
	let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
	let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();

	if paint.show_label && !link.label.is_empty() {
		let font_size = 10.0 / k;
		let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
		ctx.set_font(&format!("{}px sans-serif", font_size));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let text_width = ctx
			.measure_text(&link.label)
			.map(|m| m.width())
			.unwrap_or(0.0);
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
		ctx.fill_rect(
			mx - text_width / 2.0 - 2.0 / k,
			my - font_size / 2.0 - 1.0 / k,
			text_width + 4.0 / k,
			font_size + 2.0 / k,
		);
		ctx.set_fill_style_str(if highlighted { paint.color } else { LINK_LABEL_COLOR });
		let _ = ctx.fill_text(&link.label, mx, my);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	highlight: Option<&HighlightPath>,
	active: bool,
) {
	let k = state.transform.k;
	let font_size = 12.0 / k.max(0.5);
	let on_path = |id: &str| highlight.is_some_and(|h| h.contains_node(id));

	for emphasised in [false, true] {
		state.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			let highlighted = on_path(&info.id);
			if highlighted != emphasised {
				return;
			}
			let (x, y) = (node.x() as f64, node.y() as f64);
			let paint = node_paint(info.color, highlighted, active);

			if paint.glow {
				let glow_radius = paint.radius * 2.4;
				if let Ok(gradient) =
					ctx.create_radial_gradient(x, y, paint.radius * 0.3, x, y, glow_radius)
				{
					let _ = gradient.add_color_stop(0.0, "rgba(239, 68, 68, 0.45)");
					let _ = gradient.add_color_stop(0.6, "rgba(239, 68, 68, 0.15)");
					let _ = gradient.add_color_stop(1.0, "rgba(239, 68, 68, 0)");
					ctx.begin_path();
					let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
					#[allow(deprecated)]
					ctx.set_fill_style(&gradient);
					ctx.fill();
				}
			}

			ctx.set_global_alpha(paint.alpha);
			ctx.begin_path();
			let _ = ctx.arc(x, y, paint.radius, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(paint.color);
			ctx.fill();

			if paint.glow {
				ctx.set_stroke_style_str("white");
				ctx.set_line_width(1.5 / k);
				ctx.stroke();
			}

			ctx.set_font(&format!(
				"{}{}px sans-serif",
				if highlighted { "bold " } else { "" },
				font_size
			));
			ctx.set_text_align("center");
			ctx.set_text_baseline("middle");
			ctx.set_fill_style_str(NODE_LABEL_COLOR);
			let _ = ctx.fill_text(&info.label, x, y + paint.radius + font_size);
			ctx.set_global_alpha(1.0);
		});
	}
}
