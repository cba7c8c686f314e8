use console::Style;
use roiview_core::compiler::CompiledConfig;
use roiview_core::coordination::CoordinationType;
use roiview_core::consts::META_SCOPE;
use roiview_core::navigation::RoiNavigator;
use roiview_core::payload::RoiShape;
use roiview_core::registry::{ChannelDefinition, GroupRegistry, HeatmapGroup};
use roiview_core::source::Environment;
use roiview_core::transform::CoordinateTransform;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    current: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            current: Style::new().green().bold(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();
}

pub fn print_compile_summary(config: &CompiledConfig, environment: Environment) {
    let s = Styles::new();

    print_title(&s, &config.name);

    println!(
        "  {:<14}{}",
        s.label.apply_to("Version"),
        s.value.apply_to(&config.version)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Environment"),
        s.method.apply_to(environment)
    );
    if let Some(view) = config.camera() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Camera"),
            s.value.apply_to(format!(
                "x={} y={} zoom={}",
                view.target_x, view.target_y, view.zoom
            ))
        );
    }
    println!();

    // Files
    println!("  {}", s.header.apply_to("Files"));
    for file in config.datasets.iter().flat_map(|d| d.files.iter()) {
        println!(
            "    {:<24}{}",
            s.label.apply_to(&file.file_type),
            s.path.apply_to(&file.url)
        );
    }
    println!();

    // Overlays
    let tags = config
        .coordination_space
        .meta_scope(META_SCOPE, CoordinationType::SpatialSegmentationFilled);
    if tags.is_empty() {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Overlays"),
            s.disabled.apply_to("image only")
        );
    } else {
        println!("  {}", s.header.apply_to("Overlays"));
        for (i, tag) in tags.iter().enumerate() {
            println!("    {}. {}", s.label.apply_to(i + 1), s.value.apply_to(tag));
        }
    }
    println!();

    println!(
        "  {:<14}{}",
        s.header.apply_to("Panels"),
        s.value.apply_to(
            config
                .layout
                .iter()
                .map(|p| p.component.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    );
    println!();
}

pub fn print_roi_list(group: &str, navigator: &RoiNavigator, transform: &CoordinateTransform) {
    let s = Styles::new();

    print_title(&s, &format!("ROI Navigator: {group}"));

    let params = transform.params();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Transform"),
        s.value.apply_to(format!(
            "scale {}  canvas height {}  set-view zoom {}",
            params.scale, params.canvas_height, params.set_view_zoom
        ))
    );
    println!();

    if navigator.entries().is_empty() {
        println!("  {}", s.disabled.apply_to("no ROIs loaded"));
        println!();
        return;
    }

    for (i, roi) in navigator.entries().iter().enumerate() {
        let view = transform.to_viewport(roi);
        let marker = if i == navigator.current_index() { ">" } else { " " };
        let line = format!(
            "{marker} ROI {:<6} score {:.3}   stored ({:.1}, {:.1})   view ({:.1}, {:.1})",
            roi.id, roi.score, roi.position.x, roi.position.y, view.x, view.y
        );
        if i == navigator.current_index() {
            println!("  {}", s.current.apply_to(line));
        } else {
            println!("  {}", s.value.apply_to(line));
        }
    }
    println!();
}

pub fn print_shapes(shapes: &[RoiShape]) {
    let s = Styles::new();

    print_title(&s, "ROI Shapes");

    if shapes.is_empty() {
        println!("  {}", s.disabled.apply_to("none"));
    }
    for shape in shapes {
        println!(
            "  {:<20}{}  {}",
            s.value.apply_to(&shape.id),
            s.label.apply_to(format!(
                "centroid ({:.1}, {:.1}) score {:.3}",
                shape.x, shape.y, shape.score
            )),
            s.method.apply_to(shape.interactions.join(", "))
        );
    }
    println!();
}

pub fn print_registries(
    channels: &[ChannelDefinition],
    groups: &GroupRegistry,
    heatmap_groups: &[HeatmapGroup],
) {
    let s = Styles::new();

    print_title(&s, "Registries");

    println!("  {}", s.header.apply_to("Channels"));
    for ch in channels {
        println!(
            "    {:<8}{}",
            s.value.apply_to(&ch.name),
            s.label.apply_to(format!(
                "color {}  window [{}, {}]  source channel {}",
                ch.color.to_hex(),
                ch.window[0],
                ch.window[1],
                ch.target_channel_index
            ))
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Interaction Groups"));
    for group in groups.iter() {
        println!(
            "    {:<26}{}  {}",
            s.value.apply_to(&group.name),
            s.method.apply_to(&group.overlay_tag),
            s.label.apply_to(format!(
                "color {}  stroke {}  opacity {}",
                group.color.to_hex(),
                group.stroke_width,
                group.default_opacity
            ))
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Heatmap Groups"));
    for group in heatmap_groups {
        println!(
            "    {:<10}{}  {}",
            s.label.apply_to(group.payload_key()),
            s.value.apply_to(&group.name),
            s.method.apply_to(group.color.to_hex())
        );
    }
    println!();
}
