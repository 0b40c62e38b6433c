use std::path::Path;

use console::Style;
use ringcrop_core::editor::CommitOutcome;
use ringcrop_core::session::CropSession;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_crop_summary(input: &Path, outcome: &CommitOutcome, session: &CropSession) {
    let s = Styles::new();
    let settings = &outcome.settings;

    println!();
    println!("  {}", s.title.apply_to("Profile Photo"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(13)));
    println!();

    println!("  {:<14}{}", s.label.apply_to("Input"), s.path.apply_to(input.display()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(&outcome.storage_path)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Selection"),
        s.value.apply_to(format!(
            "{:.0}px at ({:.1}, {:.1})",
            settings.width, settings.x, settings.y
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Rotation"),
        s.value.apply_to(format!("{:.1}°", settings.rotation_angle))
    );
    if settings.quarter_turns != 0 {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Quarter turns"),
            s.value.apply_to(settings.quarter_turns)
        );
    }
    if let Some(metrics) = session.metrics() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Display"),
            s.value.apply_to(format!(
                "{:.0}x{:.0} in {:.0}x{:.0}",
                metrics.display_size.width,
                metrics.display_size.height,
                metrics.container.width,
                metrics.container.height
            ))
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Encoded"),
        s.value.apply_to(format!("{:.1} KB", outcome.png.len() as f64 / 1024.0))
    );
    println!();
}
