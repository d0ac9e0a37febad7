//! Preset command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use spark_engine::Preset;

use crate::utils::{
    add_table_row, create_table, format_budget, format_chance, format_range, format_rgb,
};

#[derive(Subcommand)]
pub enum PresetCommands {
    /// List the built-in presets
    List,

    /// Show the full configuration of a preset
    Show {
        /// Preset name (branching, wobble, meteor)
        name: String,

        /// Print the configuration as JSON, suitable for `simulate --config`
        #[arg(long)]
        json: bool,
    },
}

pub fn execute(cmd: PresetCommands) -> Result<()> {
    match cmd {
        PresetCommands::List => handle_list(),
        PresetCommands::Show { name, json } => handle_show(&name, json),
    }
}

fn handle_list() -> Result<()> {
    let mut table = create_table(&["Name", "Capacity", "Trail", "Branching", "Description"]);
    for preset in Preset::ALL {
        let config = preset.config();
        add_table_row(
            &mut table,
            vec![
                preset.name().to_string(),
                config.capacity.to_string(),
                config.trail_length.to_string(),
                format_budget(config.branch.budget),
                preset.description().to_string(),
            ],
        );
    }
    table.printstd();
    Ok(())
}

fn handle_show(name: &str, json: bool) -> Result<()> {
    let preset: Preset = name.parse()?;
    let config = preset.config();
    log::debug!("Showing preset {preset}");

    if json {
        let text = serde_json::to_string_pretty(&config)
            .with_context(|| format!("Failed to serialize preset {preset}"))?;
        println!("{text}");
        return Ok(());
    }

    println!("\n{}", style(format!("Preset: {preset}")).bold().underlined());
    println!("{}\n", preset.description());

    let branch = &config.branch;
    let mut table = create_table(&["Property", "Value"]);
    let rows = [
        ("Capacity", config.capacity.to_string()),
        ("Gravity", format!("{:.2}", config.gravity)),
        ("Drag", format!("{:.2} per 1/60 s", config.drag)),
        ("Trail length", config.trail_length.to_string()),
        ("Branch chance", format_chance(branch.chance)),
        ("Branch window", format_range(branch.life_window)),
        (
            "Children",
            format!("{} .. {}", branch.child_count.0, branch.child_count.1),
        ),
        ("Child speed", format_range(branch.child_speed)),
        (
            "Velocity inheritance",
            format!("{:.2}", branch.velocity_inheritance),
        ),
        ("Child life scale", format!("{:.2}", branch.life_scale)),
        ("Child size scale", format!("{:.2}", branch.size_scale)),
        ("Branch budget", format_budget(branch.budget)),
        ("Point size scale", format!("{:.1}", config.point_size_scale)),
        ("Size floor", format!("{:.2}", config.size_floor)),
        ("Trail tint", format_rgb(config.trail_tint)),
        (
            "Wobble",
            config.wobble.as_ref().map_or_else(
                || "none".to_string(),
                |w| {
                    format!(
                        "freq {:.1}, phase {:.1}, amp {:.3}",
                        w.frequency, w.phase_scale, w.amplitude
                    )
                },
            ),
        ),
    ];
    for (property, value) in rows {
        add_table_row(&mut table, vec![property.to_string(), value]);
    }
    table.printstd();

    println!("\n{}", style("Color at life ratio").bold());
    let mut colors = create_table(&["Ratio", "RGB", "Point size"]);
    for ratio in [1.0, 0.75, 0.5, 0.25, 0.0] {
        add_table_row(
            &mut colors,
            vec![
                format!("{ratio:.2}"),
                format_rgb(config.color.rgb(ratio)),
                format!("{:.1}", config.size_curve(ratio)),
            ],
        );
    }
    colors.printstd();

    Ok(())
}
