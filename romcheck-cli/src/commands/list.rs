use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romcheck_dat::systems;
use romcheck_lib::Platform;

/// List supported platforms grouped by manufacturer.
pub(crate) fn run_list() {
    log::info!("Supported platforms:");
    log::info!("");

    let mut platforms: Vec<Platform> = Platform::all().to_vec();
    // Stable: keeps declaration order within a manufacturer
    platforms.sort_by_key(|p| p.manufacturer());

    let mut current_manufacturer = "";
    for platform in platforms {
        if platform.manufacturer() != current_manufacturer {
            if !current_manufacturer.is_empty() {
                log::info!("");
            }
            current_manufacturer = platform.manufacturer();
            log::info!(
                "{}:",
                current_manufacturer.if_supports_color(Stdout, |t| t.bold()),
            );
        }

        let family = systems::source_for(platform)
            .map(|s| format!(" ({})", s.family))
            .unwrap_or_default();
        log::info!(
            "  {} [{}]{}",
            platform.short_name().if_supports_color(Stdout, |t| t.bold()),
            platform.display_name().if_supports_color(Stdout, |t| t.cyan()),
            family.if_supports_color(Stdout, |t| t.green()),
        );

        let extensions = systems::extensions_for(platform);
        if !extensions.is_empty() {
            log::info!("    Extensions: {}", extensions.join(", "));
        }
        log::info!("    Aliases: {}", platform.aliases().join(", "));
    }
}
