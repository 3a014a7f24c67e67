//! Plays a scripted reading session against the simulated page and logs
//! every step.
//!
//! ```text
//! RUST_LOG=info,scrollreel_engine=debug cargo run -p walkthrough -- [config.json] [--phone]
//! ```

use anyhow::Context;
use scrollreel_core::Size;
use scrollreel_engine::{EngineConfig, Item, ItemList};
use scrollreel_sim::{HEADER_HEIGHT, Harness};
use web_time::Duration;

fn load_config(path: Option<&str>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading config from {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config in {path}"))
}

fn chapters(key: u64, n: u64) -> ItemList {
    ItemList::new(
        key,
        (0..n).map(|i| Item::new(i, format!("Chapter {}", i + 1))).collect(),
    )
}

fn report(sim: &Harness, step: &str) -> anyhow::Result<()> {
    let snapshot = serde_json::to_string(&sim.snapshot())?;
    log::info!("{step}: {snapshot}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let phone = args.iter().any(|a| a == "--phone");
    let config = load_config(args.iter().map(String::as_str).find(|a| !a.starts_with("--")))?;
    let viewport = if phone {
        Size {
            width: 390.0,
            height: 844.0,
        }
    } else {
        Size {
            width: 1280.0,
            height: 800.0,
        }
    };

    let mut sim = Harness::new(config, chapters(1, 5), viewport);
    let section = sim.viewer().section_layout()[0].extent;
    log::info!(
        "mounted {:?} with {}px sections",
        sim.viewer().engine().device_class(),
        section
    );
    report(&sim, "mount")?;

    // Read most of the first chapter, then pause long enough to count as a
    // finished gesture.
    sim.scroll_to(HEADER_HEIGHT + 0.75 * section, 24.0);
    report(&sim, "pulled")?;
    sim.idle(Duration::from_millis(1000));
    report(&sim, "after pause")?;

    sim.click_nav(3)?;
    report(&sim, "clicked chapter 4")?;
    sim.idle(Duration::from_millis(900));
    report(&sim, "settled")?;

    sim.navigate_previous()?;
    sim.idle(Duration::from_millis(900));
    report(&sim, "previous")?;

    sim.replace_items(chapters(1, 2));
    sim.idle(Duration::from_millis(200));
    report(&sim, "list shrank")?;

    log::info!(
        "{} commits {:?}, {} updates published",
        sim.commits().len(),
        sim.commits(),
        sim.update_count()
    );
    sim.unmount();
    Ok(())
}
