//! Counter demo binary
//!
//! Builds both stores, hands them to their views, and clicks through a short
//! scenario while the mounted views print each frame.

use counter::DemoError;
use counter::counter::CounterReducer;
use counter::panel::panel_store;
use counter::view::{CounterView, PanelView};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unistore_core::AnyAction;
use unistore_runtime::Store;

fn main() -> Result<(), DemoError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "counter=debug,unistore_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Counter Demo ===\n");

    let counter_store = Store::new(CounterReducer);
    let counter_view = CounterView::new(counter_store.clone());
    let mounted = counter_view.mount(|frame| println!("  render -> {frame}"));

    println!("{}", counter_view.render());

    println!("\n>>> INCREMENT");
    counter_view.on_increment()?;
    println!("\n>>> INCREMENT");
    counter_view.on_increment()?;
    println!("\n>>> DECREMENT");
    counter_view.on_decrement()?;
    println!("\n>>> NOOP");
    counter_store.dispatch(AnyAction::new("NOOP")?)?;

    mounted.unsubscribe();
    let summary = serde_json::to_string(&*counter_store.state())?;
    tracing::info!(state = %summary, "counter scenario complete");

    println!("\n=== Panel Demo ===\n");

    let panel = PanelView::new(panel_store());
    let _mounted = panel.mount(|frame| println!("  render -> {frame}"));

    println!("{}", panel.render());

    println!("\n>>> panel/add_five");
    panel.on_add_five()?;
    println!("\n>>> panel/add_five");
    panel.on_add_five()?;
    println!("\n>>> panel/toggle_visible");
    panel.on_toggle()?;
    println!("\n>>> panel/toggle_visible");
    panel.on_toggle()?;

    println!("\n=== Final states ===");
    println!("counter: {}", serde_json::to_string(&*counter_store.state())?);
    println!("panel:   {}", panel.render());

    Ok(())
}
