use globeview::prelude::*;
use std::time::Duration;
use tokio::time::sleep;

const DEFAULT_PROJECTS: &str = include_str!("../../data/projects.json");

/// Headless demo session: loads the project registry, spins the globe and
/// replays a short scripted hover/drag sequence against an in-memory map.
#[tokio::main(flavor = "current_thread")]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    globeview::init_logging();

    let registry = match std::env::args().nth(1) {
        Some(path) => ProjectRegistry::from_path(path)?,
        None => ProjectRegistry::from_json_str(DEFAULT_PROJECTS)?,
    };
    let config = match std::env::args().nth(2) {
        Some(path) => SessionConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SessionConfig::default(),
    };
    log::info!("loaded {} projects", registry.len());

    let local = tokio::task::LocalSet::new();
    local.run_until(run(Rc::new(registry), config)).await
}

async fn run(
    registry: Rc<ProjectRegistry>,
    config: SessionConfig,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let map = Rc::new(HeadlessMap::new(LatLng::new(30.0, 0.0)));
    map.install_markers(&config.preview.base_layer_id, registry.marker_collection())?;

    let hover = HoverStore::new();
    let host = Rc::new(LocalFrameHost::new(config.animation.frame_interval()));
    let session = MapSession::new(config, registry.clone(), hover.clone(), host);
    session.attach_map(map.clone());
    session.start();

    let step = Duration::from_millis(250);
    sleep(step).await;
    map.set_style_loaded(true);
    log::info!("style loaded, center {:?}", map.center());

    let Some(target) = registry.layers().first().map(|layer| layer.id.clone()) else {
        log::warn!("registry has no previewable projects");
        session.teardown();
        return Ok(());
    };

    hover.hover(&target);
    log::info!(
        "hovering {}, loading: {:?}",
        target,
        session.layers().loading_project_id()
    );
    sleep(step).await;
    map.finish_source(&target)?;
    log::info!(
        "source ready, loading: {:?}, center {:?}",
        session.layers().loading_project_id(),
        map.center()
    );

    hover.clear();
    sleep(step).await;
    log::info!("hover cleared, layers {:?}", map.layer_ids());

    map.emit(&MapEvent::DragStart);
    let held = map.center();
    sleep(step).await;
    log::info!("dragging, camera held: {}", map.center() == held);
    map.emit(&MapEvent::DragEnd);
    sleep(step).await;
    log::info!("released, center {:?}", map.center());

    session.teardown();
    log::info!("teardown complete, {} listeners left", map.total_listeners());
    Ok(())
}
