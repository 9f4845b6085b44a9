use globeview::prelude::*;

/// Preview lifecycle tests driven through the headless map.
/// Hover transitions are issued faster than sources finish loading.
#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    const PROJECTS: &str = include_str!("../data/projects.json");

    struct Fixture {
        map: Rc<HeadlessMap>,
        slot: MapSlot,
        hover: HoverStore,
        manager: LayerLifecycleManager,
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn fixture(style_loaded: bool) -> Fixture {
        init_logger();
        let registry = Rc::new(ProjectRegistry::from_json_str(PROJECTS).unwrap());
        let config = PreviewConfig::default();

        let map = Rc::new(HeadlessMap::new(LatLng::new(46.8, 8.2)));
        map.install_markers(&config.base_layer_id, registry.marker_collection())
            .unwrap();
        map.set_style_loaded(style_loaded);

        let slot = MapSlot::with_map(map.clone());
        let hover = HoverStore::new();
        let manager = LayerLifecycleManager::new(slot.clone(), hover.clone(), registry, config);
        manager.attach();

        Fixture {
            map,
            slot,
            hover,
            manager,
        }
    }

    fn previews(map: &HeadlessMap) -> Vec<String> {
        map.layer_ids()
            .into_iter()
            .filter(|id| id.ends_with("-preview"))
            .collect()
    }

    fn project_sources(map: &HeadlessMap) -> Vec<String> {
        map.source_ids()
            .into_iter()
            .filter(|id| id != "projects")
            .collect()
    }

    fn base_filter(map: &HeadlessMap) -> Option<Filter> {
        map.filter("project-circles")
    }

    #[test]
    fn test_hover_marks_loading_until_source_ready() {
        let f = fixture(true);

        f.hover.hover("wrf");
        assert_eq!(f.manager.loading_project_id().as_deref(), Some("wrf"));
        assert_eq!(base_filter(&f.map), Some(Filter::equals("id", "wrf")));
        assert_eq!(previews(&f.map), vec!["wrf-preview"]);

        f.map.finish_source("wrf").unwrap();
        assert_eq!(f.manager.loading_project_id(), None);
        assert_eq!(base_filter(&f.map), Some(Filter::equals("id", "wrf")));
        assert!(!f.manager.has_listener("wrf"));
        assert_eq!(f.map.listener_count(MapEventKind::SourceData), 0);
        assert_eq!(previews(&f.map), vec!["wrf-preview"]);
    }

    #[test]
    fn test_clearing_hover_removes_everything() {
        let f = fixture(true);
        f.hover.hover("wrf");
        f.map.finish_source("wrf").unwrap();

        f.hover.clear();
        assert!(previews(&f.map).is_empty());
        assert!(project_sources(&f.map).is_empty());
        assert_eq!(base_filter(&f.map), None);
        assert_eq!(f.manager.loading_project_id(), None);
    }

    #[test]
    fn test_clearing_hover_mid_load_drops_listener() {
        let f = fixture(true);
        f.hover.hover("wrf");
        f.hover.clear();

        assert_eq!(f.manager.listener_count(), 0);
        assert_eq!(f.map.listener_count(MapEventKind::SourceData), 0);
        assert_eq!(f.manager.loading_project_id(), None);
    }

    #[test]
    fn test_preview_sits_directly_under_markers() {
        let f = fixture(true);
        f.hover.hover("buildings");
        assert_eq!(
            f.map.layer_ids(),
            vec!["buildings-preview", "project-circles"]
        );
        assert_eq!(
            f.map.layer("buildings-preview").unwrap().source.as_deref(),
            Some("buildings")
        );
    }

    #[test]
    fn test_rapid_churn_converges_to_final_target() {
        let f = fixture(true);

        f.hover.hover("wrf");
        f.hover.hover("buildings");
        f.hover.hover("wrf");

        assert_eq!(previews(&f.map), vec!["wrf-preview"]);
        assert_eq!(project_sources(&f.map), vec!["wrf"]);
        assert_eq!(f.manager.listener_count(), 1);
        assert!(f.manager.has_listener("wrf"));
        assert_eq!(f.map.listener_count(MapEventKind::SourceData), 1);
        assert_eq!(f.manager.loading_project_id().as_deref(), Some("wrf"));

        f.map.finish_source("wrf").unwrap();
        assert_eq!(f.manager.loading_project_id(), None);
        assert_eq!(f.manager.listener_count(), 0);
    }

    #[test]
    fn test_long_churn_sequences() {
        let sequences: Vec<Vec<Option<&str>>> = vec![
            vec![Some("wrf"), Some("buildings"), Some("roads_swiss_statistics")],
            vec![Some("wrf"), None, Some("wrf"), Some("dave_flows_work"), Some("buildings")],
            vec![Some("hourly_adult_population"), Some("wrf"), None],
            vec![Some("dave_flows_work"), Some("wrf"), Some("building_heights_china"), None],
        ];

        for sequence in sequences {
            let f = fixture(true);
            for target in &sequence {
                f.hover.set(*target);
            }

            let last = *sequence.last().unwrap();
            match last {
                Some(id) => {
                    assert_eq!(previews(&f.map), vec![format!("{}-preview", id)]);
                    assert_eq!(project_sources(&f.map), vec![id.to_string()]);
                    assert_eq!(f.manager.listener_count(), 1);
                    assert_eq!(f.map.listener_count(MapEventKind::SourceData), 1);
                }
                None => {
                    assert!(previews(&f.map).is_empty());
                    assert!(project_sources(&f.map).is_empty());
                    assert_eq!(f.manager.listener_count(), 0);
                    assert_eq!(f.map.listener_count(MapEventKind::SourceData), 0);
                }
            }
        }
    }

    #[test]
    fn test_superseded_completion_is_ignored() {
        let f = fixture(true);
        f.hover.hover("wrf");
        f.hover.hover("buildings");

        // late data event for a source that is no longer previewed
        f.map.emit(&MapEvent::source_loaded("wrf"));

        assert_eq!(f.manager.loading_project_id().as_deref(), Some("buildings"));
        assert_eq!(base_filter(&f.map), Some(Filter::equals("id", "buildings")));
        assert!(f.manager.has_listener("buildings"));
    }

    #[test]
    fn test_remove_unmounted_is_noop() {
        let f = fixture(true);
        f.manager.remove_preview("wrf");
        f.manager.remove_all_previews();
        assert_eq!(f.map.layer_ids(), vec!["project-circles"]);
        assert_eq!(f.map.source_ids(), vec!["projects"]);
    }

    #[test]
    fn test_remount_never_duplicates() {
        let f = fixture(true);
        f.hover.hover("wrf");
        f.manager.handle_transition(Some("wrf"), Some("wrf"));
        f.manager.handle_transition(None, Some("wrf"));

        assert_eq!(project_sources(&f.map), vec!["wrf"]);
        assert_eq!(previews(&f.map), vec!["wrf-preview"]);
        assert_eq!(f.map.listener_count(MapEventKind::SourceData), 1);
        assert_eq!(f.manager.loading_project_id().as_deref(), Some("wrf"));
    }

    #[test]
    fn test_mount_failure_resets_loading() {
        let f = fixture(true);
        f.map.reject_layer("wrf-preview");

        f.hover.hover("wrf");
        assert_eq!(f.manager.loading_project_id(), None);
        assert!(previews(&f.map).is_empty());
        assert!(project_sources(&f.map).is_empty());
        assert_eq!(f.manager.listener_count(), 0);

        // the next transition works normally
        f.hover.hover("buildings");
        assert_eq!(previews(&f.map), vec!["buildings-preview"]);
        assert_eq!(f.manager.loading_project_id().as_deref(), Some("buildings"));
    }

    #[test]
    fn test_project_without_layer() {
        let f = fixture(true);
        f.hover.hover("dave_flows_work");

        assert_eq!(f.manager.loading_project_id(), None);
        assert!(previews(&f.map).is_empty());
        assert_eq!(
            base_filter(&f.map),
            Some(Filter::equals("id", "dave_flows_work"))
        );
    }

    #[test]
    fn test_transition_waits_for_style() {
        let f = fixture(false);

        f.hover.hover("wrf");
        f.hover.hover("buildings");
        assert!(previews(&f.map).is_empty());
        assert!(f.manager.has_deferred_transition());
        assert_eq!(f.map.listener_count(MapEventKind::StyleData), 1);

        f.map.set_style_loaded(true);
        assert!(!f.manager.has_deferred_transition());
        assert_eq!(previews(&f.map), vec!["buildings-preview"]);
        assert_eq!(f.manager.loading_project_id().as_deref(), Some("buildings"));
        assert_eq!(base_filter(&f.map), Some(Filter::equals("id", "buildings")));
    }

    #[test]
    fn test_stale_deferred_transition_does_nothing() {
        let f = fixture(false);
        f.hover.hover("wrf");

        // while the map is gone the next transition cannot re-queue
        let map = f.slot.detach().unwrap();
        f.hover.hover("buildings");
        f.slot.attach(map);

        f.map.set_style_loaded(true);
        assert!(previews(&f.map).is_empty());
        assert_eq!(f.manager.loading_project_id(), None);
        assert_eq!(base_filter(&f.map), None);
    }

    #[test]
    fn test_watcher_redirecting_hover() {
        init_logger();
        let registry = Rc::new(ProjectRegistry::from_json_str(PROJECTS).unwrap());
        let config = PreviewConfig::default();
        let map = Rc::new(HeadlessMap::new(LatLng::new(46.8, 8.2)));
        map.install_markers(&config.base_layer_id, registry.marker_collection())
            .unwrap();
        map.set_style_loaded(true);

        // registered ahead of the manager: bounces "buildings" to "wrf"
        let hover = HoverStore::new();
        let writer = hover.clone();
        hover.subscribe(Rc::new(move |_: Option<&str>, new: Option<&str>| {
            if new == Some("buildings") {
                writer.hover("wrf");
            }
        }));
        let manager = LayerLifecycleManager::new(
            MapSlot::with_map(map.clone()),
            hover.clone(),
            registry,
            config,
        );
        manager.attach();

        hover.hover("buildings");
        assert_eq!(hover.get().as_deref(), Some("wrf"));
        assert_eq!(previews(&map), vec!["wrf-preview"]);
        assert_eq!(project_sources(&map), vec!["wrf"]);
        assert_eq!(manager.listener_count(), 1);
        assert_eq!(map.listener_count(MapEventKind::SourceData), 1);
        assert_eq!(manager.loading_project_id().as_deref(), Some("wrf"));
        assert_eq!(base_filter(&map), Some(Filter::equals("id", "wrf")));
    }

    #[test]
    fn test_no_map_is_noop() {
        let registry = Rc::new(ProjectRegistry::from_json_str(PROJECTS).unwrap());
        let hover = HoverStore::new();
        let manager = LayerLifecycleManager::new(
            MapSlot::new(),
            hover.clone(),
            registry,
            PreviewConfig::default(),
        );
        manager.attach();

        hover.hover("wrf");
        hover.clear();
        assert_eq!(manager.loading_project_id(), None);
        assert_eq!(manager.listener_count(), 0);
    }
}
