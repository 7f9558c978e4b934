use ledrotation::{ConfigPatch, DashboardRegistry, DisplayItem, Error, LiveManager, RotationConfig};

fn wsm_manager() -> LiveManager {
    let registry = DashboardRegistry::new(vec![
        DisplayItem::new("Weather & Time", "/dashboard/weather-time", None),
        DisplayItem::new("Sports Scores", "/dashboard/sports-scores", None),
        DisplayItem::new("Matrix Effect", "/dashboard/matrix-effect", None),
    ])
    .unwrap();
    LiveManager::new(registry, RotationConfig::default())
}

fn current_name(manager: &LiveManager) -> String {
    manager.current().unwrap().item.name
}

#[test]
fn test_next_cycles_back_to_start() {
    let mut manager = LiveManager::builtin();
    manager.set_index(7).unwrap();
    let start = manager.current().unwrap();

    for _ in 0..manager.dashboards().len() {
        manager.next().unwrap();
    }
    assert_eq!(manager.current().unwrap(), start);
}

#[test]
fn test_previous_undoes_next() {
    let mut manager = LiveManager::builtin();
    for index in [0, 13, 39] {
        manager.set_index(index).unwrap();
        manager.next().unwrap();
        manager.previous().unwrap();
        assert_eq!(manager.current().unwrap().index as i64, index);
    }
}

#[test]
fn test_set_index_bounds() {
    let mut manager = wsm_manager();
    manager.set_index(1).unwrap();

    for index in [-1, 3] {
        let err = manager.set_index(index).unwrap_err();
        assert_eq!(err, Error::IndexOutOfRange { index, len: 3 });
        assert_eq!(manager.current().unwrap().index, 1);
    }
    assert!(manager.set_index(0).is_ok());
    assert!(manager.set_index(2).is_ok());
}

#[test]
fn test_by_name_and_identifier_reach_same_item() {
    let mut manager = LiveManager::builtin();
    let by_name = manager.by_name("weather & time").unwrap();
    manager.next().unwrap();
    let by_identifier = manager.by_name("weather-time").unwrap();
    assert_eq!(by_name, by_identifier);
    assert_eq!(by_name.item.identifier, "/dashboard/weather-time");
}

#[test]
fn test_by_name_not_found() {
    let mut manager = wsm_manager();
    manager.next().unwrap();
    assert_eq!(
        manager.by_name("tetris").unwrap_err(),
        Error::NotFound("tetris".into())
    );
    assert_eq!(current_name(&manager), "Sports Scores");
}

#[test]
fn test_custom_order_becomes_effective_list() {
    let mut manager = LiveManager::builtin();
    manager.set_index(10).unwrap();
    manager
        .update_config(ConfigPatch::default().dashboard_order(["Tetris", "Snake Game"]))
        .unwrap();

    let names: Vec<_> = manager
        .config()
        .items
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names, vec!["Tetris", "Snake Game"]);
    assert_eq!(current_name(&manager), "Tetris");
    assert_eq!(manager.current().unwrap().index, 0);

    manager.next().unwrap();
    manager.next().unwrap();
    assert_eq!(current_name(&manager), "Tetris");
}

#[test]
fn test_unresolved_order_falls_back_to_canonical() {
    let mut manager = LiveManager::builtin();
    manager
        .update_config(ConfigPatch::default().dashboard_order(["NoSuchItem"]))
        .unwrap();

    assert_eq!(manager.dashboards(), manager.all_dashboards());
    assert_eq!(manager.rotation_config().dashboard_order, vec!["NoSuchItem"]);
}

#[test]
fn test_partially_resolved_order_drops_unknown_entries() {
    let mut manager = LiveManager::builtin();
    manager
        .update_config(ConfigPatch::default().dashboard_order(["NoSuchItem", "Frogger"]))
        .unwrap();

    let names: Vec<_> = manager.dashboards().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Frogger"]);
}

#[test]
fn test_comma_separated_order_patch() {
    let patch =
        ConfigPatch::from_value(serde_json::json!({"dashboardOrder": "A, B ,C"})).unwrap();
    let mut config = RotationConfig::default();
    config.apply(patch);
    assert_eq!(config.dashboard_order, vec!["A", "B", "C"]);
}

#[test]
fn test_string_interval_is_coerced() {
    let mut manager = LiveManager::builtin();
    let patch = ConfigPatch::from_value(serde_json::json!({"rotationIntervalMs": "5000"})).unwrap();
    let config = manager.update_config(patch).unwrap();
    assert_eq!(config.rotation_interval_ms, 5000);
}

#[test]
fn test_three_item_scenario() {
    let mut manager = wsm_manager();
    assert_eq!(current_name(&manager), "Weather & Time");
    assert_eq!(manager.next().unwrap().item.name, "Sports Scores");
    assert_eq!(manager.next().unwrap().item.name, "Matrix Effect");
    assert_eq!(manager.next().unwrap().item.name, "Weather & Time");
}

#[test]
fn test_set_index_out_of_range_keeps_current() {
    let mut manager = wsm_manager();
    manager.next().unwrap();
    let before = manager.current().unwrap();
    let stamp = manager.last_update();

    assert!(manager.set_index(5).is_err());
    assert_eq!(manager.current().unwrap(), before);
    assert_eq!(manager.last_update(), stamp);
}

#[test]
fn test_empty_registry_is_rejected() {
    assert_eq!(DashboardRegistry::new(Vec::new()).unwrap_err(), Error::EmptyRegistry);
}
