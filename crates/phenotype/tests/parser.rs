use std::fs;
use std::path::Path;

use phenotype::{load, Rig, STICK_WALK_RIG};
use physics::Vec2;

fn data(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
        .display()
        .to_string()
}

#[test]
fn parse_box_rig() {
    let json = fs::read_to_string(data("box.json")).unwrap();
    let rig = Rig::parse(&json).unwrap();
    assert_eq!(rig.entities.len(), 2);
    let names: Vec<_> = rig.entities.names().collect();
    assert_eq!(names, ["box", "marker"]);
    assert!(rig.entities.get("marker").unwrap().rigid_body.is_none());
}

#[test]
fn box_rig_keeps_authored_corners() {
    let state = load(Some(Path::new(&data("box.json")))).unwrap();
    let body = state.rigid_body("box").unwrap();
    assert_eq!(body.particle_count(), 4);
    assert_eq!(
        body.endpoints("d"),
        Some((Vec2::new(20.0, 0.0), Vec2::new(0.0, 0.0)))
    );
    assert!(state.entity("marker").unwrap().rigid_body().is_none());
}

#[test]
fn stick_walk_skeleton_joints_are_shared() {
    let state = Rig::parse(STICK_WALK_RIG).unwrap().into_state().unwrap();
    let skeleton = state.rigid_body("skeleton").unwrap();

    let torso = skeleton.edge("torso").unwrap();
    let neck = skeleton.edge("neck").unwrap();
    let head = skeleton.edge("head").unwrap();
    let left_arm = skeleton.edge("leftArm").unwrap();
    let left_upper = skeleton.edge("leftUpperLeg").unwrap();
    let left_lower = skeleton.edge("leftLowerLeg").unwrap();

    assert_eq!(neck.begin(), torso.end());
    assert_eq!(head.begin(), neck.end());
    assert_eq!(left_arm.begin(), neck.begin());
    assert_eq!(left_upper.begin(), torso.begin());
    assert_eq!(left_lower.begin(), left_upper.end());

    let order: Vec<_> = skeleton.resolve().into_iter().map(|e| e.name).collect();
    let position = |name: &str| order.iter().position(|n| n == name).unwrap();
    assert_eq!(order[0], "torso");
    assert!(position("neck") < position("head"));
    assert!(position("leftUpperLeg") < position("leftLowerLeg"));
}

#[test]
fn cyclic_rig_is_rejected() {
    let err = load(Some(Path::new(&data("cyclic.json")))).unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("cycle"), "{chain}");
    assert!(chain.contains("knot"), "{chain}");
}

#[test]
fn dangling_parent_is_rejected() {
    let err = load(Some(Path::new(&data("dangling_parent.json")))).unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("leftUpperLeft"), "{chain}");
}

#[test]
fn unknown_field_is_rejected() {
    let json = fs::read_to_string(data("unknown_field.json")).unwrap();
    let err = Rig::parse(&json).unwrap_err();
    assert!(format!("{err:#}").contains("colour"));
}

#[test]
fn missing_mass_is_rejected() {
    let json = fs::read_to_string(data("missing_mass.json")).unwrap();
    let err = Rig::parse(&json).unwrap_err();
    assert!(format!("{err:#}").contains("mass"));
}

#[test]
fn duplicate_edge_is_rejected() {
    let json = fs::read_to_string(data("duplicate_edge.json")).unwrap();
    let err = Rig::parse(&json).unwrap_err();
    assert!(format!("{err:#}").contains("duplicate key `main`"));
}

#[test]
fn missing_file_is_reported() {
    let err = Rig::from_path(data("no_such_rig.json")).unwrap_err();
    assert!(format!("{err:#}").contains("no_such_rig.json"));
}
