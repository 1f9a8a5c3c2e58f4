//! Integration tests for scene files: constraint listings and solved frames.

use anchor_pins::{
    attach_child, fill_in, solve_scene, Descriptor, EdgeInsets, Relation, Scene, SceneError,
    ViewTree,
};

fn listing(tree: &ViewTree) -> String {
    tree.views()
        .flat_map(|view| tree.constraints_of(view))
        .map(|c| c.description().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_programmatic_listing() {
    let mut tree = ViewTree::default();
    let card = tree.add_view("card");
    let title = tree.add_view("title");

    let root = tree.root();
    fill_in(&mut tree, root, card, EdgeInsets::uniform(8.0)).unwrap();
    attach_child(
        &mut tree,
        card,
        title,
        &[
            Descriptor::top(Relation::EqualTo(12.0)),
            Descriptor::center_x(Relation::equal()),
            Descriptor::height(44.0),
            Descriptor::width_to(Relation::AtMost(-24.0)),
        ],
    )
    .unwrap();

    insta::assert_snapshot!(listing(&tree), @r###"
    card.top == root.top + 8
    card.bottom == root.bottom - 8
    card.leading == root.leading + 8
    card.trailing == root.trailing - 8
    title.top == card.top + 12
    title.center_x == card.center_x
    title.height == 44
    title.width <= card.width - 24
    "###);
}

#[test]
fn test_scene_listing_matches_file_order() {
    let tree = solve_scene(
        r#"
[root]
width = 320
height = 200

[[views]]
name = "avatar"
pins = [
    { anchor = "leading", offset = 16 },
    { anchor = "center_y" },
    { anchor = "width", constant = 40 },
    { anchor = "height", constant = 40 },
]

[[views]]
name = "caption"
reference = "avatar"
pins = [
    { anchor = "leading", target = "trailing", offset = 8 },
    { anchor = "center_y" },
    { anchor = "height", constant = 20 },
    { anchor = "width", constant = 100 },
]
"#,
    )
    .unwrap();

    insta::assert_snapshot!(listing(&tree), @r###"
    avatar.leading == root.leading + 16
    avatar.center_y == root.center_y
    avatar.width == 40
    avatar.height == 40
    caption.leading == avatar.trailing + 8
    caption.center_y == avatar.center_y
    caption.height == 20
    caption.width == 100
    "###);
}

#[test]
fn test_scene_frames() {
    let tree = solve_scene(
        r#"
[root]
width = 320
height = 200

[[views]]
name = "avatar"
pins = [
    { anchor = "leading", offset = 16 },
    { anchor = "center_y" },
    { anchor = "width", constant = 40 },
    { anchor = "height", constant = 40 },
]

[[views]]
name = "caption"
reference = "avatar"
pins = [
    { anchor = "leading", target = "trailing", offset = 8 },
    { anchor = "center_y" },
    { anchor = "height", constant = 20 },
    { anchor = "width", constant = 100 },
]

[[views]]
name = "fixed"
frame = { x = 1, y = 2, width = 3, height = 4 }
"#,
    )
    .unwrap();

    let frame = |name: &str| tree.frame(tree.find(name).unwrap()).unwrap();
    let avatar = frame("avatar");
    let caption = frame("caption");
    let fixed = frame("fixed");

    assert!((avatar.x - 16.0).abs() < 0.001);
    assert!((avatar.y - 80.0).abs() < 0.001);
    assert!((avatar.height - 40.0).abs() < 0.001);
    assert!((caption.x - 64.0).abs() < 0.001);
    assert!((caption.y - 90.0).abs() < 0.001);
    assert!((fixed.width - 3.0).abs() < 0.001);
    assert!((fixed.y - 2.0).abs() < 0.001);
}

#[test]
fn test_nested_scene_with_fill_and_center() {
    let tree = solve_scene(
        r#"
[root]
width = 400
height = 300

[[views]]
name = "panel"
fill = { top = 20, leading = 20, bottom = 20, trailing = 20 }

[[views]]
name = "button"
parent = "panel"
center_x = 0
center_y = 10
pins = [
    { anchor = "width", constant = 120 },
    { anchor = "height", constant = 40 },
]
"#,
    )
    .unwrap();

    let button = tree.frame(tree.find("button").unwrap()).unwrap();
    assert!((button.center_x() - 200.0).abs() < 0.001, "{:?}", button);
    assert!((button.center_y() - 160.0).abs() < 0.001, "{:?}", button);
}

#[test]
fn test_unknown_anchor_in_scene() {
    let scene = Scene::from_str(
        r#"
[[views]]
name = "a"
pins = [{ anchor = "middle" }]
"#,
    )
    .unwrap();
    let err = scene.build().err().expect("unknown anchor should fail");
    assert!(matches!(err, SceneError::Pin { .. }));
    assert!(err.to_string().contains("middle"));
}
