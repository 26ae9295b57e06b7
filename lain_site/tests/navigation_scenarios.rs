use std::fs;

use anyhow::Result;
use lain_site::{
    find_next_node, CursorLocation, Direction, Node, NodeKind, Site, SiteContent,
};
use tempfile::tempdir;

fn visible_at(gate_level: u8) -> impl Fn(&Node) -> bool {
    move |node: &Node| node.required_gate_level <= gate_level
}

fn step(
    content: &SiteContent,
    cursor: CursorLocation,
    direction: Direction,
    gate_level: u8,
) -> Option<(String, CursorLocation, bool)> {
    let site = content.site(Site::A).expect("demo has site A");
    let visible = visible_at(gate_level);
    find_next_node(site, cursor, direction, false, &visible)
        .expect("cursor is valid")
        .map(|hit| (hit.node.id.clone(), hit.cursor, hit.moved))
}

#[test]
fn demo_site_walks_the_ground_floor() -> Result<()> {
    let content = SiteContent::demo()?;
    let start = CursorLocation::new(0, 0, 0, 0);

    let (id, cursor, moved) = step(&content, start, Direction::Right, 0).expect("Lda002");
    assert_eq!(id, "Lda002");
    assert_eq!(cursor, CursorLocation::new(0, 0, 0, 1));
    assert!(!moved);

    let (id, cursor, _) = step(&content, cursor, Direction::Right, 0).expect("Sskn005");
    assert_eq!(id, "Sskn005");
    assert_eq!(cursor, CursorLocation::new(0, 0, 1, 2));

    let (id, cursor, _) = step(&content, start, Direction::Down, 0).expect("Sskn005 below");
    assert_eq!(id, "Sskn005");
    assert_eq!(cursor, CursorLocation::new(0, 0, 1, 2));
    Ok(())
}

#[test]
fn demo_site_climbs_to_the_next_level() -> Result<()> {
    let content = SiteContent::demo()?;
    let (id, cursor, moved) =
        step(&content, CursorLocation::new(0, 0, 0, 0), Direction::Up, 0).expect("Poly009");
    assert_eq!(id, "Poly009");
    assert_eq!(cursor, CursorLocation::new(1, 0, 1, 0));
    assert!(moved);
    Ok(())
}

#[test]
fn locked_nodes_appear_once_the_gate_opens() -> Result<()> {
    let content = SiteContent::demo()?;
    let top = CursorLocation::new(2, 0, 0, 0);
    assert_eq!(step(&content, top, Direction::Right, 0), None);

    let (id, cursor, _) = step(&content, top, Direction::Right, 2).expect("Env012");
    assert_eq!(id, "Env012");
    assert_eq!(cursor, CursorLocation::new(2, 0, 0, 1));
    Ok(())
}

#[test]
fn content_loads_from_json_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("site.json");
    fs::write(
        &path,
        r#"{
            "nodes": [{ "id": "x", "kind": "gate" }],
            "sites": [{ "site": "B", "levels": [[
                [null, null, null, null, null, null, null, "x"],
                [null, null, null, null, null, null, null, null],
                [null, null, null, null, null, null, null, null]
            ]] }]
        }"#,
    )?;

    let content = SiteContent::from_json_file(&path)?;
    assert_eq!(content.node("x").map(|node| node.kind), Some(NodeKind::Gate));
    let site = content.site(Site::B).expect("site B");
    assert_eq!(site.locate("x"), Some(CursorLocation::new(0, 7, 0, 0)));
    assert!(content.site(Site::A).is_none());
    Ok(())
}

#[test]
fn malformed_content_file_reports_its_path() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json")?;

    let err = SiteContent::from_json_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));
    Ok(())
}
