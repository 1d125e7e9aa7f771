mod common;

use common::{BOOT_POOL, TANK, ZEEPOOL};
use zpstat::{parse_status, parse_status_all, DeviceKind, DeviceState, ParseError};

#[test]
fn zeepool_end_to_end() {
    let pool = parse_status(ZEEPOOL).expect("zeepool parses");

    assert_eq!(pool.name, "zeepool");
    assert_eq!(pool.state, "DEGRADED");
    assert_eq!(pool.see, "http://www.sun.com/msg/ZFS-8000-2Q");
    assert_eq!(pool.scrub, "none requested");
    assert_eq!(pool.errors, "No known data errors");
    assert!(pool.status.ends_with("functioning in a degraded state."));
    assert_eq!((pool.read_errors, pool.write_errors, pool.checksum_errors), (0, 0, 0));

    let tree = &pool.devices;
    assert_eq!(tree.roots().len(), 1);
    let mirror = tree.node(tree.roots()[0]);
    assert_eq!(mirror.name, "mirror-0");
    assert_eq!(mirror.kind, DeviceKind::Mirror);

    let children: Vec<_> = mirror.children.iter().map(|id| tree.node(*id)).collect();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].name, "c1t2d0");
    assert_eq!(children[0].kind, DeviceKind::Block);
    assert_eq!(children[1].name, "spare-1");
    assert_eq!(children[1].kind, DeviceKind::Spare);

    let replacements: Vec<_> = children[1].children.iter().map(|id| tree.node(*id)).collect();
    assert_eq!(replacements.len(), 2);
    assert_eq!(replacements[0].name, "c2t3d0");
    assert_eq!(replacements[0].message.as_deref(), Some("90K resilvered"));
    assert_eq!(replacements[1].name, "c2t1d0");
    assert_eq!(replacements[1].message, None);

    assert_eq!(pool.spares.len(), 1);
    assert_eq!(pool.spares[0].name, "c2t3d0");
    assert_eq!(pool.spares[0].state, DeviceState::InUse);
    assert_eq!(pool.spares[0].message.as_deref(), Some("currently in use"));
}

#[test]
fn parent_links_reach_a_root() {
    for report in [ZEEPOOL, TANK, BOOT_POOL] {
        let pool = parse_status(report).unwrap();
        let tree = &pool.devices;
        for (id, node) in tree.iter() {
            if tree.roots().contains(&id) {
                assert!(node.parent.is_none());
                continue;
            }
            let parent = node.parent.expect("non-root has a parent");
            assert!(tree.children(parent).contains(&id));
            let top = tree.ancestors(id).last().unwrap();
            assert!(tree.roots().contains(&top));
        }
    }
}

#[test]
fn tab_indented_raidz_report() {
    let pool = parse_status(TANK).unwrap();
    assert_eq!(pool.state_kind(), DeviceState::Online);
    assert_eq!(pool.scrub_summary(), "ok (Feb 9 2026)");

    let tree = &pool.devices;
    let roots: Vec<_> = tree.roots().iter().map(|id| tree.node(*id)).collect();
    assert_eq!(roots.len(), 2);
    assert!(roots.iter().all(|r| r.kind == DeviceKind::Raidz2 && r.children.len() == 4));

    let sdc = tree.find("sdc").unwrap();
    assert_eq!(tree.node(sdc).checksum_errors, 2);
    assert_eq!(tree.depth(sdc), 2);
    assert_eq!(pool.total_errors(), 2);
    assert!(pool.spares.is_empty());
}

#[test]
fn multi_pool_dump_keeps_order() {
    let dump = format!("{}\n{}", BOOT_POOL, TANK);
    let pools = parse_status_all(&dump).unwrap();
    let names: Vec<_> = pools.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["boot-pool", "tank"]);
    assert_eq!(pools[0].devices.len(), 1);
    assert_eq!(pools[1].devices.len(), 10);
}

#[test]
fn malformed_device_line_is_an_error_not_a_panic() {
    let broken = ZEEPOOL.replace("c1t2d0    ONLINE       0     0     0", "c1t2d0    ONLINE       0     0");
    assert!(matches!(
        parse_status(&broken),
        Err(ParseError::MalformedLine { found: 4, .. })
    ));
}

#[test]
fn json_encoding_is_tree_shaped() {
    let pool = parse_status(ZEEPOOL).unwrap();
    let v = serde_json::to_value(&pool).unwrap();

    assert_eq!(v["name"], "zeepool");
    assert!(v.get("size").is_none());
    let mirror = &v["devices"][0];
    assert_eq!(mirror["kind"], "mirror");
    assert_eq!(mirror["state"], "ONLINE");
    assert_eq!(mirror["children"][1]["children"][0]["message"], "90K resilvered");
    assert_eq!(v["spares"][0]["state"], "INUSE");
}
