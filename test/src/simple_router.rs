use crate::data::SIMPLE_ROUTER;
use crate::test_logger;
use p4info::{MatchType, P4Id, ProgramInfo};

fn simple_router() -> Result<ProgramInfo, anyhow::Error> {
    Ok(p4info_bmv2::read(SIMPLE_ROUTER, &test_logger())?)
}

#[test]
fn actions() -> Result<(), anyhow::Error> {
    let pi = simple_router()?;

    let actions: Vec<_> = pi
        .actions()
        .map(|a| (a.id.index(), a.name.as_str(), a.params.len()))
        .collect();
    assert_eq!(
        actions,
        [
            (0, "NoAction", 0),
            (1, "_drop", 0),
            (2, "set_nhop", 2),
            (3, "set_dmac", 1),
            (4, "rewrite_mac", 1),
            (5, "NoAction", 0),
            (6, "NoAction", 0),
        ]
    );

    let set_nhop = pi.action_id_from_name("set_nhop").unwrap();
    let port = pi.action_param_id_from_name(set_nhop, "port").unwrap();
    assert_eq!(port, P4Id::action_param(set_nhop, 1).unwrap());
    assert_eq!(pi.action_param_bitwidth(port), Some(9));

    Ok(())
}

#[test]
fn fields_follow_header_order() -> Result<(), anyhow::Error> {
    let pi = simple_router()?;

    // 2 scalars + 6 standard metadata + 3 ethernet + 12 ipv4
    assert_eq!(pi.num_fields(), 23);

    let expect = [
        (0, "scalars.tmp", 32),
        (1, "scalars.metadata.nhop_ipv4", 32),
        (2, "standard_metadata.ingress_port", 9),
        (4, "standard_metadata.egress_port", 9),
        (7, "standard_metadata._padding", 3),
        (8, "ethernet.dstAddr", 48),
        (10, "ethernet.etherType", 16),
        (11, "ipv4.version", 4),
        (17, "ipv4.fragOffset", 13),
        (22, "ipv4.dstAddr", 32),
    ];
    for (index, name, bitwidth) in expect {
        let id = P4Id::field(index).unwrap();
        assert_eq!(pi.field_name(id), Some(name), "field {}", index);
        assert_eq!(pi.field_bitwidth(id), Some(bitwidth), "field {}", name);
        assert_eq!(pi.field_id_from_name(name), Some(id));
    }

    Ok(())
}

#[test]
fn tables_span_both_pipelines() -> Result<(), anyhow::Error> {
    let pi = simple_router()?;

    let names: Vec<_> = pi.tables().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["ipv4_lpm", "forward", "send_frame"]);

    let lpm = pi.table_id_from_name("ipv4_lpm").unwrap();
    let key = pi.table_match_fields(lpm).unwrap();
    assert_eq!(key.len(), 1);
    assert_eq!(key[0].name, "ipv4.dstAddr");
    assert_eq!(key[0].match_type, MatchType::Lpm);
    assert_eq!(key[0].field, P4Id::field(22).unwrap());
    assert_eq!(key[0].bitwidth, 32);

    let forward = pi.table_id_from_name("forward").unwrap();
    let key = pi.table_match_fields(forward).unwrap();
    assert_eq!(key[0].name, "scalars.metadata.nhop_ipv4");
    assert_eq!(key[0].field, P4Id::field(1).unwrap());

    let send_frame = pi.table_id_from_name("send_frame").unwrap();
    assert_eq!(send_frame, P4Id::table(2).unwrap());
    let key = pi.table_match_fields(send_frame).unwrap();
    assert_eq!(key[0].bitwidth, 9);

    let rewrite_mac = pi.action_id_from_name("rewrite_mac").unwrap();
    let set_dmac = pi.action_id_from_name("set_dmac").unwrap();
    assert_eq!(pi.table_num_actions(send_frame), Some(3));
    assert!(pi.table_is_action_of(send_frame, rewrite_mac));
    assert!(!pi.table_is_action_of(send_frame, set_dmac));
    assert_eq!(
        pi.table_action_ids(forward),
        Some(vec![
            set_dmac,
            pi.action_id_from_name("_drop").unwrap(),
            pi.action_id_from_name("NoAction").unwrap(),
        ])
    );

    Ok(())
}

#[test]
fn reading_is_deterministic() -> Result<(), anyhow::Error> {
    let a = simple_router()?;
    let b = simple_router()?;

    assert!(a.actions().eq(b.actions()));
    assert!(a.fields().eq(b.fields()));
    assert!(a.tables().eq(b.tables()));

    Ok(())
}

#[test]
fn compiler_ids_are_ignored() -> Result<(), anyhow::Error> {
    // Reverse the compiler assigned ids, the model must not change.
    let mut doc: serde_json::Value = serde_json::from_str(SIMPLE_ROUTER)?;
    let actions = doc["actions"].as_array_mut().unwrap();
    let n = actions.len();
    for (i, a) in actions.iter_mut().enumerate() {
        a["id"] = (n - i + 100).into();
    }
    for pipeline in doc["pipelines"].as_array_mut().unwrap() {
        for t in pipeline["tables"].as_array_mut().unwrap() {
            t["id"] = 77.into();
        }
    }

    let log = test_logger();
    let renumbered = p4info_bmv2::read_value(
        &doc,
        &p4info_bmv2::Settings::default(),
        &log,
    )?;
    let original = simple_router()?;

    assert!(renumbered.actions().eq(original.actions()));
    assert!(renumbered.tables().eq(original.tables()));
    assert_eq!(
        renumbered.action_id_from_name("NoAction"),
        P4Id::action(0)
    );

    Ok(())
}

#[test]
fn repeated_action_names_are_registered() -> Result<(), anyhow::Error> {
    let pi = simple_router()?;

    assert_eq!(pi.num_actions(), 7);
    let no_action: Vec<_> = pi
        .actions()
        .filter(|a| a.name == "NoAction")
        .map(|a| a.id.index())
        .collect();
    assert_eq!(no_action, [0, 5, 6]);

    // lookups by name resolve to the first registration
    assert_eq!(pi.action_id_from_name("NoAction"), P4Id::action(0));
    let send_frame = pi.table_id_from_name("send_frame").unwrap();
    assert!(pi.table_is_action_of(send_frame, P4Id::action(6).unwrap()));

    Ok(())
}

#[test]
fn repeated_table_names_across_pipelines() -> Result<(), anyhow::Error> {
    let mut doc: serde_json::Value = serde_json::from_str(SIMPLE_ROUTER)?;
    doc["pipelines"][1]["tables"][0]["name"] = "forward".into();

    let pi = p4info_bmv2::read_value(
        &doc,
        &p4info_bmv2::Settings::default(),
        &test_logger(),
    )?;

    let names: Vec<_> = pi.tables().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["ipv4_lpm", "forward", "forward"]);
    assert_eq!(pi.table_id_from_name("forward"), P4Id::table(1));
    let egress = pi.table(P4Id::table(2).unwrap()).unwrap();
    assert_eq!(egress.match_fields[0].name, "standard_metadata.egress_port");

    Ok(())
}
